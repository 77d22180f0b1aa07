use std::{future::Future, rc::Rc};

use log::error;
use tokio::{
    sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
    task::{JoinHandle, LocalSet},
};

use crate::{
    components::{GlobalId, NodeDescriptor},
    events::RequestGrabResponse,
    GrabbableError, GrabbableResult,
};

/// Something a grabbable needs the host to do
#[derive(Debug, Clone, PartialEq)]
pub enum HostMessage {
    /// Create or update the grabbable's scene-graph node
    PublishNode(NodeDescriptor),
    /// Route grab events addressed to this node to its grabbable
    RegisterGrabHandler(GlobalId),
    /// Route interface events addressed to this node to its grabbable
    RegisterInterfaceHandler(GlobalId),
    /// Stop routing interface events to this node
    UnregisterInterfaceHandler(GlobalId),
    /// The node is gone; forget everything about it
    UnregisterNode(GlobalId),
    /// Answer a grab request
    RequestGrabResponse(RequestGrabResponse),
}

/// The sending half of the host channel, without the decision queue.
/// Held by work that lives on the decision queue itself.
#[derive(Debug, Clone)]
pub(crate) struct HostOutbox {
    sender: UnboundedSender<HostMessage>,
}

impl HostOutbox {
    pub(crate) fn send(&self, message: HostMessage) -> GrabbableResult<()> {
        self.sender.send(message).map_err(|e| {
            error!("[GRABBABLES] Host went away, dropping {:?}", e.0);
            GrabbableError::HostDisconnected
        })
    }
}

/// The grabbables' way of talking to the host scene graph.
///
/// Also owns the queue that owners' grab decisions wait on. Queued decisions make progress while
/// the host drives [`HostContext::run_until`], and any still outstanding when the last clone of
/// the context is dropped are denied.
///
/// Cheap to clone; every clone feeds the same receiver and the same queue.
#[derive(Debug, Clone)]
pub struct HostContext {
    outbox: HostOutbox,
    decisions: Rc<LocalSet>,
}

impl HostContext {
    /// Create a context, along with the receiver the host should drain
    pub fn new() -> (Self, UnboundedReceiver<HostMessage>) {
        let (sender, receiver) = unbounded_channel();
        let host = Self {
            outbox: HostOutbox { sender },
            decisions: Rc::new(LocalSet::new()),
        };
        (host, receiver)
    }

    /// Send a message to the host
    pub fn send(&self, message: HostMessage) -> GrabbableResult<()> {
        self.outbox.send(message)
    }

    /// Is anyone still listening?
    pub fn is_connected(&self) -> bool {
        !self.outbox.sender.is_closed()
    }

    /// Run `future` to completion, driving outstanding grab decisions alongside it.
    /// Must be awaited from within a tokio runtime.
    pub async fn run_until<F: Future>(&self, future: F) -> F::Output {
        self.decisions.run_until(future).await
    }

    pub(crate) fn outbox(&self) -> HostOutbox {
        self.outbox.clone()
    }

    /// Queue a decision. Never runs it in place, so this works with or without a runtime.
    pub(crate) fn spawn_decision<F>(&self, decision: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + 'static,
    {
        self.decisions.spawn_local(decision)
    }
}
