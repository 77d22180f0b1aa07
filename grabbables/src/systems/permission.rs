use std::time::Duration;

use futures_util::future::LocalBoxFuture;
use log::{debug, error, warn};
use tokio::task::JoinHandle;

use crate::{
    components::{GlobalId, GrabDecision, Grabbable},
    contexts::{host_context::HostOutbox, HostContext, HostMessage},
    events::{GrabRequest, RequestGrabResponse},
    GrabbableError,
};

/// Sends the single response a grab request is owed.
///
/// `respond` and `deny` consume the responder, and a responder dropped without answering (its
/// decision panicked, or the task deciding was cancelled) denies the request with the original ids.
/// Whatever happens, the grabber hears back exactly once.
pub struct GrabResponder {
    host: HostOutbox,
    sender: GlobalId,
    request: GrabRequest,
    use_identity_transform: Option<bool>,
    responded: bool,
}

impl GrabResponder {
    /// Create a responder for `request`, answering on behalf of `sender`
    pub fn new(
        sender: GlobalId,
        request: GrabRequest,
        use_identity_transform: Option<bool>,
        host: &HostContext,
    ) -> Self {
        Self {
            host: host.outbox(),
            sender,
            request,
            use_identity_transform,
            responded: false,
        }
    }

    /// Answer with the owner's decision, substituting any proxy ids it names
    pub fn respond(mut self, decision: GrabDecision) {
        let response = RequestGrabResponse {
            sender: self.sender,
            grabbable: decision.proxy_grabbable.unwrap_or(self.request.grabbable),
            handle: decision.proxy_handle.unwrap_or(self.request.handle),
            grabber: self.request.grabber,
            request_id: self.request.request_id,
            allowed: decision.allowed,
            use_identity_transform: self.use_identity_transform.filter(|_| decision.allowed),
        };
        self.send(response);
    }

    /// Refuse the grab, reporting the ids exactly as they were requested
    pub fn deny(mut self) {
        let response = self.original_denial();
        self.send(response);
    }

    fn original_denial(&self) -> RequestGrabResponse {
        RequestGrabResponse {
            sender: self.sender,
            grabbable: self.request.grabbable,
            handle: self.request.handle,
            grabber: self.request.grabber,
            request_id: self.request.request_id,
            allowed: false,
            use_identity_transform: None,
        }
    }

    fn send(&mut self, response: RequestGrabResponse) {
        if self.responded {
            warn!(
                "[GRABBABLES] Ignoring second response to grab request {}",
                self.request.request_id
            );
            return;
        }
        self.responded = true;

        debug!(
            "[GRABBABLES] {} {} grab request {} from {}",
            self.sender,
            if response.allowed { "approved" } else { "denied" },
            response.request_id,
            response.grabber,
        );
        let _ = self.host.send(HostMessage::RequestGrabResponse(response));
    }
}

impl Drop for GrabResponder {
    fn drop(&mut self) {
        if !self.responded {
            error!("[GRABBABLES] {}", GrabbableError::DecisionAborted);
            let response = self.original_denial();
            self.send(response);
        }
    }
}

/// Answer a grab request on behalf of `grabbable`.
///
/// Without an owner gate the grab is approved on the spot. Otherwise the owner's decision is
/// queued on the host's decision queue and the response is sent when it settles, so the grabbable
/// keeps processing events in the meantime. The response uses the ids captured here, however the
/// grabbable's state changes while the decision is outstanding.
pub fn request_grab(
    grabbable: &mut Grabbable,
    request: GrabRequest,
    host: &HostContext,
) -> Option<JoinHandle<()>> {
    let use_identity_transform = grabbable
        .config
        .grab_with_identity_transform
        .then_some(true);
    let responder = GrabResponder::new(grabbable.id, request, use_identity_transform, host);

    let Some(decide) = grabbable.config.on_grab_request.as_mut() else {
        responder.respond(GrabDecision::allow());
        return None;
    };

    let decision = decide(request);
    let timeout = grabbable.config.grab_request_timeout;
    Some(host.spawn_decision(settle(decision, timeout, responder)))
}

async fn settle(
    decision: LocalBoxFuture<'static, anyhow::Result<GrabDecision>>,
    timeout: Option<Duration>,
    responder: GrabResponder,
) {
    let outcome = match timeout {
        Some(limit) => match tokio::time::timeout(limit, decision).await {
            Ok(outcome) => outcome.map_err(GrabbableError::from),
            Err(_) => Err(GrabbableError::DecisionTimedOut(limit)),
        },
        None => decision.await.map_err(GrabbableError::from),
    };

    match outcome {
        Ok(decision) => responder.respond(decision),
        Err(e) => {
            error!(
                "[GRABBABLES] Unable to decide grab request {} from {}, denying: {e:?}",
                responder.request.request_id, responder.request.grabber
            );
            responder.deny();
        }
    }
}
