use std::collections::{hash_map::Entry, HashMap};

use log::{trace, warn};

use super::HostContext;
use crate::{
    components::{GlobalId, Grabbable, HighlightSnapshot, StandardGrabbable},
    events::{GrabEvent, InterfaceEvent},
    GrabbableError, GrabbableResult,
};

/// Anything the registry can route grab and interface events to
pub trait GrabEventSink {
    /// The core grabbable doing the work
    fn grabbable(&self) -> &Grabbable;
    /// Register with the host and publish the node
    fn mount(&mut self, host: &HostContext) -> GrabbableResult<()>;
    /// Tell the host the node is gone
    fn unmount(&mut self, host: &HostContext) -> GrabbableResult<()>;
    /// Handle a grab event
    fn handle_grab_event(
        &mut self,
        event: GrabEvent,
        host: &HostContext,
    ) -> Option<HighlightSnapshot>;
    /// Handle an interface event
    fn handle_interface_event(&mut self, event: InterfaceEvent);
}

impl GrabEventSink for Grabbable {
    fn grabbable(&self) -> &Grabbable {
        self
    }

    fn mount(&mut self, host: &HostContext) -> GrabbableResult<()> {
        Grabbable::mount(self, host)
    }

    fn unmount(&mut self, host: &HostContext) -> GrabbableResult<()> {
        Grabbable::unmount(self, host)
    }

    fn handle_grab_event(
        &mut self,
        event: GrabEvent,
        host: &HostContext,
    ) -> Option<HighlightSnapshot> {
        Grabbable::handle_grab_event(self, event, host)
    }

    fn handle_interface_event(&mut self, event: InterfaceEvent) {
        Grabbable::handle_interface_event(self, event)
    }
}

impl GrabEventSink for StandardGrabbable {
    fn grabbable(&self) -> &Grabbable {
        self.core()
    }

    fn mount(&mut self, host: &HostContext) -> GrabbableResult<()> {
        StandardGrabbable::mount(self, host)
    }

    fn unmount(&mut self, host: &HostContext) -> GrabbableResult<()> {
        StandardGrabbable::unmount(self, host)
    }

    fn handle_grab_event(
        &mut self,
        event: GrabEvent,
        host: &HostContext,
    ) -> Option<HighlightSnapshot> {
        StandardGrabbable::handle_grab_event(self, event, host)
    }

    fn handle_interface_event(&mut self, event: InterfaceEvent) {
        StandardGrabbable::handle_interface_event(self, event)
    }
}

/// Binds node identities to the grabbables mounted at them, and routes the host's events.
/// Each identity is owned by exactly one grabbable for as long as it is mounted.
pub struct GrabbableRegistry {
    host: HostContext,
    grabbables: HashMap<GlobalId, Box<dyn GrabEventSink>>,
}

impl GrabbableRegistry {
    /// Create an empty registry talking to `host`
    pub fn new(host: HostContext) -> Self {
        Self {
            host,
            grabbables: Default::default(),
        }
    }

    /// The host this registry talks to
    pub fn host(&self) -> &HostContext {
        &self.host
    }

    /// Mount a grabbable at its node identity
    pub fn mount(&mut self, grabbable: impl GrabEventSink + 'static) -> GrabbableResult<GlobalId> {
        let id = grabbable.grabbable().id();
        if self.grabbables.contains_key(&id) {
            return Err(GrabbableError::DuplicateNode(id));
        }

        let mut grabbable: Box<dyn GrabEventSink> = Box::new(grabbable);
        grabbable.mount(&self.host)?;
        self.grabbables.insert(id, grabbable);
        Ok(id)
    }

    /// Unmount the grabbable at `id`, handing it back.
    /// If the host can't be told, the grabbable stays mounted here.
    pub fn unmount(&mut self, id: GlobalId) -> GrabbableResult<Box<dyn GrabEventSink>> {
        match self.grabbables.entry(id) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().unmount(&self.host)?;
                Ok(entry.remove())
            }
            Entry::Vacant(_) => Err(GrabbableError::UnknownNode(id)),
        }
    }

    /// The grabbable mounted at `id`
    pub fn get(&self, id: GlobalId) -> Option<&Grabbable> {
        self.grabbables.get(&id).map(|g| g.grabbable())
    }

    /// Number of mounted grabbables
    pub fn len(&self) -> usize {
        self.grabbables.len()
    }

    /// Is nothing mounted?
    pub fn is_empty(&self) -> bool {
        self.grabbables.is_empty()
    }

    /// Deliver a grab event to the grabbable at `target`
    pub fn dispatch_grab_event(
        &mut self,
        target: GlobalId,
        event: GrabEvent,
    ) -> GrabbableResult<Option<HighlightSnapshot>> {
        let Some(grabbable) = self.grabbables.get_mut(&target) else {
            warn!("[GRABBABLES] Grab event {event:?} for unknown node {target}");
            return Err(GrabbableError::UnknownNode(target));
        };

        trace!("[GRABBABLES] {target} <- {event:?}");
        Ok(grabbable.handle_grab_event(event, &self.host))
    }

    /// Deliver an interface event to the grabbable at `target`
    pub fn dispatch_interface_event(
        &mut self,
        target: GlobalId,
        event: InterfaceEvent,
    ) -> GrabbableResult<()> {
        let Some(grabbable) = self.grabbables.get_mut(&target) else {
            warn!(
                "[GRABBABLES] Interface event {} for unknown node {target}",
                event.interface
            );
            return Err(GrabbableError::UnknownNode(target));
        };

        grabbable.handle_interface_event(event);
        Ok(())
    }
}
