use std::{future::Future, time::Duration};

use futures_util::future::{FutureExt, LocalBoxFuture};
use glam::Affine3A;
use serde_json::Value;

use super::{
    GlobalId, GrabConstraint, GrabbableHighlight, HighlightSnapshot, InterfaceProcessor,
    InterfaceTable, NodeDescriptor,
};
use crate::{
    contexts::HostContext,
    events::{GrabEvent, GrabRequest, InterfaceEvent},
    systems, GrabbableResult,
};

/// How long an owner gets to decide on a grab request before it is denied
pub const DEFAULT_GRAB_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Told about every observable change to a grabbable's state
pub type HighlightCallback = Box<dyn FnMut(&HighlightSnapshot)>;
/// Decides, asynchronously, whether a grab may go ahead
pub type GrabRequestCallback =
    Box<dyn FnMut(GrabRequest) -> LocalBoxFuture<'static, anyhow::Result<GrabDecision>>>;
/// Called with `(parent_from_node, universe_from_node)` whenever the node moves
pub type TransformCallback = Box<dyn FnMut(Affine3A, Affine3A)>;

/// How a grabbable interacts with hooks while it is being held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HookInteraction {
    /// Ignore hooks entirely
    #[default]
    None,
    /// Highlight nearby hooks, but never drop onto them
    HighlightOnly,
    /// Highlight nearby hooks and allow dropping onto them
    HighlightAndDrop,
}

impl HookInteraction {
    /// Should hooks light up while this grabbable is held near them?
    pub fn highlights_hooks(self) -> bool {
        matches!(
            self,
            HookInteraction::HighlightOnly | HookInteraction::HighlightAndDrop
        )
    }

    /// May this grabbable be dropped onto a hook?
    pub fn allows_drop(self) -> bool {
        self == HookInteraction::HighlightAndDrop
    }
}

/// An owner's verdict on a grab request.
///
/// An owner can approve the grab on behalf of a different grabbable or handle (a gadget handing
/// out a freshly spawned object, say) by filling in the proxy ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GrabDecision {
    /// May the grab go ahead?
    pub allowed: bool,
    /// Grabbable to report as grabbed instead of the requested one
    pub proxy_grabbable: Option<GlobalId>,
    /// Handle to report as grabbed instead of the requested one
    pub proxy_handle: Option<GlobalId>,
}

impl GrabDecision {
    /// Let the grab happen as requested
    pub fn allow() -> Self {
        GrabDecision {
            allowed: true,
            ..Default::default()
        }
    }

    /// Refuse the grab
    pub fn deny() -> Self {
        Default::default()
    }

    /// Let the grab happen, but on a different grabbable and handle
    pub fn allow_via_proxy(grabbable: GlobalId, handle: GlobalId) -> Self {
        GrabDecision {
            allowed: true,
            proxy_grabbable: Some(grabbable),
            proxy_handle: Some(handle),
        }
    }
}

/// Everything an owner can configure about a grabbable. May be swapped out wholesale with
/// [`Grabbable::set_config`].
pub struct GrabbableConfig {
    /// Limits applied while grabbed
    pub constraint: Option<GrabConstraint>,
    /// Where the node starts, relative to its parent
    pub initial_transform: Option<Affine3A>,
    /// Hook highlighting and dropping
    pub hook_interaction: HookInteraction,
    /// Keep the dropped world transform rather than snapping back
    pub preserve_drop_transform: bool,
    /// Grab at an identity offset rather than keeping the grabber-relative offset
    pub grab_with_identity_transform: bool,
    /// Show the grab indicator. Unset means shown.
    pub show_grab_indicator: Option<bool>,
    /// Advertised interfaces, in priority order
    pub interfaces: InterfaceTable,
    /// Deny grab requests whose decision takes longer than this. `None` waits forever.
    pub grab_request_timeout: Option<Duration>,
    /// Owner notification
    pub update_highlight: Option<HighlightCallback>,
    /// Owner grab gate. Without one, every grab is approved.
    pub on_grab_request: Option<GrabRequestCallback>,
    /// Owner transform notification
    pub on_transform_updated: Option<TransformCallback>,
}

impl Default for GrabbableConfig {
    fn default() -> Self {
        Self {
            constraint: None,
            initial_transform: None,
            hook_interaction: HookInteraction::None,
            preserve_drop_transform: false,
            grab_with_identity_transform: false,
            show_grab_indicator: None,
            interfaces: InterfaceTable::default(),
            grab_request_timeout: Some(DEFAULT_GRAB_REQUEST_TIMEOUT),
            update_highlight: None,
            on_grab_request: None,
            on_transform_updated: None,
        }
    }
}

impl GrabbableConfig {
    /// Start building a configuration
    pub fn builder() -> GrabbableConfigBuilder {
        Default::default()
    }
}

/// Builder for [`GrabbableConfig`]
#[derive(Default)]
pub struct GrabbableConfigBuilder {
    config: GrabbableConfig,
}

impl GrabbableConfigBuilder {
    /// Constrain the grabbable while held
    pub fn constraint(mut self, constraint: Option<GrabConstraint>) -> Self {
        self.config.constraint = constraint;
        self
    }

    /// Set the node's starting transform
    pub fn initial_transform(mut self, transform: Option<Affine3A>) -> Self {
        self.config.initial_transform = transform;
        self
    }

    /// Set how the grabbable treats hooks
    pub fn hook_interaction(mut self, hook_interaction: HookInteraction) -> Self {
        self.config.hook_interaction = hook_interaction;
        self
    }

    /// Keep the dropped world transform
    pub fn preserve_drop_transform(mut self, preserve: bool) -> Self {
        self.config.preserve_drop_transform = preserve;
        self
    }

    /// Grab at an identity offset
    pub fn grab_with_identity_transform(mut self, identity: bool) -> Self {
        self.config.grab_with_identity_transform = identity;
        self
    }

    /// Show or hide the grab indicator
    pub fn show_grab_indicator(mut self, show: bool) -> Self {
        self.config.show_grab_indicator = Some(show);
        self
    }

    /// Replace the advertised interfaces
    pub fn interfaces(mut self, interfaces: InterfaceTable) -> Self {
        self.config.interfaces = interfaces;
        self
    }

    /// Advertise one more interface, at the lowest priority so far
    pub fn interface(mut self, name: impl Into<String>) -> Self {
        self.config.interfaces.insert(name, None);
        self
    }

    /// Advertise one more interface and process its events
    pub fn interface_processor(
        mut self,
        name: impl Into<String>,
        processor: impl FnMut(GlobalId, &Value) + 'static,
    ) -> Self {
        self.config
            .interfaces
            .insert(name, Some(Box::new(processor) as InterfaceProcessor));
        self
    }

    /// Change how long grab decisions may take
    pub fn grab_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.grab_request_timeout = timeout;
        self
    }

    /// Be told about every observable state change
    pub fn update_highlight(mut self, callback: impl FnMut(&HighlightSnapshot) + 'static) -> Self {
        self.config.update_highlight = Some(Box::new(callback));
        self
    }

    /// Decide on grab requests yourself
    pub fn on_grab_request<F, Fut>(mut self, mut decide: F) -> Self
    where
        F: FnMut(GrabRequest) -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<GrabDecision>> + 'static,
    {
        self.config.on_grab_request = Some(Box::new(move |request| decide(request).boxed_local()));
        self
    }

    /// Be told whenever the node moves
    pub fn on_transform_updated(mut self, callback: impl FnMut(Affine3A, Affine3A) + 'static) -> Self {
        self.config.on_transform_updated = Some(Box::new(callback));
        self
    }

    /// Build the [`GrabbableConfig`]
    pub fn build(self) -> GrabbableConfig {
        self.config
    }
}

/// The hook a grabbable is tethered to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HookTether {
    /// The hook's address
    pub hook: GlobalId,
    /// Rigid transform from the grabbable to the hook
    pub hook_from_grabbable: Affine3A,
}

/// Runtime state of a grabbable. Only ever changed by the grabbable's own event handling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrabbableState {
    /// Current interaction phase
    pub highlight: GrabbableHighlight,
    /// The grabber handle currently associated with the grabbable
    pub handle: Option<GlobalId>,
    /// Present while tethered to a hook
    pub tether: Option<HookTether>,
    /// The hook in range, only while [`GrabbableHighlight::InHookRange`]
    pub nearby_hook: Option<GlobalId>,
    /// The interface negotiated with the nearby hook
    pub interface_name: Option<String>,
}

impl GrabbableState {
    /// Is the grabbable tethered to a hook?
    pub fn is_tethered(&self) -> bool {
        self.tether.is_some()
    }

    /// The externally visible part of the state
    pub fn snapshot(&self) -> HighlightSnapshot {
        HighlightSnapshot {
            highlight: self.highlight,
            handle: self.handle,
            tethered: self.is_tethered(),
            interface_name: self.interface_name.clone(),
            nearby_hook: self.nearby_hook,
        }
    }
}

/// A scene node that can be grabbed, moved, highlighted and dropped onto hooks.
///
/// Owns its runtime state exclusively: the only way to change it is to feed it events with
/// [`Grabbable::handle_grab_event`].
pub struct Grabbable {
    pub(crate) id: GlobalId,
    pub(crate) config: GrabbableConfig,
    pub(crate) state: GrabbableState,
    pub(crate) last_notified: HighlightSnapshot,
    pub(crate) published: Option<NodeDescriptor>,
    pub(crate) interface_handler_registered: bool,
    pub(crate) mounted: bool,
}

impl Grabbable {
    /// Create a grabbable at the node the host assigned it
    pub fn new(id: GlobalId, config: GrabbableConfig) -> Self {
        Self {
            id,
            config,
            state: Default::default(),
            last_notified: Default::default(),
            published: None,
            interface_handler_registered: false,
            mounted: false,
        }
    }

    /// This grabbable's node identity
    pub fn id(&self) -> GlobalId {
        self.id
    }

    /// Current runtime state
    pub fn state(&self) -> &GrabbableState {
        &self.state
    }

    /// Current interaction phase
    pub fn highlight(&self) -> GrabbableHighlight {
        self.state.highlight
    }

    /// Is the grabbable tethered to a hook?
    pub fn is_tethered(&self) -> bool {
        self.state.is_tethered()
    }

    /// Current configuration
    pub fn config(&self) -> &GrabbableConfig {
        &self.config
    }

    /// Has this grabbable been mounted into a host?
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Describe the node this grabbable wants the host to create
    pub fn node_descriptor(&self) -> NodeDescriptor {
        systems::materialize::materialize_node(self)
    }

    /// Register with the host and publish the node
    pub fn mount(&mut self, host: &HostContext) -> GrabbableResult<()> {
        systems::materialize::mount(self, host)
    }

    /// Tell the host this grabbable is gone
    pub fn unmount(&mut self, host: &HostContext) -> GrabbableResult<()> {
        systems::materialize::unmount(self, host)
    }

    /// Replace the configuration, republishing the node if anything visible changed
    pub fn set_config(&mut self, config: GrabbableConfig, host: &HostContext) {
        self.config = config;
        if self.mounted {
            systems::materialize::sync_with_host(self, host);
        }
    }

    /// Handle an event from the grabber. Returns the new snapshot if the owner was notified.
    pub fn handle_grab_event(
        &mut self,
        event: GrabEvent,
        host: &HostContext,
    ) -> Option<HighlightSnapshot> {
        systems::grab_events::grab_event_system(self, event, host)
    }

    /// Hand an interface event to the matching processor
    pub fn handle_interface_event(&mut self, event: InterfaceEvent) {
        systems::interface_events::interface_event_system(self, event)
    }
}
