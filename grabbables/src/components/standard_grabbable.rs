use std::{future::Future, time::Duration};

use glam::{Affine3A, Vec3, Vec4};

use super::{
    GlobalId, GrabConstraint, GrabDecision, Grabbable, GrabbableConfig, GrabbableConfigBuilder,
    GrabbableHighlight, HighlightSnapshot, HookInteraction, InterfaceTable, NodeDescriptor,
};
use crate::{
    contexts::HostContext,
    events::{GrabEvent, GrabRequest, InterfaceEvent},
    systems, GrabbableResult,
};

/// When a standard grabbable's child content is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShowGrabbableChildren {
    /// Always
    #[default]
    Always,
    /// Only while held
    OnlyWhenGrabbed,
    /// Only while not held
    OnlyWhenNotGrabbed,
}

impl ShowGrabbableChildren {
    /// Are children visible in this phase?
    pub fn is_visible(self, highlight: GrabbableHighlight) -> bool {
        match self {
            ShowGrabbableChildren::Always => true,
            ShowGrabbableChildren::OnlyWhenGrabbed => highlight.is_grabbed(),
            ShowGrabbableChildren::OnlyWhenNotGrabbed => !highlight.is_grabbed(),
        }
    }
}

/// Where a standard grabbable ends up when let go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropStyle {
    /// Onto hooks. Dropped anywhere else, it returns to where it was.
    #[default]
    DropOnHooks,
    /// Wherever it was let go
    DropInTheWorld,
}

impl DropStyle {
    /// The core hook policy this style implies
    pub fn hook_interaction(self) -> HookInteraction {
        match self {
            DropStyle::DropOnHooks => HookInteraction::HighlightAndDrop,
            DropStyle::DropInTheWorld => HookInteraction::None,
        }
    }

    /// Does this style keep the transform the grabbable was dropped at?
    pub fn preserve_drop_transform(self) -> bool {
        self == DropStyle::DropInTheWorld
    }

    fn apply(self, mut config: GrabbableConfig) -> GrabbableConfig {
        config.hook_interaction = self.hook_interaction();
        config.preserve_drop_transform = self.preserve_drop_transform();
        config
    }
}

/// The invisible volume a grabber has to touch to grab the handle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum HitVolume {
    /// The bounding box of the handle model
    #[default]
    ModelBox,
    /// A sphere around the handle's origin
    Sphere {
        /// Radius, in metres
        radius: f32,
    },
    /// A box around the handle's origin
    Cuboid {
        /// Half the box's size along each axis, in metres
        half_extents: Vec3,
    },
}

/// What the host should draw for the handle
#[derive(Debug, Clone, PartialEq)]
pub struct HandleVisual {
    /// Model to load
    pub model_uri: String,
    /// Scale to draw it at
    pub scale: Vec3,
    /// Tint, if any
    pub color: Option<Vec4>,
    /// Grab volume
    pub hit_volume: HitVolume,
}

/// Everything the host needs to present a standard grabbable
#[derive(Debug, Clone, PartialEq)]
pub struct StandardGrabbableView {
    /// The core grabbable's node
    pub node: NodeDescriptor,
    /// The handle's model and hit volume
    pub handle: HandleVisual,
    /// Should the child content be shown?
    pub children_visible: bool,
}

/// Called on a grab edge
pub type GrabEdgeCallback = Box<dyn FnMut()>;

/// A grabbable with a model for a handle and a simple drop policy.
///
/// Rather than the four highlight states, owners hear about two edges: the grab starting
/// ([`StandardGrabbableBuilder::on_grab`]) and ending ([`StandardGrabbableBuilder::on_end_grab`]).
/// Hovering near a hook counts as still being held.
pub struct StandardGrabbable {
    pub(crate) core: Grabbable,
    pub(crate) style: DropStyle,
    pub(crate) highlight: GrabbableHighlight,
    pub(crate) model_uri: String,
    pub(crate) model_scale: f32,
    pub(crate) model_color: Option<Vec4>,
    pub(crate) hit_volume: HitVolume,
    pub(crate) show_children: ShowGrabbableChildren,
    pub(crate) on_grab: Option<GrabEdgeCallback>,
    pub(crate) on_end_grab: Option<GrabEdgeCallback>,
}

impl StandardGrabbable {
    /// Start building a standard grabbable with the given handle model
    pub fn builder(model_uri: impl Into<String>) -> StandardGrabbableBuilder {
        StandardGrabbableBuilder::new(model_uri)
    }

    /// The core grabbable
    pub fn core(&self) -> &Grabbable {
        &self.core
    }

    /// Where this grabbable ends up when dropped
    pub fn style(&self) -> DropStyle {
        self.style
    }

    /// Replace the core configuration between renders. The drop style still decides the hook
    /// policy and whether the drop transform is kept, whatever `config` says about them.
    pub fn set_config(&mut self, config: GrabbableConfig, host: &HostContext) {
        let config = self.style.apply(config);
        self.core.set_config(config, host)
    }

    /// The last highlight the core reported
    pub fn highlight(&self) -> GrabbableHighlight {
        self.highlight
    }

    /// Everything the host needs to draw this grabbable right now
    pub fn view(&self) -> StandardGrabbableView {
        StandardGrabbableView {
            node: self.core.node_descriptor(),
            handle: systems::standard_grabbable::handle_visual(self),
            children_visible: self.show_children.is_visible(self.highlight),
        }
    }

    /// Register with the host and publish the node
    pub fn mount(&mut self, host: &HostContext) -> GrabbableResult<()> {
        self.core.mount(host)
    }

    /// Tell the host this grabbable is gone
    pub fn unmount(&mut self, host: &HostContext) -> GrabbableResult<()> {
        self.core.unmount(host)
    }

    /// Handle an event from the grabber, firing the grab edge callbacks as needed
    pub fn handle_grab_event(
        &mut self,
        event: GrabEvent,
        host: &HostContext,
    ) -> Option<HighlightSnapshot> {
        let snapshot = self.core.handle_grab_event(event, host)?;
        systems::standard_grabbable::apply_highlight(self, snapshot.highlight);
        Some(snapshot)
    }

    /// Hand an interface event to the matching processor
    pub fn handle_interface_event(&mut self, event: InterfaceEvent) {
        self.core.handle_interface_event(event)
    }
}

/// Builder for [`StandardGrabbable`]
pub struct StandardGrabbableBuilder {
    core: GrabbableConfigBuilder,
    style: DropStyle,
    model_uri: String,
    model_scale: f32,
    model_color: Option<Vec4>,
    hit_volume: HitVolume,
    show_children: ShowGrabbableChildren,
    on_grab: Option<GrabEdgeCallback>,
    on_end_grab: Option<GrabEdgeCallback>,
}

impl StandardGrabbableBuilder {
    /// Create a builder for a grabbable drawn with the model at `model_uri`
    pub fn new(model_uri: impl Into<String>) -> Self {
        Self {
            core: GrabbableConfig::builder(),
            style: Default::default(),
            model_uri: model_uri.into(),
            model_scale: 1.0,
            model_color: None,
            hit_volume: Default::default(),
            show_children: Default::default(),
            on_grab: None,
            on_end_grab: None,
        }
    }

    /// Scale the handle model
    pub fn model_scale(mut self, scale: f32) -> Self {
        self.model_scale = scale;
        self
    }

    /// Tint the handle model. Accepts anything that converts to a `mint` vector.
    pub fn model_color(mut self, color: impl Into<mint::Vector4<f32>>) -> Self {
        self.model_color = Some(Vec4::from(color.into()));
        self
    }

    /// Change the volume grabbers have to touch
    pub fn hit_volume(mut self, hit_volume: HitVolume) -> Self {
        self.hit_volume = hit_volume;
        self
    }

    /// Choose when child content is shown
    pub fn show_children(mut self, show_children: ShowGrabbableChildren) -> Self {
        self.show_children = show_children;
        self
    }

    /// Choose where the grabbable ends up when dropped
    pub fn style(mut self, style: DropStyle) -> Self {
        self.style = style;
        self
    }

    /// Grab at an identity offset
    pub fn use_identity_transform(mut self, identity: bool) -> Self {
        self.core = self.core.grab_with_identity_transform(identity);
        self
    }

    /// Constrain the grabbable while held
    pub fn constraint(mut self, constraint: Option<GrabConstraint>) -> Self {
        self.core = self.core.constraint(constraint);
        self
    }

    /// Set the node's starting transform
    pub fn initial_transform(mut self, transform: Option<Affine3A>) -> Self {
        self.core = self.core.initial_transform(transform);
        self
    }

    /// Advertise interfaces
    pub fn interfaces(mut self, interfaces: InterfaceTable) -> Self {
        self.core = self.core.interfaces(interfaces);
        self
    }

    /// Decide on grab requests yourself
    pub fn on_grab_request<F, Fut>(mut self, decide: F) -> Self
    where
        F: FnMut(GrabRequest) -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<GrabDecision>> + 'static,
    {
        self.core = self.core.on_grab_request(decide);
        self
    }

    /// Change how long grab decisions may take
    pub fn grab_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.core = self.core.grab_request_timeout(timeout);
        self
    }

    /// Called once each time a grab starts
    pub fn on_grab(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_grab = Some(Box::new(callback));
        self
    }

    /// Called once each time a grab ends
    pub fn on_end_grab(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_end_grab = Some(Box::new(callback));
        self
    }

    /// Build the [`StandardGrabbable`] at the node the host assigned it
    pub fn build(self, id: GlobalId) -> StandardGrabbable {
        let config = self.style.apply(self.core.build());

        StandardGrabbable {
            core: Grabbable::new(id, config),
            style: self.style,
            highlight: GrabbableHighlight::None,
            model_uri: self.model_uri,
            model_scale: self.model_scale,
            model_color: self.model_color,
            hit_volume: self.hit_volume,
            show_children: self.show_children,
            on_grab: self.on_grab,
            on_end_grab: self.on_end_grab,
        }
    }
}
