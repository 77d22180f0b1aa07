#![allow(missing_docs)]
pub mod constraint;
pub mod global_id;
pub mod grabbable;
pub mod highlight;
pub mod interfaces;
pub mod node_descriptor;
pub mod standard_grabbable;

pub use constraint::{AxisRange, GrabConstraint};
pub use global_id::GlobalId;
pub use grabbable::{
    GrabDecision, Grabbable, GrabbableConfig, GrabbableConfigBuilder, GrabbableState,
    GrabRequestCallback, HighlightCallback, HookInteraction, HookTether, TransformCallback,
};
pub use highlight::{GrabbableHighlight, HighlightSnapshot};
pub use interfaces::{InterfaceProcessor, InterfaceTable};
pub use node_descriptor::{NodeDescriptor, NodeFlags, NodeType};
pub use standard_grabbable::{
    DropStyle, GrabEdgeCallback, HandleVisual, HitVolume, ShowGrabbableChildren, StandardGrabbable,
    StandardGrabbableBuilder, StandardGrabbableView,
};
