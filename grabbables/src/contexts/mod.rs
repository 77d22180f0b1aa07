#![allow(missing_docs)]
pub mod grabbable_registry;
pub mod host_context;

pub use grabbable_registry::{GrabEventSink, GrabbableRegistry};
pub use host_context::{HostContext, HostMessage};
