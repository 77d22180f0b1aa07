#![allow(missing_docs)]
pub mod grab_events;
pub mod interface_events;
pub mod materialize;
pub mod permission;
pub mod standard_grabbable;

pub use grab_events::grab_event_system;
pub use interface_events::interface_event_system;
pub use permission::{request_grab, GrabResponder};
