use glam::Affine3A;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::components::GlobalId;

/// An event delivered by the grabber to the grabbable it concerns.
/// Events for a single grabbable always arrive in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GrabEvent {
    /// A grabber came within grabbing range
    EnterRange {
        /// The grabber's handle
        handle: GlobalId,
    },
    /// The grabber left grabbing range
    LeaveRange,
    /// The grab has begun
    StartGrab,
    /// The grabber let go, possibly onto a hook
    EndGrab {
        /// The handle still in range, if any
        handle: Option<GlobalId>,
        /// The hook the grabbable was dropped onto
        hook: Option<GlobalId>,
        /// Transform from the grabbable to that hook
        hook_from_grabbable: Option<Affine3A>,
    },
    /// The grabbable was pulled off its hook
    Detach {
        /// The handle holding it now
        handle: Option<GlobalId>,
    },
    /// The held grabbable came within range of a hook
    EnterHookRange {
        /// The handle holding it
        handle: Option<GlobalId>,
        /// The hook in range
        hook: GlobalId,
        /// The interface negotiated with the hook
        interface: Option<String>,
    },
    /// The held grabbable moved away from the hook
    LeaveHookRange {
        /// The handle holding it
        handle: Option<GlobalId>,
    },
    /// A grabber would like to grab
    RequestGrab(GrabRequest),
    /// The node moved
    TransformUpdated {
        /// Transform from the node to its parent
        parent_from_node: Affine3A,
        /// Transform from the node to the universe
        universe_from_node: Affine3A,
    },
}

/// The identities involved in a grab request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrabRequest {
    /// The grabbable to be grabbed
    pub grabbable: GlobalId,
    /// The handle the grabber would attach to
    pub handle: GlobalId,
    /// Who is asking
    pub grabber: GlobalId,
    /// Echoed back in the response so the grabber can match them up
    pub request_id: u64,
    /// The hook the grabbable would be pulled off, if tethered
    pub hook: Option<GlobalId>,
}

/// The grabbable's answer to a [`GrabRequest`]. Exactly one is sent per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestGrabResponse {
    /// The grabbable answering
    pub sender: GlobalId,
    /// The grabbable that is grabbed, which may be a proxy
    pub grabbable: GlobalId,
    /// The handle that is grabbed, which may be a proxy
    pub handle: GlobalId,
    /// Who asked
    pub grabber: GlobalId,
    /// The request being answered
    pub request_id: u64,
    /// Was the grab approved?
    pub allowed: bool,
    /// Should the grab anchor at an identity offset?
    pub use_identity_transform: Option<bool>,
}

/// An event sent to one of a grabbable's advertised interfaces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceEvent {
    /// The interface, in `name@version` form
    pub interface: String,
    /// Who sent it
    pub sender: GlobalId,
    /// Interface specific data
    pub payload: Value,
}
