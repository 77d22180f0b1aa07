use std::time::Duration;

use thiserror::Error;

use crate::components::GlobalId;

/// Everything that can go wrong while hosting grabbables
#[derive(Error, Debug)]
pub enum GrabbableError {
    /// An event was addressed to a node that has no mounted grabbable
    #[error("No grabbable is mounted at node {0}")]
    UnknownNode(GlobalId),
    /// A second grabbable tried to claim an identity that is already mounted
    #[error("A grabbable is already mounted at node {0}")]
    DuplicateNode(GlobalId),
    /// The receiving half of the host channel has gone away
    #[error("The host has stopped listening for messages")]
    HostDisconnected,
    /// The owner did not decide on a grab request in time
    #[error("The grab request was not decided within {0:?}")]
    DecisionTimedOut(Duration),
    /// The owner's decision was dropped before it produced a verdict
    #[error("The grab request decision was abandoned before it settled")]
    DecisionAborted,
    #[error(transparent)]
    /// Anything else, usually raised by owner code
    Other(#[from] anyhow::Error),
}
