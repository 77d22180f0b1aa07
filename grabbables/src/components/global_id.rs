use std::fmt;

use serde::{Deserialize, Serialize};

/// The address the host scene graph assigns to a node, unique across the whole universe.
/// Grabbables, handles, grabbers and hooks are all identified this way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalId(pub u64);

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:x}", self.0)
    }
}

impl From<u64> for GlobalId {
    fn from(raw: u64) -> Self {
        GlobalId(raw)
    }
}
