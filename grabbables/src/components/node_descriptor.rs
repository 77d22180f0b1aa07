use bitflags::bitflags;
use glam::Affine3A;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{GlobalId, GrabConstraint};

bitflags! {
    /// Behaviour the host should apply to a grabbable node
    #[derive(Default)]
    pub struct NodeFlags: u32 {
        /// Tell the grabbable whenever its transform changes
        const NOTIFY_ON_TRANSFORM_CHANGE = 1 << 0;
        /// Keep the world transform the grabbable was dropped at
        const PRESERVE_GRAB_TRANSFORM = 1 << 1;
        /// Highlight hooks the grabbable could be dropped onto
        const HIGHLIGHT_HOOKS = 1 << 2;
        /// Allow the grabbable to be dropped onto hooks
        const ALLOW_DROP_ON_HOOKS = 1 << 3;
        /// The grabbable is tethered to a hook
        const TETHERED = 1 << 4;
        /// Show the grabber's grab indicator while in range
        const SHOW_GRAB_INDICATOR = 1 << 5;
    }
}

impl Serialize for NodeFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NodeFlags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u32::deserialize(deserializer)?;
        Ok(NodeFlags::from_bits_truncate(bits))
    }
}

/// The kind of scene-graph node being described
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeType {
    /// A node that can be picked up
    Grabbable,
}

/// What a grabbable asks the host to create in the scene graph.
/// Rebuilt from configuration and tether state; the host only hears about it when it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    /// The node's identity
    pub id: GlobalId,
    /// Always [`NodeType::Grabbable`] for now
    pub node_type: NodeType,
    /// Behaviour flags
    pub flags: NodeFlags,
    /// Limits applied while grabbed
    pub constraint: Option<GrabConstraint>,
    /// Where the node starts out, relative to its parent
    pub initial_transform: Option<Affine3A>,
    /// Interfaces the grabbable advertises, highest priority first
    pub interfaces: Vec<String>,
}
