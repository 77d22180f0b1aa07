use serde::{Deserialize, Serialize};

use super::GlobalId;

/// The interaction phase a grabbable is in, as seen by its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GrabbableHighlight {
    /// Nothing is interacting with the grabbable
    #[default]
    None,
    /// A grabber is close enough to grab it
    InRange,
    /// A grabber is holding it
    Grabbed,
    /// It is being held close enough to a hook to be dropped onto it
    InHookRange,
}

impl GrabbableHighlight {
    /// Is a grab in progress? Hovering near a hook still counts as being held.
    pub fn is_grabbed(self) -> bool {
        matches!(self, GrabbableHighlight::Grabbed | GrabbableHighlight::InHookRange)
    }
}

/// Everything about a grabbable's state that its owner can observe.
/// The owner is only told about a new snapshot when it differs from the last one it was given.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HighlightSnapshot {
    /// Current interaction phase
    pub highlight: GrabbableHighlight,
    /// The grabber handle currently associated with the grabbable, if any
    pub handle: Option<GlobalId>,
    /// Is the grabbable tethered to a hook?
    pub tethered: bool,
    /// The interface negotiated with the hook in range
    pub interface_name: Option<String>,
    /// The hook in range
    pub nearby_hook: Option<GlobalId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_grabbed() {
        assert!(!GrabbableHighlight::None.is_grabbed());
        assert!(!GrabbableHighlight::InRange.is_grabbed());
        assert!(GrabbableHighlight::Grabbed.is_grabbed());
        assert!(GrabbableHighlight::InHookRange.is_grabbed());
    }

    #[test]
    fn test_default_snapshot_is_idle() {
        let snapshot = HighlightSnapshot::default();
        assert_eq!(snapshot.highlight, GrabbableHighlight::None);
        assert!(snapshot.handle.is_none());
        assert!(!snapshot.tethered);
    }
}
