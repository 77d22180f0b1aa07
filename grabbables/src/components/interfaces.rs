use log::warn;
use serde_json::Value;

use super::GlobalId;

/// Handles an interface event: called with the sender's address and the event payload
pub type InterfaceProcessor = Box<dyn FnMut(GlobalId, &Value)>;

/// The interfaces a grabbable advertises, in priority order.
///
/// Names take the form `name@version`. When a hook supports several of a grabbable's interfaces,
/// the one inserted first wins, so insertion order is significant and preserved.
#[derive(Default)]
pub struct InterfaceTable {
    entries: Vec<(String, Option<InterfaceProcessor>)>,
}

impl InterfaceTable {
    /// Create an empty table
    pub fn new() -> Self {
        Default::default()
    }

    /// Advertise an interface, optionally with a processor for its events.
    /// Re-inserting a name replaces its processor but keeps its original priority.
    pub fn insert(&mut self, name: impl Into<String>, processor: Option<InterfaceProcessor>) {
        let name = name.into();
        if !name.contains('@') {
            warn!("[GRABBABLES] Interface name {name:?} has no @version suffix");
        }

        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = processor,
            None => self.entries.push((name, processor)),
        }
    }

    /// Advertise an interface without processing its events
    pub fn with(mut self, name: impl Into<String>) -> Self {
        self.insert(name, None);
        self
    }

    /// Advertise an interface and process its events with `processor`
    pub fn with_processor(
        mut self,
        name: impl Into<String>,
        processor: impl FnMut(GlobalId, &Value) + 'static,
    ) -> Self {
        self.insert(name, Some(Box::new(processor)));
        self
    }

    /// Interface names, highest priority first
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Does any interface have a processor? Only then does the grabbable listen for interface events.
    pub fn has_processors(&self) -> bool {
        self.entries.iter().any(|(_, processor)| processor.is_some())
    }

    /// The processor registered for `name`, if any
    pub fn processor_mut(&mut self, name: &str) -> Option<&mut InterfaceProcessor> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .and_then(|(_, processor)| processor.as_mut())
    }

    /// Number of advertised interfaces
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Are there no advertised interfaces?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
