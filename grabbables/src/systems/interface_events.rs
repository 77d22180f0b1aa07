use log::trace;

use crate::{components::Grabbable, events::InterfaceEvent};

/// Hand an interface event to the processor registered for its interface.
/// Events for interfaces without a processor are dropped.
pub fn interface_event_system(grabbable: &mut Grabbable, event: InterfaceEvent) {
    let InterfaceEvent {
        interface,
        sender,
        payload,
    } = event;

    match grabbable.config.interfaces.processor_mut(&interface) {
        Some(processor) => processor(sender, &payload),
        None => trace!(
            "[GRABBABLES] {} has no processor for {interface}, ignoring event from {sender}",
            grabbable.id
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{GlobalId, GrabbableConfig, InterfaceTable};
    use serde_json::{json, Value};
    use std::{cell::RefCell, rc::Rc};

    #[test]
    fn test_interface_event_system() {
        let received: Rc<RefCell<Vec<(GlobalId, Value)>>> = Default::default();
        let recorder = received.clone();
        let interfaces = InterfaceTable::new()
            .with_processor("paint@1", move |sender, payload| {
                recorder.borrow_mut().push((sender, payload.clone()))
            })
            .with("tool@1");
        let config = GrabbableConfig::builder().interfaces(interfaces).build();
        let mut grabbable = Grabbable::new(GlobalId(1), config);

        grabbable.handle_interface_event(InterfaceEvent {
            interface: "paint@1".into(),
            sender: GlobalId(5),
            payload: json!({ "color": "red" }),
        });
        // Advertised without a processor, and not advertised at all
        grabbable.handle_interface_event(InterfaceEvent {
            interface: "tool@1".into(),
            sender: GlobalId(5),
            payload: Value::Null,
        });
        grabbable.handle_interface_event(InterfaceEvent {
            interface: "unknown@3".into(),
            sender: GlobalId(6),
            payload: Value::Null,
        });

        let received = received.borrow();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].0, GlobalId(5));
        assert_eq!(received[0].1["color"], "red");
    }
}
