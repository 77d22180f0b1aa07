use glam::Affine3A;
use log::{debug, trace};

use super::{materialize, permission};
use crate::{
    components::{Grabbable, GrabbableHighlight, HighlightSnapshot, HookTether},
    contexts::HostContext,
    events::GrabEvent,
};

/// Drive a grabbable's state machine with one event from the grabber.
///
/// After the state is updated the owner is notified if anything observable changed, and the node
/// is republished if the tether changed. Returns the snapshot the owner was given, if any.
pub fn grab_event_system(
    grabbable: &mut Grabbable,
    event: GrabEvent,
    host: &HostContext,
) -> Option<HighlightSnapshot> {
    trace!("[GRABBABLES] {} handling {event:?}", grabbable.id);
    let was_tethered = grabbable.state.is_tethered();
    let state = &mut grabbable.state;

    match event {
        GrabEvent::EnterRange { handle } => {
            state.highlight = GrabbableHighlight::InRange;
            state.handle = Some(handle);
        }
        GrabEvent::LeaveRange => {
            state.highlight = GrabbableHighlight::None;
            state.handle = None;
        }
        GrabEvent::StartGrab => {
            // The grabber reports its handle again once the grab settles
            state.highlight = GrabbableHighlight::Grabbed;
            state.handle = None;
        }
        GrabEvent::EndGrab {
            handle,
            hook,
            hook_from_grabbable,
        } => {
            state.highlight = GrabbableHighlight::InRange;
            state.handle = handle;
            state.tether = hook.map(|hook| HookTether {
                hook,
                hook_from_grabbable: hook_from_grabbable.unwrap_or(Affine3A::IDENTITY),
            });
        }
        GrabEvent::Detach { handle } => {
            state.highlight = GrabbableHighlight::Grabbed;
            state.handle = handle;
            state.tether = None;
        }
        GrabEvent::EnterHookRange {
            handle,
            hook,
            interface,
        } => {
            state.highlight = GrabbableHighlight::InHookRange;
            state.handle = handle;
            state.interface_name = interface;
            state.nearby_hook = Some(hook);
        }
        GrabEvent::LeaveHookRange { handle } => {
            state.highlight = GrabbableHighlight::Grabbed;
            state.handle = handle;
        }
        GrabEvent::RequestGrab(request) => {
            permission::request_grab(grabbable, request, host);
        }
        GrabEvent::TransformUpdated {
            parent_from_node,
            universe_from_node,
        } => {
            if let Some(on_transform_updated) = grabbable.config.on_transform_updated.as_mut() {
                on_transform_updated(parent_from_node, universe_from_node);
            }
        }
    }

    // The nearby hook only means something while hovering over it
    if grabbable.state.highlight != GrabbableHighlight::InHookRange {
        grabbable.state.nearby_hook = None;
        grabbable.state.interface_name = None;
    }

    let notified = notify_owner(grabbable);

    if grabbable.mounted && was_tethered != grabbable.state.is_tethered() {
        materialize::sync_with_host(grabbable, host);
    }

    notified
}

/// Tell the owner about the grabbable's state, unless they have already heard about exactly this.
pub fn notify_owner(grabbable: &mut Grabbable) -> Option<HighlightSnapshot> {
    let snapshot = grabbable.state.snapshot();
    if snapshot == grabbable.last_notified {
        return None;
    }

    debug!(
        "[GRABBABLES] {} is now {:?} (handle {:?}, tethered {})",
        grabbable.id, snapshot.highlight, snapshot.handle, snapshot.tethered
    );
    if let Some(update_highlight) = grabbable.config.update_highlight.as_mut() {
        update_highlight(&snapshot);
    }
    grabbable.last_notified = snapshot.clone();
    Some(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        components::{GlobalId, GrabbableConfig, NodeFlags},
        contexts::HostMessage,
        events::GrabRequest,
    };
    use glam::Vec3;
    use std::{cell::RefCell, rc::Rc};

    const H1: GlobalId = GlobalId(11);
    const K1: GlobalId = GlobalId(21);

    fn recording_grabbable() -> (Grabbable, Rc<RefCell<Vec<HighlightSnapshot>>>) {
        let notifications = Rc::new(RefCell::new(Vec::new()));
        let recorder = notifications.clone();
        let config = GrabbableConfig::builder()
            .update_highlight(move |snapshot| recorder.borrow_mut().push(snapshot.clone()))
            .build();
        (Grabbable::new(GlobalId(1), config), notifications)
    }

    #[test]
    fn test_grab_tether_detach_scenario() {
        let (host, _receiver) = HostContext::new();
        let (mut grabbable, _) = recording_grabbable();

        grabbable.handle_grab_event(GrabEvent::EnterRange { handle: H1 }, &host);
        assert_eq!(grabbable.highlight(), GrabbableHighlight::InRange);
        assert_eq!(grabbable.state().handle, Some(H1));

        grabbable.handle_grab_event(GrabEvent::StartGrab, &host);
        assert_eq!(grabbable.highlight(), GrabbableHighlight::Grabbed);
        assert_eq!(grabbable.state().handle, None);

        let transform = Affine3A::from_translation(Vec3::new(0.0, 0.1, 0.0));
        grabbable.handle_grab_event(
            GrabEvent::EndGrab {
                handle: Some(H1),
                hook: Some(K1),
                hook_from_grabbable: Some(transform),
            },
            &host,
        );
        assert_eq!(grabbable.highlight(), GrabbableHighlight::InRange);
        assert_eq!(grabbable.state().handle, Some(H1));
        assert_eq!(
            grabbable.state().tether,
            Some(HookTether {
                hook: K1,
                hook_from_grabbable: transform
            })
        );

        grabbable.handle_grab_event(GrabEvent::Detach { handle: Some(H1) }, &host);
        assert_eq!(grabbable.highlight(), GrabbableHighlight::Grabbed);
        assert_eq!(grabbable.state().handle, Some(H1));
        assert!(!grabbable.is_tethered());
    }

    #[test]
    fn test_hook_range() {
        let (host, _receiver) = HostContext::new();
        let (mut grabbable, notifications) = recording_grabbable();

        grabbable.handle_grab_event(GrabEvent::StartGrab, &host);
        let snapshot = grabbable
            .handle_grab_event(
                GrabEvent::EnterHookRange {
                    handle: Some(H1),
                    hook: K1,
                    interface: Some("paint@1".into()),
                },
                &host,
            )
            .unwrap();
        assert_eq!(snapshot.highlight, GrabbableHighlight::InHookRange);
        assert_eq!(snapshot.nearby_hook, Some(K1));
        assert_eq!(snapshot.interface_name.as_deref(), Some("paint@1"));

        let snapshot = grabbable
            .handle_grab_event(GrabEvent::LeaveHookRange { handle: Some(H1) }, &host)
            .unwrap();
        assert_eq!(snapshot.highlight, GrabbableHighlight::Grabbed);
        assert!(snapshot.nearby_hook.is_none());
        assert!(snapshot.interface_name.is_none());
        assert_eq!(notifications.borrow().len(), 3);
    }

    #[test]
    fn test_repeated_events_notify_once() {
        let (host, _receiver) = HostContext::new();
        let (mut grabbable, notifications) = recording_grabbable();

        assert!(grabbable
            .handle_grab_event(GrabEvent::EnterRange { handle: H1 }, &host)
            .is_some());
        assert!(grabbable
            .handle_grab_event(GrabEvent::EnterRange { handle: H1 }, &host)
            .is_none());
        // A different handle is a different state
        assert!(grabbable
            .handle_grab_event(
                GrabEvent::EnterRange {
                    handle: GlobalId(12)
                },
                &host
            )
            .is_some());
        // Leaving range while idle changes nothing the owner can see
        grabbable.handle_grab_event(GrabEvent::LeaveRange, &host);
        assert!(grabbable
            .handle_grab_event(GrabEvent::LeaveRange, &host)
            .is_none());

        let notifications = notifications.borrow();
        assert_eq!(notifications.len(), 3);
        assert_eq!(notifications[0].handle, Some(H1));
        assert_eq!(notifications[1].handle, Some(GlobalId(12)));
        assert_eq!(notifications[2].highlight, GrabbableHighlight::None);
    }

    #[test]
    fn test_no_owner_callback() {
        let (host, _receiver) = HostContext::new();
        let mut grabbable = Grabbable::new(GlobalId(1), GrabbableConfig::default());

        // Still tracked and reported, just nobody is called
        let snapshot = grabbable.handle_grab_event(GrabEvent::EnterRange { handle: H1 }, &host);
        assert_eq!(snapshot.unwrap().highlight, GrabbableHighlight::InRange);
    }

    #[test]
    fn test_transform_updated() {
        let (host, _receiver) = HostContext::new();
        let seen = Rc::new(RefCell::new(None));
        let recorder = seen.clone();
        let config = GrabbableConfig::builder()
            .on_transform_updated(move |parent, universe| {
                *recorder.borrow_mut() = Some((parent, universe))
            })
            .build();
        let mut grabbable = Grabbable::new(GlobalId(1), config);

        let parent_from_node = Affine3A::from_translation(Vec3::X);
        let universe_from_node = Affine3A::from_translation(Vec3::Y);
        let snapshot = grabbable.handle_grab_event(
            GrabEvent::TransformUpdated {
                parent_from_node,
                universe_from_node,
            },
            &host,
        );

        assert!(snapshot.is_none());
        assert_eq!(*seen.borrow(), Some((parent_from_node, universe_from_node)));

        // Without a callback it's a no-op
        let mut grabbable = Grabbable::new(GlobalId(2), GrabbableConfig::default());
        let snapshot = grabbable.handle_grab_event(
            GrabEvent::TransformUpdated {
                parent_from_node,
                universe_from_node,
            },
            &host,
        );
        assert!(snapshot.is_none());
    }

    #[test]
    fn test_request_grab_leaves_highlight_alone() {
        let (host, mut receiver) = HostContext::new();
        let mut grabbable = Grabbable::new(GlobalId(1), GrabbableConfig::default());
        grabbable.handle_grab_event(GrabEvent::EnterRange { handle: H1 }, &host);

        let snapshot = grabbable.handle_grab_event(
            GrabEvent::RequestGrab(GrabRequest {
                grabbable: GlobalId(1),
                handle: H1,
                grabber: GlobalId(31),
                request_id: 1,
                hook: None,
            }),
            &host,
        );
        assert!(snapshot.is_none());
        assert_eq!(grabbable.highlight(), GrabbableHighlight::InRange);
        assert!(matches!(
            receiver.try_recv().unwrap(),
            HostMessage::RequestGrabResponse(_)
        ));
    }

    #[test]
    fn test_tether_republishes_node() {
        let (host, mut receiver) = HostContext::new();
        let mut grabbable = Grabbable::new(GlobalId(1), GrabbableConfig::default());
        grabbable.mount(&host).unwrap();
        while receiver.try_recv().is_ok() {}

        grabbable.handle_grab_event(GrabEvent::StartGrab, &host);
        assert!(receiver.try_recv().is_err());

        grabbable.handle_grab_event(
            GrabEvent::EndGrab {
                handle: None,
                hook: Some(K1),
                hook_from_grabbable: None,
            },
            &host,
        );
        match receiver.try_recv().unwrap() {
            HostMessage::PublishNode(descriptor) => {
                assert!(descriptor.flags.contains(NodeFlags::TETHERED))
            }
            other => panic!("Expected the node to be republished, got {other:?}"),
        }

        grabbable.handle_grab_event(GrabEvent::Detach { handle: Some(H1) }, &host);
        match receiver.try_recv().unwrap() {
            HostMessage::PublishNode(descriptor) => {
                assert!(!descriptor.flags.contains(NodeFlags::TETHERED))
            }
            other => panic!("Expected the node to be republished, got {other:?}"),
        }
    }
}
