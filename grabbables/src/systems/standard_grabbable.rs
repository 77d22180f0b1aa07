use glam::Vec3;
use log::debug;

use crate::components::{GrabbableHighlight, HandleVisual, StandardGrabbable};

/// How much bigger the handle is drawn while a grabber is in range
pub const IN_RANGE_SCALE: f32 = 1.1;

/// Record a new highlight from the core, firing `on_grab` or `on_end_grab` on the edges.
/// Moving between being held and hovering over a hook is not an edge.
pub fn apply_highlight(grabbable: &mut StandardGrabbable, highlight: GrabbableHighlight) {
    let was_grabbed = grabbable.highlight.is_grabbed();
    grabbable.highlight = highlight;

    match (was_grabbed, highlight.is_grabbed()) {
        (false, true) => {
            debug!("[GRABBABLES] {} grab started", grabbable.core.id());
            if let Some(on_grab) = grabbable.on_grab.as_mut() {
                on_grab();
            }
        }
        (true, false) => {
            debug!("[GRABBABLES] {} grab ended", grabbable.core.id());
            if let Some(on_end_grab) = grabbable.on_end_grab.as_mut() {
                on_end_grab();
            }
        }
        _ => {}
    }
}

/// The handle as it should be drawn in the current phase
pub fn handle_visual(grabbable: &StandardGrabbable) -> HandleVisual {
    let highlight_scale = if grabbable.highlight == GrabbableHighlight::InRange {
        IN_RANGE_SCALE
    } else {
        1.0
    };

    HandleVisual {
        model_uri: grabbable.model_uri.clone(),
        scale: Vec3::splat(highlight_scale * grabbable.model_scale),
        color: grabbable.model_color,
        hit_volume: grabbable.hit_volume,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        components::{GlobalId, ShowGrabbableChildren},
        contexts::HostContext,
        events::GrabEvent,
    };
    use approx::assert_relative_eq;
    use std::{cell::Cell, rc::Rc};

    struct Edges {
        grabs: Rc<Cell<usize>>,
        end_grabs: Rc<Cell<usize>>,
    }

    fn counting_grabbable() -> (StandardGrabbable, Edges) {
        let grabs = Rc::new(Cell::new(0));
        let end_grabs = Rc::new(Cell::new(0));
        let (g, e) = (grabs.clone(), end_grabs.clone());
        let grabbable = StandardGrabbable::builder("models/box.glb")
            .model_scale(2.0)
            .on_grab(move || g.set(g.get() + 1))
            .on_end_grab(move || e.set(e.get() + 1))
            .build(GlobalId(1));
        (grabbable, Edges { grabs, end_grabs })
    }

    #[test]
    fn test_grab_fires_once() {
        use GrabbableHighlight::*;
        let (mut grabbable, edges) = counting_grabbable();

        for highlight in [None, InRange, Grabbed] {
            apply_highlight(&mut grabbable, highlight);
        }
        assert_eq!(edges.grabs.get(), 1);
        assert_eq!(edges.end_grabs.get(), 0);
    }

    #[test]
    fn test_hook_excursion_is_not_an_edge() {
        use GrabbableHighlight::*;
        let (mut grabbable, edges) = counting_grabbable();
        apply_highlight(&mut grabbable, Grabbed);
        assert_eq!(edges.grabs.get(), 1);

        apply_highlight(&mut grabbable, InHookRange);
        apply_highlight(&mut grabbable, Grabbed);
        assert_eq!(edges.grabs.get(), 1);
        assert_eq!(edges.end_grabs.get(), 0);

        apply_highlight(&mut grabbable, InRange);
        assert_eq!(edges.end_grabs.get(), 1);

        apply_highlight(&mut grabbable, None);
        assert_eq!(edges.end_grabs.get(), 1);
    }

    #[test]
    fn test_handle_scale() {
        let (mut grabbable, _) = counting_grabbable();
        assert_relative_eq!(handle_visual(&grabbable).scale, Vec3::splat(2.0));

        apply_highlight(&mut grabbable, GrabbableHighlight::InRange);
        assert_relative_eq!(handle_visual(&grabbable).scale, Vec3::splat(2.2));

        apply_highlight(&mut grabbable, GrabbableHighlight::Grabbed);
        assert_relative_eq!(handle_visual(&grabbable).scale, Vec3::splat(2.0));
    }

    #[test]
    fn test_events_drive_edges() {
        let (host, _receiver) = HostContext::new();
        let (mut grabbable, edges) = counting_grabbable();
        grabbable.show_children = ShowGrabbableChildren::OnlyWhenNotGrabbed;

        grabbable.handle_grab_event(
            GrabEvent::EnterRange {
                handle: GlobalId(2),
            },
            &host,
        );
        grabbable.handle_grab_event(GrabEvent::StartGrab, &host);
        assert_eq!(edges.grabs.get(), 1);
        assert!(!grabbable.view().children_visible);

        grabbable.handle_grab_event(
            GrabEvent::EndGrab {
                handle: Some(GlobalId(2)),
                hook: None,
                hook_from_grabbable: None,
            },
            &host,
        );
        assert_eq!(edges.end_grabs.get(), 1);
        assert_eq!(grabbable.highlight(), GrabbableHighlight::InRange);
        assert!(grabbable.view().children_visible);
    }
}
