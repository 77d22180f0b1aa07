use itertools::Itertools;
use log::debug;

use crate::{
    components::{Grabbable, NodeDescriptor, NodeFlags, NodeType},
    contexts::{HostContext, HostMessage},
    GrabbableResult, DEFAULT_GRAB_INTERFACE,
};

/// Describe the node a grabbable wants, from its configuration and tether state alone.
/// Total over every combination: being tethered always suppresses the hook flags.
pub fn materialize_node(grabbable: &Grabbable) -> NodeDescriptor {
    let config = &grabbable.config;
    let tethered = grabbable.state.is_tethered();

    let mut flags = NodeFlags::empty();
    flags.set(
        NodeFlags::NOTIFY_ON_TRANSFORM_CHANGE,
        config.on_transform_updated.is_some(),
    );
    flags.set(
        NodeFlags::PRESERVE_GRAB_TRANSFORM,
        config.preserve_drop_transform,
    );
    flags.set(
        NodeFlags::HIGHLIGHT_HOOKS,
        config.hook_interaction.highlights_hooks() && !tethered,
    );
    flags.set(
        NodeFlags::ALLOW_DROP_ON_HOOKS,
        config.hook_interaction.allows_drop() && !tethered,
    );
    flags.set(NodeFlags::TETHERED, tethered);
    flags.set(
        NodeFlags::SHOW_GRAB_INDICATOR,
        config.show_grab_indicator.unwrap_or(true),
    );

    let mut interfaces: Vec<String> = config.interfaces.names().map(str::to_owned).collect();
    if interfaces.is_empty() {
        interfaces.push(DEFAULT_GRAB_INTERFACE.to_owned());
    }

    NodeDescriptor {
        id: grabbable.id,
        node_type: NodeType::Grabbable,
        flags,
        constraint: config.constraint,
        initial_transform: config.initial_transform,
        interfaces,
    }
}

/// Register a grabbable with the host and publish its node
pub fn mount(grabbable: &mut Grabbable, host: &HostContext) -> GrabbableResult<()> {
    host.send(HostMessage::RegisterGrabHandler(grabbable.id))?;
    grabbable.mounted = true;
    grabbable.published = None;
    grabbable.interface_handler_registered = false;
    try_sync_with_host(grabbable, host)
}

/// Tell the host a grabbable is gone
pub fn unmount(grabbable: &mut Grabbable, host: &HostContext) -> GrabbableResult<()> {
    host.send(HostMessage::UnregisterNode(grabbable.id))?;
    grabbable.mounted = false;
    grabbable.published = None;
    grabbable.interface_handler_registered = false;
    Ok(())
}

/// Republish the node and fix up the interface registration, but only where something changed.
/// Host failures are logged by the context and otherwise ignored.
pub fn sync_with_host(grabbable: &mut Grabbable, host: &HostContext) {
    let _ = try_sync_with_host(grabbable, host);
}

fn try_sync_with_host(grabbable: &mut Grabbable, host: &HostContext) -> GrabbableResult<()> {
    let descriptor = materialize_node(grabbable);
    if grabbable.published.as_ref() != Some(&descriptor) {
        debug!(
            "[GRABBABLES] Publishing {} with flags {:?} and interfaces [{}]",
            grabbable.id,
            descriptor.flags,
            descriptor.interfaces.iter().join(", ")
        );
        host.send(HostMessage::PublishNode(descriptor.clone()))?;
        grabbable.published = Some(descriptor);
    }

    let wants_interface_events = grabbable.config.interfaces.has_processors();
    if wants_interface_events != grabbable.interface_handler_registered {
        let message = if wants_interface_events {
            HostMessage::RegisterInterfaceHandler(grabbable.id)
        } else {
            HostMessage::UnregisterInterfaceHandler(grabbable.id)
        };
        host.send(message)?;
        grabbable.interface_handler_registered = wants_interface_events;
    }

    Ok(())
}
