#![deny(missing_docs)]

//! Grabbable scene nodes for AR and VR applications.
//!
//! A grabbable is a scene node that a remote grabber (a hand, a controller proxy) can pick up,
//! move around and drop, either into the world or onto a *hook*. The grabber lives in the host
//! process: it tells each grabbable what is happening to it through a strictly ordered stream of
//! [`events::GrabEvent`]s, and the grabbable answers with node descriptors and grab responses over
//! a [`contexts::HostContext`].
//!
//! # Getting started
//! Build a [`components::GrabbableConfig`], wrap it in a [`components::Grabbable`] (or use the
//! higher level [`components::StandardGrabbable`]) and mount it into a
//! [`contexts::GrabbableRegistry`]. Feed the registry the events your host delivers, and drain the
//! receiver returned by [`contexts::HostContext::new`] to find out what the grabbables want the
//! host to do.
//!
//! Grab permission requests are decided asynchronously. Decisions wait on a queue owned by the
//! [`contexts::HostContext`] and make progress while the host awaits
//! [`contexts::HostContext::run_until`].

pub use glam;

pub use grabbable_error::GrabbableError;

/// Components are the data owned by each grabbable
pub mod components;
/// Contexts wrap the host that grabbables talk to
pub mod contexts;
/// Wire types exchanged with the host
pub mod events;
mod grabbable_error;
/// Systems are functions that update components in response to events
pub mod systems;

/// Grabbables result type
pub type GrabbableResult<T> = std::result::Result<T, GrabbableError>;

/// Interface advertised by a grabbable that doesn't configure any of its own
pub const DEFAULT_GRAB_INTERFACE: &str = "grab@1";
