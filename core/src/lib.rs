//! Keyboard event routing for view trees.
//!
//! # Conceptual overview
//! Views form a tree. At any time at most one view has keyboard focus; deciding which one is up
//! to the focus management of the surrounding framework.
//!
//! ## Events
//! When a key is pressed or released, the platform input layer delivers a raw key transition.
//! It is then routed to the focused view in three phases:
//!
//! 1. *Capturing*: from the root down to the focused view’s superview, each view’s capture
//!    handler sees the event. This lets an ancestor intercept keys before its descendants do.
//! 2. *At target*: the focused view’s regular handler sees the event.
//! 3. *Bubbling*: from the focused view’s superview back up to the root, each view’s regular
//!    handler sees the event.
//!
//! Each view has four optional handler slots: key down and key up, each with a capture variant.
//! A handler may mark the event as handled. That ends routing immediately, and tells the input
//! layer not to apply the default behavior (such as typing the character into a text field).
//!
//! ## Backends
//! Backends are platform input layers abstracted to a common interface. They hand over raw key
//! transitions and are asked to perform default actions for events nobody handled.

pub mod backend;
pub mod config;
mod dispatch;
pub mod error;
pub mod events;
pub mod raw_events;
mod view;
mod view_tree;

pub use dispatch::Dispatcher;
pub use view::ViewId;
pub use view_tree::ViewTree;
