//! Device adapters. Each turns one raw event stream into [`GestureSignal`]s
//! for the tracker and never touches the session or the consumer itself.
//!
//! [`GestureSignal`]: crate::types::GestureSignal

pub mod drag;
pub mod scroll;
pub mod touchpad;

pub use drag::{DragContext, SurfaceDragAdapter};
pub use scroll::{ScrollContext, WheelScrollAdapter};
pub use touchpad::{TouchpadContext, TrackpadSwipeAdapter};
