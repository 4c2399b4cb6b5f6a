//! Kinetic swipe gestures for paged shell surfaces.
//!
//! Raw touch, touchpad swipe, touchpad hold and scroll events go into a
//! [`SwipeTracker`]. It recognizes at most one gesture at a time and drives
//! a [`SwipeConsumer`] through `begin -> update* -> end`, where `end`
//! carries the snap point to settle on and the animation length.

pub mod adapters;
pub mod config;
pub mod history;
pub mod input;
pub mod monitor;
pub mod projection;
pub mod session;
pub mod snap;
pub mod tracker;
pub mod types;

pub use config::{ConfigError, SwipeConfig};
pub use input::{
    GesturePhase, ScrollDirection, ScrollEvent, ScrollSource, TouchEvent, TouchEventKind,
    TouchpadHoldEvent, TouchpadSwipeEvent,
};
pub use monitor::{MonitorLayout, MonitorRect};
pub use session::{ConfirmError, SessionState, SwipeConsumer, SwipeRequest};
pub use tracker::SwipeTracker;
pub use types::{
    ActionMode, AdapterKind, EventDisposition, GestureDevice, Modifiers, Orientation,
    TextDirection,
};
