//! Raw device event records, already decoded from whatever backend delivered them.

use crate::types::Modifiers;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchEventKind {
    Down,
    Motion,
    Up,
    Cancel,
}

/// One contact point change on a touch surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchEvent {
    pub time_ms: u64,
    pub slot: u32,
    pub kind: TouchEventKind,
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GesturePhase {
    Begin,
    Update,
    End,
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchpadSwipeEvent {
    pub time_ms: u64,
    pub phase: GesturePhase,
    pub fingers: u32,
    pub x: f64,
    pub y: f64,
    pub dx_unaccelerated: f64,
    pub dy_unaccelerated: f64,
}

/// Fingers resting on the touchpad without moving. `Update` never occurs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchpadHoldEvent {
    pub time_ms: u64,
    pub phase: GesturePhase,
    pub fingers: u32,
    pub x: f64,
    pub y: f64,
    pub modifiers: Modifiers,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
    Smooth,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollSource {
    Wheel,
    Finger,
    Continuous,
    WheelTilt,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollEvent {
    pub time_ms: u64,
    pub direction: ScrollDirection,
    pub source: ScrollSource,
    pub from_touchpad: bool,
    pub dx: f64,
    pub dy: f64,
    pub x: f64,
    pub y: f64,
    pub modifiers: Modifiers,
}

impl ScrollEvent {
    /// Both deltas exactly zero: the device's end-of-scroll marker.
    pub fn is_stop(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }

    /// Only finger-driven scrolling ever terminates with a stop marker.
    pub fn is_finger_scroll(&self) -> bool {
        self.source == ScrollSource::Finger || self.from_touchpad
    }
}
