use core::ops::BitOr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Picks the component of `(x, y)` that lies along this axis.
    pub fn axis(self, x: f64, y: f64) -> f64 {
        match self {
            Self::Horizontal => x,
            Self::Vertical => y,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

/// Keyboard modifier state attached to pointer-ish events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(pub u32);

impl Modifiers {
    pub const NONE: Self = Self(0);
    pub const SHIFT: Self = Self(1 << 0);
    pub const CONTROL: Self = Self(1 << 2);
    pub const ALT: Self = Self(1 << 3);
    pub const SUPER: Self = Self(1 << 26);

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Bitmask of shell contexts a tracker may run in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ActionMode(pub u32);

impl ActionMode {
    pub const NONE: Self = Self(0);
    pub const NORMAL: Self = Self(1 << 0);
    pub const OVERVIEW: Self = Self(1 << 1);
    pub const LOCK_SCREEN: Self = Self(1 << 2);
    pub const UNLOCK_SCREEN: Self = Self(1 << 3);
    pub const LOGIN_SCREEN: Self = Self(1 << 4);
    pub const SYSTEM_MODAL: Self = Self(1 << 5);
    pub const POPUP: Self = Self(1 << 7);
    pub const ALL: Self = Self(u32::MAX);

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for ActionMode {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Whether an input event was swallowed by the tracker or must reach other handlers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EventDisposition {
    Handled,
    #[default]
    Propagate,
}

impl EventDisposition {
    pub fn is_handled(self) -> bool {
        matches!(self, Self::Handled)
    }
}

/// Device family a gesture came from; selects the projection tuning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GestureDevice {
    #[default]
    Touch,
    Touchpad,
}

/// Which adapter produced a signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdapterKind {
    SurfaceDrag,
    TrackpadSwipe,
    WheelScroll,
}

impl AdapterKind {
    pub fn device(self) -> GestureDevice {
        match self {
            Self::SurfaceDrag => GestureDevice::Touch,
            Self::TrackpadSwipe | Self::WheelScroll => GestureDevice::Touchpad,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureSignal {
    Begin { x: f64, y: f64 },
    Update { delta: f64 },
    End { velocity: f64, cancelled: bool },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SignalBuffer {
    len: usize,
    slots: [Option<GestureSignal>; Self::MAX],
}

impl SignalBuffer {
    pub const MAX: usize = 4;

    pub const fn new() -> Self {
        Self {
            len: 0,
            slots: [None; Self::MAX],
        }
    }

    pub fn push(&mut self, signal: GestureSignal) {
        if self.len >= Self::MAX {
            log::warn!("swipe: signal buffer full, dropping {:?}", signal);
            return;
        }
        self.slots[self.len] = Some(signal);
        self.len += 1;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &GestureSignal> {
        self.slots[..self.len].iter().filter_map(Option::as_ref)
    }
}

impl Default for SignalBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// What an adapter made of one raw device event.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AdapterOutput {
    pub signals: SignalBuffer,
    pub disposition: EventDisposition,
}

impl AdapterOutput {
    pub fn propagate() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, signal: GestureSignal) {
        self.signals.push(signal);
    }
}
