//! The single live gesture and the contract with the screen that consumes it.
//!
//! A session moves `None -> Tracking -> None` once per physical gesture.
//! The only way into `Tracking` is a consumer calling
//! [`SwipeRequest::confirm_swipe`] from inside its `begin` callback.

use core::fmt;

use log::{debug, error, trace, warn};

use crate::{
    config::SwipeConfig,
    projection::{self, DeviceTuning, Release},
    snap::{Bounds, SnapPoints, SnapPointsError},
    types::{GestureDevice, Orientation, TextDirection},
};


/// Receiver of the normalized gesture stream.
pub trait SwipeConsumer {
    /// Must call [`SwipeRequest::confirm_swipe`] before returning, or the
    /// physical gesture is ignored.
    fn begin(&mut self, request: &mut SwipeRequest);
    fn update(&mut self, progress: f64);
    fn end(&mut self, duration_ms: u32, target: f64);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfirmError {
    ZeroDistance,
    InvalidDistance(f64),
    EmptySnapPoints,
    TooManySnapPoints(usize),
    UnsortedSnapPoints,
    NonFiniteSnapPoints,
    NonFiniteProgress,
}

impl fmt::Display for ConfirmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDistance => write!(f, "swipe distance must not be zero"),
            Self::InvalidDistance(distance) => {
                write!(f, "swipe distance must be positive and finite, got {distance}")
            }
            Self::EmptySnapPoints => write!(f, "snap points must not be empty"),
            Self::TooManySnapPoints(count) => write!(f, "too many snap points: {count}"),
            Self::UnsortedSnapPoints => write!(f, "snap points must be ascending"),
            Self::NonFiniteSnapPoints => write!(f, "snap points must be finite"),
            Self::NonFiniteProgress => write!(f, "current and cancel progress must be finite"),
        }
    }
}

impl std::error::Error for ConfirmError {}

impl From<SnapPointsError> for ConfirmError {
    fn from(value: SnapPointsError) -> Self {
        match value {
            SnapPointsError::Empty => Self::EmptySnapPoints,
            SnapPointsError::TooMany(count) => Self::TooManySnapPoints(count),
            SnapPointsError::NotFinite => Self::NonFiniteSnapPoints,
            SnapPointsError::Unsorted => Self::UnsortedSnapPoints,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Confirmation {
    distance: f64,
    snap_points: SnapPoints,
    current_progress: f64,
    cancel_progress: f64,
    animating_towards: Option<f64>,
}

/// Handed to [`SwipeConsumer::begin`]; records the consumer's confirmation.
#[derive(Debug)]
pub struct SwipeRequest {
    monitor: usize,
    orientation: Orientation,
    device: GestureDevice,
    confirmation: Option<Confirmation>,
}

impl SwipeRequest {
    fn new(monitor: usize, orientation: Orientation, device: GestureDevice) -> Self {
        Self {
            monitor,
            orientation,
            device,
            confirmation: None,
        }
    }

    /// Index of the monitor the gesture started on.
    pub fn monitor(&self) -> usize {
        self.monitor
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn device(&self) -> GestureDevice {
        self.device
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmation.is_some()
    }

    /// Accepts the gesture.
    ///
    /// `distance` is the pixel length of one progress unit. A rejected
    /// confirmation is logged and leaves the gesture unconfirmed.
    pub fn confirm_swipe(
        &mut self,
        distance: f64,
        snap_points: &[f64],
        current_progress: f64,
        cancel_progress: f64,
    ) -> Result<(), ConfirmError> {
        self.confirm(distance, snap_points, current_progress, cancel_progress, None)
    }

    /// Like [`Self::confirm_swipe`] for a gesture that catches an animation
    /// still heading to `animating_towards`.
    pub fn confirm_swipe_animating(
        &mut self,
        distance: f64,
        snap_points: &[f64],
        current_progress: f64,
        cancel_progress: f64,
        animating_towards: f64,
    ) -> Result<(), ConfirmError> {
        self.confirm(
            distance,
            snap_points,
            current_progress,
            cancel_progress,
            Some(animating_towards),
        )
    }

    fn confirm(
        &mut self,
        distance: f64,
        snap_points: &[f64],
        current_progress: f64,
        cancel_progress: f64,
        animating_towards: Option<f64>,
    ) -> Result<(), ConfirmError> {
        self.confirmation = None;
        let result = validate_confirmation(
            distance,
            snap_points,
            current_progress,
            cancel_progress,
            animating_towards,
        );
        match result {
            Ok(confirmation) => {
                debug!(
                    "swipe: confirmed distance={} points={} current={} cancel={}",
                    distance,
                    confirmation.snap_points.len(),
                    current_progress,
                    cancel_progress
                );
                self.confirmation = Some(confirmation);
                Ok(())
            }
            Err(err) => {
                error!("swipe: rejected confirmation: {}", err);
                Err(err)
            }
        }
    }
}

fn validate_confirmation(
    distance: f64,
    snap_points: &[f64],
    current_progress: f64,
    cancel_progress: f64,
    animating_towards: Option<f64>,
) -> Result<Confirmation, ConfirmError> {
    if distance == 0.0 {
        return Err(ConfirmError::ZeroDistance);
    }
    if !distance.is_finite() || distance < 0.0 {
        return Err(ConfirmError::InvalidDistance(distance));
    }
    if !current_progress.is_finite()
        || !cancel_progress.is_finite()
        || animating_towards.is_some_and(|target| !target.is_finite())
    {
        return Err(ConfirmError::NonFiniteProgress);
    }
    let snap_points = SnapPoints::from_slice(snap_points)?;
    Ok(Confirmation {
        distance,
        snap_points,
        current_progress,
        cancel_progress,
        animating_towards,
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    None,
    Tracking,
}

#[derive(Clone, Debug)]
struct ActiveGesture {
    device: GestureDevice,
    distance: f64,
    snap_points: SnapPoints,
    initial_index: usize,
    cancel_progress: f64,
    progress: f64,
    bounds: Bounds,
}

impl ActiveGesture {
    /// Pixels per progress unit. Touchpad travel uses the virtual pad size.
    fn distance(&self, touchpad_distance: f64) -> f64 {
        match self.device {
            GestureDevice::Touch => self.distance,
            GestureDevice::Touchpad => touchpad_distance,
        }
    }
}

pub struct GestureSession {
    config: SwipeConfig,
    orientation: Orientation,
    text_direction: TextDirection,
    allow_long_swipes: bool,
    dont_snap: bool,
    gesture: Option<ActiveGesture>,
}

impl GestureSession {
    pub fn new(orientation: Orientation, config: SwipeConfig) -> Self {
        Self {
            config,
            orientation,
            text_direction: TextDirection::LeftToRight,
            allow_long_swipes: false,
            dont_snap: false,
            gesture: None,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        if self.gesture.is_some() {
            SessionState::Tracking
        } else {
            SessionState::None
        }
    }

    pub fn is_idle(&self) -> bool {
        self.gesture.is_none()
    }

    pub fn progress(&self) -> Option<f64> {
        self.gesture.as_ref().map(|gesture| gesture.progress)
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.gesture.as_ref().map(|gesture| gesture.bounds)
    }

    pub fn device(&self) -> Option<GestureDevice> {
        self.gesture.as_ref().map(|gesture| gesture.device)
    }

    pub fn set_allow_long_swipes(&mut self, allow: bool) {
        self.allow_long_swipes = allow;
    }

    pub fn set_dont_snap(&mut self, dont_snap: bool) {
        self.dont_snap = dont_snap;
    }

    pub fn set_text_direction(&mut self, direction: TextDirection) {
        self.text_direction = direction;
    }

    /// Asks the consumer to confirm a new gesture. Returns `true` once tracking.
    pub fn begin<C>(&mut self, device: GestureDevice, monitor: usize, consumer: &mut C) -> bool
    where
        C: SwipeConsumer + ?Sized,
    {
        if self.gesture.is_some() {
            warn!("swipe: begin rejected, session already tracking");
            return false;
        }

        let mut request = SwipeRequest::new(monitor, self.orientation, device);
        consumer.begin(&mut request);
        let Some(confirmation) = request.confirmation else {
            debug!("swipe: begin not confirmed device={:?}", device);
            return false;
        };

        let bounds = confirmation.snap_points.bounds(
            confirmation.current_progress,
            self.allow_long_swipes,
            self.config.projection.epsilon,
            confirmation.animating_towards,
        );
        let progress = bounds.clamp(confirmation.current_progress);
        let initial_index = confirmation.snap_points.closest(progress);

        debug!(
            "swipe: begin device={:?} monitor={} progress={} bounds=[{}, {}]",
            device, monitor, progress, bounds.min, bounds.max
        );

        self.gesture = Some(ActiveGesture {
            device,
            distance: confirmation.distance,
            snap_points: confirmation.snap_points,
            initial_index,
            cancel_progress: confirmation.cancel_progress,
            progress,
            bounds,
        });
        true
    }

    /// Applies one adapter delta in pixels. No-op unless tracking.
    pub fn update<C>(&mut self, delta: f64, consumer: &mut C)
    where
        C: SwipeConsumer + ?Sized,
    {
        let flip = self.flips_direction();
        let touchpad_distance = self.touchpad_distance();
        let dont_snap = self.dont_snap;
        let Some(gesture) = self.gesture.as_mut() else {
            return;
        };

        let delta = if flip { -delta } else { delta };
        let mut progress = gesture.progress + delta / gesture.distance(touchpad_distance);
        if !dont_snap {
            progress = gesture.bounds.clamp(progress);
        }
        gesture.progress = progress;

        trace!("swipe: update delta={} progress={}", delta, progress);
        consumer.update(progress);
    }

    /// Finishes the gesture: projects the release and animates to a snap point.
    ///
    /// `velocity` is in pixels per ms, signed like the deltas.
    pub fn end<C>(&mut self, velocity: f64, cancelled: bool, consumer: &mut C)
    where
        C: SwipeConsumer + ?Sized,
    {
        let flip = self.flips_direction();
        let Some(gesture) = self.gesture.take() else {
            return;
        };
        let distance = gesture.distance(self.touchpad_distance());
        let velocity = if flip { -velocity } else { velocity };

        let target = if cancelled {
            gesture.cancel_progress
        } else {
            let release = Release {
                snap_points: &gesture.snap_points,
                bounds: gesture.bounds,
                initial_index: gesture.initial_index,
                progress: gesture.progress,
                dont_snap: self.dont_snap,
            };
            let tuning = DeviceTuning::for_device(&self.config.projection, gesture.device);
            projection::end_progress(&release, velocity, tuning, &self.config.projection)
        };

        let duration_ms = projection::animation_duration_ms(
            gesture.progress,
            target,
            velocity / distance,
            &self.config.animation,
        );

        debug!(
            "swipe: end velocity={} cancelled={} progress={} target={} duration_ms={}",
            velocity, cancelled, gesture.progress, target, duration_ms
        );
        consumer.end(duration_ms, target);
    }

    /// Ends the gesture on the spot, animating nothing, back to the cancel value.
    pub fn interrupt<C>(&mut self, consumer: &mut C)
    where
        C: SwipeConsumer + ?Sized,
    {
        let Some(gesture) = self.gesture.take() else {
            return;
        };
        debug!(
            "swipe: interrupted progress={} cancel={}",
            gesture.progress, gesture.cancel_progress
        );
        consumer.end(0, gesture.cancel_progress);
    }

    /// Drops the gesture without telling the consumer.
    pub fn reset(&mut self) {
        self.gesture = None;
    }

    fn flips_direction(&self) -> bool {
        self.orientation == Orientation::Horizontal
            && self.text_direction == TextDirection::RightToLeft
    }

    fn touchpad_distance(&self) -> f64 {
        match self.orientation {
            Orientation::Horizontal => self.config.touchpad.base_width_px,
            Orientation::Vertical => self.config.touchpad.base_height_px,
        }
    }
}
