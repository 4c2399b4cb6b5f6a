use core::fmt;
use std::{fs, path::Path};

use serde::Deserialize;

const EVENT_HISTORY_WINDOW_MS: u64 = 150;
const DRAG_THRESHOLD_PX: f64 = 16.0;
const SCROLL_MULTIPLIER: f64 = 10.0;
const GESTURE_FINGER_COUNT: u32 = 3;
const MAX_TOUCH_POINTS: usize = 3;
const HOLD_END_DELAY_MS: u64 = 50;
const DRAG_VELOCITY_WINDOW_MS: u64 = 100;
const TOUCHPAD_BASE_WIDTH_PX: f64 = 400.0;
const TOUCHPAD_BASE_HEIGHT_PX: f64 = 300.0;
const VELOCITY_THRESHOLD_TOUCH: f64 = 0.3;
const VELOCITY_THRESHOLD_TOUCHPAD: f64 = 0.6;
const DECELERATION_TOUCH: f64 = 0.998;
const DECELERATION_TOUCHPAD: f64 = 0.997;
const VELOCITY_CURVE_THRESHOLD: f64 = 2.0;
const DECELERATION_PARABOLA_MULTIPLIER: f64 = 0.35;
const SNAP_EPSILON: f64 = 0.005;
const MIN_ANIMATION_DURATION_MS: u32 = 100;
const MAX_ANIMATION_DURATION_MS: u32 = 400;
// Derivative of easeOutCubic at t=0.
const DURATION_MULTIPLIER: f64 = 3.0;
const ANIMATION_BASE_VELOCITY: f64 = 0.002;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
    pub window_ms: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            window_ms: EVENT_HISTORY_WINDOW_MS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecognitionConfig {
    pub drag_threshold_px: f64,
    pub scroll_multiplier: f64,
    pub finger_count: u32,
    pub max_touch_points: usize,
    pub hold_end_delay_ms: u64,
    pub drag_velocity_window_ms: u64,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            drag_threshold_px: DRAG_THRESHOLD_PX,
            scroll_multiplier: SCROLL_MULTIPLIER,
            finger_count: GESTURE_FINGER_COUNT,
            max_touch_points: MAX_TOUCH_POINTS,
            hold_end_delay_ms: HOLD_END_DELAY_MS,
            drag_velocity_window_ms: DRAG_VELOCITY_WINDOW_MS,
        }
    }
}

/// Touchpad travel does not map 1:1 to screen pixels, so a fixed virtual
/// pad size stands in for the page distance.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TouchpadConfig {
    pub base_width_px: f64,
    pub base_height_px: f64,
}

impl Default for TouchpadConfig {
    fn default() -> Self {
        Self {
            base_width_px: TOUCHPAD_BASE_WIDTH_PX,
            base_height_px: TOUCHPAD_BASE_HEIGHT_PX,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectionConfig {
    pub velocity_threshold_touch: f64,
    pub velocity_threshold_touchpad: f64,
    pub deceleration_touch: f64,
    pub deceleration_touchpad: f64,
    pub curve_threshold: f64,
    pub parabola_multiplier: f64,
    pub epsilon: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            velocity_threshold_touch: VELOCITY_THRESHOLD_TOUCH,
            velocity_threshold_touchpad: VELOCITY_THRESHOLD_TOUCHPAD,
            deceleration_touch: DECELERATION_TOUCH,
            deceleration_touchpad: DECELERATION_TOUCHPAD,
            curve_threshold: VELOCITY_CURVE_THRESHOLD,
            parabola_multiplier: DECELERATION_PARABOLA_MULTIPLIER,
            epsilon: SNAP_EPSILON,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationConfig {
    pub min_duration_ms: u32,
    pub max_duration_ms: u32,
    pub duration_multiplier: f64,
    pub base_velocity: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            min_duration_ms: MIN_ANIMATION_DURATION_MS,
            max_duration_ms: MAX_ANIMATION_DURATION_MS,
            duration_multiplier: DURATION_MULTIPLIER,
            base_velocity: ANIMATION_BASE_VELOCITY,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwipeConfig {
    pub history: HistoryConfig,
    pub recognition: RecognitionConfig,
    pub touchpad: TouchpadConfig,
    pub projection: ProjectionConfig,
    pub animation: AnimationConfig,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read swipe config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse swipe config: {err}"),
            Self::Invalid(reason) => write!(f, "invalid swipe config: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl SwipeConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_path(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let history = &self.history;
        let recognition = &self.recognition;
        let touchpad = &self.touchpad;
        let projection = &self.projection;
        let animation = &self.animation;

        ensure(history.window_ms > 0, "history.window_ms must be > 0")?;

        ensure(
            recognition.drag_threshold_px.is_finite() && recognition.drag_threshold_px >= 0.0,
            "recognition.drag_threshold_px must be >= 0",
        )?;
        ensure(
            positive(recognition.scroll_multiplier),
            "recognition.scroll_multiplier must be > 0",
        )?;
        ensure(
            recognition.finger_count >= 2,
            "recognition.finger_count must be >= 2",
        )?;
        ensure(
            recognition.max_touch_points >= 1
                && recognition.max_touch_points <= crate::adapters::drag::MAX_CONTACTS,
            "recognition.max_touch_points must be in 1..=10",
        )?;
        ensure(
            recognition.drag_velocity_window_ms > 0,
            "recognition.drag_velocity_window_ms must be > 0",
        )?;

        ensure(
            positive(touchpad.base_width_px),
            "touchpad.base_width_px must be > 0",
        )?;
        ensure(
            positive(touchpad.base_height_px),
            "touchpad.base_height_px must be > 0",
        )?;

        ensure(
            positive(projection.velocity_threshold_touch),
            "projection.velocity_threshold_touch must be > 0",
        )?;
        ensure(
            positive(projection.velocity_threshold_touchpad),
            "projection.velocity_threshold_touchpad must be > 0",
        )?;
        ensure(
            unit_open(projection.deceleration_touch),
            "projection.deceleration_touch must be in (0, 1)",
        )?;
        ensure(
            unit_open(projection.deceleration_touchpad),
            "projection.deceleration_touchpad must be in (0, 1)",
        )?;
        ensure(
            positive(projection.curve_threshold),
            "projection.curve_threshold must be > 0",
        )?;
        ensure(
            positive(projection.parabola_multiplier),
            "projection.parabola_multiplier must be > 0",
        )?;
        ensure(
            positive(projection.epsilon) && projection.epsilon < 0.5,
            "projection.epsilon must be in (0, 0.5)",
        )?;

        ensure(
            animation.min_duration_ms <= animation.max_duration_ms,
            "animation.min_duration_ms must be <= animation.max_duration_ms",
        )?;
        ensure(
            positive(animation.duration_multiplier),
            "animation.duration_multiplier must be > 0",
        )?;
        ensure(
            positive(animation.base_velocity),
            "animation.base_velocity must be > 0",
        )?;

        Ok(())
    }
}

fn ensure(condition: bool, reason: &str) -> Result<(), ConfigError> {
    if condition {
        Ok(())
    } else {
        Err(ConfigError::Invalid(reason.to_string()))
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn unit_open(value: f64) -> bool {
    value.is_finite() && value > 0.0 && value < 1.0
}
