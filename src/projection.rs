//! Where a released swipe comes to rest and how long the settle animation runs.

use crate::{
    config::{AnimationConfig, ProjectionConfig},
    snap::{Bounds, SnapPoints},
    types::GestureDevice,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeviceTuning {
    pub velocity_threshold: f64,
    pub deceleration: f64,
}

impl DeviceTuning {
    pub fn for_device(config: &ProjectionConfig, device: GestureDevice) -> Self {
        match device {
            GestureDevice::Touch => Self {
                velocity_threshold: config.velocity_threshold_touch,
                deceleration: config.deceleration_touch,
            },
            GestureDevice::Touchpad => Self {
                velocity_threshold: config.velocity_threshold_touchpad,
                deceleration: config.deceleration_touchpad,
            },
        }
    }
}

/// Snapshot of a gesture at release time.
#[derive(Clone, Copy, Debug)]
pub struct Release<'a> {
    pub snap_points: &'a SnapPoints,
    pub bounds: Bounds,
    pub initial_index: usize,
    pub progress: f64,
    pub dont_snap: bool,
}

/// Signed distance, in progress units, a release at `velocity` (px/ms) coasts.
///
/// Linear in velocity up to the curve threshold, parabolic above it so very
/// fast flicks reach further.
pub fn coast_distance(velocity: f64, deceleration: f64, config: &ProjectionConfig) -> f64 {
    let slope = deceleration / (1.0 - deceleration) / 1000.0;
    let speed = velocity.abs();
    let threshold = config.curve_threshold;
    let multiplier = config.parabola_multiplier;

    let distance = if speed > threshold {
        let c = slope / 2.0 / multiplier;
        let x = speed - threshold + c;
        slope * threshold + multiplier * x * x - multiplier * c * c
    } else {
        speed * slope
    };

    distance * sign(velocity)
}

/// Picks the progress value the gesture settles on.
pub fn end_progress(
    release: &Release<'_>,
    velocity: f64,
    tuning: DeviceTuning,
    config: &ProjectionConfig,
) -> f64 {
    let projected = release.progress + coast_distance(velocity, tuning.deceleration, config);
    if release.dont_snap {
        return projected;
    }

    let snap = release.snap_points;
    if velocity.abs() < tuning.velocity_threshold {
        return snap.get(snap.closest(release.progress));
    }

    let projected = release.bounds.clamp(projected);
    let index = snap.point_for_projection(projected, velocity, release.initial_index);
    snap.get(index)
}

/// Settle animation length in ms.
///
/// `velocity` is in progress units per ms. A velocity that points away from
/// the target is replaced by the configured base velocity.
pub fn animation_duration_ms(
    progress: f64,
    target: f64,
    velocity: f64,
    config: &AnimationConfig,
) -> u32 {
    let remaining = target - progress;
    let velocity = if remaining * velocity <= 0.0 {
        config.base_velocity
    } else {
        velocity
    };

    let n_points = remaining.abs().ceil().max(1.0);
    let max_duration = f64::from(config.max_duration_ms) * (1.0 + n_points).log2();

    let duration = (remaining / velocity * config.duration_multiplier).abs();
    if duration <= 0.0 {
        return 0;
    }

    let min_duration = f64::from(config.min_duration_ms).min(max_duration);
    duration.clamp(min_duration, max_duration).round() as u32
}

fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
