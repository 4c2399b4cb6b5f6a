use core::fmt;

pub const MAX_SNAP_POINTS: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SnapPointsError {
    Empty,
    TooMany(usize),
    NotFinite,
    Unsorted,
}

impl fmt::Display for SnapPointsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "snap points must not be empty"),
            Self::TooMany(count) => {
                write!(f, "{count} snap points exceed the limit of {MAX_SNAP_POINTS}")
            }
            Self::NotFinite => write!(f, "snap points must be finite"),
            Self::Unsorted => write!(f, "snap points must be sorted in ascending order"),
        }
    }
}

impl std::error::Error for SnapPointsError {}

/// Ascending, non-empty list of legal resting progress values.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapPoints {
    points: heapless::Vec<f64, MAX_SNAP_POINTS>,
}

impl SnapPoints {
    pub fn from_slice(points: &[f64]) -> Result<Self, SnapPointsError> {
        if points.is_empty() {
            return Err(SnapPointsError::Empty);
        }
        if points.iter().any(|point| !point.is_finite()) {
            return Err(SnapPointsError::NotFinite);
        }
        if points.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(SnapPointsError::Unsorted);
        }
        let points = heapless::Vec::from_slice(points)
            .map_err(|()| SnapPointsError::TooMany(points.len()))?;
        Ok(Self { points })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> f64 {
        self.points[index.min(self.points.len() - 1)]
    }

    pub fn first(&self) -> f64 {
        self.points[0]
    }

    pub fn last(&self) -> f64 {
        self.points[self.points.len() - 1]
    }

    /// Index of the point nearest `pos`; ties go to the lower index.
    pub fn closest(&self, pos: f64) -> usize {
        let mut best = 0usize;
        let mut best_distance = f64::INFINITY;
        for (index, point) in self.points.iter().enumerate() {
            let distance = (point - pos).abs();
            if distance < best_distance {
                best = index;
                best_distance = distance;
            }
        }
        best
    }

    /// Index of the smallest point `>= pos`.
    pub fn next(&self, pos: f64) -> Option<usize> {
        self.points.iter().position(|point| *point >= pos)
    }

    /// Index of the largest point `<= pos`.
    pub fn previous(&self, pos: f64) -> Option<usize> {
        self.points.iter().rposition(|point| *point <= pos)
    }

    /// Range progress may roam during a gesture that started at `pos`.
    ///
    /// Without long swipes the range reaches one point past the bracketing
    /// pair on each side. `animating_towards` widens the side an interrupted
    /// animation was heading to by one more point.
    pub fn bounds(
        &self,
        pos: f64,
        allow_long_swipes: bool,
        epsilon: f64,
        animating_towards: Option<f64>,
    ) -> Bounds {
        if allow_long_swipes {
            return Bounds {
                min: self.first(),
                max: self.last(),
            };
        }

        let last_index = self.points.len() - 1;
        let closest = self.closest(pos);
        let (prev, next) = if (self.points[closest] - pos).abs() < epsilon {
            (closest, closest)
        } else {
            (
                self.previous(pos).unwrap_or(0),
                self.next(pos).unwrap_or(last_index),
            )
        };

        let mut min_index = prev.saturating_sub(1);
        let mut max_index = (next + 1).min(last_index);

        if let Some(target) = animating_towards {
            if target == self.points[prev] {
                min_index = min_index.saturating_sub(1);
            }
            if target == self.points[next] {
                max_index = (max_index + 1).min(last_index);
            }
        }

        Bounds {
            min: self.points[min_index],
            max: self.points[max_index],
        }
    }

    /// Resting point for a decisive release whose projection landed at `pos`.
    ///
    /// A release that would settle back on the point the gesture started from
    /// advances one point in the direction of travel instead.
    pub fn point_for_projection(&self, pos: f64, velocity: f64, initial: usize) -> usize {
        let prev = self.previous(pos);
        let next = self.next(pos);
        let (behind, ahead) = if velocity > 0.0 {
            (prev, next)
        } else {
            (next, prev)
        };

        if behind == Some(initial) {
            if let Some(ahead) = ahead {
                return ahead;
            }
        }

        self.closest(pos)
    }
}
