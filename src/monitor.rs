pub const MAX_MONITORS: usize = 8;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MonitorRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl MonitorRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    fn distance_sq(&self, x: f64, y: f64) -> f64 {
        let dx = (self.x - x).max(0.0).max(x - (self.x + self.width));
        let dy = (self.y - y).max(0.0).max(y - (self.y + self.height));
        dx * dx + dy * dy
    }
}

/// Screen geometry used to tell the consumer which monitor a gesture began on.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MonitorLayout {
    monitors: heapless::Vec<MonitorRect, MAX_MONITORS>,
}

impl MonitorLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a layout, keeping the first `MAX_MONITORS` rectangles.
    pub fn from_rects(rects: &[MonitorRect]) -> Self {
        let mut layout = Self::default();
        for rect in rects {
            if layout.monitors.push(*rect).is_err() {
                log::warn!(
                    "swipe: monitor layout truncated to {} entries",
                    MAX_MONITORS
                );
                break;
            }
        }
        layout
    }

    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    /// Monitor containing the point, else the nearest one, else 0.
    pub fn index_at(&self, x: f64, y: f64) -> usize {
        if let Some(index) = self.monitors.iter().position(|rect| rect.contains(x, y)) {
            return index;
        }

        let mut best = 0usize;
        let mut best_distance = f64::INFINITY;
        for (index, rect) in self.monitors.iter().enumerate() {
            let distance = rect.distance_sq(x, y);
            if distance < best_distance {
                best = index;
                best_distance = distance;
            }
        }
        best
    }
}
