use heapless::Deque;

pub const HISTORY_CAPACITY: usize = 128;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Sample {
    pub time_ms: u64,
    pub delta: f64,
}

/// Recent `(timestamp, delta)` readings within a fixed time window.
///
/// Samples are newest-last. Trimming is lazy: it happens before every append
/// and whenever the owner asks for a velocity at release time. When the ring
/// is full the oldest sample is evicted regardless of age.
#[derive(Clone, Debug)]
pub struct SampleHistory {
    window_ms: u64,
    samples: Deque<Sample, HISTORY_CAPACITY>,
}

impl SampleHistory {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            samples: Deque::new(),
        }
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Drops every sample older than `time_ms - window`.
    pub fn trim(&mut self, time_ms: u64) {
        let threshold = time_ms.saturating_sub(self.window_ms);
        let mut dropped = 0usize;
        while self
            .samples
            .front()
            .is_some_and(|sample| sample.time_ms < threshold)
        {
            let _ = self.samples.pop_front();
            dropped += 1;
        }
        if dropped > 0 {
            log::trace!("swipe: history trimmed dropped={} kept={}", dropped, self.samples.len());
        }
    }

    pub fn append(&mut self, time_ms: u64, delta: f64) {
        let time_ms = match self.samples.back() {
            Some(last) if time_ms < last.time_ms => {
                log::warn!(
                    "swipe: out-of-order sample t={} newest={}, clamping",
                    time_ms,
                    last.time_ms
                );
                last.time_ms
            }
            _ => time_ms,
        };

        self.trim(time_ms);
        if self.samples.is_full() {
            let _ = self.samples.pop_front();
        }
        let _ = self.samples.push_back(Sample { time_ms, delta });
    }

    /// Average velocity in delta units per millisecond.
    ///
    /// The first sample only anchors the period; its delta happened before it.
    pub fn calculate_velocity(&self) -> f64 {
        if self.samples.len() < 2 {
            return 0.0;
        }
        let (Some(first), Some(last)) = (self.samples.front(), self.samples.back()) else {
            return 0.0;
        };
        if first.time_ms == last.time_ms {
            return 0.0;
        }

        let total_delta: f64 = self.samples.iter().skip(1).map(|sample| sample.delta).sum();
        let period = (last.time_ms - first.time_ms) as f64;
        total_delta / period
    }
}
