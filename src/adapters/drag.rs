use heapless::{Deque, Vec};
use log::{debug, trace};

use crate::{
    input::{TouchEvent, TouchEventKind},
    types::{AdapterOutput, EventDisposition, GestureSignal, Orientation},
};

pub const MAX_CONTACTS: usize = 10;
const VELOCITY_SAMPLES: usize = 16;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Point {
    x: f64,
    y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum DragPhase {
    Idle,
    /// Enough contacts are down; waiting for the centroid to travel far enough.
    Pending,
    Tracking,
    /// Rejected for the rest of this touch sequence.
    Ignored,
}

/// Per-event inputs the tracker owns.
#[derive(Clone, Copy, Debug)]
pub struct DragContext {
    pub orientation: Orientation,
    pub session_idle: bool,
    pub threshold_px: f64,
    pub min_points: usize,
    pub max_points: usize,
}

/// Direct multi-contact drag on a touch surface.
///
/// The centroid of all contacts drives the gesture. Deltas are measured from
/// the previous centroid and negated so dragging content towards the start
/// of the axis increases progress. The release velocity comes from the
/// adapter's own short motion window, not from a [`SampleHistory`].
///
/// [`SampleHistory`]: crate::history::SampleHistory
pub struct SurfaceDragAdapter {
    velocity_window_ms: u64,
    phase: DragPhase,
    contacts: Vec<(u32, Point), MAX_CONTACTS>,
    last_centroid: Point,
    travel: Point,
    pending_travel: Point,
    motion: Deque<(u64, Point), VELOCITY_SAMPLES>,
}

impl SurfaceDragAdapter {
    pub fn new(velocity_window_ms: u64) -> Self {
        Self {
            velocity_window_ms,
            phase: DragPhase::Idle,
            contacts: Vec::new(),
            last_centroid: Point::default(),
            travel: Point::default(),
            pending_travel: Point::default(),
            motion: Deque::new(),
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.phase == DragPhase::Tracking
    }

    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    /// Stops feeding the session until every contact is lifted.
    pub fn abandon(&mut self) {
        self.phase = if self.contacts.is_empty() {
            DragPhase::Idle
        } else {
            DragPhase::Ignored
        };
        debug!("swipe: drag abandoned contacts={}", self.contacts.len());
    }

    pub fn handle(&mut self, event: &TouchEvent, context: &DragContext) -> AdapterOutput {
        let was_tracking = self.is_tracking();
        let mut output = AdapterOutput::propagate();

        match event.kind {
            TouchEventKind::Down => self.on_down(event, context, &mut output),
            TouchEventKind::Motion => self.on_motion(event, context, &mut output),
            TouchEventKind::Up => self.on_up(event, context, &mut output),
            TouchEventKind::Cancel => self.on_cancel(event, context, &mut output),
        }

        if was_tracking || self.is_tracking() {
            output.disposition = EventDisposition::Handled;
        }
        output
    }

    fn on_down(&mut self, event: &TouchEvent, context: &DragContext, output: &mut AdapterOutput) {
        let point = Point {
            x: event.x,
            y: event.y,
        };
        if let Some(contact) = self.contact_mut(event.slot) {
            *contact = point;
        } else if self.contacts.push((event.slot, point)).is_err() {
            trace!("swipe: drag contact table full slot={}", event.slot);
            return;
        }

        let count = self.contacts.len();
        match self.phase {
            DragPhase::Idle => {
                let fits = (context.min_points..=context.max_points).contains(&count);
                if context.session_idle && fits {
                    self.start_pending(event.time_ms);
                }
            }
            DragPhase::Pending => {
                if count > context.max_points {
                    debug!("swipe: drag ignored, too many contacts={}", count);
                    self.phase = DragPhase::Ignored;
                } else {
                    self.reanchor();
                }
            }
            DragPhase::Tracking => {
                if count > context.max_points {
                    debug!("swipe: drag cancelled, too many contacts={}", count);
                    let velocity = self.release_velocity(event.time_ms, context.orientation);
                    output.emit(GestureSignal::End {
                        velocity,
                        cancelled: true,
                    });
                    self.phase = DragPhase::Ignored;
                } else {
                    self.reanchor();
                }
            }
            DragPhase::Ignored => {}
        }
    }

    fn on_motion(&mut self, event: &TouchEvent, context: &DragContext, output: &mut AdapterOutput) {
        let Some(contact) = self.contact_mut(event.slot) else {
            return;
        };
        contact.x = event.x;
        contact.y = event.y;

        if matches!(self.phase, DragPhase::Idle | DragPhase::Ignored) {
            return;
        }

        let centroid = self.centroid();
        let step = Point {
            x: centroid.x - self.last_centroid.x,
            y: centroid.y - self.last_centroid.y,
        };
        self.last_centroid = centroid;
        self.travel.x += step.x;
        self.travel.y += step.y;
        self.push_motion(event.time_ms);

        let orientation = context.orientation;
        match self.phase {
            DragPhase::Pending => {
                self.pending_travel.x += step.x;
                self.pending_travel.y += step.y;
                let moved = orientation.axis(self.pending_travel.x, self.pending_travel.y);
                let threshold_met = if context.threshold_px <= 0.0 {
                    moved != 0.0
                } else {
                    moved.abs() >= context.threshold_px
                };
                if !threshold_met {
                    return;
                }

                debug!(
                    "swipe: drag begin contacts={} moved={} threshold={}",
                    self.contacts.len(),
                    moved,
                    context.threshold_px
                );
                self.phase = DragPhase::Tracking;
                output.emit(GestureSignal::Begin {
                    x: centroid.x,
                    y: centroid.y,
                });
                output.emit(GestureSignal::Update {
                    delta: -orientation.axis(step.x, step.y),
                });
            }
            DragPhase::Tracking => {
                let delta = -orientation.axis(step.x, step.y);
                if delta != 0.0 {
                    trace!("swipe: drag delta={}", delta);
                    output.emit(GestureSignal::Update { delta });
                }
            }
            DragPhase::Idle | DragPhase::Ignored => {}
        }
    }

    fn on_up(&mut self, event: &TouchEvent, context: &DragContext, output: &mut AdapterOutput) {
        let Some(index) = self.contact_index(event.slot) else {
            return;
        };
        let _ = self.contacts.swap_remove(index);

        if !self.contacts.is_empty() {
            match self.phase {
                DragPhase::Pending if self.contacts.len() < context.min_points => {
                    self.phase = DragPhase::Ignored;
                }
                DragPhase::Pending | DragPhase::Tracking => self.reanchor(),
                DragPhase::Idle | DragPhase::Ignored => {}
            }
            return;
        }

        if self.phase == DragPhase::Tracking {
            let velocity = self.release_velocity(event.time_ms, context.orientation);
            debug!("swipe: drag release velocity={}", velocity);
            output.emit(GestureSignal::End {
                velocity,
                cancelled: false,
            });
        }
        self.clear();
    }

    fn on_cancel(&mut self, event: &TouchEvent, context: &DragContext, output: &mut AdapterOutput) {
        if self.phase == DragPhase::Tracking {
            let velocity = self.release_velocity(event.time_ms, context.orientation);
            debug!("swipe: drag cancelled by device");
            output.emit(GestureSignal::End {
                velocity,
                cancelled: true,
            });
        }
        self.contacts.clear();
        self.clear();
    }

    fn start_pending(&mut self, time_ms: u64) {
        self.phase = DragPhase::Pending;
        self.last_centroid = self.centroid();
        self.travel = Point::default();
        self.pending_travel = Point::default();
        self.motion.clear();
        self.push_motion(time_ms);
        trace!("swipe: drag pending contacts={}", self.contacts.len());
    }

    /// A contact joined or left: measure the next step from the new centroid.
    fn reanchor(&mut self) {
        self.last_centroid = self.centroid();
    }

    fn clear(&mut self) {
        self.phase = DragPhase::Idle;
        self.travel = Point::default();
        self.pending_travel = Point::default();
        self.motion.clear();
    }

    fn push_motion(&mut self, time_ms: u64) {
        if self.motion.is_full() {
            let _ = self.motion.pop_front();
        }
        let _ = self.motion.push_back((time_ms, self.travel));
    }

    /// Signed axis velocity in px/ms over the recent motion window, already
    /// negated like the deltas.
    fn release_velocity(&mut self, time_ms: u64, orientation: Orientation) -> f64 {
        let threshold = time_ms.saturating_sub(self.velocity_window_ms);
        while self
            .motion
            .front()
            .is_some_and(|(sample_ms, _)| *sample_ms < threshold)
        {
            let _ = self.motion.pop_front();
        }

        let (Some((first_ms, first)), Some((last_ms, last))) =
            (self.motion.front(), self.motion.back())
        else {
            return 0.0;
        };
        if last_ms <= first_ms {
            return 0.0;
        }

        let moved = orientation.axis(last.x - first.x, last.y - first.y);
        -moved / (last_ms - first_ms) as f64
    }

    fn centroid(&self) -> Point {
        if self.contacts.is_empty() {
            return Point::default();
        }
        let count = self.contacts.len() as f64;
        let (sum_x, sum_y) = self
            .contacts
            .iter()
            .fold((0.0, 0.0), |(x, y), (_, point)| (x + point.x, y + point.y));
        Point {
            x: sum_x / count,
            y: sum_y / count,
        }
    }

    fn contact_index(&self, slot: u32) -> Option<usize> {
        self.contacts.iter().position(|(id, _)| *id == slot)
    }

    fn contact_mut(&mut self, slot: u32) -> Option<&mut Point> {
        self.contacts
            .iter_mut()
            .find(|(id, _)| *id == slot)
            .map(|(_, point)| point)
    }
}
