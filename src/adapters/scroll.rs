use log::{debug, trace};

use crate::{
    history::SampleHistory,
    input::{ScrollDirection, ScrollEvent},
    types::{AdapterOutput, EventDisposition, GestureSignal, Modifiers, Orientation},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScrollPhase {
    Idle,
    Handling,
    /// Rejected by the tracker; waits for the stop marker.
    Ignored,
}

/// Per-event inputs the tracker owns.
#[derive(Clone, Copy, Debug)]
pub struct ScrollContext {
    pub orientation: Orientation,
    pub multiplier: f64,
    pub required_modifiers: Modifiers,
    pub session_idle: bool,
}

/// Smooth finger scrolling treated as a swipe.
///
/// A sequence starts with its first non-zero delta and ends with the
/// device's zero-delta stop marker.
pub struct WheelScrollAdapter {
    phase: ScrollPhase,
    history: SampleHistory,
}

impl WheelScrollAdapter {
    pub fn new(history_window_ms: u64) -> Self {
        Self {
            phase: ScrollPhase::Idle,
            history: SampleHistory::new(history_window_ms),
        }
    }

    pub fn is_handling(&self) -> bool {
        self.phase == ScrollPhase::Handling
    }

    /// Whether this event may start or continue a scroll swipe.
    ///
    /// Modifiers only matter for starting; a running sequence keeps going
    /// when they change.
    pub fn accepts(&self, event: &ScrollEvent, required_modifiers: Modifiers) -> bool {
        if event.direction != ScrollDirection::Smooth || !event.is_finger_scroll() {
            return false;
        }
        self.is_handling()
            || required_modifiers.is_empty()
            || event.modifiers.intersects(required_modifiers)
    }

    pub fn handle(&mut self, event: &ScrollEvent, context: &ScrollContext) -> AdapterOutput {
        let mut output = AdapterOutput::propagate();
        match self.phase {
            ScrollPhase::Idle => {
                if event.is_stop() || !context.session_idle {
                    return output;
                }
                if !self.accepts(event, context.required_modifiers) {
                    return output;
                }

                debug!("swipe: scroll begin x={} y={}", event.x, event.y);
                self.history.reset();
                self.history.append(event.time_ms, 0.0);
                self.phase = ScrollPhase::Handling;
                output.emit(GestureSignal::Begin {
                    x: event.x,
                    y: event.y,
                });
                self.emit_delta(event, context, &mut output);
            }
            ScrollPhase::Handling => {
                if !self.accepts(event, context.required_modifiers) {
                    return output;
                }
                if event.is_stop() {
                    self.history.trim(event.time_ms);
                    let velocity = self.history.calculate_velocity();
                    debug!("swipe: scroll stop velocity={}", velocity);
                    output.emit(GestureSignal::End {
                        velocity,
                        cancelled: false,
                    });
                    self.phase = ScrollPhase::Idle;
                } else {
                    self.emit_delta(event, context, &mut output);
                }
            }
            ScrollPhase::Ignored => {
                if event.is_stop() {
                    self.phase = ScrollPhase::Idle;
                }
                return output;
            }
        }

        output.disposition = EventDisposition::Handled;
        output
    }

    /// Starts a gesture from a two-finger touchpad hold.
    pub fn catch_hold(&mut self, time_ms: u64, x: f64, y: f64) -> AdapterOutput {
        let mut output = AdapterOutput::propagate();
        if self.phase == ScrollPhase::Handling {
            return output;
        }
        debug!("swipe: scroll hold caught animation x={} y={}", x, y);
        self.history.reset();
        self.history.append(time_ms, 0.0);
        self.phase = ScrollPhase::Handling;
        output.emit(GestureSignal::Begin { x, y });
        output.disposition = EventDisposition::Handled;
        output
    }

    /// Ends a hold-started gesture that never scrolled.
    pub fn release(&mut self, time_ms: u64) -> AdapterOutput {
        let mut output = AdapterOutput::propagate();
        if self.phase != ScrollPhase::Handling {
            return output;
        }
        debug!("swipe: scroll hold released t={}", time_ms);
        self.phase = ScrollPhase::Idle;
        output.emit(GestureSignal::End {
            velocity: 0.0,
            cancelled: false,
        });
        output.disposition = EventDisposition::Handled;
        output
    }

    pub fn abandon(&mut self) {
        if self.phase == ScrollPhase::Handling {
            debug!("swipe: scroll abandoned");
        }
        self.phase = ScrollPhase::Ignored;
    }

    fn emit_delta(
        &mut self,
        event: &ScrollEvent,
        context: &ScrollContext,
        output: &mut AdapterOutput,
    ) {
        let delta = context.orientation.axis(event.dx, event.dy) * context.multiplier;
        self.history.append(event.time_ms, delta);
        trace!("swipe: scroll delta={}", delta);
        output.emit(GestureSignal::Update { delta });
    }
}
