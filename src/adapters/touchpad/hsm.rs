use log::{debug, trace};
use statig::prelude::*;

use super::*;
use crate::{history::SampleHistory, input::GesturePhase, types::GestureSignal};

pub(super) struct TouchpadHsm {
    pub(super) phase: TouchpadPhase,
    history: SampleHistory,
    cumulative_x: f64,
    cumulative_y: f64,
}

#[state_machine(initial = "State::idle()")]
impl TouchpadHsm {
    #[state]
    fn idle(&mut self, context: &mut DispatchContext, event: &TouchpadHsmEvent) -> Outcome<State> {
        match event {
            TouchpadHsmEvent::Swipe(swipe) => self.start_swipe(context, swipe),
            TouchpadHsmEvent::HoldCatch { time_ms, x, y } => {
                self.catch_hold(context, *time_ms, *x, *y)
            }
            TouchpadHsmEvent::Release { .. } | TouchpadHsmEvent::Abandon => Handled,
        }
    }

    #[state]
    fn pending(
        &mut self,
        context: &mut DispatchContext,
        event: &TouchpadHsmEvent,
    ) -> Outcome<State> {
        match event {
            TouchpadHsmEvent::Swipe(swipe) => match swipe.phase {
                GesturePhase::Begin => {
                    self.cumulative_x = 0.0;
                    self.cumulative_y = 0.0;
                    self.try_lock(context, swipe)
                }
                GesturePhase::Update => self.try_lock(context, swipe),
                GesturePhase::End | GesturePhase::Cancel => {
                    trace!("swipe: touchpad released before lock");
                    self.go_idle()
                }
            },
            TouchpadHsmEvent::Abandon => self.go_ignored(),
            TouchpadHsmEvent::HoldCatch { .. } | TouchpadHsmEvent::Release { .. } => Handled,
        }
    }

    #[state]
    fn handling(
        &mut self,
        context: &mut DispatchContext,
        event: &TouchpadHsmEvent,
    ) -> Outcome<State> {
        match event {
            TouchpadHsmEvent::Swipe(swipe) => match swipe.phase {
                GesturePhase::Begin | GesturePhase::Update => {
                    self.emit_delta(context, swipe);
                    Handled
                }
                GesturePhase::End | GesturePhase::Cancel => {
                    self.history.trim(swipe.time_ms);
                    let velocity = self.history.calculate_velocity();
                    debug!(
                        "swipe: touchpad release phase={:?} velocity={}",
                        swipe.phase, velocity
                    );
                    context.output.emit(GestureSignal::End {
                        velocity,
                        cancelled: false,
                    });
                    self.go_idle()
                }
            },
            TouchpadHsmEvent::Release { time_ms } => {
                debug!("swipe: touchpad hold released t={}", time_ms);
                context.output.emit(GestureSignal::End {
                    velocity: 0.0,
                    cancelled: false,
                });
                self.go_idle()
            }
            TouchpadHsmEvent::Abandon => self.go_ignored(),
            TouchpadHsmEvent::HoldCatch { .. } => Handled,
        }
    }

    #[state]
    fn ignored(
        &mut self,
        context: &mut DispatchContext,
        event: &TouchpadHsmEvent,
    ) -> Outcome<State> {
        match event {
            TouchpadHsmEvent::Swipe(swipe) => match swipe.phase {
                GesturePhase::Begin => self.start_swipe(context, swipe),
                GesturePhase::Update => Handled,
                GesturePhase::End | GesturePhase::Cancel => self.go_idle(),
            },
            TouchpadHsmEvent::HoldCatch { time_ms, x, y } => {
                self.catch_hold(context, *time_ms, *x, *y)
            }
            TouchpadHsmEvent::Release { .. } | TouchpadHsmEvent::Abandon => Handled,
        }
    }
}

impl TouchpadHsm {
    pub(super) fn new(history_window_ms: u64) -> Self {
        Self {
            phase: TouchpadPhase::Idle,
            history: SampleHistory::new(history_window_ms),
            cumulative_x: 0.0,
            cumulative_y: 0.0,
        }
    }

    fn start_swipe(
        &mut self,
        context: &mut DispatchContext,
        swipe: &TouchpadSwipeEvent,
    ) -> Outcome<State> {
        let settings = context.settings;
        if swipe.phase != GesturePhase::Begin || swipe.fingers != settings.finger_count {
            return Handled;
        }
        if !settings.session_idle {
            trace!("swipe: touchpad ignored, session busy");
            return self.go_ignored();
        }

        self.cumulative_x = 0.0;
        self.cumulative_y = 0.0;
        self.phase = TouchpadPhase::Pending;
        match self.try_lock(context, swipe) {
            Handled => Transition(State::pending()),
            outcome => outcome,
        }
    }

    fn catch_hold(
        &mut self,
        context: &mut DispatchContext,
        time_ms: u64,
        x: f64,
        y: f64,
    ) -> Outcome<State> {
        if !context.settings.session_idle {
            return Handled;
        }
        debug!("swipe: touchpad hold caught animation x={} y={}", x, y);
        self.history.reset();
        self.history.append(time_ms, 0.0);
        context.output.emit(GestureSignal::Begin { x, y });
        self.phase = TouchpadPhase::Handling;
        Transition(State::handling())
    }

    /// Accumulates motion until it is long enough to pick an axis.
    fn try_lock(
        &mut self,
        context: &mut DispatchContext,
        swipe: &TouchpadSwipeEvent,
    ) -> Outcome<State> {
        self.cumulative_x += swipe.dx_unaccelerated;
        self.cumulative_y += swipe.dy_unaccelerated;

        let distance = self.cumulative_x.hypot(self.cumulative_y);
        if distance == 0.0 || distance < context.settings.lock_threshold_px {
            return Handled;
        }

        let locked = if self.cumulative_x.abs() > self.cumulative_y.abs() {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };
        debug!(
            "swipe: touchpad direction lock cdx={} cdy={} axis={:?} want={:?}",
            self.cumulative_x, self.cumulative_y, locked, context.settings.orientation
        );
        self.cumulative_x = 0.0;
        self.cumulative_y = 0.0;

        if locked != context.settings.orientation {
            return self.go_ignored();
        }

        self.history.reset();
        self.history.append(swipe.time_ms, 0.0);
        context.output.emit(GestureSignal::Begin {
            x: swipe.x,
            y: swipe.y,
        });
        self.emit_delta(context, swipe);
        self.phase = TouchpadPhase::Handling;
        Transition(State::handling())
    }

    fn emit_delta(&mut self, context: &mut DispatchContext, swipe: &TouchpadSwipeEvent) {
        let settings = context.settings;
        let mut delta = settings
            .orientation
            .axis(swipe.dx_unaccelerated, swipe.dy_unaccelerated);
        if settings.natural_scroll {
            delta = -delta;
        }
        self.history.append(swipe.time_ms, delta);
        trace!("swipe: touchpad delta={}", delta);
        context.output.emit(GestureSignal::Update { delta });
    }

    fn go_idle(&mut self) -> Outcome<State> {
        self.phase = TouchpadPhase::Idle;
        self.cumulative_x = 0.0;
        self.cumulative_y = 0.0;
        Transition(State::idle())
    }

    fn go_ignored(&mut self) -> Outcome<State> {
        self.phase = TouchpadPhase::Ignored;
        Transition(State::ignored())
    }
}
