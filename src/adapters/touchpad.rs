use statig::blocking::IntoStateMachineExt as _;

mod hsm;

use hsm::TouchpadHsm;

use crate::{
    input::TouchpadSwipeEvent,
    types::{AdapterOutput, EventDisposition, Orientation},
};


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchpadPhase {
    Idle,
    /// Fingers are swiping but the direction lock has not decided yet.
    Pending,
    Handling,
    Ignored,
}

/// Per-event inputs the tracker owns.
#[derive(Clone, Copy, Debug)]
pub struct TouchpadContext {
    pub orientation: Orientation,
    pub natural_scroll: bool,
    pub lock_threshold_px: f64,
    pub finger_count: u32,
    pub session_idle: bool,
}

#[derive(Clone, Copy, Debug)]
enum TouchpadHsmEvent {
    Swipe(TouchpadSwipeEvent),
    /// Resting fingers caught a running animation.
    HoldCatch { time_ms: u64, x: f64, y: f64 },
    /// The catching hold ended without turning into a swipe.
    Release { time_ms: u64 },
    Abandon,
}

struct DispatchContext {
    settings: TouchpadContext,
    output: AdapterOutput,
}

impl DispatchContext {
    fn new(settings: TouchpadContext) -> Self {
        Self {
            settings,
            output: AdapterOutput::propagate(),
        }
    }
}

/// Multi-finger touchpad swipe with a direction lock.
pub struct TrackpadSwipeAdapter {
    machine: statig::blocking::StateMachine<TouchpadHsm>,
}

impl TrackpadSwipeAdapter {
    pub fn new(history_window_ms: u64) -> Self {
        Self {
            machine: TouchpadHsm::new(history_window_ms).state_machine(),
        }
    }

    pub fn phase(&self) -> TouchpadPhase {
        self.machine.inner().phase
    }

    pub fn is_handling(&self) -> bool {
        self.phase() == TouchpadPhase::Handling
    }

    pub fn handle(
        &mut self,
        event: &TouchpadSwipeEvent,
        settings: TouchpadContext,
    ) -> AdapterOutput {
        self.dispatch(TouchpadHsmEvent::Swipe(*event), settings)
    }

    /// Starts a gesture straight from a touchpad hold.
    pub fn catch_hold(
        &mut self,
        time_ms: u64,
        x: f64,
        y: f64,
        settings: TouchpadContext,
    ) -> AdapterOutput {
        self.dispatch(TouchpadHsmEvent::HoldCatch { time_ms, x, y }, settings)
    }

    /// Ends a hold-started gesture that never moved.
    pub fn release(&mut self, time_ms: u64, settings: TouchpadContext) -> AdapterOutput {
        self.dispatch(TouchpadHsmEvent::Release { time_ms }, settings)
    }

    /// Stops feeding the session until the physical swipe terminates.
    pub fn abandon(&mut self, settings: TouchpadContext) {
        let _ = self.dispatch(TouchpadHsmEvent::Abandon, settings);
    }

    fn dispatch(&mut self, event: TouchpadHsmEvent, settings: TouchpadContext) -> AdapterOutput {
        let was_handling = self.is_handling();
        let mut context = DispatchContext::new(settings);
        self.machine.handle_with_context(&event, &mut context);

        let mut output = context.output;
        if was_handling || self.is_handling() {
            output.disposition = EventDisposition::Handled;
        }
        output
    }
}
