//! Front door of the crate: one tracker per swipeable screen.

use log::{debug, trace};

use crate::{
    adapters::{
        DragContext, ScrollContext, SurfaceDragAdapter, TouchpadContext, TrackpadSwipeAdapter,
        WheelScrollAdapter,
    },
    config::SwipeConfig,
    input::{
        GesturePhase, ScrollDirection, ScrollEvent, TouchEvent, TouchpadHoldEvent,
        TouchpadSwipeEvent,
    },
    monitor::MonitorLayout,
    session::{GestureSession, SessionState, SwipeConsumer},
    types::{
        ActionMode, AdapterKind, AdapterOutput, EventDisposition, GestureSignal, Modifiers,
        Orientation, TextDirection,
    },
};

#[cfg(test)]
mod tests;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingRelease {
    kind: AdapterKind,
    due_ms: u64,
}

/// Owns the session and the three adapters and routes raw input between them.
///
/// At most one adapter feeds the session at a time. Every call that can
/// reach the consumer takes it by `&mut`.
pub struct SwipeTracker {
    config: SwipeConfig,
    orientation: Orientation,
    session: GestureSession,
    drag: SurfaceDragAdapter,
    touchpad: TrackpadSwipeAdapter,
    scroll: WheelScrollAdapter,
    monitors: MonitorLayout,
    allowed_modes: ActionMode,
    action_mode: ActionMode,
    enabled: bool,
    allow_drag: bool,
    allow_scroll: bool,
    natural_scroll: bool,
    scroll_modifiers: Modifiers,
    threshold_suspended: bool,
    active: Option<AdapterKind>,
    pending_release: Option<PendingRelease>,
}

impl SwipeTracker {
    pub fn new(orientation: Orientation, allowed_modes: ActionMode, config: SwipeConfig) -> Self {
        let window_ms = config.history.window_ms;
        Self {
            config,
            orientation,
            session: GestureSession::new(orientation, config),
            drag: SurfaceDragAdapter::new(config.recognition.drag_velocity_window_ms),
            touchpad: TrackpadSwipeAdapter::new(window_ms),
            scroll: WheelScrollAdapter::new(window_ms),
            monitors: MonitorLayout::new(),
            allowed_modes,
            action_mode: ActionMode::NORMAL,
            enabled: true,
            allow_drag: true,
            allow_scroll: true,
            natural_scroll: false,
            scroll_modifiers: Modifiers::NONE,
            threshold_suspended: false,
            active: None,
            pending_release: None,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn progress(&self) -> Option<f64> {
        self.session.progress()
    }

    pub fn active_adapter(&self) -> Option<AdapterKind> {
        self.active
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling mid-gesture interrupts it.
    pub fn set_enabled<C>(&mut self, enabled: bool, consumer: &mut C)
    where
        C: SwipeConsumer + ?Sized,
    {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        debug!("swipe: tracker enabled={}", enabled);
        if !enabled {
            self.interrupt(consumer);
        }
    }

    /// Shell context changes take effect on the next update.
    pub fn set_action_mode(&mut self, mode: ActionMode) {
        self.action_mode = mode;
    }

    pub fn set_allow_drag(&mut self, allow: bool) {
        self.allow_drag = allow;
    }

    pub fn set_allow_scroll(&mut self, allow: bool) {
        self.allow_scroll = allow;
    }

    pub fn set_allow_long_swipes(&mut self, allow: bool) {
        self.session.set_allow_long_swipes(allow);
    }

    pub fn set_dont_snap(&mut self, dont_snap: bool) {
        self.session.set_dont_snap(dont_snap);
    }

    pub fn set_text_direction(&mut self, direction: TextDirection) {
        self.session.set_text_direction(direction);
    }

    pub fn set_natural_scroll(&mut self, natural: bool) {
        self.natural_scroll = natural;
    }

    pub fn set_scroll_modifiers(&mut self, modifiers: Modifiers) {
        self.scroll_modifiers = modifiers;
    }

    pub fn set_monitors(&mut self, monitors: MonitorLayout) {
        self.monitors = monitors;
    }

    /// The consumer's settle animation is done; new gestures need the full
    /// begin threshold again.
    pub fn animation_finished(&mut self) {
        self.threshold_suspended = false;
    }

    /// Whether a scroll event would be taken by this tracker.
    pub fn can_handle_scroll_event(&self, event: &ScrollEvent) -> bool {
        if !self.enabled || !self.allow_scroll || !self.may_recognize() {
            return false;
        }
        if !event.is_finger_scroll() {
            return false;
        }
        self.scroll.is_handling() || self.scroll_modifiers_satisfied(event.modifiers)
    }

    pub fn handle_touch<C>(&mut self, event: &TouchEvent, consumer: &mut C) -> EventDisposition
    where
        C: SwipeConsumer + ?Sized,
    {
        let context = self.drag_context();
        let output = self.drag.handle(event, &context);
        self.apply(AdapterKind::SurfaceDrag, output, consumer)
    }

    pub fn handle_touchpad_swipe<C>(
        &mut self,
        event: &TouchpadSwipeEvent,
        consumer: &mut C,
    ) -> EventDisposition
    where
        C: SwipeConsumer + ?Sized,
    {
        if !self.enabled {
            return EventDisposition::Propagate;
        }
        if event.fingers == self.config.recognition.finger_count
            && self.active == Some(AdapterKind::TrackpadSwipe)
        {
            self.pending_release = None;
        }

        let context = self.touchpad_context();
        let output = self.touchpad.handle(event, context);
        self.apply(AdapterKind::TrackpadSwipe, output, consumer)
    }

    pub fn handle_touchpad_hold<C>(
        &mut self,
        event: &TouchpadHoldEvent,
        consumer: &mut C,
    ) -> EventDisposition
    where
        C: SwipeConsumer + ?Sized,
    {
        if !self.enabled {
            return EventDisposition::Propagate;
        }

        let kind = if event.fingers == self.config.recognition.finger_count {
            AdapterKind::TrackpadSwipe
        } else if event.fingers == 2
            && self.allow_scroll
            && self.scroll_modifiers_satisfied(event.modifiers)
        {
            AdapterKind::WheelScroll
        } else {
            return EventDisposition::Propagate;
        };

        match event.phase {
            GesturePhase::Begin => {
                if !self.threshold_suspended || !self.session.is_idle() {
                    return EventDisposition::Propagate;
                }
                let output = match kind {
                    AdapterKind::TrackpadSwipe => {
                        let context = self.touchpad_context();
                        self.touchpad.catch_hold(event.time_ms, event.x, event.y, context)
                    }
                    AdapterKind::WheelScroll => {
                        self.scroll.catch_hold(event.time_ms, event.x, event.y)
                    }
                    AdapterKind::SurfaceDrag => return EventDisposition::Propagate,
                };
                self.apply(kind, output, consumer)
            }
            GesturePhase::End | GesturePhase::Cancel => {
                if self.active == Some(kind) {
                    let due_ms = event.time_ms + self.config.recognition.hold_end_delay_ms;
                    trace!("swipe: hold ended, release due at {}", due_ms);
                    self.pending_release = Some(PendingRelease { kind, due_ms });
                }
                EventDisposition::Propagate
            }
            GesturePhase::Update => EventDisposition::Propagate,
        }
    }

    pub fn handle_scroll<C>(&mut self, event: &ScrollEvent, consumer: &mut C) -> EventDisposition
    where
        C: SwipeConsumer + ?Sized,
    {
        if self.active == Some(AdapterKind::WheelScroll)
            && (!self.allow_scroll || !self.may_recognize())
        {
            debug!("swipe: scroll context lost mid-gesture");
            self.interrupt(consumer);
        }
        // The stop marker must always reach the adapter so it can leave its sequence.
        let stop_marker = event.is_stop() && event.is_finger_scroll();
        if !self.can_handle_scroll_event(event) && !stop_marker {
            return EventDisposition::Propagate;
        }
        if event.direction != ScrollDirection::Smooth {
            return EventDisposition::Propagate;
        }
        if self.active == Some(AdapterKind::WheelScroll) {
            self.pending_release = None;
        }

        let context = ScrollContext {
            orientation: self.orientation,
            multiplier: self.config.recognition.scroll_multiplier,
            required_modifiers: self.scroll_modifiers,
            session_idle: self.session.is_idle(),
        };
        let output = self.scroll.handle(event, &context);
        self.apply(AdapterKind::WheelScroll, output, consumer)
    }

    /// Fires a pending hold release once its delay has passed.
    pub fn tick<C>(&mut self, now_ms: u64, consumer: &mut C)
    where
        C: SwipeConsumer + ?Sized,
    {
        let Some(pending) = self.pending_release else {
            return;
        };
        if now_ms < pending.due_ms {
            return;
        }
        self.pending_release = None;

        let output = match pending.kind {
            AdapterKind::TrackpadSwipe => {
                let context = self.touchpad_context();
                self.touchpad.release(now_ms, context)
            }
            AdapterKind::WheelScroll => self.scroll.release(now_ms),
            AdapterKind::SurfaceDrag => return,
        };
        let _ = self.apply(pending.kind, output, consumer);
    }

    /// Ends the running gesture at its cancel value with no animation.
    pub fn interrupt<C>(&mut self, consumer: &mut C)
    where
        C: SwipeConsumer + ?Sized,
    {
        self.pending_release = None;
        let Some(kind) = self.active.take() else {
            return;
        };
        debug!("swipe: interrupting {:?}", kind);
        self.session.interrupt(consumer);
        self.abandon(kind);
    }

    fn apply<C>(
        &mut self,
        kind: AdapterKind,
        output: AdapterOutput,
        consumer: &mut C,
    ) -> EventDisposition
    where
        C: SwipeConsumer + ?Sized,
    {
        for signal in output.signals.iter() {
            match *signal {
                GestureSignal::Begin { x, y } => {
                    if !self.try_begin(kind, x, y, consumer) {
                        self.abandon(kind);
                        return EventDisposition::Propagate;
                    }
                }
                GestureSignal::Update { delta } => {
                    if self.active != Some(kind) {
                        continue;
                    }
                    if !self.may_recognize() {
                        debug!("swipe: mode or enable check failed mid-gesture");
                        self.interrupt(consumer);
                        return EventDisposition::Propagate;
                    }
                    self.session.update(delta, consumer);
                }
                GestureSignal::End {
                    velocity,
                    cancelled,
                } => {
                    if self.active != Some(kind) {
                        continue;
                    }
                    self.active = None;
                    self.pending_release = None;
                    if !self.may_recognize() {
                        // The adapter already left its sequence; only the session is cancelled.
                        debug!("swipe: mode or enable check failed at release");
                        self.session.interrupt(consumer);
                        continue;
                    }
                    self.session.end(velocity, cancelled, consumer);
                    self.threshold_suspended = true;
                }
            }
        }
        output.disposition
    }

    fn try_begin<C>(&mut self, kind: AdapterKind, x: f64, y: f64, consumer: &mut C) -> bool
    where
        C: SwipeConsumer + ?Sized,
    {
        if !self.may_recognize() {
            debug!(
                "swipe: begin refused enabled={} mode={:?} allowed={:?}",
                self.enabled, self.action_mode, self.allowed_modes
            );
            return false;
        }

        let monitor = self.monitors.index_at(x, y);
        if !self.session.begin(kind.device(), monitor, consumer) {
            return false;
        }
        self.active = Some(kind);
        true
    }

    fn abandon(&mut self, kind: AdapterKind) {
        match kind {
            AdapterKind::SurfaceDrag => self.drag.abandon(),
            AdapterKind::TrackpadSwipe => {
                let context = self.touchpad_context();
                self.touchpad.abandon(context);
            }
            AdapterKind::WheelScroll => self.scroll.abandon(),
        }
    }

    fn may_recognize(&self) -> bool {
        self.enabled && self.allowed_modes.intersects(self.action_mode)
    }

    fn scroll_modifiers_satisfied(&self, modifiers: Modifiers) -> bool {
        self.scroll_modifiers.is_empty() || modifiers.intersects(self.scroll_modifiers)
    }

    fn begin_threshold(&self) -> f64 {
        if self.threshold_suspended {
            0.0
        } else {
            self.config.recognition.drag_threshold_px
        }
    }

    fn drag_context(&self) -> DragContext {
        let recognition = &self.config.recognition;
        DragContext {
            orientation: self.orientation,
            session_idle: self.session.is_idle(),
            threshold_px: self.begin_threshold(),
            min_points: if self.allow_drag {
                1
            } else {
                recognition.finger_count as usize
            },
            max_points: recognition.max_touch_points,
        }
    }

    fn touchpad_context(&self) -> TouchpadContext {
        TouchpadContext {
            orientation: self.orientation,
            natural_scroll: self.natural_scroll,
            lock_threshold_px: self.begin_threshold(),
            finger_count: self.config.recognition.finger_count,
            session_idle: self.session.is_idle(),
        }
    }
}
