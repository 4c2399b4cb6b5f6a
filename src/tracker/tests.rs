use super::*;
use crate::{
    input::{ScrollSource, TouchEventKind},
    monitor::MonitorRect,
    session::SwipeRequest,
};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Seen {
    Begin(usize),
    Update(f64),
    End(u32, f64),
}

/// Three pages, resting on the middle one.
struct Pager {
    seen: Vec<Seen>,
}

impl Pager {
    fn new() -> Self {
        Self { seen: Vec::new() }
    }

    fn begins(&self) -> Vec<usize> {
        self.seen
            .iter()
            .filter_map(|seen| match seen {
                Seen::Begin(monitor) => Some(*monitor),
                _ => None,
            })
            .collect()
    }

    fn updates(&self) -> Vec<f64> {
        self.seen
            .iter()
            .filter_map(|seen| match seen {
                Seen::Update(progress) => Some(*progress),
                _ => None,
            })
            .collect()
    }

    fn ends(&self) -> Vec<(u32, f64)> {
        self.seen
            .iter()
            .filter_map(|seen| match seen {
                Seen::End(duration, target) => Some((*duration, *target)),
                _ => None,
            })
            .collect()
    }
}

impl SwipeConsumer for Pager {
    fn begin(&mut self, request: &mut SwipeRequest) {
        self.seen.push(Seen::Begin(request.monitor()));
        request
            .confirm_swipe(100.0, &[0.0, 1.0, 2.0], 1.0, 1.0)
            .expect("valid confirmation");
    }

    fn update(&mut self, progress: f64) {
        self.seen.push(Seen::Update(progress));
    }

    fn end(&mut self, duration_ms: u32, target: f64) {
        self.seen.push(Seen::End(duration_ms, target));
    }
}

fn tracker() -> SwipeTracker {
    SwipeTracker::new(
        Orientation::Horizontal,
        ActionMode::NORMAL,
        SwipeConfig::default(),
    )
}

fn touch(time_ms: u64, kind: TouchEventKind, x: f64) -> TouchEvent {
    TouchEvent {
        time_ms,
        slot: 0,
        kind,
        x,
        y: 100.0,
    }
}

fn hold(time_ms: u64, phase: GesturePhase) -> TouchpadHoldEvent {
    TouchpadHoldEvent {
        time_ms,
        phase,
        fingers: 3,
        x: 300.0,
        y: 200.0,
        modifiers: Modifiers::NONE,
    }
}

fn swipe(time_ms: u64, phase: GesturePhase, dx: f64) -> TouchpadSwipeEvent {
    TouchpadSwipeEvent {
        time_ms,
        phase,
        fingers: 3,
        x: 300.0,
        y: 200.0,
        dx_unaccelerated: dx,
        dy_unaccelerated: 0.0,
    }
}

fn scroll(time_ms: u64, dx: f64) -> ScrollEvent {
    ScrollEvent {
        time_ms,
        direction: ScrollDirection::Smooth,
        source: ScrollSource::Finger,
        from_touchpad: true,
        dx,
        dy: 0.0,
        x: 300.0,
        y: 200.0,
        modifiers: Modifiers::NONE,
    }
}

/// Puts a finger down at x=200 and drags it 20 px to the left.
fn start_drag(tracker: &mut SwipeTracker, pager: &mut Pager) -> EventDisposition {
    let _ = tracker.handle_touch(&touch(0, TouchEventKind::Down, 200.0), pager);
    tracker.handle_touch(&touch(10, TouchEventKind::Motion, 180.0), pager)
}

fn finish_drag(tracker: &mut SwipeTracker, pager: &mut Pager) {
    let _ = tracker.handle_touch(&touch(20, TouchEventKind::Motion, 160.0), pager);
    let _ = tracker.handle_touch(&touch(30, TouchEventKind::Up, 160.0), pager);
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn drag_runs_begin_updates_and_end() {
    let mut tracker = tracker();
    let mut pager = Pager::new();

    let disposition = start_drag(&mut tracker, &mut pager);
    assert_eq!(disposition, EventDisposition::Handled);
    assert_eq!(tracker.active_adapter(), Some(AdapterKind::SurfaceDrag));
    assert_eq!(tracker.state(), SessionState::Tracking);

    finish_drag(&mut tracker, &mut pager);

    // 40 px over 20 ms is decisive; 0.6 progress left at 0.02/ms is under the floor.
    assert_eq!(pager.begins(), vec![0]);
    let updates = pager.updates();
    assert_eq!(updates.len(), 2);
    assert_close(updates[0], 1.2);
    assert_close(updates[1], 1.4);
    assert_eq!(pager.ends(), vec![(100, 2.0)]);
    assert_eq!(tracker.state(), SessionState::None);
    assert_eq!(tracker.active_adapter(), None);
}

#[test]
fn disabled_tracker_refuses_to_begin() {
    let mut tracker = tracker();
    let mut pager = Pager::new();
    tracker.set_enabled(false, &mut pager);

    let disposition = start_drag(&mut tracker, &mut pager);

    assert_eq!(disposition, EventDisposition::Propagate);
    assert!(pager.seen.is_empty());
    assert!(!tracker.is_enabled());
}

#[test]
fn action_mode_outside_allowed_set_refuses_to_begin() {
    let mut tracker = tracker();
    let mut pager = Pager::new();
    tracker.set_action_mode(ActionMode::OVERVIEW);

    let _ = start_drag(&mut tracker, &mut pager);
    assert!(pager.seen.is_empty());

    let _ = tracker.handle_touch(&touch(30, TouchEventKind::Up, 180.0), &mut pager);
    tracker.set_action_mode(ActionMode::NORMAL);
    let _ = start_drag(&mut tracker, &mut pager);
    assert_eq!(pager.begins(), vec![0]);
}

#[test]
fn disabling_mid_gesture_interrupts_once() {
    let mut tracker = tracker();
    let mut pager = Pager::new();
    let _ = start_drag(&mut tracker, &mut pager);

    tracker.set_enabled(false, &mut pager);
    let _ = tracker.handle_touch(&touch(20, TouchEventKind::Motion, 150.0), &mut pager);
    let _ = tracker.handle_touch(&touch(30, TouchEventKind::Up, 150.0), &mut pager);

    assert_eq!(pager.ends(), vec![(0, 1.0)]);
    assert_eq!(pager.updates().len(), 1);
    assert_eq!(tracker.state(), SessionState::None);
}

#[test]
fn mode_change_mid_gesture_interrupts_on_next_update() {
    let mut tracker = tracker();
    let mut pager = Pager::new();
    let _ = start_drag(&mut tracker, &mut pager);

    tracker.set_action_mode(ActionMode::LOCK_SCREEN);
    let _ = tracker.handle_touch(&touch(20, TouchEventKind::Motion, 150.0), &mut pager);

    assert_eq!(pager.updates().len(), 1);
    assert_eq!(pager.ends(), vec![(0, 1.0)]);
    assert_eq!(tracker.active_adapter(), None);
}

#[test]
fn mode_change_mid_swipe_interrupts_trackpad() {
    let mut tracker = tracker();
    let mut pager = Pager::new();
    let _ = tracker.handle_touchpad_swipe(&swipe(0, GesturePhase::Begin, 0.0), &mut pager);
    let _ = tracker.handle_touchpad_swipe(&swipe(10, GesturePhase::Update, 40.0), &mut pager);
    assert_eq!(tracker.active_adapter(), Some(AdapterKind::TrackpadSwipe));

    tracker.set_action_mode(ActionMode::LOCK_SCREEN);
    let _ = tracker.handle_touchpad_swipe(&swipe(20, GesturePhase::Update, 10.0), &mut pager);
    let _ = tracker.handle_touchpad_swipe(&swipe(30, GesturePhase::End, 0.0), &mut pager);

    assert_eq!(pager.updates().len(), 1);
    assert_eq!(pager.ends(), vec![(0, 1.0)]);
    assert_eq!(tracker.active_adapter(), None);
}

#[test]
fn mode_change_mid_scroll_cancels_instead_of_committing() {
    let mut tracker = tracker();
    let mut pager = Pager::new();
    let _ = tracker.handle_scroll(&scroll(0, 3.0), &mut pager);
    let _ = tracker.handle_scroll(&scroll(10, 3.0), &mut pager);
    assert_eq!(pager.updates().len(), 2);

    tracker.set_action_mode(ActionMode::LOCK_SCREEN);
    let _ = tracker.handle_scroll(&scroll(20, 3.0), &mut pager);
    let _ = tracker.handle_scroll(&scroll(30, 3.0), &mut pager);
    let _ = tracker.handle_scroll(&scroll(40, 0.0), &mut pager);

    assert_eq!(pager.updates().len(), 2);
    assert_eq!(pager.ends(), vec![(0, 1.0)]);
    assert_eq!(tracker.active_adapter(), None);

    // The stop marker left the old sequence, so a new one can start.
    tracker.set_action_mode(ActionMode::NORMAL);
    let _ = tracker.handle_scroll(&scroll(100, 3.0), &mut pager);
    assert_eq!(pager.begins().len(), 2);
}

#[test]
fn disallowing_scroll_mid_gesture_cancels_on_stop_marker() {
    let mut tracker = tracker();
    let mut pager = Pager::new();
    let _ = tracker.handle_scroll(&scroll(0, 3.0), &mut pager);
    let _ = tracker.handle_scroll(&scroll(10, 3.0), &mut pager);

    tracker.set_allow_scroll(false);
    let _ = tracker.handle_scroll(&scroll(20, 0.0), &mut pager);

    assert_eq!(pager.updates().len(), 2);
    assert_eq!(pager.ends(), vec![(0, 1.0)]);
    assert_eq!(tracker.active_adapter(), None);

    tracker.set_allow_scroll(true);
    let _ = tracker.handle_scroll(&scroll(100, 3.0), &mut pager);
    assert_eq!(pager.begins().len(), 2);
}

#[test]
fn threshold_is_suspended_until_animation_finishes() {
    let mut tracker = tracker();
    let mut pager = Pager::new();
    let _ = start_drag(&mut tracker, &mut pager);
    finish_drag(&mut tracker, &mut pager);

    // A one pixel nudge catches the settling animation.
    let _ = tracker.handle_touch(&touch(100, TouchEventKind::Down, 200.0), &mut pager);
    let _ = tracker.handle_touch(&touch(110, TouchEventKind::Motion, 199.0), &mut pager);
    assert_eq!(pager.begins().len(), 2);
    let _ = tracker.handle_touch(&touch(120, TouchEventKind::Up, 199.0), &mut pager);

    tracker.animation_finished();
    let _ = tracker.handle_touch(&touch(200, TouchEventKind::Down, 200.0), &mut pager);
    let _ = tracker.handle_touch(&touch(210, TouchEventKind::Motion, 199.0), &mut pager);
    assert_eq!(pager.begins().len(), 2);
}

#[test]
fn hold_needs_a_settling_animation() {
    let mut tracker = tracker();
    let mut pager = Pager::new();

    let disposition = tracker.handle_touchpad_hold(&hold(0, GesturePhase::Begin), &mut pager);

    assert_eq!(disposition, EventDisposition::Propagate);
    assert!(pager.seen.is_empty());
}

#[test]
fn hold_catch_ends_after_release_delay() {
    let mut tracker = tracker();
    let mut pager = Pager::new();
    let _ = start_drag(&mut tracker, &mut pager);
    finish_drag(&mut tracker, &mut pager);

    let caught = tracker.handle_touchpad_hold(&hold(100, GesturePhase::Begin), &mut pager);
    assert_eq!(caught, EventDisposition::Handled);
    assert_eq!(tracker.active_adapter(), Some(AdapterKind::TrackpadSwipe));
    assert_eq!(pager.begins().len(), 2);

    let _ = tracker.handle_touchpad_hold(&hold(200, GesturePhase::End), &mut pager);
    tracker.tick(240, &mut pager);
    assert_eq!(pager.ends().len(), 1);

    tracker.tick(250, &mut pager);
    assert_eq!(pager.ends(), vec![(100, 2.0), (0, 1.0)]);
    assert_eq!(tracker.state(), SessionState::None);
}

#[test]
fn swipe_after_hold_cancels_the_pending_release() {
    let mut tracker = tracker();
    let mut pager = Pager::new();
    let _ = start_drag(&mut tracker, &mut pager);
    finish_drag(&mut tracker, &mut pager);

    let _ = tracker.handle_touchpad_hold(&hold(100, GesturePhase::Begin), &mut pager);
    let _ = tracker.handle_touchpad_hold(&hold(200, GesturePhase::End), &mut pager);
    let _ = tracker.handle_touchpad_swipe(&swipe(210, GesturePhase::Begin, 0.0), &mut pager);
    let _ = tracker.handle_touchpad_swipe(&swipe(220, GesturePhase::Update, 40.0), &mut pager);

    tracker.tick(300, &mut pager);
    assert_eq!(pager.ends().len(), 1);
    assert_eq!(tracker.state(), SessionState::Tracking);

    // Touchpad progress is measured against the 400 px virtual pad.
    let updates = pager.updates();
    assert_close(updates[updates.len() - 1], 1.1);
}

#[test]
fn hold_end_for_other_finger_count_keeps_the_swipe() {
    let mut tracker = tracker();
    let mut pager = Pager::new();
    let _ = start_drag(&mut tracker, &mut pager);
    finish_drag(&mut tracker, &mut pager);

    let _ = tracker.handle_touchpad_hold(&hold(100, GesturePhase::Begin), &mut pager);
    assert_eq!(tracker.active_adapter(), Some(AdapterKind::TrackpadSwipe));

    let mut two_fingers = hold(200, GesturePhase::End);
    two_fingers.fingers = 2;
    let _ = tracker.handle_touchpad_hold(&two_fingers, &mut pager);
    tracker.tick(300, &mut pager);

    assert_eq!(pager.ends().len(), 1);
    assert_eq!(tracker.state(), SessionState::Tracking);
    assert_eq!(tracker.active_adapter(), Some(AdapterKind::TrackpadSwipe));
}

#[test]
fn scroll_modifiers_gate_scroll_handling() {
    let mut tracker = tracker();
    let mut pager = Pager::new();
    tracker.set_scroll_modifiers(Modifiers::SUPER);

    let plain = scroll(0, 2.0);
    assert!(!tracker.can_handle_scroll_event(&plain));

    let mut held = scroll(0, 2.0);
    held.modifiers = Modifiers::SUPER;
    assert!(tracker.can_handle_scroll_event(&held));

    let mut wheel = held;
    wheel.source = ScrollSource::Wheel;
    wheel.from_touchpad = false;
    assert!(!tracker.can_handle_scroll_event(&wheel));

    tracker.set_allow_scroll(false);
    assert!(!tracker.can_handle_scroll_event(&held));
    tracker.set_allow_scroll(true);

    tracker.set_enabled(false, &mut pager);
    assert!(!tracker.can_handle_scroll_event(&held));
}

#[test]
fn scroll_sequence_ends_on_stop_marker() {
    let mut tracker = tracker();
    let mut pager = Pager::new();

    let first = tracker.handle_scroll(&scroll(0, 2.0), &mut pager);
    assert_eq!(first, EventDisposition::Handled);
    assert_eq!(tracker.active_adapter(), Some(AdapterKind::WheelScroll));

    let _ = tracker.handle_scroll(&scroll(10, 0.0), &mut pager);

    assert_eq!(pager.begins(), vec![0]);
    assert_close(pager.updates()[0], 1.05);
    assert_eq!(pager.ends().len(), 1);
    assert_eq!(tracker.active_adapter(), None);
}

#[test]
fn only_one_adapter_drives_the_session() {
    let mut tracker = tracker();
    let mut pager = Pager::new();
    let _ = start_drag(&mut tracker, &mut pager);

    let _ = tracker.handle_touchpad_swipe(&swipe(20, GesturePhase::Begin, 0.0), &mut pager);
    let _ = tracker.handle_touchpad_swipe(&swipe(30, GesturePhase::Update, 40.0), &mut pager);
    let scrolled = tracker.handle_scroll(&scroll(40, 3.0), &mut pager);

    assert_eq!(scrolled, EventDisposition::Propagate);
    assert_eq!(pager.begins().len(), 1);
    assert_eq!(pager.updates().len(), 1);
    assert_eq!(tracker.active_adapter(), Some(AdapterKind::SurfaceDrag));
}

#[test]
fn begin_reports_monitor_under_gesture() {
    let mut tracker = tracker();
    let mut pager = Pager::new();
    tracker.set_monitors(MonitorLayout::from_rects(&[
        MonitorRect::new(0.0, 0.0, 1920.0, 1080.0),
        MonitorRect::new(1920.0, 0.0, 1280.0, 1024.0),
    ]));

    let _ = tracker.handle_touch(&touch(0, TouchEventKind::Down, 2000.0), &mut pager);
    let _ = tracker.handle_touch(&touch(10, TouchEventKind::Motion, 1980.0), &mut pager);

    assert_eq!(pager.begins(), vec![1]);
}

#[test]
fn interrupt_without_gesture_is_silent() {
    let mut tracker = tracker();
    let mut pager = Pager::new();

    tracker.interrupt(&mut pager);
    tracker.tick(1_000, &mut pager);

    assert!(pager.seen.is_empty());
}
