use kinetic_swipe::{
    config::SwipeConfig,
    history::SampleHistory,
    projection::{self, DeviceTuning},
    snap::{Bounds, SnapPoints},
    ActionMode, ConfirmError, EventDisposition, GestureDevice, GesturePhase, Modifiers,
    Orientation, ScrollDirection, ScrollEvent, ScrollSource, SessionState, SwipeConsumer,
    SwipeRequest, SwipeTracker, TouchEvent, TouchEventKind, TouchpadSwipeEvent,
};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Call {
    Begin,
    Update(f64),
    End(u32, f64),
}

struct Recorder {
    distance: f64,
    snap_points: Vec<f64>,
    current: f64,
    cancel: f64,
    confirmed: Option<Result<(), ConfirmError>>,
    calls: Vec<Call>,
}

impl Recorder {
    fn new(snap_points: &[f64], current: f64) -> Self {
        Self {
            distance: 100.0,
            snap_points: snap_points.to_vec(),
            current,
            cancel: current,
            confirmed: None,
            calls: Vec::new(),
        }
    }

    fn count_begins(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::Begin))
            .count()
    }

    fn updates(&self) -> Vec<f64> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Update(progress) => Some(*progress),
                _ => None,
            })
            .collect()
    }

    fn ends(&self) -> Vec<(u32, f64)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::End(duration, target) => Some((*duration, *target)),
                _ => None,
            })
            .collect()
    }
}

impl SwipeConsumer for Recorder {
    fn begin(&mut self, request: &mut SwipeRequest) {
        self.calls.push(Call::Begin);
        self.confirmed = Some(request.confirm_swipe(
            self.distance,
            &self.snap_points,
            self.current,
            self.cancel,
        ));
    }

    fn update(&mut self, progress: f64) {
        self.calls.push(Call::Update(progress));
    }

    fn end(&mut self, duration_ms: u32, target: f64) {
        self.calls.push(Call::End(duration_ms, target));
    }
}

fn tracker(orientation: Orientation) -> SwipeTracker {
    SwipeTracker::new(orientation, ActionMode::ALL, SwipeConfig::default())
}

fn touch(time_ms: u64, kind: TouchEventKind, x: f64) -> TouchEvent {
    TouchEvent {
        time_ms,
        slot: 0,
        kind,
        x,
        y: 400.0,
    }
}

fn swipe(time_ms: u64, phase: GesturePhase, dx: f64, dy: f64) -> TouchpadSwipeEvent {
    TouchpadSwipeEvent {
        time_ms,
        phase,
        fingers: 3,
        x: 640.0,
        y: 360.0,
        dx_unaccelerated: dx,
        dy_unaccelerated: dy,
    }
}

/// Deterministic jitter in `[-1, 1)`.
struct Lcg(u64);

impl Lcg {
    fn next_unit(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        ((self.0 >> 11) as f64 / (1u64 << 53) as f64) * 2.0 - 1.0
    }
}

/// Drags one finger through `steps` pseudo-random horizontal moves and lifts it.
fn random_drag(tracker: &mut SwipeTracker, recorder: &mut Recorder, seed: u64, steps: usize) {
    let mut rng = Lcg(seed);
    let mut x = 1000.0;
    let mut t = 0;
    let _ = tracker.handle_touch(&touch(t, TouchEventKind::Down, x), recorder);
    for _ in 0..steps {
        t += 8;
        x += rng.next_unit() * 120.0;
        let _ = tracker.handle_touch(&touch(t, TouchEventKind::Motion, x), recorder);
    }
    let _ = tracker.handle_touch(&touch(t + 8, TouchEventKind::Up, x), recorder);
}

#[test]
fn updates_stay_within_bounds_fixed_at_begin() {
    for seed in 1..40 {
        let mut tracker = tracker(Orientation::Horizontal);
        let mut recorder = Recorder::new(&[0.0, 1.0, 2.0, 3.0], 1.0);

        random_drag(&mut tracker, &mut recorder, seed, 30);

        // Resting on 1 of [0, 1, 2, 3] the gesture may roam over [0, 2].
        for progress in recorder.updates() {
            assert!(
                (0.0..=2.0).contains(&progress),
                "seed {seed}: progress {progress} left bounds"
            );
        }
    }
}

#[test]
fn every_release_settles_on_a_snap_point() {
    let points = [0.0, 0.5, 1.0, 2.0];
    for seed in 1..40 {
        let mut tracker = tracker(Orientation::Horizontal);
        let mut recorder = Recorder::new(&points, 1.0);

        random_drag(&mut tracker, &mut recorder, seed, 12);

        for (_, target) in recorder.ends() {
            assert!(points.contains(&target), "seed {seed}: target {target}");
        }
    }
}

#[test]
fn trimming_twice_matches_trimming_once() {
    let mut history = SampleHistory::new(150);
    for (t, delta) in [(0, 1.0), (40, 2.0), (90, 3.0), (160, 4.0), (210, 5.0)] {
        history.append(t, delta);
    }

    history.trim(260);
    let once: Vec<(u64, f64)> = history.samples().map(|s| (s.time_ms, s.delta)).collect();
    history.trim(260);
    let twice: Vec<(u64, f64)> = history.samples().map(|s| (s.time_ms, s.delta)).collect();

    assert_eq!(once, twice);
    assert_eq!(once, vec![(160, 4.0), (210, 5.0)]);
}

#[test]
fn velocity_is_exactly_zero_without_a_time_span() {
    let mut history = SampleHistory::new(150);
    assert_eq!(history.calculate_velocity(), 0.0);

    history.append(50, 9.0);
    assert_eq!(history.calculate_velocity(), 0.0);

    history.append(50, 4.0);
    history.append(50, -2.0);
    assert_eq!(history.calculate_velocity(), 0.0);
}

#[test]
fn fast_release_never_snaps_back_to_start() {
    let mut tracker = tracker(Orientation::Horizontal);
    let mut recorder = Recorder::new(&[0.0, 1.0, 2.0], 0.0);

    // Finger moves left 30 px in 4 ms: progress 0.3 at 7.5 px/ms.
    let _ = tracker.handle_touch(&touch(0, TouchEventKind::Down, 300.0), &mut recorder);
    let _ = tracker.handle_touch(&touch(2, TouchEventKind::Motion, 280.0), &mut recorder);
    let _ = tracker.handle_touch(&touch(4, TouchEventKind::Motion, 270.0), &mut recorder);
    let _ = tracker.handle_touch(&touch(5, TouchEventKind::Up, 270.0), &mut recorder);

    let ends = recorder.ends();
    assert_eq!(ends.len(), 1);
    let target = ends[0].1;
    assert!(target == 1.0 || target == 2.0, "snapped back to {target}");
}

#[test]
fn soft_release_picks_nearest_point_deterministically() {
    let config = SwipeConfig::default();
    let snap_points = SnapPoints::from_slice(&[0.0, 1.0]).expect("valid snap points");
    let release = projection::Release {
        snap_points: &snap_points,
        bounds: Bounds { min: 0.0, max: 1.0 },
        initial_index: 0,
        progress: 0.5,
        dont_snap: false,
    };
    let tuning = DeviceTuning::for_device(&config.projection, GestureDevice::Touch);

    let first = projection::end_progress(&release, 0.1, tuning, &config.projection);
    let second = projection::end_progress(&release, 0.1, tuning, &config.projection);

    assert_eq!(first, 0.0);
    assert_eq!(first, second);
}

fn feed_direction_lock(tracker: &mut SwipeTracker, recorder: &mut Recorder) {
    let _ = tracker.handle_touchpad_swipe(&swipe(0, GesturePhase::Begin, 0.0, 0.0), recorder);
    let _ = tracker.handle_touchpad_swipe(&swipe(10, GesturePhase::Update, 8.0, 1.0), recorder);
    let _ = tracker.handle_touchpad_swipe(&swipe(20, GesturePhase::Update, 12.0, 1.0), recorder);
    let _ = tracker.handle_touchpad_swipe(&swipe(30, GesturePhase::Update, 6.0, 0.0), recorder);
}

#[test]
fn direction_lock_starts_matching_tracker_only() {
    let mut horizontal = tracker(Orientation::Horizontal);
    let mut recorder = Recorder::new(&[0.0, 1.0, 2.0], 1.0);
    feed_direction_lock(&mut horizontal, &mut recorder);

    assert_eq!(recorder.calls.first(), Some(&Call::Begin));
    assert_eq!(recorder.count_begins(), 1);
    assert_eq!(recorder.updates().len(), 2);
    assert_eq!(horizontal.state(), SessionState::Tracking);

    let mut vertical = tracker(Orientation::Vertical);
    let mut recorder = Recorder::new(&[0.0, 1.0, 2.0], 1.0);
    feed_direction_lock(&mut vertical, &mut recorder);
    let _ = vertical.handle_touchpad_swipe(&swipe(40, GesturePhase::End, 0.0, 0.0), &mut recorder);

    assert!(recorder.calls.is_empty());
}

#[test]
fn disabling_interrupts_with_single_end_at_cancel_progress() {
    let mut tracker = tracker(Orientation::Horizontal);
    let mut recorder = Recorder::new(&[0.0, 1.0, 2.0], 1.0);
    recorder.cancel = 0.0;

    let _ = tracker.handle_touch(&touch(0, TouchEventKind::Down, 500.0), &mut recorder);
    let _ = tracker.handle_touch(&touch(10, TouchEventKind::Motion, 480.0), &mut recorder);
    let _ = tracker.handle_touch(&touch(20, TouchEventKind::Motion, 470.0), &mut recorder);
    assert_eq!(recorder.updates().len(), 2);

    tracker.set_enabled(false, &mut recorder);
    let _ = tracker.handle_touch(&touch(30, TouchEventKind::Motion, 400.0), &mut recorder);
    let _ = tracker.handle_touch(&touch(40, TouchEventKind::Up, 400.0), &mut recorder);

    assert_eq!(recorder.ends(), vec![(0, 0.0)]);
    assert_eq!(recorder.calls.last(), Some(&Call::End(0, 0.0)));
    assert_eq!(recorder.updates().len(), 2);
}

#[test]
fn scroll_stop_marker_ends_the_sequence() {
    let mut tracker = tracker(Orientation::Horizontal);
    let mut recorder = Recorder::new(&[0.0, 1.0, 2.0], 1.0);
    let mut event = ScrollEvent {
        time_ms: 0,
        direction: ScrollDirection::Smooth,
        source: ScrollSource::Finger,
        from_touchpad: true,
        dx: 5.0,
        dy: 0.0,
        x: 10.0,
        y: 10.0,
        modifiers: Modifiers::NONE,
    };

    assert_eq!(
        tracker.handle_scroll(&event, &mut recorder),
        EventDisposition::Handled
    );
    event.time_ms = 16;
    event.dx = 0.0;
    let _ = tracker.handle_scroll(&event, &mut recorder);

    // 5 * 10 px against the 400 px virtual pad.
    assert_eq!(recorder.count_begins(), 1);
    assert_eq!(recorder.updates(), vec![1.125]);
    assert_eq!(recorder.ends().len(), 1);
    assert_eq!(tracker.state(), SessionState::None);
}

#[test]
fn zero_distance_confirmation_is_rejected() {
    let mut tracker = tracker(Orientation::Horizontal);
    let mut recorder = Recorder::new(&[0.0, 1.0], 0.0);
    recorder.distance = 0.0;

    let _ = tracker.handle_touch(&touch(0, TouchEventKind::Down, 500.0), &mut recorder);
    let _ = tracker.handle_touch(&touch(10, TouchEventKind::Motion, 450.0), &mut recorder);
    let _ = tracker.handle_touch(&touch(20, TouchEventKind::Motion, 400.0), &mut recorder);
    let _ = tracker.handle_touch(&touch(30, TouchEventKind::Up, 400.0), &mut recorder);

    assert_eq!(recorder.confirmed, Some(Err(ConfirmError::ZeroDistance)));
    assert_eq!(recorder.calls, vec![Call::Begin]);
    assert_eq!(tracker.state(), SessionState::None);
}
