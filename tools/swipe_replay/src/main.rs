mod trace;

use std::{path::PathBuf, process};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use kinetic_swipe::{
    ActionMode, Orientation, SwipeConfig, SwipeConsumer, SwipeRequest, SwipeTracker,
};
use log::{debug, error, info};

use trace::{parse_expected_kinds, parse_trace, TraceRow};

#[derive(Debug, Parser)]
#[command(name = "swipe_replay")]
#[command(about = "Replays a recorded input trace through a swipe tracker")]
struct Cli {
    /// CSV trace with touch, swipe, hold, scroll and tick rows.
    trace: PathBuf,
    /// File listing the expected begin/update/end kinds.
    #[arg(long)]
    expect: Option<PathBuf>,
    /// Tuning file; built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_delimiter = ',', default_value = "0,1,2")]
    snap_points: Vec<f64>,
    /// Progress the screen rests at before the first gesture.
    #[arg(long, default_value_t = 1.0)]
    start: f64,
    /// Pixels per progress unit for touch drags.
    #[arg(long, default_value_t = 1000.0)]
    distance: f64,
    #[arg(long, value_enum, default_value_t = OrientationArg::Horizontal)]
    orientation: OrientationArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OrientationArg {
    Horizontal,
    Vertical,
}

impl From<OrientationArg> for Orientation {
    fn from(value: OrientationArg) -> Self {
        match value {
            OrientationArg::Horizontal => Self::Horizontal,
            OrientationArg::Vertical => Self::Vertical,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum ReplayEvent {
    Begin { monitor: usize },
    Update { progress: f64 },
    End { duration_ms: u32, target: f64 },
}

impl ReplayEvent {
    fn kind(&self) -> &'static str {
        match self {
            Self::Begin { .. } => "begin",
            Self::Update { .. } => "update",
            Self::End { .. } => "end",
        }
    }
}

/// A paged screen that settles on whatever target the tracker picks.
struct ReplayScreen {
    distance: f64,
    snap_points: Vec<f64>,
    resting: f64,
    events: Vec<(u64, ReplayEvent)>,
    now_ms: u64,
    /// Settle animation started by the last `end`.
    settling_until: Option<u64>,
}

impl ReplayScreen {
    fn new(distance: f64, snap_points: Vec<f64>, resting: f64) -> Self {
        Self {
            distance,
            snap_points,
            resting,
            events: Vec::new(),
            now_ms: 0,
            settling_until: None,
        }
    }
}

impl SwipeConsumer for ReplayScreen {
    fn begin(&mut self, request: &mut SwipeRequest) {
        self.events
            .push((self.now_ms, ReplayEvent::Begin { monitor: request.monitor() }));
        if let Err(err) =
            request.confirm_swipe(self.distance, &self.snap_points, self.resting, self.resting)
        {
            error!("replay: screen could not confirm swipe: {err}");
        }
    }

    fn update(&mut self, progress: f64) {
        self.events.push((self.now_ms, ReplayEvent::Update { progress }));
    }

    fn end(&mut self, duration_ms: u32, target: f64) {
        self.events.push((
            self.now_ms,
            ReplayEvent::End {
                duration_ms,
                target,
            },
        ));
        self.resting = target;
        self.settling_until = Some(self.now_ms + u64::from(duration_ms));
    }
}

fn main() {
    env_logger::init();
    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => SwipeConfig::from_toml_path(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => SwipeConfig::default(),
    };
    let rows = parse_trace(&cli.trace)?;
    info!("replay: {} rows from {}", rows.len(), cli.trace.display());

    let mut tracker = SwipeTracker::new(cli.orientation.into(), ActionMode::ALL, config);
    let mut screen = ReplayScreen::new(cli.distance, cli.snap_points.clone(), cli.start);

    for row in &rows {
        let now_ms = row.time_ms();
        screen.now_ms = now_ms;
        if screen.settling_until.is_some_and(|until| now_ms >= until) {
            screen.settling_until = None;
            tracker.animation_finished();
        }
        tracker.tick(now_ms, &mut screen);

        let disposition = match row {
            TraceRow::Touch(event) => tracker.handle_touch(event, &mut screen),
            TraceRow::Swipe(event) => tracker.handle_touchpad_swipe(event, &mut screen),
            TraceRow::Hold(event) => tracker.handle_touchpad_hold(event, &mut screen),
            TraceRow::Scroll(event) => tracker.handle_scroll(event, &mut screen),
            TraceRow::Tick(_) => continue,
        };
        if disposition.is_handled() {
            debug!("replay: t={now_ms} handled");
        }
    }

    println!("event,ms,kind,monitor,progress,duration_ms,target");
    for (ms, event) in &screen.events {
        match event {
            ReplayEvent::Begin { monitor } => println!("event,{ms},begin,{monitor},,,"),
            ReplayEvent::Update { progress } => println!("event,{ms},update,,{progress},,"),
            ReplayEvent::End {
                duration_ms,
                target,
            } => println!("event,{ms},end,,,{duration_ms},{target}"),
        }
    }

    if let Some(expect_path) = &cli.expect {
        let expected = parse_expected_kinds(expect_path)?;
        let actual: Vec<&'static str> = screen.events.iter().map(|(_, e)| e.kind()).collect();
        if actual != expected {
            eprintln!("expected kinds: {}", expected.join(","));
            eprintln!("actual kinds:   {}", actual.join(","));
            bail!("event sequence mismatch");
        }
    }

    Ok(())
}
