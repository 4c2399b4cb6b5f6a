use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use anyhow::{anyhow, bail, Context, Result};
use kinetic_swipe::{
    GesturePhase, Modifiers, ScrollDirection, ScrollEvent, ScrollSource, TouchEvent,
    TouchEventKind, TouchpadHoldEvent, TouchpadSwipeEvent,
};

/// One replayable trace line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TraceRow {
    Touch(TouchEvent),
    Swipe(TouchpadSwipeEvent),
    Hold(TouchpadHoldEvent),
    Scroll(ScrollEvent),
    /// Advances the clock without input.
    Tick(u64),
}

impl TraceRow {
    pub fn time_ms(&self) -> u64 {
        match self {
            Self::Touch(event) => event.time_ms,
            Self::Swipe(event) => event.time_ms,
            Self::Hold(event) => event.time_ms,
            Self::Scroll(event) => event.time_ms,
            Self::Tick(time_ms) => *time_ms,
        }
    }
}

pub fn parse_trace(path: &Path) -> Result<Vec<TraceRow>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut rows = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line.with_context(|| format!("failed to read {}:{line_no}", path.display()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let row = parse_row(trimmed)
            .with_context(|| format!("{}:{line_no} invalid trace line", path.display()))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Columns per kind:
///
/// ```text
/// touch,ms,slot,down|motion|up|cancel,x,y
/// swipe,ms,begin|update|end|cancel,fingers,x,y,dx,dy
/// hold,ms,begin|end|cancel,fingers,x,y[,modifiers]
/// scroll,ms,direction,source,touchpad,dx,dy,x,y[,modifiers]
/// tick,ms
/// ```
///
/// `direction` is `smooth|up|down|left|right`, `source` is
/// `finger|wheel|continuous|wheel_tilt` and `touchpad` is `0|1`.
pub fn parse_row(line: &str) -> Result<TraceRow> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    let kind = parts[0];
    let time_ms = parse_field::<u64>(&parts, 1, "ms")?;

    let row = match kind {
        "touch" => {
            expect_columns(&parts, 6)?;
            TraceRow::Touch(TouchEvent {
                time_ms,
                slot: parse_field(&parts, 2, "slot")?,
                kind: parse_touch_kind(parts[3])?,
                x: parse_field(&parts, 4, "x")?,
                y: parse_field(&parts, 5, "y")?,
            })
        }
        "swipe" => {
            expect_columns(&parts, 8)?;
            TraceRow::Swipe(TouchpadSwipeEvent {
                time_ms,
                phase: parse_phase(parts[2])?,
                fingers: parse_field(&parts, 3, "fingers")?,
                x: parse_field(&parts, 4, "x")?,
                y: parse_field(&parts, 5, "y")?,
                dx_unaccelerated: parse_field(&parts, 6, "dx")?,
                dy_unaccelerated: parse_field(&parts, 7, "dy")?,
            })
        }
        "hold" => {
            expect_columns(&parts, 6)?;
            TraceRow::Hold(TouchpadHoldEvent {
                time_ms,
                phase: parse_phase(parts[2])?,
                fingers: parse_field(&parts, 3, "fingers")?,
                x: parse_field(&parts, 4, "x")?,
                y: parse_field(&parts, 5, "y")?,
                modifiers: parse_modifiers(parts.get(6).copied())?,
            })
        }
        "scroll" => {
            expect_columns(&parts, 9)?;
            TraceRow::Scroll(ScrollEvent {
                time_ms,
                direction: parse_direction(parts[2])?,
                source: parse_source(parts[3])?,
                from_touchpad: parse_flag(parts[4])?,
                dx: parse_field(&parts, 5, "dx")?,
                dy: parse_field(&parts, 6, "dy")?,
                x: parse_field(&parts, 7, "x")?,
                y: parse_field(&parts, 8, "y")?,
                modifiers: parse_modifiers(parts.get(9).copied())?,
            })
        }
        "tick" => TraceRow::Tick(time_ms),
        other => bail!("unknown row kind: {other}"),
    };
    Ok(row)
}

fn expect_columns(parts: &[&str], count: usize) -> Result<()> {
    if parts.len() < count {
        bail!(
            "{} row needs at least {count} columns, got {}",
            parts[0],
            parts.len()
        );
    }
    Ok(())
}

fn parse_field<T>(parts: &[&str], index: usize, field: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = parts
        .get(index)
        .ok_or_else(|| anyhow!("missing {field} column"))?;
    raw.parse::<T>()
        .map_err(|err| anyhow!("invalid {field} '{raw}': {err}"))
}

fn parse_touch_kind(raw: &str) -> Result<TouchEventKind> {
    match raw.to_ascii_lowercase().as_str() {
        "down" => Ok(TouchEventKind::Down),
        "motion" | "move" => Ok(TouchEventKind::Motion),
        "up" => Ok(TouchEventKind::Up),
        "cancel" => Ok(TouchEventKind::Cancel),
        other => Err(anyhow!("invalid touch kind: {other}")),
    }
}

fn parse_phase(raw: &str) -> Result<GesturePhase> {
    match raw.to_ascii_lowercase().as_str() {
        "begin" => Ok(GesturePhase::Begin),
        "update" => Ok(GesturePhase::Update),
        "end" => Ok(GesturePhase::End),
        "cancel" => Ok(GesturePhase::Cancel),
        other => Err(anyhow!("invalid gesture phase: {other}")),
    }
}

fn parse_direction(raw: &str) -> Result<ScrollDirection> {
    match raw.to_ascii_lowercase().as_str() {
        "smooth" => Ok(ScrollDirection::Smooth),
        "up" => Ok(ScrollDirection::Up),
        "down" => Ok(ScrollDirection::Down),
        "left" => Ok(ScrollDirection::Left),
        "right" => Ok(ScrollDirection::Right),
        other => Err(anyhow!("invalid scroll direction: {other}")),
    }
}

fn parse_source(raw: &str) -> Result<ScrollSource> {
    match raw.to_ascii_lowercase().as_str() {
        "finger" => Ok(ScrollSource::Finger),
        "wheel" => Ok(ScrollSource::Wheel),
        "continuous" => Ok(ScrollSource::Continuous),
        "wheel_tilt" => Ok(ScrollSource::WheelTilt),
        other => Err(anyhow!("invalid scroll source: {other}")),
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        other => Err(anyhow!("invalid flag: {other}")),
    }
}

/// `shift+super` style; empty or `none` means no modifiers.
pub fn parse_modifiers(raw: Option<&str>) -> Result<Modifiers> {
    let Some(raw) = raw else {
        return Ok(Modifiers::NONE);
    };
    let mut modifiers = Modifiers::NONE;
    for name in raw.split('+').map(str::trim).filter(|name| !name.is_empty()) {
        modifiers = modifiers
            | match name.to_ascii_lowercase().as_str() {
                "none" => Modifiers::NONE,
                "shift" => Modifiers::SHIFT,
                "control" | "ctrl" => Modifiers::CONTROL,
                "alt" => Modifiers::ALT,
                "super" => Modifiers::SUPER,
                other => bail!("invalid modifier: {other}"),
            };
    }
    Ok(modifiers)
}

/// Reads the expected `begin|update|end` kinds, one per line.
pub fn parse_expected_kinds(path: &Path) -> Result<Vec<&'static str>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut kinds = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line.with_context(|| format!("failed to read {}:{line_no}", path.display()))?;
        let token = line.trim();
        if token.is_empty() || token.starts_with('#') {
            continue;
        }
        let kind = match token.to_ascii_lowercase().as_str() {
            "begin" => "begin",
            "update" => "update",
            "end" => "end",
            other => bail!(
                "{}:{line_no} invalid expected event kind: {other}",
                path.display()
            ),
        };
        kinds.push(kind);
    }
    Ok(kinds)
}
