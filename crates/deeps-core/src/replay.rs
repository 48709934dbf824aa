//! Point-in-time reconstruction and playback over closed sessions.
//!
//! `reconstruct` is a pure function of `(session, cursor)`: the same
//! arguments always produce a structurally identical state, which is what
//! makes scrubbing backwards as cheap as scrubbing forwards. The player
//! layered on top owns nothing but a cursor; it is stepped by whoever runs
//! the clock (the CLI uses a `tokio::time::interval`).

use crate::event::{EventPayload, LogEntry, TelemetrySnapshot};
use crate::patient::Vitals;
use crate::recorder::Session;
use crate::types::LaserState;
use serde::Serialize;

// ---------------------------------------------------------------------------
// ReplayState
// ---------------------------------------------------------------------------

/// Everything an observer needs to render the theatre at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayState {
    pub active_laser: LaserState,
    pub tumor_visible: bool,
    pub tumor_destroyed: bool,
    pub latest_vitals: Option<Vitals>,
    pub latest_telemetry: Option<TelemetrySnapshot>,
    /// All console log payloads at or before the cursor, in recording order.
    pub logs: Vec<LogEntry>,
}

impl Default for ReplayState {
    fn default() -> Self {
        Self {
            active_laser: LaserState::Off,
            tumor_visible: false,
            tumor_destroyed: false,
            latest_vitals: None,
            latest_telemetry: None,
            logs: Vec::new(),
        }
    }
}

/// Rebuild the observable state at `cursor_ms`.
///
/// Last-write-wins per event kind over the prefix `timestamp <= cursor`;
/// kinds with no event yet sit at their defaults (laser off, target intact,
/// no snapshots, empty log).
pub fn reconstruct(session: &Session, cursor_ms: u64) -> ReplayState {
    let mut state = ReplayState::default();
    for event in session.events() {
        if event.timestamp_ms > cursor_ms {
            break;
        }
        match &event.payload {
            EventPayload::Log(entry) => state.logs.push(entry.clone()),
            EventPayload::Vitals(vitals) => state.latest_vitals = Some(vitals.clone()),
            EventPayload::Laser(laser) => state.active_laser = *laser,
            EventPayload::Tumor(tumor) => {
                state.tumor_visible = tumor.visible;
                state.tumor_destroyed = tumor.destroyed;
            }
            EventPayload::Telemetry(telemetry) => state.latest_telemetry = Some(*telemetry),
        }
    }
    state
}

// ---------------------------------------------------------------------------
// Anomaly
// ---------------------------------------------------------------------------

/// A flagged log event a reviewer can jump to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anomaly {
    pub timestamp_ms: u64,
    pub entry: LogEntry,
}

/// All anomalous log events of a session, in timeline order.
pub fn anomalies(session: &Session) -> Vec<Anomaly> {
    session
        .events()
        .iter()
        .filter_map(|event| match &event.payload {
            EventPayload::Log(entry) if entry.is_anomalous() => Some(Anomaly {
                timestamp_ms: event.timestamp_ms,
                entry: entry.clone(),
            }),
            _ => None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// ReplayPlayer
// ---------------------------------------------------------------------------

/// Cursor-and-speed shell around [`reconstruct`]. Advancement happens only
/// in `tick()`; pausing simply makes ticks no-ops, so an external clock can
/// run unconditionally.
#[derive(Debug, Clone)]
pub struct ReplayPlayer {
    session: Session,
    cursor_ms: u64,
    playing: bool,
    speed: f64,
    tick_interval_ms: u64,
}

impl ReplayPlayer {
    pub fn new(session: Session, tick_interval_ms: u64) -> Self {
        Self {
            session,
            cursor_ms: 0,
            playing: false,
            speed: 1.0,
            tick_interval_ms: tick_interval_ms.max(1),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn cursor_ms(&self) -> u64 {
        self.cursor_ms
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Timestamp of the last recorded event; the cursor never passes it.
    pub fn end_ms(&self) -> u64 {
        self.session.duration_ms()
    }

    pub fn at_end(&self) -> bool {
        self.cursor_ms >= self.end_ms()
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn toggle(&mut self) {
        self.playing = !self.playing;
    }

    /// Non-positive and non-finite multipliers are ignored.
    pub fn set_speed(&mut self, multiplier: f64) {
        if multiplier.is_finite() && multiplier > 0.0 {
            self.speed = multiplier;
        }
    }

    /// Move the cursor directly, clamped to the session bounds.
    pub fn seek(&mut self, cursor_ms: u64) {
        self.cursor_ms = cursor_ms.min(self.end_ms());
    }

    /// Advance one clock tick while playing; returns the new cursor.
    pub fn tick(&mut self) -> u64 {
        if self.playing {
            let step = (self.tick_interval_ms as f64 * self.speed) as u64;
            self.cursor_ms = (self.cursor_ms + step).min(self.end_ms());
            if self.at_end() {
                self.playing = false;
            }
        }
        self.cursor_ms
    }

    pub fn state(&self) -> ReplayState {
        reconstruct(&self.session, self.cursor_ms)
    }

    pub fn anomalies(&self) -> Vec<Anomaly> {
        anomalies(&self.session)
    }

    /// Jump the cursor to the nth anomaly; returns its timestamp if it
    /// exists.
    pub fn seek_to_anomaly(&mut self, index: usize) -> Option<u64> {
        let anomaly = self.anomalies().into_iter().nth(index)?;
        self.seek(anomaly.timestamp_ms);
        Some(anomaly.timestamp_ms)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
