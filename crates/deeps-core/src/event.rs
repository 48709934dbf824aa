//! Recorded event model.
//!
//! Every observable the theatre produces during a run is one of five typed
//! payloads stamped with a millisecond offset from session start. Payloads
//! are a tagged union so replay never needs to interpret loose data.

use crate::patient::Vitals;
use crate::types::{LaserState, Tool};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// LogSource
// ---------------------------------------------------------------------------

/// Subsystem a console log line is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogSource {
    Kestra,
    VisionModel,
    Safety,
    Oumi,
    Cline,
    CodeRabbit,
    Vitalis,
    System,
    Critical,
}

impl LogSource {
    pub fn as_str(self) -> &'static str {
        match self {
            LogSource::Kestra => "KESTRA",
            LogSource::VisionModel => "VISION_MODEL",
            LogSource::Safety => "SAFETY",
            LogSource::Oumi => "OUMI",
            LogSource::Cline => "CLINE",
            LogSource::CodeRabbit => "CODE_RABBIT",
            LogSource::Vitalis => "VITALIS",
            LogSource::System => "SYSTEM",
            LogSource::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for LogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// LogEntry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub source: LogSource,
    pub message: String,
}

impl LogEntry {
    pub fn new(source: LogSource, message: impl Into<String>) -> Self {
        Self {
            source,
            message: message.into(),
        }
    }

    /// Anomaly predicate used by replay navigation: only lines escalated to
    /// the `CRITICAL` channel count.
    pub fn is_anomalous(&self) -> bool {
        self.source == LogSource::Critical
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.source, self.message)
    }
}

// ---------------------------------------------------------------------------
// TumorState / TelemetrySnapshot
// ---------------------------------------------------------------------------

/// Target-mass visibility and destruction flags. Imaging flips `visible`;
/// ablation flips `destroyed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TumorState {
    pub visible: bool,
    pub destroyed: bool,
}

/// Robot-side progress readout: which subsystem holds the arm and how far
/// the procedure has advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub tool: Tool,
    /// Completion percentage, 0–100.
    pub progress: u8,
}

// ---------------------------------------------------------------------------
// EventPayload / RecordedEvent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Log,
    Vitals,
    Laser,
    Tumor,
    Telemetry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPayload {
    Log(LogEntry),
    Vitals(Vitals),
    Laser(LaserState),
    Tumor(TumorState),
    Telemetry(TelemetrySnapshot),
}

impl EventPayload {
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::Log(_) => EventKind::Log,
            EventPayload::Vitals(_) => EventKind::Vitals,
            EventPayload::Laser(_) => EventKind::Laser,
            EventPayload::Tumor(_) => EventKind::Tumor,
            EventPayload::Telemetry(_) => EventKind::Telemetry,
        }
    }
}

/// One timestamped entry in a session recording. Offsets are milliseconds
/// from session start and non-decreasing by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedEvent {
    pub timestamp_ms: u64,
    #[serde(flatten)]
    pub payload: EventPayload,
}

impl RecordedEvent {
    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }

    pub fn as_log(&self) -> Option<&LogEntry> {
        match &self.payload {
            EventPayload::Log(entry) => Some(entry),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_json_is_tagged() {
        let event = RecordedEvent {
            timestamp_ms: 420,
            payload: EventPayload::Laser(LaserState::Growing),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"LASER\""));
        assert!(json.contains("\"data\":\"GROWING\""));
        let parsed: RecordedEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn log_json_roundtrip() {
        let event = RecordedEvent {
            timestamp_ms: 0,
            payload: EventPayload::Log(LogEntry::new(LogSource::Kestra, "Orchestrating...")),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"LOG\""));
        assert!(json.contains("KESTRA"));
        let parsed: RecordedEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.kind(), EventKind::Log);
        assert_eq!(parsed, event);
    }

    #[test]
    fn anomaly_predicate_is_critical_only() {
        assert!(LogEntry::new(LogSource::Critical, "ICP CRITICAL DETECTED.").is_anomalous());
        assert!(!LogEntry::new(LogSource::System, "ABORTING PROCEDURE.").is_anomalous());
        assert!(!LogEntry::new(LogSource::Safety, "Verifying parameters...").is_anomalous());
    }

    #[test]
    fn log_display_format() {
        let entry = LogEntry::new(LogSource::System, "FIRING LASER.");
        assert_eq!(entry.to_string(), "[SYSTEM] FIRING LASER.");
    }
}
