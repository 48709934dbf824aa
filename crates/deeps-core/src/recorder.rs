//! Session recording.
//!
//! The recorder owns an append-only in-memory buffer for exactly one run at
//! a time. Timestamps are assigned at append time from a monotonic clock
//! relative to session start, so ordering is guaranteed by construction;
//! nothing ever sorts the buffer. `stop_session` seals the buffer into an
//! immutable [`Session`] with an integrity digest; from that point the
//! events are shared read-only with the replay engine.

use crate::error::{DeepsError, Result};
use crate::event::{EventPayload, LogEntry, RecordedEvent};
use crate::patient::Patient;
use crate::types::ProcedureKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::time::Instant;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A finalized recording: the ordered event sequence of one sequencer run.
/// Immutable once constructed; the digest seals the event stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: Uuid,
    patient_id: String,
    kind: ProcedureKind,
    started_at: DateTime<Utc>,
    events: Vec<RecordedEvent>,
    digest: String,
}

impl Session {
    /// Construct a session directly from events, e.g. when importing an
    /// exported recording or building fixtures. Sequencer runs go through
    /// [`SessionRecorder`] instead.
    pub fn from_events(
        patient_id: impl Into<String>,
        kind: ProcedureKind,
        events: Vec<RecordedEvent>,
    ) -> Self {
        let digest = digest_events(&events);
        Self {
            id: Uuid::new_v4(),
            patient_id: patient_id.into(),
            kind,
            started_at: Utc::now(),
            events,
            digest,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    pub fn kind(&self) -> ProcedureKind {
        self.kind
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Timestamp of the last event, in ms from session start.
    pub fn duration_ms(&self) -> u64 {
        self.events.last().map(|e| e.timestamp_ms).unwrap_or(0)
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// All console log payloads in recording order.
    pub fn logs(&self) -> impl Iterator<Item = &LogEntry> {
        self.events.iter().filter_map(|e| e.as_log())
    }

    /// Recompute the digest and compare against the sealed value.
    pub fn verify(&self) -> Result<()> {
        let computed = digest_events(&self.events);
        if computed != self.digest {
            return Err(DeepsError::DigestMismatch {
                recorded: self.digest.clone(),
                computed,
            });
        }
        Ok(())
    }
}

fn digest_events(events: &[RecordedEvent]) -> String {
    let mut hasher = Sha256::new();
    for event in events {
        // Serialization of RecordedEvent is infallible: all payloads are
        // plain data with derived Serialize impls.
        let bytes = serde_json::to_vec(event).expect("event serialization");
        hasher.update(&bytes);
    }
    hex::encode(hasher.finalize())
}

// ---------------------------------------------------------------------------
// SessionRecorder
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct ActiveRecording {
    patient_id: String,
    kind: ProcedureKind,
    started_wall: DateTime<Utc>,
    started: Instant,
}

/// Append-only event recorder for the currently live run.
#[derive(Debug, Default)]
pub struct SessionRecorder {
    events: Vec<RecordedEvent>,
    active: Option<ActiveRecording>,
}

impl SessionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    /// Reset the buffer and begin a new recording for `patient`.
    pub fn start_session(&mut self, patient: &Patient) {
        self.events.clear();
        self.active = Some(ActiveRecording {
            patient_id: patient.id.clone(),
            kind: patient.kind,
            started_wall: Utc::now(),
            started: Instant::now(),
        });
    }

    /// Append an event stamped with the current offset. A no-op unless a
    /// recording is live.
    pub fn record(&mut self, payload: EventPayload) {
        let Some(active) = &self.active else {
            return;
        };
        let timestamp_ms = active.started.elapsed().as_millis() as u64;
        self.events.push(RecordedEvent {
            timestamp_ms,
            payload,
        });
    }

    pub fn record_log(&mut self, entry: LogEntry) {
        self.record(EventPayload::Log(entry));
    }

    /// Seal the buffer into an immutable [`Session`] and clear the
    /// recording flag. Returns `None` if no recording was live.
    pub fn stop_session(&mut self) -> Option<Session> {
        let active = self.active.take()?;
        let events = std::mem::take(&mut self.events);
        let digest = digest_events(&events);
        Some(Session {
            id: Uuid::new_v4(),
            patient_id: active.patient_id,
            kind: active.kind,
            started_at: active.started_wall,
            events,
            digest,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{LogSource, TumorState};
    use crate::patient::{BloodPressure, OrganMetric, Vitals};
    use crate::profile::MetricKind;
    use crate::types::{LaserState, PatientStatus, RiskTier, Sex};

    fn patient() -> Patient {
        Patient {
            id: "PX-3000".into(),
            name: "Priya Patel".into(),
            age: 39,
            sex: Sex::F,
            kind: ProcedureKind::Neuro,
            vitals: Vitals {
                hr: 77,
                bp: BloodPressure {
                    systolic: 121,
                    diastolic: 74,
                },
                glucose: 92,
                temp_f: 98.2,
                metric: OrganMetric::new(MetricKind::Icp, 12.0),
            },
            history: vec![],
            condition: "Meningioma".into(),
            allergies: vec![],
            target: [0.3, 0.1, 0.0],
            scheduled_time: "10:00".into(),
            status: PatientStatus::Waiting,
            risk: RiskTier::Moderate,
        }
    }

    #[test]
    fn record_before_start_is_noop() {
        let mut recorder = SessionRecorder::new();
        recorder.record(EventPayload::Laser(LaserState::Growing));
        assert!(!recorder.is_recording());
        assert!(recorder.stop_session().is_none());
    }

    #[test]
    fn record_after_stop_is_noop() {
        let mut recorder = SessionRecorder::new();
        recorder.start_session(&patient());
        recorder.record_log(LogEntry::new(LogSource::System, "FIRING LASER."));
        let session = recorder.stop_session().unwrap();
        assert_eq!(session.events().len(), 1);

        recorder.record_log(LogEntry::new(LogSource::System, "late"));
        assert!(recorder.stop_session().is_none());
    }

    #[test]
    fn timestamps_are_non_decreasing() {
        let mut recorder = SessionRecorder::new();
        recorder.start_session(&patient());
        for i in 0..32 {
            recorder.record_log(LogEntry::new(LogSource::System, format!("line {i}")));
        }
        let session = recorder.stop_session().unwrap();
        let stamps: Vec<u64> = session.events().iter().map(|e| e.timestamp_ms).collect();
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn start_resets_previous_buffer() {
        let mut recorder = SessionRecorder::new();
        let p = patient();
        recorder.start_session(&p);
        recorder.record(EventPayload::Tumor(TumorState {
            visible: true,
            destroyed: false,
        }));
        recorder.start_session(&p);
        let session = recorder.stop_session().unwrap();
        assert!(session.is_empty());
        assert_eq!(session.duration_ms(), 0);
    }

    #[test]
    fn session_metadata_comes_from_patient() {
        let mut recorder = SessionRecorder::new();
        recorder.start_session(&patient());
        let session = recorder.stop_session().unwrap();
        assert_eq!(session.patient_id(), "PX-3000");
        assert_eq!(session.kind(), ProcedureKind::Neuro);
    }

    #[test]
    fn digest_verifies_and_detects_tampering() {
        let mut recorder = SessionRecorder::new();
        recorder.start_session(&patient());
        recorder.record(EventPayload::Laser(LaserState::Growing));
        recorder.record(EventPayload::Laser(LaserState::Off));
        let session = recorder.stop_session().unwrap();
        session.verify().unwrap();

        let mut tampered_events = session.events().to_vec();
        tampered_events[1].payload = EventPayload::Laser(LaserState::Growing);
        let tampered = Session {
            events: tampered_events,
            ..session.clone()
        };
        assert!(tampered.verify().is_err());
    }

    #[test]
    fn from_events_seals_a_valid_digest() {
        let events = vec![RecordedEvent {
            timestamp_ms: 5,
            payload: EventPayload::Laser(LaserState::Off),
        }];
        let session = Session::from_events("PX-1", ProcedureKind::Renal, events);
        session.verify().unwrap();
        assert_eq!(session.duration_ms(), 5);
    }
}
