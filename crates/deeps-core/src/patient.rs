use crate::error::{DeepsError, Result};
use crate::profile::MetricKind;
use crate::types::{PatientStatus, ProcedureKind, RiskTier, Sex};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// BloodPressure
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodPressure {
    pub systolic: u32,
    pub diastolic: u32,
}

impl fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.systolic, self.diastolic)
    }
}

// ---------------------------------------------------------------------------
// OrganMetric
// ---------------------------------------------------------------------------

/// The category-specific measurement as a structured numeric reading.
/// Threshold checks compare `value` numerically; the console form
/// (`"ICP: 28mmHg (CRITICAL)"`) is rendered on demand and never parsed
/// back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrganMetric {
    pub kind: MetricKind,
    pub value: f64,
}

impl OrganMetric {
    pub fn new(kind: MetricKind, value: f64) -> Self {
        Self { kind, value }
    }

    /// Render the console form, flagging readings at or past `critical`.
    pub fn describe(&self, critical: f64) -> String {
        if self.value >= critical {
            format!(
                "{}: {}{} (CRITICAL)",
                self.kind.label(),
                self.value,
                self.kind.unit()
            )
        } else {
            format!("{}: {}{}", self.kind.label(), self.value, self.kind.unit())
        }
    }
}

// ---------------------------------------------------------------------------
// Vitals
// ---------------------------------------------------------------------------

/// Clinical snapshot. Also used verbatim as the payload of `VITALS` events
/// recorded during ablation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub hr: u32,
    pub bp: BloodPressure,
    pub glucose: u32,
    pub temp_f: f64,
    pub metric: OrganMetric,
}

// ---------------------------------------------------------------------------
// Patient
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub sex: Sex,
    pub kind: ProcedureKind,
    pub vitals: Vitals,
    pub history: Vec<String>,
    pub condition: String,
    pub allergies: Vec<String>,
    /// Target mass position in theatre coordinates.
    pub target: [f64; 3],
    pub scheduled_time: String,
    pub status: PatientStatus,
    pub risk: RiskTier,
}

impl Patient {
    /// Terminal patients cannot re-enter the theatre.
    pub fn is_locked(&self) -> bool {
        self.status.is_terminal()
    }

    /// Advance the lifecycle, enforcing monotonicity.
    pub fn advance_status(&mut self, next: PatientStatus) -> Result<()> {
        if !self.status.can_advance_to(next) {
            return Err(DeepsError::InvalidTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }

    /// Console form of the organ metric for this patient's category.
    pub fn metric_display(&self) -> String {
        self.vitals
            .metric
            .describe(self.kind.profile().critical_metric)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::MetricKind;

    pub(crate) fn sample_patient(kind: ProcedureKind) -> Patient {
        let profile = kind.profile();
        Patient {
            id: "PX-1001".into(),
            name: "Elena Rodriguez".into(),
            age: 44,
            sex: Sex::F,
            kind,
            vitals: Vitals {
                hr: 72,
                bp: BloodPressure {
                    systolic: 118,
                    diastolic: 76,
                },
                glucose: 96,
                temp_f: 98.4,
                metric: OrganMetric::new(profile.metric, profile.nominal_metric),
            },
            history: vec!["Hypertension".into()],
            condition: profile.conditions[0].into(),
            allergies: vec!["None".into()],
            target: [0.4, 0.1, -0.1],
            scheduled_time: "8:00".into(),
            status: PatientStatus::Waiting,
            risk: RiskTier::Moderate,
        }
    }

    #[test]
    fn advance_follows_lifecycle() {
        let mut p = sample_patient(ProcedureKind::Neuro);
        p.advance_status(PatientStatus::Surgery).unwrap();
        p.advance_status(PatientStatus::Completed).unwrap();
        assert!(p.is_locked());
        assert!(p.advance_status(PatientStatus::Surgery).is_err());
    }

    #[test]
    fn cancel_from_waiting() {
        let mut p = sample_patient(ProcedureKind::Renal);
        p.advance_status(PatientStatus::Cancelled).unwrap();
        assert!(p.is_locked());
    }

    #[test]
    fn backward_transition_rejected() {
        let mut p = sample_patient(ProcedureKind::Ocular);
        p.advance_status(PatientStatus::Surgery).unwrap();
        let err = p.advance_status(PatientStatus::Prepping).unwrap_err();
        assert!(err.to_string().contains("invalid patient transition"));
    }

    #[test]
    fn metric_display_flags_critical() {
        let mut p = sample_patient(ProcedureKind::Neuro);
        assert_eq!(p.metric_display(), "ICP: 12mmHg");
        p.vitals.metric = OrganMetric::new(MetricKind::Icp, 28.0);
        assert_eq!(p.metric_display(), "ICP: 28mmHg (CRITICAL)");
    }
}
