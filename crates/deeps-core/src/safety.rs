//! Pre-ablation safety gate rules.
//!
//! `evaluate` is a pure function of the patient snapshot: no clocks, no
//! randomness, no side effects. The sequencer calls it exactly once per run
//! at the gate; tests may call it as often as they like and must see
//! identical results.

use crate::patient::Patient;
use serde::{Deserialize, Serialize};

/// Heart rate above which every procedure is refused, regardless of kind.
pub const MAX_SAFE_HR: u32 = 125;

pub const TACHYCARDIA_REASON: &str = "SEVERE TACHYCARDIA";

// ---------------------------------------------------------------------------
// SafetyResult
// ---------------------------------------------------------------------------

/// Gate verdict. `reason` is empty exactly when `safe` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyResult {
    pub safe: bool,
    pub reason: String,
}

impl SafetyResult {
    pub fn safe() -> Self {
        Self {
            safe: true,
            reason: String::new(),
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            safe: false,
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// evaluate
// ---------------------------------------------------------------------------

/// Apply the gate rules in priority order; the first match wins.
///
/// 1. Heart rate above [`MAX_SAFE_HR`]: unsafe for any kind.
/// 2. The kind's own organ metric at or past its profile threshold:
///    unsafe with the profile's abort reason. The rule is kind-scoped; a
///    reading only counts against the category it belongs to.
/// 3. Otherwise safe.
pub fn evaluate(patient: &Patient) -> SafetyResult {
    if patient.vitals.hr > MAX_SAFE_HR {
        return SafetyResult::rejected(TACHYCARDIA_REASON);
    }

    let profile = patient.kind.profile();
    let metric = &patient.vitals.metric;
    if metric.kind == profile.metric && metric.value >= profile.critical_metric {
        return SafetyResult::rejected(profile.abort_reason);
    }

    SafetyResult::safe()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patient::{BloodPressure, OrganMetric, Patient, Vitals};
    use crate::profile::MetricKind;
    use crate::types::{PatientStatus, ProcedureKind, RiskTier, Sex};

    fn patient(kind: ProcedureKind, hr: u32, metric: OrganMetric) -> Patient {
        Patient {
            id: "PX-2000".into(),
            name: "Akira Sato".into(),
            age: 57,
            sex: Sex::M,
            kind,
            vitals: Vitals {
                hr,
                bp: BloodPressure {
                    systolic: 124,
                    diastolic: 78,
                },
                glucose: 101,
                temp_f: 98.7,
                metric,
            },
            history: vec![],
            condition: kind.profile().conditions[0].into(),
            allergies: vec![],
            target: [0.3, 0.0, 0.0],
            scheduled_time: "9:00".into(),
            status: PatientStatus::Waiting,
            risk: RiskTier::Moderate,
        }
    }

    #[test]
    fn tachycardia_rejected_for_every_kind() {
        for kind in ProcedureKind::all() {
            let profile = kind.profile();
            let p = patient(*kind, 130, OrganMetric::new(profile.metric, profile.nominal_metric));
            let result = evaluate(&p);
            assert!(!result.safe);
            assert_eq!(result.reason, "SEVERE TACHYCARDIA");
        }
    }

    #[test]
    fn tachycardia_outranks_metric() {
        let p = patient(
            ProcedureKind::Neuro,
            140,
            OrganMetric::new(MetricKind::Icp, 30.0),
        );
        assert_eq!(evaluate(&p).reason, "SEVERE TACHYCARDIA");
    }

    #[test]
    fn icp_critical_for_neuro() {
        let p = patient(
            ProcedureKind::Neuro,
            90,
            OrganMetric::new(MetricKind::Icp, 28.0),
        );
        let result = evaluate(&p);
        assert!(!result.safe);
        assert_eq!(result.reason, "ICP CRITICAL");
    }

    #[test]
    fn metric_rule_is_kind_scoped() {
        // An ICP reading of 28 only matters to NEURO; OCULAR and RENAL
        // gates ignore a metric that is not theirs.
        for kind in [ProcedureKind::Ocular, ProcedureKind::Renal] {
            let p = patient(kind, 90, OrganMetric::new(MetricKind::Icp, 28.0));
            assert!(evaluate(&p).safe, "{kind}");
        }
    }

    #[test]
    fn iop_and_creatinine_thresholds() {
        let glaucoma = patient(
            ProcedureKind::Ocular,
            80,
            OrganMetric::new(MetricKind::Iop, 35.0),
        );
        assert_eq!(evaluate(&glaucoma).reason, "IOP CRITICAL");

        let failure = patient(
            ProcedureKind::Renal,
            80,
            OrganMetric::new(MetricKind::Creatinine, 5.2),
        );
        assert_eq!(evaluate(&failure).reason, "RENAL FAILURE");

        let stable = patient(
            ProcedureKind::Renal,
            80,
            OrganMetric::new(MetricKind::Creatinine, 1.1),
        );
        assert!(evaluate(&stable).safe);
    }

    #[test]
    fn safe_reason_is_empty() {
        let p = patient(
            ProcedureKind::Neuro,
            90,
            OrganMetric::new(MetricKind::Icp, 12.0),
        );
        let result = evaluate(&p);
        assert!(result.safe);
        assert!(result.reason.is_empty());
    }

    #[test]
    fn evaluate_is_idempotent() {
        let p = patient(
            ProcedureKind::Ocular,
            126,
            OrganMetric::new(MetricKind::Iop, 15.0),
        );
        let first = evaluate(&p);
        let second = evaluate(&p);
        assert_eq!(first, second);
    }
}
