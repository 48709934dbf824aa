//! Static per-kind procedure configuration.
//!
//! Everything that varies by [`ProcedureKind`] (organ metric semantics,
//! critical thresholds, laser parameters, prescriptions, target placement)
//! lives in one record looked up once per patient, instead of being spread
//! across kind comparisons at every decision point.

use crate::types::ProcedureKind;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// MetricKind
// ---------------------------------------------------------------------------

/// The organ-specific measurement tracked for a procedure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Intracranial pressure, mmHg.
    Icp,
    /// Intraocular pressure, mmHg.
    Iop,
    /// Serum creatinine, mg/dL.
    Creatinine,
}

impl MetricKind {
    pub fn label(self) -> &'static str {
        match self {
            MetricKind::Icp => "ICP",
            MetricKind::Iop => "IOP",
            MetricKind::Creatinine => "Creatinine",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            MetricKind::Icp | MetricKind::Iop => "mmHg",
            MetricKind::Creatinine => "mg/dL",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// TargetEnvelope
// ---------------------------------------------------------------------------

/// Axis-aligned box the target mass may occupy, in theatre coordinates.
#[derive(Debug, Clone, Copy)]
pub struct TargetEnvelope {
    pub x: (f64, f64),
    pub y: (f64, f64),
    pub z: (f64, f64),
}

// ---------------------------------------------------------------------------
// ProcedureProfile
// ---------------------------------------------------------------------------

/// Fixed clinical and hardware configuration for one procedure category.
#[derive(Debug, Clone)]
pub struct ProcedureProfile {
    pub kind: ProcedureKind,
    pub metric: MetricKind,
    /// Typical pre-op reading for a stable patient.
    pub nominal_metric: f64,
    /// Reading at or above which the safety gate refuses to operate.
    pub critical_metric: f64,
    /// Reason string recorded when the gate aborts on this metric.
    pub abort_reason: &'static str,
    pub laser_wavelength_nm: u32,
    pub beam_color: &'static str,
    pub conditions: &'static [&'static str],
    /// Post-op prescription lines for the discharge record.
    pub drug_protocol: &'static [&'static str],
    pub target_envelope: TargetEnvelope,
}

static NEURO: ProcedureProfile = ProcedureProfile {
    kind: ProcedureKind::Neuro,
    metric: MetricKind::Icp,
    nominal_metric: 12.0,
    critical_metric: 28.0,
    abort_reason: "ICP CRITICAL",
    laser_wavelength_nm: 532,
    beam_color: "green",
    conditions: &["Glioblastoma", "Meningioma"],
    drug_protocol: &[
        "Dexamethasone 4mg IV every 6 hours",
        "Levetiracetam 500mg twice daily",
    ],
    target_envelope: TargetEnvelope {
        x: (0.2, 0.7),
        y: (-0.25, 0.25),
        z: (-0.25, 0.25),
    },
};

static OCULAR: ProcedureProfile = ProcedureProfile {
    kind: ProcedureKind::Ocular,
    metric: MetricKind::Iop,
    nominal_metric: 15.0,
    critical_metric: 35.0,
    abort_reason: "IOP CRITICAL",
    laser_wavelength_nm: 488,
    beam_color: "cyan",
    conditions: &["Retinal Detachment", "Cataract", "Macular Hole"],
    drug_protocol: &[
        "Prednisolone acetate 1% drops, four times daily",
        "Timolol 0.5% drops, twice daily",
    ],
    target_envelope: TargetEnvelope {
        x: (0.55, 0.65),
        y: (-0.15, 0.15),
        z: (-0.15, 0.15),
    },
};

static RENAL: ProcedureProfile = ProcedureProfile {
    kind: ProcedureKind::Renal,
    metric: MetricKind::Creatinine,
    nominal_metric: 1.1,
    critical_metric: 5.2,
    abort_reason: "RENAL FAILURE",
    laser_wavelength_nm: 589,
    beam_color: "orange",
    conditions: &["Staghorn Calculus", "Uric Acid Stone"],
    drug_protocol: &[
        "Tamsulosin 0.4mg daily",
        "Potassium citrate 10mEq with meals",
    ],
    target_envelope: TargetEnvelope {
        x: (0.1, 0.4),
        y: (-0.4, 0.4),
        z: (-0.15, 0.15),
    },
};

impl ProcedureKind {
    /// The static configuration record for this category.
    pub fn profile(self) -> &'static ProcedureProfile {
        match self {
            ProcedureKind::Neuro => &NEURO,
            ProcedureKind::Ocular => &OCULAR,
            ProcedureKind::Renal => &RENAL,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
