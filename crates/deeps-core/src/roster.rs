//! Admission roster generation.
//!
//! The roster is an injectable collaborator as far as the sequencer is
//! concerned; this module is the stock generator the CLI uses. Generators
//! take `&mut impl Rng` so callers can seed a `StdRng` for reproducible
//! cohorts.

use crate::patient::{BloodPressure, OrganMetric, Patient, Vitals};
use crate::types::{PatientStatus, ProcedureKind, RiskTier, Sex};
use rand::Rng;

const NAMES: &[&str] = &[
    "Sarah Connor",
    "John Smith",
    "Elena Rodriguez",
    "Akira Sato",
    "Marcus Aurelius",
    "Wei Chen",
    "Priya Patel",
    "Lars Jensen",
    "Amara Diallo",
    "David Kim",
    "Neo Anderson",
    "Trinity Moss",
];

const HISTORIES: &[&str] = &["Hypertension", "None", "Asthma", "Diabetes"];
const ALLERGIES: &[&str] = &["None", "Penicillin", "Latex"];

/// Fraction of admissions generated in a critical pre-op state.
const CRITICAL_RATE: f64 = 0.2;

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Generate an ordered admission roster of `count` patients.
pub fn generate(count: usize, rng: &mut impl Rng) -> Vec<Patient> {
    (0..count).map(|i| generate_one(i, rng)).collect()
}

fn generate_one(slot: usize, rng: &mut impl Rng) -> Patient {
    let kind = ProcedureKind::all()[rng.gen_range(0..ProcedureKind::all().len())];
    let profile = kind.profile();
    let critical = rng.gen_bool(CRITICAL_RATE);

    let metric_value = if critical {
        profile.critical_metric
    } else {
        profile.nominal_metric
    };

    let envelope = &profile.target_envelope;
    let target = [
        rng.gen_range(envelope.x.0..=envelope.x.1),
        rng.gen_range(envelope.y.0..=envelope.y.1),
        rng.gen_range(envelope.z.0..=envelope.z.1),
    ];

    Patient {
        id: format!("PX-{}", rng.gen_range(1000..10000)),
        name: NAMES[slot % NAMES.len()].to_string(),
        age: rng.gen_range(20..85),
        sex: if rng.gen_bool(0.5) { Sex::M } else { Sex::F },
        kind,
        vitals: Vitals {
            hr: rng.gen_range(60..100),
            bp: BloodPressure {
                systolic: rng.gen_range(110..140),
                diastolic: rng.gen_range(70..85),
            },
            glucose: rng.gen_range(80..140),
            temp_f: 98.0 + rng.gen_range(0.0..1.0),
            metric: OrganMetric::new(profile.metric, metric_value),
        },
        history: vec![HISTORIES[rng.gen_range(0..HISTORIES.len())].to_string()],
        condition: profile.conditions[rng.gen_range(0..profile.conditions.len())].to_string(),
        allergies: vec![ALLERGIES[rng.gen_range(0..ALLERGIES.len())].to_string()],
        target,
        scheduled_time: format!("{}:00", 8 + slot),
        status: PatientStatus::Waiting,
        risk: if critical {
            RiskTier::Critical
        } else {
            RiskTier::Moderate
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
