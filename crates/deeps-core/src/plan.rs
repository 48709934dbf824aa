//! Trajectory plan advisory.
//!
//! The planning phase produces a small set of candidate approach paths with
//! risk/efficiency scores and a reasoning line, marking the winner
//! `Selected`. The set is a static decision-explanation artifact: generated
//! once per run, shown to the operator, and deliberately outside the replay
//! timeline.

use crate::patient::Patient;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// PlanStatus / Plan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanStatus {
    Selected,
    Rejected,
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanStatus::Selected => f.write_str("SELECTED"),
            PlanStatus::Rejected => f.write_str("REJECTED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: Uuid,
    pub name: String,
    /// Estimated complication risk, percent.
    pub risk: f64,
    /// Estimated ablation efficiency, percent.
    pub efficiency: f64,
    pub reasoning: String,
    pub status: PlanStatus,
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

struct Strategy {
    name: &'static str,
    risk: f64,
    efficiency: f64,
    reasoning: &'static str,
}

const STRATEGIES: &[Strategy] = &[
    Strategy {
        name: "Direct Vector",
        risk: 12.0,
        efficiency: 97.0,
        reasoning: "Shortest path to target; crosses a perfusion-dense region.",
    },
    Strategy {
        name: "Vessel-Averse Detour",
        risk: 4.0,
        efficiency: 88.0,
        reasoning: "Longer approach keeping a safety margin from major vasculature.",
    },
    Strategy {
        name: "Staged Approach",
        risk: 7.0,
        efficiency: 82.0,
        reasoning: "Two-stage entry allowing mid-course re-imaging; slowest option.",
    },
];

/// Produce the advisory set for one run: every stock strategy scored for
/// the patient, the lowest-risk candidate marked `Selected`.
pub fn candidate_plans(patient: &Patient) -> Vec<Plan> {
    let winner = STRATEGIES
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.risk.total_cmp(&b.risk))
        .map(|(i, _)| i)
        .unwrap_or(0);

    STRATEGIES
        .iter()
        .enumerate()
        .map(|(i, s)| Plan {
            id: Uuid::new_v4(),
            name: s.name.to_string(),
            risk: s.risk,
            efficiency: s.efficiency,
            reasoning: format!("{} ({} / {})", s.reasoning, patient.kind, patient.condition),
            status: if i == winner {
                PlanStatus::Selected
            } else {
                PlanStatus::Rejected
            },
        })
        .collect()
}

/// The `Selected` member of an advisory set.
pub fn selected(plans: &[Plan]) -> Option<&Plan> {
    plans.iter().find(|p| p.status == PlanStatus::Selected)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
