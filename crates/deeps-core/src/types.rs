use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ProcedureKind
// ---------------------------------------------------------------------------

/// The three procedure categories the theatre supports. Every patient is
/// admitted under exactly one kind; thresholds, laser parameters, and
/// prescriptions are looked up from its [`crate::profile::ProcedureProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcedureKind {
    Neuro,
    Ocular,
    Renal,
}

impl ProcedureKind {
    pub fn all() -> &'static [ProcedureKind] {
        &[
            ProcedureKind::Neuro,
            ProcedureKind::Ocular,
            ProcedureKind::Renal,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProcedureKind::Neuro => "NEURO",
            ProcedureKind::Ocular => "OCULAR",
            ProcedureKind::Renal => "RENAL",
        }
    }
}

impl fmt::Display for ProcedureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProcedureKind {
    type Err = crate::error::DeepsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NEURO" => Ok(ProcedureKind::Neuro),
            "OCULAR" => Ok(ProcedureKind::Ocular),
            "RENAL" => Ok(ProcedureKind::Renal),
            _ => Err(crate::error::DeepsError::InvalidKind(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// PatientStatus
// ---------------------------------------------------------------------------

/// Patient lifecycle. Transitions are monotonic within a run:
/// `Waiting → … → Surgery → {Completed | Cancelled}`. The two terminal
/// states block re-entry into the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatientStatus {
    Waiting,
    Prepping,
    Surgery,
    Recovery,
    Completed,
    Cancelled,
}

impl PatientStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, PatientStatus::Completed | PatientStatus::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PatientStatus::Waiting => "WAITING",
            PatientStatus::Prepping => "PREPPING",
            PatientStatus::Surgery => "SURGERY",
            PatientStatus::Recovery => "RECOVERY",
            PatientStatus::Completed => "COMPLETED",
            PatientStatus::Cancelled => "CANCELLED",
        }
    }

    /// Whether a move to `next` respects the monotonic lifecycle.
    /// Cancellation is reachable from any non-terminal state; everything
    /// else must advance strictly forward.
    pub fn can_advance_to(self, next: PatientStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        if next == PatientStatus::Cancelled {
            return true;
        }
        next > self
    }
}

impl fmt::Display for PatientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RiskTier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Critical,
    High,
    Moderate,
}

impl RiskTier {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskTier::Critical => "CRITICAL",
            RiskTier::High => "HIGH",
            RiskTier::Moderate => "MODERATE",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Sex
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    M,
    F,
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::M => f.write_str("M"),
            Sex::F => f.write_str("F"),
        }
    }
}

// ---------------------------------------------------------------------------
// LaserState
// ---------------------------------------------------------------------------

/// Beam emitter state as seen by observers. `Off` is the resting default;
/// the ablation phase walks `Growing → Shrinking → Off`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LaserState {
    #[default]
    Off,
    Growing,
    Shrinking,
}

impl LaserState {
    pub fn as_str(self) -> &'static str {
        match self {
            LaserState::Off => "OFF",
            LaserState::Growing => "GROWING",
            LaserState::Shrinking => "SHRINKING",
        }
    }
}

impl fmt::Display for LaserState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tool
// ---------------------------------------------------------------------------

/// The active-tool indicator shown while the sequencer runs. Each phase
/// lights up the subsystem doing the work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    #[default]
    Idle,
    Vision,
    Oumi,
    Cline,
    Rabbit,
    Kestra,
}

impl Tool {
    /// Operator-facing label, matching the console badge.
    pub fn label(self) -> &'static str {
        match self {
            Tool::Idle => "STANDBY",
            Tool::Vision => "TOGETHER AI",
            Tool::Oumi => "OUMI AGENT",
            Tool::Cline => "CLINE CLI",
            Tool::Rabbit => "CODE RABBIT",
            Tool::Kestra => "KESTRA ORCH",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn kind_roundtrip() {
        for kind in ProcedureKind::all() {
            let parsed = ProcedureKind::from_str(kind.as_str()).unwrap();
            assert_eq!(*kind, parsed);
        }
        assert!(ProcedureKind::from_str("cardiac").is_err());
    }

    #[test]
    fn kind_parse_is_case_insensitive() {
        assert_eq!(
            ProcedureKind::from_str("neuro").unwrap(),
            ProcedureKind::Neuro
        );
    }

    #[test]
    fn status_terminality() {
        assert!(PatientStatus::Completed.is_terminal());
        assert!(PatientStatus::Cancelled.is_terminal());
        assert!(!PatientStatus::Waiting.is_terminal());
        assert!(!PatientStatus::Surgery.is_terminal());
    }

    #[test]
    fn status_monotonic_advance() {
        assert!(PatientStatus::Waiting.can_advance_to(PatientStatus::Surgery));
        assert!(PatientStatus::Surgery.can_advance_to(PatientStatus::Completed));
        assert!(PatientStatus::Waiting.can_advance_to(PatientStatus::Cancelled));
        assert!(!PatientStatus::Surgery.can_advance_to(PatientStatus::Waiting));
        assert!(!PatientStatus::Completed.can_advance_to(PatientStatus::Surgery));
        assert!(!PatientStatus::Cancelled.can_advance_to(PatientStatus::Cancelled));
    }

    #[test]
    fn laser_default_is_off() {
        assert_eq!(LaserState::default(), LaserState::Off);
        assert_eq!(LaserState::Off.as_str(), "OFF");
    }

    #[test]
    fn tool_labels() {
        assert_eq!(Tool::Idle.label(), "STANDBY");
        assert_eq!(Tool::Kestra.label(), "KESTRA ORCH");
    }
}
