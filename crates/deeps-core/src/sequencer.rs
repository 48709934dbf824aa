//! Procedure sequencing state machine.
//!
//! One cooperative async flow drives a run through the fixed phase order,
//! recording everything observable into the session buffer and suspending
//! between phases for the configured simulated work durations. The flow is
//! strictly linear with a single branch: the safety gate either authorizes
//! the ablation or forces the run into the `Aborted` terminal state.
//!
//! External collaborators (the workflow orchestrator and the narrative log
//! generator) are injected through the [`WorkflowTrigger`] and [`Narrator`]
//! traits; both are allowed to fail without stopping a run.

use crate::config::PhaseTimings;
use crate::event::{EventPayload, LogEntry, LogSource, TelemetrySnapshot, TumorState};
use crate::model::{LearningUpdate, ModelRegistry};
use crate::patient::{Patient, Vitals};
use crate::plan::{self, Plan};
use crate::recorder::{Session, SessionRecorder};
use crate::safety;
use crate::types::{LaserState, PatientStatus, ProcedureKind, Tool};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::time::sleep;

/// Substituted for a narrative line when the generator is unreachable.
pub const DEGRADED_LINK_LINE: &str = "Connection instability detected. Retrying packet...";

// ---------------------------------------------------------------------------
// SequencerState
// ---------------------------------------------------------------------------

/// Phase machine states. Transitions are linear in declaration order except
/// `Gating`, which branches to `Aborted` when the safety gate refuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequencerState {
    Idle,
    Orchestrating,
    Imaging,
    Gating,
    Planning,
    Generating,
    Ablating,
    Learning,
    Completed,
    Aborted,
}

impl SequencerState {
    pub fn all() -> &'static [SequencerState] {
        &[
            SequencerState::Idle,
            SequencerState::Orchestrating,
            SequencerState::Imaging,
            SequencerState::Gating,
            SequencerState::Planning,
            SequencerState::Generating,
            SequencerState::Ablating,
            SequencerState::Learning,
            SequencerState::Completed,
            SequencerState::Aborted,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SequencerState::Idle => "idle",
            SequencerState::Orchestrating => "orchestrating",
            SequencerState::Imaging => "imaging",
            SequencerState::Gating => "gating",
            SequencerState::Planning => "planning",
            SequencerState::Generating => "generating",
            SequencerState::Ablating => "ablating",
            SequencerState::Learning => "learning",
            SequencerState::Completed => "completed",
            SequencerState::Aborted => "aborted",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SequencerState::Completed | SequencerState::Aborted)
    }
}

impl fmt::Display for SequencerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Collaborator traits
// ---------------------------------------------------------------------------

/// Result of a workflow orchestration trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerOutcome {
    pub success: bool,
    pub execution_id: Option<String>,
}

/// External workflow orchestrator. A transport failure is equivalent to
/// `success: false`; the sequencer never aborts on either.
#[allow(async_fn_in_trait)]
pub trait WorkflowTrigger {
    async fn trigger(
        &self,
        patient_id: &str,
        kind: ProcedureKind,
    ) -> anyhow::Result<TriggerOutcome>;
}

/// Stage hint passed to the narrative generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NarrativeStage {
    Scanning,
    Planning,
    Coding,
    Ablating,
}

impl NarrativeStage {
    pub fn as_str(self) -> &'static str {
        match self {
            NarrativeStage::Scanning => "SCANNING",
            NarrativeStage::Planning => "PLANNING",
            NarrativeStage::Coding => "CODING",
            NarrativeStage::Ablating => "ABLATING",
        }
    }
}

impl fmt::Display for NarrativeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External narrative log generator. Failures fall back to
/// [`DEGRADED_LINK_LINE`].
#[allow(async_fn_in_trait)]
pub trait Narrator {
    async fn narrate(&self, stage: NarrativeStage, context: &str) -> anyhow::Result<String>;
}

// ---------------------------------------------------------------------------
// RunOutcome
// ---------------------------------------------------------------------------

/// Everything a finished run leaves behind.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub terminal: SequencerState,
    pub final_status: PatientStatus,
    /// Safety-gate reason when the run aborted.
    pub abort_reason: Option<String>,
    /// Orchestrator execution id when the trigger succeeded.
    pub execution_id: Option<String>,
    pub plans: Vec<Plan>,
    pub learning: Option<LearningUpdate>,
    pub session: Session,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Entry refused: the patient is already in a terminal status. No
    /// session is recorded.
    Rejected { status: PatientStatus },
    Finished(Box<RunSummary>),
}

// ---------------------------------------------------------------------------
// ProcedureSequencer
// ---------------------------------------------------------------------------

pub struct ProcedureSequencer<W, N> {
    timings: PhaseTimings,
    orchestrator: W,
    narrator: N,
}

impl<W: WorkflowTrigger, N: Narrator> ProcedureSequencer<W, N> {
    pub fn new(timings: PhaseTimings, orchestrator: W, narrator: N) -> Self {
        Self {
            timings,
            orchestrator,
            narrator,
        }
    }

    /// Drive one procedure for `patient` to a terminal state.
    ///
    /// Terminal-status patients are rejected without side effects. The
    /// learning registry is only touched by runs that reach the learning
    /// phase.
    pub async fn run(
        &self,
        patient: &mut Patient,
        registry: &mut ModelRegistry,
    ) -> crate::Result<RunOutcome> {
        if patient.is_locked() {
            tracing::warn!(
                patient = %patient.id,
                status = %patient.status,
                "re-entry refused for terminal patient"
            );
            return Ok(RunOutcome::Rejected {
                status: patient.status,
            });
        }

        // The gate and the vitals feed both use the snapshot captured at
        // sequence start, not live patient state.
        let snapshot = patient.clone();
        let mut recorder = SessionRecorder::new();
        recorder.start_session(patient);
        let mut state = SequencerState::Idle;

        // ── Orchestration ──
        self.enter(&mut state, SequencerState::Orchestrating, Tool::Kestra, 5, &mut recorder);
        self.log(
            &mut recorder,
            LogSource::Kestra,
            format!("Orchestrating workflow for {} intervention...", patient.kind),
        );
        self.pause(self.timings.orchestration_ms / 2).await;

        let execution_id = match self.orchestrator.trigger(&patient.id, patient.kind).await {
            Ok(outcome) if outcome.success => {
                let id = outcome.execution_id.unwrap_or_else(|| "unknown".to_string());
                self.log(
                    &mut recorder,
                    LogSource::Kestra,
                    format!("Pre-op containers triggered (execution {id})."),
                );
                Some(id)
            }
            Ok(_) => {
                self.log(
                    &mut recorder,
                    LogSource::System,
                    "Orchestrator declined the workflow; continuing in degraded mode.",
                );
                None
            }
            Err(err) => {
                tracing::warn!(error = %err, "orchestration trigger failed");
                self.log(
                    &mut recorder,
                    LogSource::System,
                    "Orchestrator unreachable; continuing in degraded mode.",
                );
                None
            }
        };
        self.pause(self.timings.orchestration_ms / 2).await;

        // ── Imaging ──
        self.enter(&mut state, SequencerState::Imaging, Tool::Vision, 10, &mut recorder);
        let line = self.narrate(NarrativeStage::Scanning, &snapshot).await;
        self.log(&mut recorder, LogSource::VisionModel, line);
        self.pause(self.timings.imaging_ms / 2).await;
        self.log(&mut recorder, LogSource::VisionModel, "Analysing tissue density...");
        self.pause(self.timings.imaging_ms / 2).await;
        recorder.record(EventPayload::Tumor(TumorState {
            visible: true,
            destroyed: false,
        }));
        self.log(&mut recorder, LogSource::VisionModel, "ANOMALY DETECTED. Vector locked.");
        self.progress(&mut recorder, Tool::Vision, 20);

        // ── Safety gate ──
        self.enter(&mut state, SequencerState::Gating, Tool::Idle, 20, &mut recorder);
        self.log(
            &mut recorder,
            LogSource::Safety,
            format!("Verifying {} parameters...", patient.kind),
        );
        self.pause(self.timings.gate_ms).await;

        let verdict = safety::evaluate(&snapshot);
        if !verdict.safe {
            self.log(
                &mut recorder,
                LogSource::Critical,
                format!("{} DETECTED.", verdict.reason),
            );
            self.log(&mut recorder, LogSource::System, "ABORTING PROCEDURE.");
            patient.advance_status(PatientStatus::Cancelled)?;
            self.enter(&mut state, SequencerState::Aborted, Tool::Idle, 20, &mut recorder);
            self.pause(self.timings.abort_hold_ms).await;
            let session = recorder
                .stop_session()
                .expect("recording is live for the duration of a run");
            return Ok(RunOutcome::Finished(Box::new(RunSummary {
                terminal: state,
                final_status: patient.status,
                abort_reason: Some(verdict.reason),
                execution_id,
                plans: Vec::new(),
                learning: None,
                session,
            })));
        }
        self.log(&mut recorder, LogSource::Safety, "Parameters verified. Authorization granted.");

        // ── Planning ──
        self.enter(&mut state, SequencerState::Planning, Tool::Oumi, 25, &mut recorder);
        let line = self.narrate(NarrativeStage::Planning, &snapshot).await;
        self.log(&mut recorder, LogSource::Oumi, line);
        self.pause(self.timings.planning_ms).await;
        let plans = plan::candidate_plans(patient);
        if let Some(winner) = plan::selected(&plans) {
            self.log(
                &mut recorder,
                LogSource::Oumi,
                format!(
                    "Trajectory optimized via RL; '{}' selected from {} candidates.",
                    winner.name,
                    plans.len()
                ),
            );
        }
        self.progress(&mut recorder, Tool::Oumi, 40);

        // ── Code generation and audit ──
        self.enter(&mut state, SequencerState::Generating, Tool::Cline, 45, &mut recorder);
        let line = self.narrate(NarrativeStage::Coding, &snapshot).await;
        self.log(&mut recorder, LogSource::Cline, line);
        self.pause(self.timings.codegen_ms).await;
        self.progress(&mut recorder, Tool::Rabbit, 55);
        self.log(&mut recorder, LogSource::CodeRabbit, "Code audit: PASS. 0 errors.");
        self.pause(self.timings.audit_ms).await;
        self.progress(&mut recorder, Tool::Rabbit, 60);

        // ── Ablation ──
        self.enter(&mut state, SequencerState::Ablating, Tool::Idle, 60, &mut recorder);
        patient.advance_status(PatientStatus::Surgery)?;
        self.log(&mut recorder, LogSource::Vitalis, "Hardware armed.");
        self.pause(self.timings.arming_ms).await;
        self.log(&mut recorder, LogSource::System, "FIRING LASER.");
        recorder.record(EventPayload::Laser(LaserState::Growing));

        let ticks = self.timings.ablation_ticks;
        for tick in 0..ticks {
            self.pause(self.timings.ablation_tick_ms).await;
            recorder.record(EventPayload::Vitals(drift_vitals(&snapshot.vitals, tick)));
            let pct = 60 + (u64::from(tick + 1) * 40 / u64::from(ticks.max(1))) as u8;
            self.progress(&mut recorder, Tool::Idle, pct.min(100));
            if tick + 1 == ticks / 2 {
                let line = self.narrate(NarrativeStage::Ablating, &snapshot).await;
                self.log(&mut recorder, LogSource::System, line);
            }
        }

        recorder.record(EventPayload::Tumor(TumorState {
            visible: true,
            destroyed: true,
        }));
        self.log(&mut recorder, LogSource::System, "Target eliminated.");
        self.pause(self.timings.cooldown_ms).await;
        recorder.record(EventPayload::Laser(LaserState::Shrinking));
        self.pause(self.timings.retract_ms).await;
        recorder.record(EventPayload::Laser(LaserState::Off));

        // ── Learning ──
        self.enter(&mut state, SequencerState::Learning, Tool::Oumi, 100, &mut recorder);
        let learning = registry.absorb_run(patient);
        self.log(
            &mut recorder,
            LogSource::Oumi,
            format!(
                "Model {} updated to {}: {}",
                registry.model_name, learning.version, learning.insight
            ),
        );
        self.pause(self.timings.learning_ms).await;

        // ── Complete ──
        patient.advance_status(PatientStatus::Completed)?;
        self.log(&mut recorder, LogSource::System, "Procedure complete.");
        self.enter(&mut state, SequencerState::Completed, Tool::Idle, 100, &mut recorder);
        let session = recorder
            .stop_session()
            .expect("recording is live for the duration of a run");

        Ok(RunOutcome::Finished(Box::new(RunSummary {
            terminal: state,
            final_status: patient.status,
            abort_reason: None,
            execution_id,
            plans,
            learning: Some(learning),
            session,
        })))
    }

    // ── Internal ──

    fn enter(
        &self,
        state: &mut SequencerState,
        next: SequencerState,
        tool: Tool,
        progress: u8,
        recorder: &mut SessionRecorder,
    ) {
        tracing::debug!(from = state.as_str(), to = next.as_str(), "phase transition");
        *state = next;
        recorder.record(EventPayload::Telemetry(TelemetrySnapshot { tool, progress }));
    }

    fn progress(&self, recorder: &mut SessionRecorder, tool: Tool, progress: u8) {
        recorder.record(EventPayload::Telemetry(TelemetrySnapshot { tool, progress }));
    }

    fn log(&self, recorder: &mut SessionRecorder, source: LogSource, message: impl Into<String>) {
        let entry = LogEntry::new(source, message);
        tracing::info!("{entry}");
        recorder.record_log(entry);
    }

    async fn narrate(&self, stage: NarrativeStage, patient: &Patient) -> String {
        let context = format!("{} / {}", patient.kind, patient.condition);
        match self.narrator.narrate(stage, &context).await {
            Ok(line) => line,
            Err(err) => {
                tracing::warn!(error = %err, stage = %stage, "narrative generation failed");
                DEGRADED_LINK_LINE.to_string()
            }
        }
    }

    async fn pause(&self, ms: u64) {
        if ms > 0 {
            sleep(Duration::from_millis(ms)).await;
        }
    }
}

/// Small deterministic wobble applied to the baseline vitals during
/// ablation ticks.
fn drift_vitals(base: &Vitals, tick: u32) -> Vitals {
    const WOBBLE: [i32; 8] = [0, 1, 2, 1, 0, -1, -2, -1];
    let delta = WOBBLE[tick as usize % WOBBLE.len()];
    let mut vitals = base.clone();
    vitals.hr = vitals.hr.saturating_add_signed(delta);
    vitals.bp.systolic = vitals.bp.systolic.saturating_add_signed(delta);
    vitals
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
