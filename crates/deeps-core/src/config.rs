use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// PhaseTimings
// ---------------------------------------------------------------------------

/// Simulated work durations for each sequencer phase, in milliseconds.
/// These are the only suspension points in a run; everything else is
/// synchronous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTimings {
    #[serde(default = "default_orchestration_ms")]
    pub orchestration_ms: u64,
    #[serde(default = "default_imaging_ms")]
    pub imaging_ms: u64,
    #[serde(default = "default_gate_ms")]
    pub gate_ms: u64,
    #[serde(default = "default_planning_ms")]
    pub planning_ms: u64,
    /// Extended sub-duration for autonomous control-script generation.
    #[serde(default = "default_codegen_ms")]
    pub codegen_ms: u64,
    #[serde(default = "default_audit_ms")]
    pub audit_ms: u64,
    #[serde(default = "default_arming_ms")]
    pub arming_ms: u64,
    #[serde(default = "default_ablation_tick_ms")]
    pub ablation_tick_ms: u64,
    #[serde(default = "default_ablation_ticks")]
    pub ablation_ticks: u32,
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
    #[serde(default = "default_retract_ms")]
    pub retract_ms: u64,
    #[serde(default = "default_learning_ms")]
    pub learning_ms: u64,
    /// Hold time on the abort screen before the referral is issued.
    #[serde(default = "default_abort_hold_ms")]
    pub abort_hold_ms: u64,
}

fn default_orchestration_ms() -> u64 {
    2_000
}

fn default_imaging_ms() -> u64 {
    3_000
}

fn default_gate_ms() -> u64 {
    1_500
}

fn default_planning_ms() -> u64 {
    2_000
}

fn default_codegen_ms() -> u64 {
    1_500
}

fn default_audit_ms() -> u64 {
    800
}

fn default_arming_ms() -> u64 {
    1_000
}

fn default_ablation_tick_ms() -> u64 {
    800
}

fn default_ablation_ticks() -> u32 {
    10
}

fn default_cooldown_ms() -> u64 {
    1_000
}

fn default_retract_ms() -> u64 {
    1_000
}

fn default_learning_ms() -> u64 {
    1_000
}

fn default_abort_hold_ms() -> u64 {
    2_000
}

impl Default for PhaseTimings {
    fn default() -> Self {
        Self {
            orchestration_ms: default_orchestration_ms(),
            imaging_ms: default_imaging_ms(),
            gate_ms: default_gate_ms(),
            planning_ms: default_planning_ms(),
            codegen_ms: default_codegen_ms(),
            audit_ms: default_audit_ms(),
            arming_ms: default_arming_ms(),
            ablation_tick_ms: default_ablation_tick_ms(),
            ablation_ticks: default_ablation_ticks(),
            cooldown_ms: default_cooldown_ms(),
            retract_ms: default_retract_ms(),
            learning_ms: default_learning_ms(),
            abort_hold_ms: default_abort_hold_ms(),
        }
    }
}

impl PhaseTimings {
    /// Zero-delay timings for tests and headless replays. The ablation tick
    /// count keeps its default so event counts are unchanged.
    pub fn instant() -> Self {
        Self {
            orchestration_ms: 0,
            imaging_ms: 0,
            gate_ms: 0,
            planning_ms: 0,
            codegen_ms: 0,
            audit_ms: 0,
            arming_ms: 0,
            ablation_tick_ms: 0,
            ablation_ticks: default_ablation_ticks(),
            cooldown_ms: 0,
            retract_ms: 0,
            learning_ms: 0,
            abort_hold_ms: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// OrchestratorConfig / NarrativeConfig
// ---------------------------------------------------------------------------

/// Endpoint settings for the external workflow orchestrator. Absent means
/// the simulation runs with the offline stand-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    pub base_url: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_flow_id")]
    pub flow_id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

fn default_namespace() -> String {
    "com.deeps.medical".to_string()
}

fn default_flow_id() -> String {
    "deeps_surgery_pipeline".to_string()
}

/// Endpoint settings for the narrative log generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeConfig {
    pub base_url: String,
    /// Environment variable holding the API key; the key itself never
    /// lives in the config file.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_api_key_env() -> String {
    "DEEPS_NARRATIVE_API_KEY".to_string()
}

// ---------------------------------------------------------------------------
// SimulationConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub timings: PhaseTimings,
    #[serde(default = "default_roster_size")]
    pub roster_size: usize,
    /// Replay player tick interval in milliseconds.
    #[serde(default = "default_replay_tick_ms")]
    pub replay_tick_ms: u64,
    #[serde(default)]
    pub orchestrator: Option<OrchestratorConfig>,
    #[serde(default)]
    pub narrative: Option<NarrativeConfig>,
}

fn default_roster_size() -> usize {
    15
}

fn default_replay_tick_ms() -> u64 {
    100
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            timings: PhaseTimings::default(),
            roster_size: default_roster_size(),
            replay_tick_ms: default_replay_tick_ms(),
            orchestrator: None,
            narrative: None,
        }
    }
}

impl SimulationConfig {
    /// Load from a YAML file; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        let config: SimulationConfig = serde_yaml::from_str(&data)?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = SimulationConfig::load(&dir.path().join("deeps.yaml")).unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.timings.ablation_ticks, 10);
        assert_eq!(config.roster_size, 15);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deeps.yaml");
        std::fs::write(&path, "timings:\n  ablation_tick_ms: 50\nroster_size: 3\n").unwrap();

        let config = SimulationConfig::load(&path).unwrap();
        assert_eq!(config.timings.ablation_tick_ms, 50);
        assert_eq!(config.timings.ablation_ticks, 10);
        assert_eq!(config.roster_size, 3);
        assert!(config.orchestrator.is_none());
    }

    #[test]
    fn orchestrator_section_parses() {
        let yaml = "orchestrator:\n  base_url: http://localhost:8080\n  username: admin\n";
        let config: SimulationConfig = serde_yaml::from_str(yaml).unwrap();
        let orch = config.orchestrator.unwrap();
        assert_eq!(orch.base_url, "http://localhost:8080");
        assert_eq!(orch.namespace, "com.deeps.medical");
        assert_eq!(orch.flow_id, "deeps_surgery_pipeline");
        assert_eq!(orch.username.as_deref(), Some("admin"));
        assert!(orch.password.is_none());
    }

    #[test]
    fn instant_keeps_tick_count() {
        let t = PhaseTimings::instant();
        assert_eq!(t.ablation_ticks, 10);
        assert_eq!(t.ablation_tick_ms, 0);
    }
}
