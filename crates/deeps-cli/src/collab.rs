//! Wiring between the core collaborator traits and the transport clients.
//!
//! The core never names a transport; this module decides, from the loaded
//! config and environment, whether a run talks to real endpoints or to the
//! offline stand-ins.

use deeps_agent::{KestraClient, KestraConfig, NarrativeClient};
use deeps_core::config::SimulationConfig;
use deeps_core::sequencer::{Narrator, NarrativeStage, TriggerOutcome, WorkflowTrigger};
use deeps_core::types::ProcedureKind;

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Workflow-trigger implementation selected at startup.
pub enum Orchestrator {
    /// No orchestrator configured: accept every trigger locally.
    Offline,
    Kestra(KestraClient),
}

pub fn orchestrator_from(config: &SimulationConfig) -> Orchestrator {
    match &config.orchestrator {
        Some(cfg) => Orchestrator::Kestra(KestraClient::new(KestraConfig {
            base_url: cfg.base_url.clone(),
            namespace: cfg.namespace.clone(),
            flow_id: cfg.flow_id.clone(),
            credentials: cfg.username.clone().zip(cfg.password.clone()),
        })),
        None => Orchestrator::Offline,
    }
}

impl WorkflowTrigger for Orchestrator {
    async fn trigger(
        &self,
        patient_id: &str,
        kind: ProcedureKind,
    ) -> anyhow::Result<TriggerOutcome> {
        match self {
            Orchestrator::Offline => Ok(TriggerOutcome {
                success: true,
                execution_id: Some("MOCK-EXEC-99".to_string()),
            }),
            Orchestrator::Kestra(client) => {
                let outcome = client.trigger(patient_id, kind.as_str()).await?;
                Ok(TriggerOutcome {
                    success: outcome.success,
                    execution_id: outcome.execution_id,
                })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Narrative
// ---------------------------------------------------------------------------

pub struct Narrative(NarrativeClient);

pub fn narrator_from(config: &SimulationConfig) -> Narrative {
    match &config.narrative {
        Some(cfg) => match std::env::var(&cfg.api_key_env) {
            Ok(key) if !key.is_empty() => {
                Narrative(NarrativeClient::remote(cfg.base_url.clone(), key))
            }
            _ => {
                tracing::warn!(
                    env = %cfg.api_key_env,
                    "narrative API key not set; using offline lines"
                );
                Narrative(NarrativeClient::offline())
            }
        },
        None => Narrative(NarrativeClient::offline()),
    }
}

impl Narrator for Narrative {
    async fn narrate(&self, stage: NarrativeStage, context: &str) -> anyhow::Result<String> {
        Ok(self.0.generate(stage.as_str(), context).await?)
    }
}
