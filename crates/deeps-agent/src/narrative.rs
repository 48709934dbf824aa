//! Narrative log-line generation client.
//!
//! Each sequencer stage asks for one short technical console line. With a
//! remote endpoint configured the line comes from the generative model;
//! without one the client runs offline and rotates through stock lines.
//! Remote failures are returned as errors so the caller can substitute its
//! own degraded-link message.

use crate::error::AgentError;
use crate::Result;
use serde::Deserialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Stock lines used in offline mode, rotated per request.
const OFFLINE_LINES: &[&str] = &[
    "Analyzing cortical surface density...",
    "Detecting anomalous voxel cluster at vector [12, 4, 9]...",
    "Oumi RL model converging: 99.8% confidence...",
    "Cline generating Python script for robotic arm...",
];

/// Per-stage prompt sent to the generative endpoint.
fn prompt_for(stage: &str) -> &'static str {
    match stage {
        "SCANNING" => {
            "Generate a short, highly technical medical log line about scanning a \
             volumetric organ image. Use terms like 'voxel' and 'cortex'. Max 10 words."
        }
        "PLANNING" => {
            "Generate a technical log line about a reinforcement-learning agent \
             calculating a surgical path. Use terms like 'gradient descent' and \
             'collision avoidance'. Max 10 words."
        }
        "CODING" => {
            "Generate a log line about an autonomous coding agent writing robot \
             control scripts. Use terms like 'runtime' and 'unit test'. Max 10 words."
        }
        "ABLATING" => {
            "Generate a dramatic log line about a laser destroying a target mass. \
             Use terms like 'thermal ablation' and 'target neutralized'. Max 10 words."
        }
        _ => "Generate a short technical medical log line. Max 10 words.",
    }
}

// ─── NarrativeClient ──────────────────────────────────────────────────────

#[derive(Debug)]
enum Mode {
    Offline { cursor: AtomicUsize },
    Remote {
        http: reqwest::Client,
        base_url: String,
        api_key: String,
    },
}

/// Client for the narrative generator collaborator.
#[derive(Debug)]
pub struct NarrativeClient {
    mode: Mode,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    text: String,
}

impl NarrativeClient {
    /// Offline client: never touches the network, always succeeds.
    pub fn offline() -> Self {
        Self {
            mode: Mode::Offline {
                cursor: AtomicUsize::new(0),
            },
        }
    }

    /// Remote client against a generative endpoint.
    pub fn remote(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            mode: Mode::Remote {
                http: reqwest::Client::new(),
                base_url: base_url.into(),
                api_key: api_key.into(),
            },
        }
    }

    /// Produce one console line for `stage`.
    pub async fn generate(&self, stage: &str, context: &str) -> Result<String> {
        match &self.mode {
            Mode::Offline { cursor } => {
                let i = cursor.fetch_add(1, Ordering::Relaxed);
                Ok(OFFLINE_LINES[i % OFFLINE_LINES.len()].to_string())
            }
            Mode::Remote {
                http,
                base_url,
                api_key,
            } => {
                let url = format!("{}/v1/generate", base_url.trim_end_matches('/'));
                let response = http
                    .post(url)
                    .bearer_auth(api_key)
                    .json(&serde_json::json!({
                        "prompt": prompt_for(stage),
                        "context": context,
                    }))
                    .send()
                    .await?;

                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(AgentError::Status {
                        status: status.as_u16(),
                        body,
                    });
                }

                let body = response.text().await?;
                let generated: GenerateResponse = serde_json::from_str(&body)
                    .map_err(|source| AgentError::Parse { body, source })?;
                Ok(generated.text)
            }
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
