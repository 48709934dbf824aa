//! Workflow orchestration trigger client.
//!
//! Fires the pre-op pipeline on the external orchestrator by POSTing a
//! multipart form (`patient_id`, `surgery_type`) to the flow's trigger
//! endpoint. A non-success HTTP status is a *declined* trigger, reported as
//! `TriggerOutcome::failed()`; only transport-level problems surface as
//! `Err`, and the sequencer treats both the same way (degraded continue).

use crate::error::AgentError;
use crate::Result;
use serde::Deserialize;

// ─── Configuration ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct KestraConfig {
    pub base_url: String,
    pub namespace: String,
    pub flow_id: String,
    /// Basic-auth credentials, if the orchestrator requires them.
    pub credentials: Option<(String, String)>,
}

impl Default for KestraConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            namespace: "com.deeps.medical".to_string(),
            flow_id: "deeps_surgery_pipeline".to_string(),
            credentials: None,
        }
    }
}

// ─── TriggerOutcome ───────────────────────────────────────────────────────

/// What the orchestrator said about the trigger request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerOutcome {
    pub success: bool,
    pub execution_id: Option<String>,
}

impl TriggerOutcome {
    pub fn failed() -> Self {
        Self {
            success: false,
            execution_id: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExecutionResponse {
    id: String,
}

// ─── KestraClient ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct KestraClient {
    config: KestraConfig,
    http: reqwest::Client,
}

impl KestraClient {
    pub fn new(config: KestraConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn trigger_url(&self) -> String {
        format!(
            "{}/api/v1/executions/trigger/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.namespace,
            self.config.flow_id
        )
    }

    /// Trigger the surgery pipeline for one patient.
    pub async fn trigger(&self, patient_id: &str, surgery_type: &str) -> Result<TriggerOutcome> {
        let form = reqwest::multipart::Form::new()
            .text("patient_id", patient_id.to_string())
            .text("surgery_type", surgery_type.to_string());

        let mut request = self.http.post(self.trigger_url()).multipart(form);
        if let Some((user, pass)) = &self.config.credentials {
            request = request.basic_auth(user, Some(pass));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "orchestrator declined trigger");
            return Ok(TriggerOutcome::failed());
        }

        let body = response.text().await?;
        let execution: ExecutionResponse =
            serde_json::from_str(&body).map_err(|source| AgentError::Parse { body, source })?;
        tracing::info!(execution = %execution.id, "orchestrator trigger accepted");
        Ok(TriggerOutcome {
            success: true,
            execution_id: Some(execution.id),
        })
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(server: &mockito::ServerGuard) -> KestraClient {
        KestraClient::new(KestraConfig {
            base_url: server.url(),
            credentials: Some(("admin".into(), "secret".into())),
            ..KestraConfig::default()
        })
    }

    #[tokio::test]
    async fn accepted_trigger_returns_execution_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "POST",
                "/api/v1/executions/trigger/com.deeps.medical/deeps_surgery_pipeline",
            )
            .with_status(200)
            .with_body("{\"id\": \"exec-123\"}")
            .create_async()
            .await;

        let outcome = client_for(&server)
            .trigger("PX-1001", "NEURO")
            .await
            .unwrap();
        mock.assert_async().await;
        assert!(outcome.success);
        assert_eq!(outcome.execution_id.as_deref(), Some("exec-123"));
    }

    #[tokio::test]
    async fn declined_trigger_is_a_soft_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock(
                "POST",
                "/api/v1/executions/trigger/com.deeps.medical/deeps_surgery_pipeline",
            )
            .with_status(503)
            .with_body("maintenance window")
            .create_async()
            .await;

        let outcome = client_for(&server)
            .trigger("PX-1001", "RENAL")
            .await
            .unwrap();
        assert_eq!(outcome, TriggerOutcome::failed());
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock(
                "POST",
                "/api/v1/executions/trigger/com.deeps.medical/deeps_surgery_pipeline",
            )
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = client_for(&server)
            .trigger("PX-1001", "OCULAR")
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Parse { .. }));
    }

    #[test]
    fn trigger_url_shape() {
        let client = KestraClient::new(KestraConfig {
            base_url: "http://orch:8080/".into(),
            ..KestraConfig::default()
        });
        assert_eq!(
            client.trigger_url(),
            "http://orch:8080/api/v1/executions/trigger/com.deeps.medical/deeps_surgery_pipeline"
        );
    }
}
