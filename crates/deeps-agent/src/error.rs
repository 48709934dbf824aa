use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse collaborator response: {source}\n  body: {body}")]
    Parse {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Collaborator returned status {status}: {body}")]
    Status { status: u16, body: String },
}
