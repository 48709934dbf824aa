use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeepsError {
    #[error("unknown procedure kind: {0}")]
    InvalidKind(String),

    #[error("invalid patient transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("session digest mismatch: recorded {recorded}, computed {computed}")]
    DigestMismatch { recorded: String, computed: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DeepsError>;
