//! `deeps-agent` — native Rust clients for the DEEPS external
//! collaborators.
//!
//! The theatre core treats both collaborators as opaque async services; the
//! clients here are the real transports behind those seams:
//!
//! ```text
//! KestraClient     ← POST multipart trigger to the workflow orchestrator
//!     │               success ⇒ execution id, declined ⇒ soft failure
//!     ▼
//! TriggerOutcome
//!
//! NarrativeClient  ← per-stage prompt to the generative log endpoint,
//!     │               or offline stock-line rotation
//!     ▼
//! String (one console line)
//! ```
//!
//! Neither client knows about patients or sequencing; both speak plain
//! strings and ids so the wiring layer decides how failures degrade.

pub mod error;
pub mod kestra;
pub mod narrative;

pub use error::AgentError;
pub use kestra::{KestraClient, KestraConfig, TriggerOutcome};
pub use narrative::NarrativeClient;

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, AgentError>;
