//! Core domain for the DEEPS surgical theatre simulation: patient model,
//! safety gate, session recording, the procedure sequencer, and the replay
//! engine. Rendering, report delivery, and transport to the external
//! collaborators live in the surrounding crates.

pub mod config;
pub mod error;
pub mod event;
pub mod model;
pub mod patient;
pub mod plan;
pub mod profile;
pub mod recorder;
pub mod replay;
pub mod report;
pub mod roster;
pub mod safety;
pub mod sequencer;
pub mod types;

pub use error::{DeepsError, Result};
