//! Post-procedure document rendering.
//!
//! Plain-text records handed to the operator after a run reaches a terminal
//! state: a discharge record for completed procedures, a referral letter
//! for aborted ones. Rendering reads the learning registry so the signing
//! line always carries the model version that produced the run.

use crate::model::ModelRegistry;
use crate::patient::Patient;
use crate::recorder::Session;

const RULE: &str = "------------------------------------------------";

/// Discharge record for a successfully completed procedure.
pub fn success_record(patient: &Patient, session: &Session, registry: &ModelRegistry) -> String {
    let profile = patient.kind.profile();
    let mut lines = vec![
        "DEEPS-OS SURGICAL SUCCESS RECORD".to_string(),
        RULE.to_string(),
        format!("PATIENT: {}", patient.name),
        format!("ID: {}", patient.id),
        format!("TYPE: {} INTERVENTION", patient.kind),
        format!("TARGET: {}", patient.condition),
        RULE.to_string(),
        "METRICS:".to_string(),
        format!("- Duration: {}s", session.duration_ms() / 1000),
        format!("- Recorded events: {}", session.events().len()),
        "- Vitals: Stable".to_string(),
        String::new(),
        "POST-OP:".to_string(),
        format!(
            "- Monitor {} every 4 hours.",
            profile.metric.label()
        ),
    ];
    for drug in profile.drug_protocol {
        lines.push(format!("- {drug}"));
    }
    lines.push("- Schedule follow-up imaging in 24 hours.".to_string());
    lines.push(RULE.to_string());
    lines.push(format!(
        "SIGNED: DEEPS AI CORE ({} {})",
        registry.model_name,
        registry.version()
    ));
    lines.join("\n")
}

/// Referral letter for a run the safety gate refused.
pub fn referral_letter(patient: &Patient, reason: &str, registry: &ModelRegistry) -> String {
    [
        "DEEPS-OS REFERRAL LETTER (ABORTED)".to_string(),
        RULE.to_string(),
        format!("PATIENT: {}", patient.name),
        format!("ID: {}", patient.id),
        format!("REASON: {reason}"),
        "STATUS: URGENT REFERRAL REQUIRED".to_string(),
        RULE.to_string(),
        format!(
            "SIGNED: DEEPS AI CORE ({} {})",
            registry.model_name,
            registry.version()
        ),
    ]
    .join("\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
