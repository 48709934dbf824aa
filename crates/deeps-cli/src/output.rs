use deeps_core::patient::Patient;
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Fixed-width roster listing, one admission per line.
pub fn print_roster(patients: &[&Patient]) {
    println!(
        "{:<8} {:<7} {:<18} {:<7} {:<20} {:<9} {:<10}",
        "ID", "TIME", "NAME", "KIND", "CONDITION", "RISK", "STATUS"
    );
    for p in patients {
        println!(
            "{:<8} {:<7} {:<18} {:<7} {:<20} {:<9} {:<10}",
            p.id,
            p.scheduled_time,
            p.name,
            p.kind.as_str(),
            p.condition,
            p.risk.as_str(),
            p.status.as_str()
        );
    }
    println!("{} admission(s)", patients.len());
}
