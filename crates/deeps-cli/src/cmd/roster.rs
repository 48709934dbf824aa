use crate::output::{print_json, print_roster};
use deeps_core::config::SimulationConfig;
use deeps_core::patient::Patient;
use deeps_core::roster;
use deeps_core::types::ProcedureKind;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::str::FromStr;

pub fn run(
    config: &SimulationConfig,
    seed: u64,
    kind: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let kind = kind.map(ProcedureKind::from_str).transpose()?;
    let patients = roster::generate(config.roster_size, &mut StdRng::seed_from_u64(seed));
    let filtered: Vec<&Patient> = patients
        .iter()
        .filter(|p| kind.map_or(true, |k| p.kind == k))
        .collect();

    if json {
        print_json(&filtered)
    } else {
        print_roster(&filtered);
        Ok(())
    }
}
