use crate::cmd::select_patient;
use crate::collab;
use crate::output::print_json;
use deeps_core::config::{PhaseTimings, SimulationConfig};
use deeps_core::model::ModelRegistry;
use deeps_core::replay;
use deeps_core::report;
use deeps_core::roster;
use deeps_core::sequencer::{ProcedureSequencer, RunOutcome, SequencerState};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub fn run(
    config: &SimulationConfig,
    seed: u64,
    patient_ref: &str,
    fast: bool,
    json: bool,
) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(execute(config, seed, patient_ref, fast, json))
}

async fn execute(
    config: &SimulationConfig,
    seed: u64,
    patient_ref: &str,
    fast: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut patients = roster::generate(config.roster_size, &mut StdRng::seed_from_u64(seed));
    let index = select_patient(&patients, patient_ref)?;
    let mut patient = patients.swap_remove(index);

    let timings = if fast {
        PhaseTimings::instant()
    } else {
        config.timings.clone()
    };
    let sequencer = ProcedureSequencer::new(
        timings,
        collab::orchestrator_from(config),
        collab::narrator_from(config),
    );
    let mut registry = ModelRegistry::new();

    match sequencer.run(&mut patient, &mut registry).await? {
        RunOutcome::Rejected { status } => {
            println!("procedure refused: patient {} is already {}", patient.id, status);
        }
        RunOutcome::Finished(summary) => {
            if json {
                return print_json(&summary);
            }
            println!();
            match summary.terminal {
                SequencerState::Completed => {
                    println!("{}", report::success_record(&patient, &summary.session, &registry));
                }
                SequencerState::Aborted => {
                    let reason = summary.abort_reason.as_deref().unwrap_or("UNSPECIFIED");
                    println!("{}", report::referral_letter(&patient, reason, &registry));
                }
                other => println!("run ended in unexpected state {other}"),
            }

            let anomalies = replay::anomalies(&summary.session);
            if !anomalies.is_empty() {
                println!(
                    "\n{} anomaly marker(s) recorded; inspect with 'deeps replay {} --anomalies'",
                    anomalies.len(),
                    patient.id
                );
            }
        }
    }
    Ok(())
}
