use crate::cmd::select_patient;
use crate::collab;
use crate::output::print_json;
use deeps_core::config::{PhaseTimings, SimulationConfig};
use deeps_core::model::ModelRegistry;
use deeps_core::replay::ReplayPlayer;
use deeps_core::roster;
use deeps_core::sequencer::{ProcedureSequencer, RunOutcome};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

pub struct Options {
    pub at: Option<u64>,
    pub anomalies: bool,
    pub follow: bool,
    pub speed: f64,
    pub fast: bool,
}

pub fn run(
    config: &SimulationConfig,
    seed: u64,
    patient_ref: &str,
    options: Options,
    json: bool,
) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(execute(config, seed, patient_ref, options, json))
}

async fn execute(
    config: &SimulationConfig,
    seed: u64,
    patient_ref: &str,
    options: Options,
    json: bool,
) -> anyhow::Result<()> {
    // Sessions do not persist across processes: record one now, then hand
    // the closed session to the player.
    let mut patients = roster::generate(config.roster_size, &mut StdRng::seed_from_u64(seed));
    let index = select_patient(&patients, patient_ref)?;
    let mut patient = patients.swap_remove(index);

    let timings = if options.fast {
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

    let summary = match sequencer.run(&mut patient, &mut registry).await? {
        RunOutcome::Rejected { status } => {
            println!("nothing to replay: patient {} is already {}", patient.id, status);
            return Ok(());
        }
        RunOutcome::Finished(summary) => summary,
    };

    let mut player = ReplayPlayer::new(summary.session, config.replay_tick_ms);

    if options.anomalies {
        let anomalies = player.anomalies();
        if json {
            return print_json(&anomalies);
        }
        if anomalies.is_empty() {
            println!("no anomalies recorded");
        } else {
            for (i, a) in anomalies.iter().enumerate() {
                println!("#{i} at {:>6}ms  {}", a.timestamp_ms, a.entry);
            }
        }
        return Ok(());
    }

    if let Some(cursor) = options.at {
        player.seek(cursor);
        let state = player.state();
        if json {
            return print_json(&state);
        }
        println!(
            "t={}ms  laser={}  target_destroyed={}  logs={}",
            player.cursor_ms(),
            state.active_laser,
            state.tumor_destroyed,
            state.logs.len()
        );
        for log in &state.logs {
            println!("  {log}");
        }
        return Ok(());
    }

    if options.follow {
        player.set_speed(options.speed);
        player.play();
        let mut interval = tokio::time::interval(Duration::from_millis(config.replay_tick_ms));
        let mut shown = 0usize;
        while !player.at_end() {
            interval.tick().await;
            player.tick();
            let state = player.state();
            for log in &state.logs[shown..] {
                println!("[{:>6}ms] {}", player.cursor_ms(), log);
            }
            shown = state.logs.len();
        }
        println!("playback finished at {}ms", player.cursor_ms());
        return Ok(());
    }

    // No flags: summarize the recording.
    let session = player.session();
    if json {
        return print_json(session);
    }
    println!(
        "session {} for {} ({}): {} events over {}ms, digest {}",
        session.id(),
        session.patient_id(),
        session.kind(),
        session.events().len(),
        session.duration_ms(),
        &session.digest()[..12]
    );
    Ok(())
}
