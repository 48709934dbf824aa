mod cmd;
mod collab;
mod output;

use anyhow::Context;
use clap::{Parser, Subcommand};
use deeps_core::config::SimulationConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "deeps",
    about = "DEEPS surgical theatre simulation — run scripted procedures, record sessions, replay them",
    version,
    propagate_version = true
)]
struct Cli {
    /// Simulation config file (YAML; defaults apply if absent)
    #[arg(long, global = true, env = "DEEPS_CONFIG")]
    config: Option<PathBuf>,

    /// Roster generation seed
    #[arg(long, global = true, default_value_t = 42)]
    seed: u64,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the admission roster
    Roster {
        /// Filter by procedure kind (NEURO, OCULAR, RENAL)
        #[arg(long)]
        kind: Option<String>,
    },

    /// Run the procedure for one patient
    Run {
        /// Patient id (PX-xxxx) or roster index
        patient: String,

        /// Skip the simulated phase delays
        #[arg(long)]
        fast: bool,
    },

    /// Record a procedure, then inspect or play back its session
    Replay {
        /// Patient id (PX-xxxx) or roster index
        patient: String,

        /// Reconstruct state at this cursor, in ms from session start
        #[arg(long)]
        at: Option<u64>,

        /// List flagged log events
        #[arg(long)]
        anomalies: bool,

        /// Play the recording against the wall clock
        #[arg(long)]
        follow: bool,

        /// Playback speed multiplier for --follow
        #[arg(long, default_value_t = 1.0)]
        speed: f64,

        /// Record with zero phase delays before replaying
        #[arg(long)]
        fast: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Run { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let config_path = cli
        .config
        .unwrap_or_else(|| PathBuf::from("deeps.yaml"));

    let result = (|| {
        let config = SimulationConfig::load(&config_path)
            .with_context(|| format!("failed to load config {}", config_path.display()))?;

        match cli.command {
            Commands::Roster { kind } => {
                cmd::roster::run(&config, cli.seed, kind.as_deref(), cli.json)
            }
            Commands::Run { patient, fast } => {
                cmd::run::run(&config, cli.seed, &patient, fast, cli.json)
            }
            Commands::Replay {
                patient,
                at,
                anomalies,
                follow,
                speed,
                fast,
            } => cmd::replay::run(
                &config,
                cli.seed,
                &patient,
                cmd::replay::Options {
                    at,
                    anomalies,
                    follow,
                    speed,
                    fast,
                },
                cli.json,
            ),
        }
    })();

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
