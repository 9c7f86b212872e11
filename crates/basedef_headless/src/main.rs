//! Headless base-defence runner.
//!
//! Runs the simulation core without graphics: scripted scenarios in,
//! JSON reports out. Intended for CI, balance experiments, and
//! determinism checks.
//!
//! # Usage
//!
//! ```bash
//! # Run the built-in sandbox scenario
//! cargo run -p basedef_headless -- run
//!
//! # Run a scenario file
//! cargo run -p basedef_headless -- run --scenario scenarios/harvest_loop.ron
//!
//! # Generate a map and write it as a legacy grid save
//! cargo run -p basedef_headless -- generate --output map.txt --seed 99
//!
//! # Verify determinism by replaying the same scenario several times
//! cargo run -p basedef_headless -- verify --runs 5
//! ```
//!
//! Reports go to stdout; logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use basedef_core::prelude::{generate_deposits, DepositKind, GenerationConfig};
use basedef_core::save;
use basedef_headless::runner::HeadlessRunner;
use basedef_headless::scenario::Scenario;

#[derive(Parser)]
#[command(name = "basedef_headless")]
#[command(about = "Headless base-defence simulation runner")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario and print its report as JSON
    Run {
        /// Scenario RON file (built-in sandbox when omitted)
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Override the scenario's map seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Generate a deposit map and write it as a legacy grid save
    Generate {
        /// Output path for the grid file
        #[arg(short, long)]
        output: PathBuf,

        /// Map seed
        #[arg(long, default_value = "12345")]
        seed: u64,

        /// Deposit counts as trees,gold,iron
        #[arg(long, value_delimiter = ',', num_args = 3)]
        counts: Option<Vec<u32>>,
    },

    /// Verify determinism by running the same scenario multiple times
    Verify {
        /// Scenario RON file (built-in sandbox when omitted)
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Number of verification runs
        #[arg(short, long, default_value = "5")]
        runs: u32,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs to stderr; stdout carries the report.
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    match cli.command {
        Some(Commands::Run { scenario, seed }) => cmd_run(scenario, seed),
        Some(Commands::Generate {
            output,
            seed,
            counts,
        }) => cmd_generate(output, seed, counts),
        Some(Commands::Verify { scenario, runs }) => cmd_verify(scenario, runs),
        None => cmd_run(None, None),
    }
}

fn load_scenario(path: Option<PathBuf>) -> Result<Scenario, ExitCode> {
    match path {
        Some(path) => Scenario::load(&path).map_err(|err| {
            tracing::error!(path = %path.display(), %err, "failed to load scenario");
            ExitCode::FAILURE
        }),
        None => Ok(Scenario::sandbox()),
    }
}

/// Run one scenario and print the JSON report.
fn cmd_run(scenario: Option<PathBuf>, seed: Option<u64>) -> ExitCode {
    let mut scenario = match load_scenario(scenario) {
        Ok(scenario) => scenario,
        Err(code) => return code,
    };
    if let Some(seed) = seed {
        scenario.generation.seed = seed;
    }

    let report = HeadlessRunner::new(&scenario).run(&scenario);

    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(%err, "failed to serialize report");
            ExitCode::FAILURE
        }
    }
}

/// Generate a deposit map and save it in the legacy grid format.
fn cmd_generate(output: PathBuf, seed: u64, counts: Option<Vec<u32>>) -> ExitCode {
    let mut config = GenerationConfig::new_game().with_seed(seed);
    if let Some(counts) = counts {
        config.trees = counts[0];
        config.gold = counts[1];
        config.iron = counts[2];
    }

    let grid = generate_deposits(&config);
    tracing::info!(
        seed = config.seed,
        trees = grid.count_deposits(DepositKind::Tree),
        gold = grid.count_deposits(DepositKind::Gold),
        iron = grid.count_deposits(DepositKind::Iron),
        "map generated"
    );

    match save::save_grid_file(&grid, &output) {
        Ok(()) => {
            tracing::info!(path = %output.display(), "grid saved");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(%err, "failed to save grid");
            ExitCode::FAILURE
        }
    }
}

/// Run the same scenario repeatedly and compare end-state hashes.
fn cmd_verify(scenario: Option<PathBuf>, runs: u32) -> ExitCode {
    let scenario = match load_scenario(scenario) {
        Ok(scenario) => scenario,
        Err(code) => return code,
    };

    let mut baseline: Option<u64> = None;
    for run in 0..runs {
        let hash = HeadlessRunner::new(&scenario).run_for_hash(&scenario);
        match baseline {
            None => {
                baseline = Some(hash);
                tracing::info!(run, hash, "baseline hash");
            }
            Some(expected) if expected == hash => {
                tracing::info!(run, hash, "hash matches");
            }
            Some(expected) => {
                tracing::error!(run, expected, actual = hash, "determinism violation");
                return ExitCode::FAILURE;
            }
        }
    }

    println!("deterministic: {runs} identical runs");
    ExitCode::SUCCESS
}
