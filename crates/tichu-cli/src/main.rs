use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use tichu_bot::{HeuristicPolicy, Policy};
use tichu_cli::config::SimulationConfig;
use tichu_cli::interactive::InteractivePolicy;
use tichu_cli::logging::init_logging;
use tichu_cli::runner::SimulationRunner;
use tichu_cli::session::{MatchSession, SeatDriver};

/// Tichu at the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "tichu",
    author,
    version,
    about = "Tichu match runner: play against bots or batch-simulate them"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play one match from the North seat against three bots.
    Play {
        /// Seed for the deal sequence; random when omitted.
        #[arg(long, value_name = "SEED")]
        seed: Option<u64>,

        /// Strength of the three computer seats.
        #[arg(long, value_enum, default_value_t = Difficulty::Normal)]
        difficulty: Difficulty,

        /// Points a partnership needs to take the match.
        #[arg(long, value_name = "POINTS", default_value_t = 1000)]
        target: i32,
    },
    /// Run a configured batch of bot matches, streaming JSONL round rows.
    Simulate {
        /// Path to the YAML configuration file.
        #[arg(short, long, value_name = "FILE", default_value = "sim/sim.yaml")]
        config: PathBuf,

        /// Override the run identifier (substitutes {run_id} templates).
        #[arg(long, value_name = "RUN_ID")]
        run_id: Option<String>,

        /// Override the number of matches to play.
        #[arg(long, value_name = "COUNT")]
        matches: Option<usize>,

        /// Override the RNG seed for match generation.
        #[arg(long, value_name = "SEED")]
        seed: Option<u64>,

        /// Exit after validating the configuration (no simulation is run).
        #[arg(long)]
        validate_only: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Difficulty {
    Easy,
    Normal,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Play {
            seed,
            difficulty,
            target,
        } => play(seed, difficulty, target),
        Command::Simulate {
            config,
            run_id,
            matches,
            seed,
            validate_only,
        } => simulate(config, run_id, matches, seed, validate_only),
    }
}

fn play(seed: Option<u64>, difficulty: Difficulty, target: i32) -> anyhow::Result<()> {
    let seed = seed.unwrap_or_else(rand::random);

    let bot = || -> Box<dyn Policy> {
        match difficulty {
            Difficulty::Easy => Box::new(HeuristicPolicy::easy()),
            Difficulty::Normal => Box::new(HeuristicPolicy::normal()),
        }
    };

    let seats = [
        SeatDriver::new("you", Box::new(InteractivePolicy::stdio())),
        SeatDriver::new("bot_east", bot()),
        SeatDriver::new("bot_south", bot()),
        SeatDriver::new("bot_west", bot()),
    ];

    println!("Tichu to {target} points. You sit North; South is your partner.");
    println!("Seed {seed} replays this match.");

    let mut session = MatchSession::new(seed, target, seats);
    let outcome = session.run()?;

    println!();
    println!(
        "Final score: North/South {}, East/West {}.",
        outcome.final_scores[0], outcome.final_scores[1]
    );
    println!("{} take the match.", outcome.winner);

    Ok(())
}

fn simulate(
    config_path: PathBuf,
    run_id: Option<String>,
    matches: Option<usize>,
    seed: Option<u64>,
    validate_only: bool,
) -> anyhow::Result<()> {
    let mut config = SimulationConfig::from_path(&config_path)?;

    if let Some(run_id) = run_id {
        config.run_id = run_id;
    }

    if let Some(matches) = matches {
        config.matches.count = matches;
    }

    if let Some(seed) = seed {
        config.matches.seed = Some(seed);
    }

    config.validate()?;

    let outputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let matches = config.matches.count;
    let target = config.matches.target;

    println!(
        "Loaded configuration '{run_id}' ({matches} match{}, first to {target} points)",
        if matches == 1 { "" } else { "es" }
    );

    let logging_guard = init_logging(&config.logging, &outputs)?;

    if validate_only {
        println!("Validation-only mode: simulation skipped.");
        return Ok(());
    }

    let runner = SimulationRunner::new(config, outputs);
    let summary = runner.run()?;

    println!(
        "Simulation complete for '{run_id}': {} matches, {} rounds → {} rows at {}",
        summary.matches_played,
        summary.rounds_played,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    println!(
        "Wins: North/South {} vs East/West {}",
        summary.wins[0], summary.wins[1]
    );
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    Ok(())
}
