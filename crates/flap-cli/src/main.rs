//! Headless driver for the flap side-scroller simulation.

mod commands;
mod frames;
mod policy;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "flap",
    about = "Evolve side-scroller policies against a headless simulation",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate generations of linear policies and report their fitness
    Run {
        /// Agents per generation
        #[arg(short, long, default_value = "20")]
        population: usize,

        /// Number of generations to evaluate
        #[arg(short, long, default_value = "5")]
        generations: u32,

        /// RNG seed for the course and the policy weights
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Stop each generation after this many ticks
        #[arg(long, default_value = "3000")]
        max_ticks: u64,

        /// Write per-tick snapshots of the last generation as JSON lines
        #[arg(long)]
        frames: Option<PathBuf>,

        /// Print the generation summaries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the simulation configuration as JSON
    Config {
        /// Override the RNG seed
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            population,
            generations,
            seed,
            max_ticks,
            frames,
            json,
        } => commands::run::run(&commands::run::RunOptions {
            population,
            generations,
            seed,
            max_ticks,
            frames,
            json,
        }),
        Commands::Config { seed } => commands::config::run(seed),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}
