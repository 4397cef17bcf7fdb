//! Benchmark driver for the battle solver.
//!
//! Repeats the full solve, checks the result against a known value, and
//! records timings. Results are saved to `.bench_runs/` with versioning.
//!
//! Usage:
//!   cargo run --release -p bench_runner -- run
//!   cargo run --release -p bench_runner -- run --loops 50 --parallel
//!   cargo run --release -p bench_runner -- sweep --tolerances 0.5,0.192,0.05
//!   cargo run --release -p bench_runner -- compare

mod cmd;
mod models;
mod utils;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use cmd::{compare, run, sweep};

#[derive(Parser)]
#[command(name = "bench_runner")]
struct Cli {
    /// Log solver milestones (graph size, sweeps)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Time repeated solves and verify the result
    Run(run::RunArgs),

    /// Solve once per tolerance and report convergence
    Sweep(sweep::SweepArgs),

    /// Compare timings between saved runs
    Compare(compare::CompareArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[bench_runner] failed to install logger: {}", e);
    }

    let result = match cli.command {
        Some(Commands::Run(args)) => run::execute(args),
        Some(Commands::Sweep(args)) => sweep::execute(args),
        Some(Commands::Compare(args)) => compare::execute(args),
        None => {
            // Require explicit subcommand to avoid flag ambiguity at the root.
            use clap::CommandFactory;
            Cli::command().print_help().map_err(Into::into)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[bench_runner] {}", e);
            ExitCode::FAILURE
        }
    }
}
