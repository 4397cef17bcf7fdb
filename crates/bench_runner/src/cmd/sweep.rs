use std::path::PathBuf;
use std::time::Instant;

use battle_mdp::{Battle, SolveOptions};
use clap::Args;

use super::{load_scenario, CmdResult};

#[derive(Args, Debug)]
pub struct SweepArgs {
    /// Tolerances to solve for, comma separated
    #[arg(short, long, value_delimiter = ',', default_value = "0.5,0.192,0.05,0.001")]
    pub tolerances: Vec<f64>,

    /// Give up on a tolerance after this many sweeps
    #[arg(long)]
    pub max_sweeps: Option<u64>,

    /// JSON scenario file (default: built-in reference)
    #[arg(short, long)]
    pub scenario: Option<PathBuf>,
}

pub fn execute(args: SweepArgs) -> CmdResult {
    let scenario = load_scenario(args.scenario.as_deref())?;

    // The graph is discovered once and shared by every tolerance
    let mut battle = Battle::new(&scenario);

    println!(
        "{:>10}  {:>20}  {:>20}  {:>20}  {:>8}  {:>10}",
        "tolerance", "value", "lower", "upper", "sweeps", "time"
    );
    for &tolerance in &args.tolerances {
        let mut options = SolveOptions::new(tolerance);
        if let Some(max) = args.max_sweeps {
            options = options.max_sweeps(max);
        }

        let start = Instant::now();
        let solution = battle.evaluate_with(options)?;
        let elapsed = start.elapsed();

        println!(
            "{:>10}  {:>20}  {:>20}  {:>20}  {:>8}  {:>8.2}ms",
            tolerance,
            solution.value,
            solution.lower,
            solution.upper,
            solution.sweeps,
            elapsed.as_secs_f64() * 1e3
        );
    }
    println!("\n{} nodes", battle.graph().len());

    Ok(())
}
