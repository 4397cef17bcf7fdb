use std::path::PathBuf;
use std::time::Instant;

use battle_mdp::{solve, verify_result, Battle, MdpError, SolveOptions};
use clap::Args;
use rayon::prelude::*;
use tracing::{info, warn};

use super::{load_scenario, CmdResult};
use crate::models::{GraphInfo, ResultCheck, RunConfig, RunSummary, Timing};
use crate::utils::{get_timestamps, save_run};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Number of full solves to time
    #[arg(short, long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub loops: u64,

    /// Root interval width at which iteration stops
    #[arg(short, long, default_value_t = 0.192)]
    pub tolerance: f64,

    /// Known result for the scenario
    #[arg(long, default_value_t = 0.89873589887)]
    pub expected: f64,

    /// Largest accepted distance from `--expected`
    #[arg(long, default_value_t = 1e-6)]
    pub max_diff: f64,

    /// Run the loops on the rayon thread pool
    #[arg(short, long)]
    pub parallel: bool,

    /// JSON scenario file (default: built-in reference)
    #[arg(short, long)]
    pub scenario: Option<PathBuf>,

    /// Don't write the summary to `.bench_runs/`
    #[arg(long)]
    pub no_save: bool,
}

pub fn execute(args: RunArgs) -> CmdResult {
    let scenario = load_scenario(args.scenario.as_deref())?;
    let scenario_name = args
        .scenario
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "reference".to_string());

    info!(
        loops = args.loops,
        tolerance = args.tolerance,
        parallel = args.parallel,
        scenario = %scenario_name,
        "starting benchmark"
    );

    // Each solve builds its own memo tables, so the loops share nothing
    let start = Instant::now();
    let results: Vec<f64> = if args.parallel {
        (0..args.loops)
            .into_par_iter()
            .map(|_| solve(&scenario, args.tolerance))
            .collect::<Result<_, MdpError>>()?
    } else {
        (0..args.loops)
            .map(|_| solve(&scenario, args.tolerance))
            .collect::<Result<_, MdpError>>()?
    };
    let duration = start.elapsed();

    let value = *results.last().ok_or("no solves ran")?;
    let deterministic = results.iter().all(|r| r.to_bits() == value.to_bits());
    if !deterministic {
        warn!("solves disagreed between loops");
    }

    // One untimed solve for the graph statistics
    let mut battle = Battle::new(&scenario);
    let solution = battle.evaluate_with(SolveOptions::new(args.tolerance))?;

    let check = verify_result(value, args.expected, args.max_diff);

    let (timestamp, timestamp_human) = get_timestamps();
    let summary = RunSummary {
        timestamp: timestamp.clone(),
        timestamp_human,
        status: if check.is_ok() && deterministic {
            "SUCCESS".to_string()
        } else {
            "FAILURE".to_string()
        },
        scenario: scenario_name,
        config: RunConfig {
            loops: args.loops,
            tolerance: args.tolerance,
            parallel: args.parallel,
        },
        timing: Timing {
            total_seconds: duration.as_secs_f64(),
            per_solve_seconds: duration.as_secs_f64() / args.loops as f64,
        },
        result: ResultCheck {
            value,
            expected: args.expected,
            diff: value - args.expected,
            max_diff: args.max_diff,
            deterministic,
        },
        graph: GraphInfo {
            nodes: battle.graph().len(),
            sweeps: solution.sweeps,
            lower: solution.lower,
            upper: solution.upper,
        },
    };

    let saved = if args.no_save {
        None
    } else {
        let json = serde_json::to_string_pretty(&summary)?;
        Some(save_run(&timestamp, &json)?)
    };

    println!("\n=== Benchmark Summary ===");
    println!("Status:    {}", summary.status);
    println!("Scenario:  {}", summary.scenario);
    println!(
        "Time:      {:.3}s total, {:.2}ms per solve ({} loops{})",
        summary.timing.total_seconds,
        summary.timing.per_solve_seconds * 1e3,
        args.loops,
        if args.parallel { ", parallel" } else { "" }
    );
    println!(
        "Result:    {} (expected {}, diff {:e})",
        value, args.expected, summary.result.diff
    );
    println!(
        "Graph:     {} nodes, {} sweeps, root interval [{}, {}]",
        summary.graph.nodes, summary.graph.sweeps, summary.graph.lower, summary.graph.upper
    );
    if let Some(path) = saved {
        println!("\nFull report saved to:");
        println!("{}", path.display());
    }
    println!("=========================");

    check?;
    Ok(())
}
