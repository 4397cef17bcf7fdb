use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use super::CmdResult;
use crate::models::RunSummary;
use crate::utils::{list_runs, runs_dir};

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Base run to compare against (default: the run before head)
    #[arg(short, long)]
    pub base: Option<String>,

    /// Head run to check (default: latest)
    #[arg(long, default_value = "latest")]
    pub head: String,

    /// Per-solve slowdown, in percent, reported as a regression
    #[arg(long, default_value_t = 10.0)]
    pub threshold: f64,
}

pub fn execute(args: CompareArgs) -> CmdResult {
    let dir = runs_dir()?;
    let head = load_run(&dir, &args.head)?;

    let base_name = match args.base {
        Some(base) => base,
        None => find_predecessor(&dir, &head.timestamp)?
            .ok_or("could not find a previous run to compare against")?,
    };
    let base = load_run(&dir, &base_name)?;

    println!("\n=== Benchmark Comparison ===");
    println!("  Base: {} ({})", base.timestamp, base.timestamp_human);
    println!("  Head: {} ({})", head.timestamp, head.timestamp_human);
    println!("============================");

    if base.scenario != head.scenario || base.config.tolerance != head.config.tolerance {
        println!(
            "Warning: runs differ in setup ({} @ {} vs {} @ {})",
            base.scenario, base.config.tolerance, head.scenario, head.config.tolerance
        );
    }

    let before = base.timing.per_solve_seconds;
    let after = head.timing.per_solve_seconds;
    let change = if before > 0.0 {
        (after - before) / before * 100.0
    } else {
        0.0
    };
    println!(
        "Per solve: {:.2}ms -> {:.2}ms ({:+.1}%)",
        before * 1e3,
        after * 1e3,
        change
    );

    let drift = head.result.value - base.result.value;
    println!(
        "Result:    {} -> {} (drift {:e})",
        base.result.value, head.result.value, drift
    );
    println!(
        "Graph:     {} -> {} nodes, {} -> {} sweeps",
        base.graph.nodes, head.graph.nodes, base.graph.sweeps, head.graph.sweeps
    );

    if change > args.threshold {
        println!("\nREGRESSION: per-solve time grew by more than {}%", args.threshold);
    } else if drift != 0.0 {
        println!("\nResult changed between runs.");
    } else {
        println!("\nNo regressions.");
    }

    Ok(())
}

fn run_path(dir: &Path, name: &str) -> PathBuf {
    if name.ends_with(".json") {
        dir.join(name)
    } else {
        dir.join(format!("{}.json", name))
    }
}

fn load_run(dir: &Path, name: &str) -> CmdResult<RunSummary> {
    let path = run_path(dir, name);
    let content = fs::read_to_string(&path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    Ok(serde_json::from_str(&content)?)
}

/// Latest saved run older than `timestamp`.
fn find_predecessor(dir: &Path, timestamp: &str) -> CmdResult<Option<String>> {
    let runs = list_runs(dir)?;
    let previous = runs
        .iter()
        .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .filter(|stem| stem.as_str() < timestamp)
        .last();
    Ok(previous)
}
