//! parsort benchmark entry point.
//!
//! Usage:
//!   parsort-bench                          # 2,000,000 elements, 8 workers
//!   parsort-bench --n=500000 --workers=4   # custom size and pool
//!   parsort-bench --seed=42                # reproducible input
//!
//! Sorts a random array through the coordinator/worker scheduler,
//! times it against the standard-library sort on the same input, and
//! verifies the two agree.

use std::env;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio::runtime::Runtime;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use parsort_kernel::{run_sort, SortOptions};

struct BenchArgs {
    n: usize,
    workers: usize,
    seed: Option<u64>,
}

fn main() -> ExitCode {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = parse_args()?;
    let Some(args) = args else {
        print_help();
        return Ok(ExitCode::SUCCESS);
    };

    tracing::debug!(n = args.n, workers = args.workers, seed = ?args.seed, "starting benchmark");

    if let Some(seed) = args.seed {
        fastrand::seed(seed);
    }
    let data: Vec<i64> = (0..args.n).map(|_| fastrand::i64(0..args.n.max(1) as i64)).collect();

    // Reference: standard-library sort on a copy of the same input.
    let mut reference = data.clone();
    let start = Instant::now();
    reference.sort_unstable();
    let t_reference = start.elapsed();

    let runtime = Runtime::new().context("Failed to create tokio runtime")?;
    let options = SortOptions {
        workers: args.workers,
    };
    let start = Instant::now();
    let report = runtime
        .block_on(run_sort(data, &options))
        .context("distributed sort failed")?;
    let t_parallel = start.elapsed();

    println!("array size:     {}", args.n);
    println!("workers:        {}", args.workers);
    println!("std sort:       {}", human_time(t_reference));
    println!("parsort:        {}", human_time(t_parallel));
    println!(
        "tasks:          {} sort, {} merge over {} levels (peak busy {})",
        report.stats.sort_tasks,
        report.stats.merge_tasks,
        report.stats.levels,
        report.stats.max_busy
    );

    if report.sorted == reference {
        println!("result matches the reference sort");
        Ok(ExitCode::SUCCESS)
    } else if !parsort_kernel::sort::is_sorted(&report.sorted) {
        eprintln!("MISMATCH: output is not in sorted order");
        Ok(ExitCode::FAILURE)
    } else {
        eprintln!("MISMATCH: output is ordered but is not a permutation of the input");
        Ok(ExitCode::FAILURE)
    }
}

/// Parse arguments. `Ok(None)` means help was requested.
fn parse_args() -> Result<Option<BenchArgs>> {
    let mut args = BenchArgs {
        n: 2_000_000,
        workers: 8,
        seed: None,
    };

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => return Ok(None),
            _ if arg.starts_with("--n=") => {
                args.n = arg["--n=".len()..]
                    .parse()
                    .with_context(|| format!("invalid --n value in '{arg}'"))?;
            }
            _ if arg.starts_with("--workers=") => {
                args.workers = arg["--workers=".len()..]
                    .parse()
                    .with_context(|| format!("invalid --workers value in '{arg}'"))?;
            }
            _ if arg.starts_with("--seed=") => {
                args.seed = Some(
                    arg["--seed=".len()..]
                        .parse()
                        .with_context(|| format!("invalid --seed value in '{arg}'"))?,
                );
            }
            unknown => {
                anyhow::bail!("unknown option: {unknown} (run with --help for usage)");
            }
        }
    }

    Ok(Some(args))
}

fn print_help() {
    println!(
        r#"parsort-bench v{}

Usage:
  parsort-bench [OPTIONS]

Options:
  --n=<count>        Number of random elements to sort (default: 2000000)
  --workers=<count>  Worker pool size, 0 sorts locally (default: 8)
  --seed=<seed>      Seed the input generator for reproducible runs
  -h, --help         Show this help
"#,
        env!("CARGO_PKG_VERSION")
    );
}

fn human_time(duration: Duration) -> String {
    let mut t = duration.as_nanos() as f64;
    if t < 1000.0 {
        return format!("{:.1}ns", t);
    }
    t /= 1000.0;
    if t < 1000.0 {
        return format!("{:.1}us", t);
    }
    t /= 1000.0;
    if t < 1000.0 {
        return format!("{:.1}ms", t);
    }
    t /= 1000.0;
    format!("{:.1}s", t)
}
