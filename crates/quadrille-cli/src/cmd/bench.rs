use clap::Args;
use quadrille_core::{Grid, Solver, SolverResult};
use quadrille_protocol::config::SearchParams;
use quadrille_protocol::puzzle::Puzzle;
use std::path::PathBuf;
use std::process;
use std::time::Instant;
use tracing::{error, info};

#[derive(Args, Debug, Clone)]
pub struct BenchArgs {
    /// Puzzle JSON file in challenge API format
    pub file: PathBuf,

    /// Number of solves to run
    #[arg(short = 'n', long, default_value_t = 5)]
    pub count: usize,

    #[command(flatten)]
    pub params: SearchParams,
}

pub fn run(args: BenchArgs) {
    if let Err(e) = try_run(args) {
        error!("{}", e);
        process::exit(1);
    }
}

fn try_run(args: BenchArgs) -> SolverResult<()> {
    let puzzle = Puzzle::load_from_file(&args.file)?;

    let mut scores = Vec::with_capacity(args.count);
    let mut timings = Vec::with_capacity(args.count);

    for run in 0..args.count {
        let grid = Grid::from_puzzle(&puzzle)?;

        // Each run gets its own seed stream so repeats are independent
        // while the whole benchmark stays reproducible.
        let mut params = args.params;
        params.seed = args.params.seed.map(|s| s + run as u64 * 7919);

        let solver = Solver::new(grid, params)?;

        let started = Instant::now();
        let report = solver.solve();
        let elapsed = started.elapsed().as_secs_f64();

        info!(
            "run {}: score {} in {:.2}s ({} generations)",
            run + 1,
            report.score,
            elapsed,
            report.generations
        );
        scores.push(report.score as f64);
        timings.push(elapsed);
    }

    let (score_mean, score_err) = mean_and_error(&scores);
    let (time_mean, time_err) = mean_and_error(&timings);
    println!(
        "mean score {:.1} +- {:.1}, mean timing {:.2}s +- {:.2}s over {} runs",
        score_mean, score_err, time_mean, time_err, args.count
    );
    Ok(())
}

/// Mean and 90% confidence interval of the standard error.
fn mean_and_error(samples: &[f64]) -> (f64, f64) {
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>() / n;
    (mean, variance.sqrt() * 1.96 / n.sqrt())
}
