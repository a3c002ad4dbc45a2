use clap::Args;
use quadrille_core::{Grid, Solver, SolverResult};
use quadrille_protocol::config::SearchParams;
use quadrille_protocol::puzzle::Puzzle;
use quadrille_protocol::solution::Solution;
use std::fs;
use std::path::PathBuf;
use std::process;
use std::time::Instant;
use tracing::{error, info};

#[derive(Args, Debug, Clone)]
pub struct SolveArgs {
    /// Puzzle JSON file in challenge API format
    pub file: PathBuf,

    #[command(flatten)]
    pub params: SearchParams,

    /// Where to write the result JSON (defaults to `<file>.result`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: SolveArgs) {
    if let Err(e) = try_run(args) {
        error!("{}", e);
        process::exit(1);
    }
}

fn try_run(args: SolveArgs) -> SolverResult<()> {
    let puzzle = Puzzle::load_from_file(&args.file)?;
    info!(
        "puzzle '{}' ({}x{}), {} ms budget",
        puzzle.id, puzzle.width, puzzle.height, args.params.deadline_ms
    );

    let grid = Grid::from_puzzle(&puzzle)?;
    let solver = Solver::new(grid, args.params)?;

    let started = Instant::now();
    let report = solver.solve();
    let elapsed = started.elapsed();

    let solution = Solution {
        id: puzzle.id,
        squares: report.squares,
    };

    let output = args.output.unwrap_or_else(|| {
        let mut raw = args.file.into_os_string();
        raw.push(".result");
        PathBuf::from(raw)
    });
    fs::write(&output, serde_json::to_string_pretty(&solution)?)?;

    info!(
        "{} squares in {:.2}s over {} generations -> {}",
        report.score,
        elapsed.as_secs_f32(),
        report.generations,
        output.display()
    );
    println!("Score: {}", report.score);
    Ok(())
}
