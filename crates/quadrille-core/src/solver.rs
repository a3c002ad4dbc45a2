use crate::decoder::{self, Scratch};
use crate::error::{SolverError, SolverResult};
use crate::grid::Grid;
use crate::island::Island;
use crate::share::BestBoard;
use quadrille_protocol::config::SearchParams;
use quadrille_protocol::solution::Square;
use rayon::prelude::*;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Outcome of one solve: a complete decomposition plus its square count.
#[derive(Debug, Clone)]
pub struct SolveReport {
    pub squares: Vec<Square>,
    pub score: u32,
    pub generations: u64,
}

/// Runs a fleet of independent islands against one grid and keeps the
/// best decomposition any of them reaches before the deadline.
///
/// The grid and its max-square table are shared read-only; each island
/// owns everything mutable. Between islands the only traffic is the
/// [`BestBoard`], which is also the injection point for solutions relayed
/// from other machines (see [`Solver::inject`]).
pub struct Solver {
    grid: Arc<Grid>,
    board: Arc<BestBoard>,
    params: SearchParams,
}

impl Solver {
    pub fn new(grid: Grid, params: SearchParams) -> SolverResult<Self> {
        if params.population_size == 0 {
            return Err(SolverError::Config(
                "population_size must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            grid: Arc::new(grid),
            board: Arc::new(BestBoard::new()),
            params,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The exchange board, for an outer layer that publishes bests to or
    /// drains bests from other machines while a solve is running.
    pub fn board(&self) -> Arc<BestBoard> {
        self.board.clone()
    }

    /// Offer an externally produced permutation (packed points). Returns
    /// false if the offering is not a bijection on this grid's anchors.
    pub fn inject(&self, fitness: u32, packed: &[u32]) -> bool {
        self.board.offer_packed(&self.grid, fitness, packed)
    }

    pub fn solve(&self) -> SolveReport {
        let stop = AtomicBool::new(false);
        self.solve_with_cancel(&stop)
    }

    /// Solve until the deadline, the generation cap, or `stop` goes true.
    /// Always returns a complete decomposition: even a deadline that has
    /// already elapsed leaves the seeded population to expand.
    pub fn solve_with_cancel(&self, stop: &AtomicBool) -> SolveReport {
        let deadline = Instant::now() + Duration::from_millis(self.params.deadline_ms);

        if self.grid.anchor_count() == 0 {
            // Nothing larger than 1x1 fits anywhere, so the trivial
            // decomposition is already optimal.
            let mut scratch = Scratch::new(&self.grid);
            let mut squares = Vec::new();
            decoder::expand(&self.grid, &[], &mut scratch, &mut squares);
            return SolveReport {
                score: squares.len() as u32,
                squares,
                generations: 0,
            };
        }

        let workers = self
            .params
            .workers
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(4)
            })
            .max(1);

        info!(
            "spawning {} islands (K = {}, anchors = {}, open cells = {})",
            workers,
            self.params.population_size,
            self.grid.anchor_count(),
            self.grid.open_cells()
        );

        let mut islands: Vec<Island> = (0..workers)
            .map(|i| {
                Island::new(
                    self.grid.clone(),
                    &self.params,
                    self.params.seed.map(|s| s + i as u64),
                )
            })
            .collect();

        let board = &*self.board;
        let max_generations = self.params.max_generations;
        let run_all = |islands: &mut Vec<Island>| {
            islands
                .par_iter_mut()
                .for_each(|island| island.run(deadline, max_generations, board, stop));
        };

        match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => pool.install(|| run_all(&mut islands)),
            Err(e) => {
                warn!("thread pool unavailable ({}); running islands on the caller", e);
                run_all(&mut islands);
            }
        }

        let generations: u64 = islands.iter().map(|island| island.generation()).sum();
        let best = islands
            .iter()
            .min_by_key(|island| island.best().0)
            .expect("at least one island");
        let (fitness, perm) = best.best();

        let mut scratch = Scratch::new(&self.grid);
        let mut squares = Vec::new();
        decoder::expand(&self.grid, perm, &mut scratch, &mut squares);
        debug_assert_eq!(fitness as usize, squares.len());

        info!("best score {} after {} generations", squares.len(), generations);

        SolveReport {
            score: squares.len() as u32,
            squares,
            generations,
        }
    }
}
