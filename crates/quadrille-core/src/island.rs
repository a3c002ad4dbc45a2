use crate::decoder::{self, Scratch};
use crate::grid::Grid;
use crate::ops::{copy_and_mutate, crossover_and_mutate, SplitLine};
use crate::point::Point;
use crate::population::Population;
use crate::seeds;
use crate::share::BestBoard;
use fastrand::Rng;
use quadrille_protocol::config::SearchParams;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// One independent evolutionary search over a shared grid.
///
/// An island owns its population, scratchpad, and RNG. It breeds K
/// children per generation (crossover or copy, both fused with the
/// mutation shifts), scores them with the fast-count decoder, and keeps
/// the best K of the 2K rows. The only cross-island traffic is the
/// non-blocking best-exchange at `share_interval` generation boundaries.
pub struct Island {
    grid: Arc<Grid>,
    population: Population,
    scratch: Scratch,
    rng: Rng,
    line_range: u32,
    share_interval: u64,
    generation: u64,
}

impl Island {
    pub fn new(grid: Arc<Grid>, params: &SearchParams, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(s) => Rng::with_seed(s),
            None => Rng::new(),
        };

        let mut population = Population::new(params.population_size, grid.anchor_count());
        let mut scratch = Scratch::new(&grid);

        seeds::seed_population(&grid, &mut population, &mut rng);
        for k in 0..population.elite() {
            let fitness = decoder::count(&grid, population.row(k), &mut scratch);
            population.set_fitness(k, fitness);
        }

        Self {
            grid,
            population,
            scratch,
            rng,
            line_range: params.line_coefficient_range,
            share_interval: params.share_interval,
            generation: 0,
        }
    }

    /// Breed, score, and select one generation.
    pub fn step(&mut self) {
        let elite = self.population.elite();
        for child in elite..self.population.rows() {
            let a = self.rng.usize(0..elite);
            if self.rng.bool() {
                let b = self.rng.usize(0..elite);
                let line = SplitLine::random(&mut self.rng, &self.grid, self.line_range);
                let (pa, pb, out) = self.population.parents_and_child(a, b, child);
                crossover_and_mutate(pa, pb, out, line, &mut self.rng);
            } else {
                let (pa, out) = self.population.parent_and_child(a, child);
                copy_and_mutate(pa, out, &mut self.rng);
            }

            let fitness = decoder::count(&self.grid, self.population.row(child), &mut self.scratch);
            self.population.set_fitness(child, fitness);
        }
        self.population.select_elite();
        self.generation += 1;
    }

    /// Run generations until the deadline, the stop flag, or the optional
    /// generation cap. Publishes a final best on the way out so late
    /// joiners still see this island's result on the board.
    pub fn run(
        &mut self,
        deadline: Instant,
        max_generations: Option<u64>,
        board: &BestBoard,
        stop: &AtomicBool,
    ) {
        loop {
            if stop.load(Ordering::Relaxed) || Instant::now() >= deadline {
                break;
            }
            if let Some(cap) = max_generations {
                if self.generation >= cap {
                    break;
                }
            }

            self.step();

            if self.share_interval > 0 && self.generation % self.share_interval == 0 {
                self.publish(board);
                self.adopt(board);
            }
        }
        self.publish(board);
    }

    fn publish(&self, board: &BestBoard) {
        let best = self.population.best_row();
        board.offer(self.population.fitness(best), self.population.row(best));
    }

    /// Replace the worst elite row with the board's best if it is
    /// strictly better. Board contents are permutations by construction
    /// (in-process offers) or validated at the boundary (external ones),
    /// so the copy needs no re-check.
    fn adopt(&mut self, board: &BestBoard) {
        let worst = self.population.worst_parent();
        let threshold = self.population.fitness(worst);
        if let Some(fitness) = board.copy_better_into(threshold, self.population.row_mut(worst)) {
            self.population.set_fitness(worst, fitness);
        }
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Best fitness and permutation currently held.
    pub fn best(&self) -> (u32, &[Point]) {
        let best = self.population.best_row();
        (self.population.fitness(best), self.population.row(best))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}
