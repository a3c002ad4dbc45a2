use crate::point::Point;

/// Fixed-size population: K elite rows followed by K child rows in one
/// flat gene buffer, fitness in a parallel array. All storage is sized at
/// construction; breeding and selection reuse it for the whole solve.
pub struct Population {
    genes: Vec<Point>,
    fitness: Vec<u32>,
    perm_len: usize,
    elite: usize,
}

impl Population {
    pub fn new(elite: usize, perm_len: usize) -> Self {
        assert!(elite >= 1, "population needs at least one elite slot");
        let rows = elite * 2;
        Self {
            genes: vec![Point::new(0, 0); rows * perm_len],
            fitness: vec![u32::MAX; rows],
            perm_len,
            elite,
        }
    }

    #[inline(always)]
    pub fn elite(&self) -> usize {
        self.elite
    }

    #[inline(always)]
    pub fn rows(&self) -> usize {
        self.elite * 2
    }

    #[inline(always)]
    pub fn perm_len(&self) -> usize {
        self.perm_len
    }

    #[inline(always)]
    pub fn row(&self, i: usize) -> &[Point] {
        &self.genes[i * self.perm_len..(i + 1) * self.perm_len]
    }

    #[inline(always)]
    pub fn row_mut(&mut self, i: usize) -> &mut [Point] {
        &mut self.genes[i * self.perm_len..(i + 1) * self.perm_len]
    }

    #[inline(always)]
    pub fn fitness(&self, i: usize) -> u32 {
        self.fitness[i]
    }

    #[inline(always)]
    pub fn set_fitness(&mut self, i: usize, fitness: u32) {
        self.fitness[i] = fitness;
    }

    /// One parent row and one child slot borrowed together, for the fused
    /// copy operator.
    pub fn parent_and_child(&mut self, parent: usize, child: usize) -> (&[Point], &mut [Point]) {
        debug_assert!(parent < self.elite && child >= self.elite && child < self.rows());
        let len = self.perm_len;
        let (head, tail) = self.genes.split_at_mut(self.elite * len);
        let c = child - self.elite;
        (
            &head[parent * len..(parent + 1) * len],
            &mut tail[c * len..(c + 1) * len],
        )
    }

    /// Two parent rows and one child slot borrowed together, for the
    /// fused crossover operator. The parents may be the same row.
    pub fn parents_and_child(
        &mut self,
        a: usize,
        b: usize,
        child: usize,
    ) -> (&[Point], &[Point], &mut [Point]) {
        debug_assert!(a < self.elite && b < self.elite);
        debug_assert!(child >= self.elite && child < self.rows());
        let len = self.perm_len;
        let (head, tail) = self.genes.split_at_mut(self.elite * len);
        let c = child - self.elite;
        (
            &head[a * len..(a + 1) * len],
            &head[b * len..(b + 1) * len],
            &mut tail[c * len..(c + 1) * len],
        )
    }

    fn swap_rows(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        let len = self.perm_len;
        for k in 0..len {
            self.genes.swap(i * len + k, j * len + k);
        }
        self.fitness.swap(i, j);
    }

    /// Partially reorder rows so the `elite` lowest-fitness rows occupy
    /// the front. Quickselect: partitions are narrowed toward the elite
    /// boundary and nothing is fully sorted. Row order inside either half
    /// is arbitrary; ties fall wherever the partition leaves them, which
    /// is deterministic for a given layout.
    pub fn select_elite(&mut self) {
        let mut first = 0;
        let mut last = self.rows() - 1;
        loop {
            if first >= last {
                break;
            }
            let split = self.partition(first, last);
            if split > self.elite {
                last = split - 1;
            } else if split < self.elite {
                first = split + 1;
            } else {
                break;
            }
        }
    }

    /// Hoare partition on fitness, swapping whole rows. Returns the final
    /// pivot index.
    fn partition(&mut self, first: usize, last: usize) -> usize {
        let pivot_idx = first + (last - first) / 2;
        let pivot = self.fitness[pivot_idx];
        self.swap_rows(pivot_idx, first);

        let mut low = first + 1;
        let mut high = last;
        loop {
            while low <= high && self.fitness[low] <= pivot {
                low += 1;
            }
            while self.fitness[high] >= pivot && high >= low {
                high -= 1;
            }
            if high < low {
                break;
            }
            self.swap_rows(low, high);
        }
        self.swap_rows(first, high);
        high
    }

    /// Row index with the lowest fitness.
    pub fn best_row(&self) -> usize {
        let mut best = 0;
        for i in 1..self.rows() {
            if self.fitness[i] < self.fitness[best] {
                best = i;
            }
        }
        best
    }

    /// Elite row index with the highest fitness.
    pub fn worst_parent(&self) -> usize {
        let mut worst = 0;
        for i in 1..self.elite {
            if self.fitness[i] > self.fitness[worst] {
                worst = i;
            }
        }
        worst
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn population_with_fitness(fitness: &[u32], perm_len: usize) -> Population {
        let elite = fitness.len() / 2;
        let mut p = Population::new(elite, perm_len);
        for (i, &f) in fitness.iter().enumerate() {
            p.set_fitness(i, f);
            // Tag each row's genes with its original index so row moves
            // can be tracked.
            let tag = Point::new(i as u16, 0);
            for slot in p.row_mut(i) {
                *slot = tag;
            }
        }
        p
    }

    #[test]
    fn test_select_elite_keeps_k_lowest() {
        let mut rng = fastrand::Rng::with_seed(42);
        for _ in 0..200 {
            let rows = 16;
            let fitness: Vec<u32> = (0..rows).map(|_| rng.u32(0..50)).collect();
            let mut pop = population_with_fitness(&fitness, 3);

            pop.select_elite();

            let mut sorted = fitness.clone();
            sorted.sort();

            // The elite multiset must equal the K smallest values; which
            // tied row lands where is arbitrary.
            let mut elite: Vec<u32> = (0..pop.elite()).map(|i| pop.fitness(i)).collect();
            elite.sort();
            assert_eq!(elite, sorted[..pop.elite()]);
        }
    }

    #[test]
    fn test_rows_travel_with_their_fitness() {
        let fitness = vec![9, 3, 7, 1, 8, 2, 5, 4];
        let mut pop = population_with_fitness(&fitness, 4);
        pop.select_elite();

        for i in 0..pop.rows() {
            let tag = pop.row(i)[0].x() as usize;
            assert_eq!(
                pop.fitness(i),
                fitness[tag],
                "row {} carries fitness from a different row",
                i
            );
        }
    }

    #[test]
    fn test_parents_and_child_borrows_expected_rows() {
        let fitness = vec![1, 2, 3, 4];
        let mut pop = population_with_fitness(&fitness, 2);
        let (a, b, child) = pop.parents_and_child(0, 1, 3);
        assert_eq!(a[0].x(), 0);
        assert_eq!(b[0].x(), 1);
        child[0] = Point::new(42, 0);
        assert_eq!(pop.row(3)[0].x(), 42);
    }

    #[test]
    fn test_best_and_worst_lookup() {
        let fitness = vec![5, 2, 9, 1];
        let pop = population_with_fitness(&fitness, 1);
        assert_eq!(pop.best_row(), 3);
        assert_eq!(pop.worst_parent(), 0); // elite = rows 0..2
    }
}
