use crate::decoder::{self, Scratch};
use crate::error::{SolverError, SolverResult};
use crate::grid::Grid;
use crate::point::Point;
use std::sync::Mutex;
use tracing::debug;

/// Best-known solution exchanged between islands, and the entry point for
/// offerings from an outer broadcast layer.
///
/// A single slot holds the lowest-fitness permutation seen so far. All
/// island-side access is try-lock: an island that finds the slot busy
/// simply skips the exchange and carries on, so no search loop ever
/// stalls on a peer.
pub struct BestBoard {
    slot: Mutex<Option<(u32, Vec<Point>)>>,
}

impl BestBoard {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Offer a permutation produced inside this process. Keeps the slot
    /// unchanged unless `fitness` improves on it; skips silently when the
    /// slot is busy.
    pub fn offer(&self, fitness: u32, genes: &[Point]) {
        let Ok(mut slot) = self.slot.try_lock() else {
            return;
        };
        match slot.as_mut() {
            Some((best, _)) if *best <= fitness => {}
            Some((best, stored)) => {
                *best = fitness;
                stored.clear();
                stored.extend_from_slice(genes);
            }
            None => *slot = Some((fitness, genes.to_vec())),
        }
    }

    /// Copy the stored permutation into `dst` if it beats `threshold` and
    /// has the right length. Returns its fitness on success.
    pub fn copy_better_into(&self, threshold: u32, dst: &mut [Point]) -> Option<u32> {
        let slot = self.slot.try_lock().ok()?;
        match slot.as_ref() {
            Some((fitness, genes)) if *fitness < threshold && genes.len() == dst.len() => {
                dst.copy_from_slice(genes);
                Some(*fitness)
            }
            _ => None,
        }
    }

    /// Accept an externally produced permutation, e.g. relayed from
    /// another machine. Unlike in-process offers these are untrusted: an
    /// offering that is not a bijection on the grid's anchor set is
    /// dropped, and the score is recomputed rather than taken from the
    /// claim.
    pub fn offer_packed(&self, grid: &Grid, claimed: u32, packed: &[u32]) -> bool {
        let genes = match validate_offering(grid, packed) {
            Ok(genes) => genes,
            Err(e) => {
                debug!("dropping peer offering: {}", e);
                return false;
            }
        };

        let mut scratch = Scratch::new(grid);
        let fitness = decoder::count(grid, &genes, &mut scratch);
        if fitness != claimed {
            debug!(
                "peer solution claims score {} but decodes to {}; keeping the recomputed score",
                claimed, fitness
            );
        }
        self.offer(fitness, &genes);
        true
    }

    /// Current best as (fitness, packed points), for outward publication.
    pub fn peek_packed(&self) -> Option<(u32, Vec<u32>)> {
        let slot = self.slot.try_lock().ok()?;
        slot.as_ref()
            .map(|(fitness, genes)| (*fitness, genes.iter().map(|p| p.packed()).collect()))
    }
}

impl Default for BestBoard {
    fn default() -> Self {
        Self::new()
    }
}

/// Check that a packed offering is exactly a bijection on the grid's
/// anchor set.
fn validate_offering(grid: &Grid, packed: &[u32]) -> SolverResult<Vec<Point>> {
    if packed.len() != grid.anchor_count() {
        return Err(SolverError::PeerInjectInvalid(format!(
            "length {} does not match {} anchors",
            packed.len(),
            grid.anchor_count()
        )));
    }
    let mut seen = vec![false; grid.anchor_count()];
    for &raw in packed {
        let p = Point::from_packed(raw);
        match grid.anchors().binary_search(&p) {
            Ok(i) if !seen[i] => seen[i] = true,
            _ => {
                return Err(SolverError::PeerInjectInvalid(
                    "not a permutation of the anchor set".to_string(),
                ));
            }
        }
    }
    Ok(packed.iter().copied().map(Point::from_packed).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid(width: usize, height: usize) -> Grid {
        Grid::from_mask(&vec![vec![true; width]; height]).unwrap()
    }

    #[test]
    fn test_offer_keeps_the_best() {
        let g = open_grid(3, 3);
        let board = BestBoard::new();
        let perm = g.anchors().to_vec();

        board.offer(10, &perm);
        board.offer(20, &perm);
        assert_eq!(board.peek_packed().unwrap().0, 10);

        board.offer(5, &perm);
        assert_eq!(board.peek_packed().unwrap().0, 5);
    }

    #[test]
    fn test_copy_better_into_respects_threshold() {
        let g = open_grid(3, 3);
        let board = BestBoard::new();
        let perm = g.anchors().to_vec();
        board.offer(10, &perm);

        let mut dst = vec![Point::new(0, 0); perm.len()];
        assert_eq!(board.copy_better_into(10, &mut dst), None);
        assert_eq!(board.copy_better_into(11, &mut dst), Some(10));
        assert_eq!(dst, perm);
    }

    #[test]
    fn test_offer_packed_validates_bijection() {
        let g = open_grid(4, 4);
        let board = BestBoard::new();
        let valid: Vec<u32> = g.anchors().iter().map(|p| p.packed()).collect();

        // Wrong length
        assert!(!board.offer_packed(&g, 1, &valid[1..]));

        // Duplicate entry
        let mut dup = valid.clone();
        dup[0] = dup[1];
        assert!(!board.offer_packed(&g, 1, &dup));

        // A point outside the anchor set
        let mut foreign = valid.clone();
        foreign[0] = Point::new(3, 3).packed(); // bottom-right corner, N = 1
        assert!(!board.offer_packed(&g, 1, &foreign));

        // Accepted, but the claimed score is replaced with the real one:
        // the row-major ordering covers the open 4x4 with a single square.
        assert!(board.offer_packed(&g, 7, &valid));
        assert_eq!(board.peek_packed().unwrap().0, 1);
    }

    #[test]
    fn test_invalid_offerings_fail_with_typed_errors() {
        let g = open_grid(4, 4);

        let err = validate_offering(&g, &[]).unwrap_err();
        assert!(matches!(err, SolverError::PeerInjectInvalid(_)));
        assert!(err.to_string().contains("anchors"), "unexpected message: {}", err);

        let mut dup: Vec<u32> = g.anchors().iter().map(|p| p.packed()).collect();
        dup[0] = dup[1];
        let err = validate_offering(&g, &dup).unwrap_err();
        assert!(matches!(err, SolverError::PeerInjectInvalid(_)));
    }
}
