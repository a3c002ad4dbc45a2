use crate::grid::Grid;
use crate::point::Point;
use quadrille_protocol::solution::Square;

/// Reusable per-island evaluation scratchpad.
///
/// Coverage is tracked with an epoch stamp: a cell is covered when its
/// stamp equals the current epoch, so clearing between evaluations is a
/// counter bump instead of a memset.
pub struct Scratch {
    stamp: Vec<u32>,
    epoch: u32,
}

impl Scratch {
    pub fn new(grid: &Grid) -> Self {
        Self {
            stamp: vec![0; grid.cells()],
            epoch: 0,
        }
    }

    #[inline]
    fn next_epoch(&mut self) -> u32 {
        if self.epoch == u32::MAX {
            self.stamp.fill(0);
            self.epoch = 0;
        }
        self.epoch += 1;
        self.epoch
    }
}

/// Count the squares the greedy decoder draws for `perm` without
/// materialising them.
///
/// Pass 1 walks the permutation and draws a maximal square at every
/// anchor that is still uncovered and can hold at least a 2x2. The 1x1
/// remainder needs no pass of its own: it is `open - covered`, one square
/// per leftover cell.
pub fn count(grid: &Grid, perm: &[Point], scratch: &mut Scratch) -> u32 {
    let width = grid.width() as usize;
    let epoch = scratch.next_epoch();
    let stamp = &mut scratch.stamp;

    let mut drawn = 0u32;
    let mut covered = 0u32;
    for &p in perm {
        let base = p.cell(width);
        if stamp[base] == epoch {
            continue;
        }
        let side = grow_square(grid, stamp, epoch, base, width);
        if side < 2 {
            continue;
        }
        cover_block(stamp, epoch, base, side, width);
        drawn += 1;
        covered += (side * side) as u32;
    }
    drawn + (grid.open_cells() - covered)
}

/// Materialise the full decomposition for `perm` into `out`: the same
/// maximal squares as [`count`], then a 1x1 for every open cell still
/// uncovered.
pub fn expand(grid: &Grid, perm: &[Point], scratch: &mut Scratch, out: &mut Vec<Square>) {
    out.clear();
    let width = grid.width() as usize;
    let epoch = scratch.next_epoch();
    let stamp = &mut scratch.stamp;

    for &p in perm {
        let base = p.cell(width);
        if stamp[base] == epoch {
            continue;
        }
        let side = grow_square(grid, stamp, epoch, base, width);
        if side < 2 {
            continue;
        }
        cover_block(stamp, epoch, base, side, width);
        out.push(Square {
            x: p.x(),
            y: p.y(),
            size: side as u16,
        });
    }

    for y in 0..grid.height() as usize {
        for x in 0..width {
            let cell = y * width + x;
            if grid.is_open(cell) && stamp[cell] != epoch {
                out.push(Square {
                    x: x as u16,
                    y: y as u16,
                    size: 1,
                });
            }
        }
    }
}

/// Largest side that fits at `base` given current coverage. Expands one
/// ring at a time: the bottom row and right column of the next candidate
/// square. Walls never intrude below the precomputed cap, so only squares
/// drawn earlier in the permutation can stop the growth.
#[inline(always)]
fn grow_square(grid: &Grid, stamp: &[u32], epoch: u32, base: usize, width: usize) -> usize {
    let cap = grid.max_square_at(base) as usize;
    let mut side = 1;
    'grow: while side < cap {
        let row = base + side * width;
        for k in 0..=side {
            if stamp[row + k] == epoch {
                break 'grow;
            }
        }
        let mut col = base + side;
        for _ in 0..side {
            if stamp[col] == epoch {
                break 'grow;
            }
            col += width;
        }
        side += 1;
    }
    side
}

#[inline(always)]
fn cover_block(stamp: &mut [u32], epoch: u32, base: usize, side: usize, width: usize) {
    let mut row = base;
    for _ in 0..side {
        stamp[row..row + side].fill(epoch);
        row += width;
    }
}
