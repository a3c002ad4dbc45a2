use crate::error::{SolverError, SolverResult};
use crate::point::Point;
use quadrille_protocol::puzzle::Puzzle;

/// Immutable per-solve view of a puzzle board.
///
/// Besides the open-cell mask this precomputes the max-square table: for
/// every cell the side of the largest square whose top-left corner sits
/// there without touching a wall or the border. Cells where that side is
/// at least 2 form the anchor list, the point set every permutation
/// genome ranges over. Cells that can only ever hold a 1x1 are left to
/// the decoder's cleanup pass.
pub struct Grid {
    width: u16,
    height: u16,
    open: Vec<bool>,
    open_cells: u32,
    max_square: Vec<u16>,
    anchors: Vec<Point>,
}

impl Grid {
    pub fn from_puzzle(puzzle: &Puzzle) -> SolverResult<Self> {
        if puzzle.puzzle.len() != puzzle.height
            || puzzle.puzzle.iter().any(|row| row.len() != puzzle.width)
        {
            return Err(SolverError::BadGrid(format!(
                "mask does not match declared dimensions {}x{}",
                puzzle.width, puzzle.height
            )));
        }
        let rows: Vec<Vec<bool>> = puzzle
            .puzzle
            .iter()
            .map(|row| row.iter().map(|&c| c != 0).collect())
            .collect();
        Self::from_mask(&rows)
    }

    /// Build from a row-major mask, `true` = open cell.
    pub fn from_mask(rows: &[Vec<bool>]) -> SolverResult<Self> {
        let height = rows.len();
        if height == 0 {
            return Err(SolverError::BadGrid("mask has no rows".to_string()));
        }
        let width = rows[0].len();
        if width == 0 {
            return Err(SolverError::BadGrid("mask has no columns".to_string()));
        }
        if width > u16::MAX as usize || height > u16::MAX as usize {
            return Err(SolverError::BadGrid(format!(
                "dimensions {}x{} exceed the 16-bit coordinate range",
                width, height
            )));
        }
        if rows.iter().any(|row| row.len() != width) {
            return Err(SolverError::BadGrid("mask rows have uneven lengths".to_string()));
        }

        let mut open = Vec::with_capacity(width * height);
        for row in rows {
            open.extend_from_slice(row);
        }
        let open_cells = open.iter().filter(|&&c| c).count() as u32;
        if open_cells == 0 {
            return Err(SolverError::BadGrid("every cell is a wall".to_string()));
        }

        let max_square = compute_max_squares(&open, width, height);

        // Anchors are collected row-major, so the list is sorted in packed
        // point order (binary-searchable).
        let mut anchors = Vec::new();
        for y in 0..height {
            for x in 0..width {
                if max_square[y * width + x] >= 2 {
                    anchors.push(Point::new(x as u16, y as u16));
                }
            }
        }

        Ok(Self {
            width: width as u16,
            height: height as u16,
            open,
            open_cells,
            max_square,
            anchors,
        })
    }

    #[inline(always)]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[inline(always)]
    pub fn cells(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline(always)]
    pub fn is_open(&self, cell: usize) -> bool {
        self.open[cell]
    }

    #[inline(always)]
    pub fn open_cells(&self) -> u32 {
        self.open_cells
    }

    /// Side of the largest wall-free square rooted at `cell`.
    #[inline(always)]
    pub fn max_square_at(&self, cell: usize) -> u16 {
        self.max_square[cell]
    }

    pub fn anchors(&self) -> &[Point] {
        &self.anchors
    }

    #[inline(always)]
    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }
}

/// Reverse-scan dynamic program: a cell's square is one larger than the
/// smallest of its right, down, and diagonal neighbours' squares.
fn compute_max_squares(open: &[bool], width: usize, height: usize) -> Vec<u16> {
    let mut table = vec![0u16; width * height];
    for y in (0..height).rev() {
        for x in (0..width).rev() {
            let i = y * width + x;
            if !open[i] {
                continue;
            }
            table[i] = if x + 1 == width || y + 1 == height {
                1
            } else {
                let right = table[i + 1];
                let down = table[i + width];
                let diag = table[i + width + 1];
                1 + right.min(down).min(diag)
            };
        }
    }
    table
}
