use quadrille_core::protocol::config::SearchParams;
use quadrille_core::protocol::solution::Square;
use quadrille_core::{Grid, Solver};
use rstest::rstest;

fn grid(pattern: &[&str]) -> Grid {
    let rows: Vec<Vec<bool>> = pattern
        .iter()
        .map(|row| row.chars().map(|c| c == '.').collect())
        .collect();
    Grid::from_mask(&rows).unwrap()
}

fn params(seed: u64) -> SearchParams {
    SearchParams {
        population_size: 48,
        workers: Some(1),
        deadline_ms: 5_000,
        seed: Some(seed),
        max_generations: Some(150),
        ..Default::default()
    }
}

fn assert_covers_exactly(grid: &Grid, squares: &[Square]) {
    let width = grid.width() as usize;
    let mut hits = vec![0u32; grid.cells()];
    for sq in squares {
        for dy in 0..sq.size as usize {
            for dx in 0..sq.size as usize {
                let cell = (sq.y as usize + dy) * width + sq.x as usize + dx;
                assert!(grid.is_open(cell), "square {:?} covers a wall", sq);
                hits[cell] += 1;
            }
        }
    }
    for cell in 0..grid.cells() {
        let expected = if grid.is_open(cell) { 1 } else { 0 };
        assert_eq!(hits[cell], expected, "cell {} covered {} times", cell, hits[cell]);
    }
}

#[rstest]
#[case::two_by_two(&["..", ".."], 1)]
#[case::three_by_three(&["...", "...", "..."], 1)]
#[case::four_by_four(&["....", "....", "....", "...."], 1)]
#[case::five_by_five(&[".....", ".....", ".....", ".....", "....."], 1)]
#[case::blocked_center(&["...", ".#.", "..."], 8)]
#[case::ten_by_ten(&[
    "..........", "..........", "..........", "..........", "..........",
    "..........", "..........", "..........", "..........", "..........",
], 1)]
fn test_known_instances_reach_the_optimum(#[case] pattern: &[&str], #[case] expected: u32) {
    let g = grid(pattern);
    let solver = Solver::new(g, params(11)).unwrap();
    let report = solver.solve();

    assert_eq!(report.score, expected);
    assert_eq!(report.score as usize, report.squares.len());
    assert_covers_exactly(solver.grid(), &report.squares);
}

#[rstest]
#[case::ten_by_ten_notched(&[
    "#.........", "..........", "..........", "..........", "..........",
    "..........", "..........", "..........", "..........", "..........",
], 19)]
#[case::ell_shape(&[
    "....####",
    "....####",
    "....####",
    "........",
    "........",
    "........",
], 7)]
fn test_irregular_instances_stay_under_known_bounds(#[case] pattern: &[&str], #[case] bound: u32) {
    let g = grid(pattern);
    let solver = Solver::new(g, params(23)).unwrap();
    let report = solver.solve();

    assert!(
        report.score <= bound,
        "score {} exceeds known bound {}",
        report.score,
        bound
    );
    assert_eq!(report.score as usize, report.squares.len());
    assert_covers_exactly(solver.grid(), &report.squares);
}

#[test]
fn test_more_workers_never_hurt_validity() {
    let g = grid(&[
        "........",
        "...#....",
        "........",
        "........",
        "......#.",
        "........",
    ]);
    let mut p = params(31);
    p.workers = Some(4);
    let solver = Solver::new(g, p).unwrap();
    let report = solver.solve();

    assert_covers_exactly(solver.grid(), &report.squares);
    assert_eq!(report.score as usize, report.squares.len());
}
