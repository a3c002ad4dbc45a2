use crate::grid::Grid;
use crate::point::Point;
use crate::population::Population;
use fastrand::Rng;
use itertools::Itertools;

/// How many slices the X/Y weight axis is divided into for the blended
/// orderings, and how many max-square weightings each slice is paired
/// with.
const WEIGHT_SPLITS: i64 = 50;
const WEIGHT_RATIOS: i64 = 5;

struct Anchor {
    point: Point,
    x: i64,
    y: i64,
    n: i64,
}

fn sorted<K: Ord, F: Fn(&Anchor) -> K>(anchors: &[Anchor], key: F) -> Vec<Point> {
    anchors
        .iter()
        .sorted_by_key(|a| key(a))
        .map(|a| a.point)
        .collect()
}

/// Seed the elite rows of a fresh population.
///
/// The first rows are deterministic orderings of the anchor set: biggest
/// square first, row/column sweeps, and integer-weighted blends of the
/// three. Sorted starts reach decent fitness within a handful of
/// generations; the remaining rows are uniform shuffles to keep the pool
/// from converging on one basin immediately.
pub fn seed_population(grid: &Grid, population: &mut Population, rng: &mut Rng) {
    let anchors: Vec<Anchor> = grid
        .anchors()
        .iter()
        .map(|&p| Anchor {
            point: p,
            x: p.x() as i64,
            y: p.y() as i64,
            n: grid.max_square_at(p.cell(grid.width() as usize)) as i64,
        })
        .collect();

    let elite = population.elite();
    let mut orders: Vec<Vec<Point>> = Vec::with_capacity(elite);

    orders.push(sorted(&anchors, |a| (-a.n, a.y, a.x)));
    orders.push(sorted(&anchors, |a| (-a.n, a.x, a.y)));
    orders.push(sorted(&anchors, |a| (a.y, -a.n, a.x)));
    orders.push(sorted(&anchors, |a| (a.x, -a.n, a.y)));
    orders.push(sorted(&anchors, |a| (a.y, a.x, 0)));
    orders.push(sorted(&anchors, |a| (a.x, a.y, 0)));
    orders.truncate(elite);

    'blends: for split in 0..WEIGHT_SPLITS {
        for ratio in 0..WEIGHT_RATIOS {
            if orders.len() == elite {
                break 'blends;
            }
            // Integer restatement of the weighted key
            // y*s + x*(1-s) - n*ratio with s in [0, 1]: every term is
            // scaled by (WEIGHT_SPLITS - 1), which preserves the order.
            let wy = split;
            let wx = WEIGHT_SPLITS - 1 - split;
            let wn = ratio * (WEIGHT_SPLITS - 1);
            orders.push(sorted(&anchors, |a| (a.y * wy + a.x * wx - a.n * wn, 0, 0)));
        }
    }

    for (k, order) in orders.iter().enumerate() {
        population.row_mut(k).copy_from_slice(order);
    }

    for k in orders.len()..elite {
        let row = population.row_mut(k);
        row.copy_from_slice(grid.anchors());
        rng.shuffle(row);
    }
}
