/// Food placement.
///
/// Uniform rejection sampling over the whole board: draw a cell, redraw
/// while it is under the snake. After `MAX_DRAWS` rejections the placer
/// switches to sampling from the explicit list of free cells, which bounds
/// the work even on a nearly full board. Both paths are uniform over the
/// free cells.

use std::collections::{HashSet, VecDeque};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::grid::{Coord, Grid};

const MAX_DRAWS: usize = 64;

/// Pick a free cell for the next food item.
/// Returns `None` only when the body covers every cell.
pub fn place_food<R: Rng>(rng: &mut R, grid: &Grid, body: &VecDeque<Coord>) -> Option<Coord> {
    if body.len() >= grid.cell_count() {
        return None;
    }
    for _ in 0..MAX_DRAWS {
        let c = Coord::new(rng.gen_range(0..grid.size), rng.gen_range(0..grid.size));
        if !body.contains(&c) {
            return Some(c);
        }
    }

    let occupied: HashSet<Coord> = body.iter().copied().collect();
    let free: Vec<Coord> = grid.cells().filter(|c| !occupied.contains(c)).collect();
    free.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn never_lands_on_body() {
        let g = Grid::new(6);
        let body: VecDeque<Coord> = (0..6).map(|x| Coord::new(x, 2)).collect();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..500 {
            let f = place_food(&mut rng, &g, &body).unwrap();
            assert!(g.contains(f));
            assert!(!body.contains(&f));
        }
    }

    #[test]
    fn finds_last_free_cell() {
        let g = Grid::new(5);
        let hole = Coord::new(3, 1);
        let body: VecDeque<Coord> = g.cells().filter(|c| *c != hole).collect();
        let mut rng = StdRng::seed_from_u64(9);
        assert_eq!(place_food(&mut rng, &g, &body), Some(hole));
    }

    #[test]
    fn full_board_has_no_food() {
        let g = Grid::new(5);
        let body: VecDeque<Coord> = g.cells().collect();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(place_food(&mut rng, &g, &body), None);
    }

    #[test]
    fn reaches_every_free_cell() {
        let g = Grid::new(3);
        let body: VecDeque<Coord> = [Coord::new(1, 1)].into_iter().collect();
        let mut rng = StdRng::seed_from_u64(5);
        let mut seen = HashSet::new();
        for _ in 0..2000 {
            seen.insert(place_food(&mut rng, &g, &body).unwrap());
        }
        assert_eq!(seen.len(), 8);
    }
}
