use rand::{seq::IteratorRandom, Rng};

use crate::Cell;
use crate::grid::Grid;
use crate::snake::Snake;

/// Picks a free cell uniformly at random, or `None` once the snake fills the grid.
pub fn spawn_food<R: Rng + ?Sized>(grid: &Grid, snake: &Snake, rng: &mut R) -> Option<Cell> {
    grid.cells()
        .filter(|cell| !snake.occupies(*cell))
        .choose(rng)
}
