use crate::{Cell, GridInt};

/// Fixed-size playfield. Only its bounds matter, cells themselves hold no state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cols: GridInt,
    rows: GridInt,
}

impl Grid {
    pub fn new(cols: GridInt, rows: GridInt) -> Self {
        Grid { cols, rows }
    }

    pub fn cols(&self) -> GridInt {
        self.cols
    }

    pub fn rows(&self) -> GridInt {
        self.rows
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.cols).contains(&cell.0) && (0..self.rows).contains(&cell.1)
    }

    pub fn area(&self) -> usize {
        self.cols.max(0) as usize * self.rows.max(0) as usize
    }

    /// Every cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |y| (0..cols).map(move |x| (x, y)))
    }
}
