use std::{env, path::PathBuf, time::Duration};

use anyhow::{bail, Result};

use crate::{Cell, GridInt};
use crate::grid::Grid;
use crate::snake::Heading;

const GRID_COLS: GridInt = 25;
const GRID_ROWS: GridInt = 25;
const TICK_INTERVAL_MS: u64 = 100;
const INPUT_POLL_MS: u64 = 5;
const LOG_FILE_NAME: &str = "grid-snake.log";

/// Compiled-in game settings. There is no way to override these at runtime.
#[derive(Clone, Debug)]
pub struct Config {
    pub cols: GridInt,
    pub rows: GridInt,
    pub start: Cell,
    pub heading: Heading,
    pub tick: Duration,
    pub input_poll: Duration,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cols: GRID_COLS,
            rows: GRID_ROWS,
            start: (1, 1),
            heading: Heading::Right,
            tick: Duration::from_millis(TICK_INTERVAL_MS),
            input_poll: Duration::from_millis(INPUT_POLL_MS),
            log_file: env::temp_dir().join(LOG_FILE_NAME),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        let grid = Grid::new(self.cols, self.rows);
        if grid.area() < 2 {
            bail!("grid {}x{} has no room for a snake and food", self.cols, self.rows);
        }

        if !grid.contains(self.start) {
            bail!("start cell {:?} is outside the {}x{} grid", self.start, self.cols, self.rows);
        }

        if self.tick == Duration::from_millis(0) {
            bail!("tick interval must be positive");
        }

        Ok(())
    }
}
