mod config;
mod food;
mod game;
mod grid;
mod sim;
mod snake;
mod state;
mod term;

use std::fs::File;

use anyhow::{Context, Result};
use log::{error, info, LevelFilter};
use simplelog::WriteLogger;

use config::Config;

pub type TermInt = u16;
pub type Coords = (u16, u16);

pub type GridInt = i32;
pub type Cell = (GridInt, GridInt);

fn main() -> Result<()> {
    let config = Config::default();
    config.validate()?;
    init_logging(&config)?;

    info!("Starting snake on a {}x{} grid", config.cols, config.rows);

    let mut game = game::SnakeGame::new(config)?;
    game.initialize()?;

    // The terminal is restored even when the game itself failed
    let res = game.play();
    let restored = game.shutdown();

    if let Err(e) = &res {
        error!("{:#}", e);
    }

    res.and(restored)
}

// stdout is the game board, so logs go to a file
fn init_logging(config: &Config) -> Result<()> {
    let file = File::create(&config.log_file)
        .with_context(|| format!("Error creating log file {}", config.log_file.display()))?;

    WriteLogger::init(LevelFilter::Debug, simplelog::Config::default(), file)
        .context("Error initializing logger")
}
