use anyhow::{bail, Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::info;
use rand::{rngs::StdRng, SeedableRng};

use crate::{Cell, Coords, TermInt};
use crate::config::Config;
use crate::grid::Grid;
use crate::sim::Simulation;
use crate::snake::Heading::{self, *};
use crate::state::{Ending, GameState, Phase, Snapshot};
use crate::term::TermManager;

// Every grid cell is two terminal columns wide so the board looks square
const SNAKE_BODY_GLYPH: &str = "██";
const FOOD_GLYPH: &str = "()";
const DEAD_SNAKE_GLYPH: &str = "XX";
const EMPTY_GLYPH: &str = "  ";

pub struct SnakeGame {
    config: Config,
    grid: Grid,
    term: TermManager,
    /// Top-left corner of the border, the score line sits right above it.
    origin: Coords,
    last_frame: Option<Snapshot>,
}

impl SnakeGame {
    pub fn new(config: Config) -> Result<Self> {
        let term = TermManager::new()?;
        let grid = Grid::new(config.cols, config.rows);

        let (board_w, board_h) = board_size(&grid);
        let (w, h) = term.get_terminal_size();
        if w < board_w || h < board_h {
            bail!("terminal is {}x{}, the board needs at least {}x{}", w, h, board_w, board_h);
        }

        let origin = ((w - board_w) / 2, (h - board_h) / 2 + 1);
        Ok(SnakeGame { config, grid, term, origin, last_frame: None })
    }

    pub fn initialize(&mut self) -> Result<()> {
        self.term.setup()
    }

    pub fn shutdown(&mut self) -> Result<()> {
        self.term.restore()
    }

    /// Runs one game until it ends or the player quits.
    pub fn play(&mut self) -> Result<()> {
        let mut rng = StdRng::from_entropy();
        let state = GameState::new(self.grid, self.config.start, self.config.heading, &mut rng)
            .context("grid has no room for food")?;
        let sim = Simulation::spawn(state, rng, self.config.tick)?;

        self.term.clear()?;
        let (board_w, board_h) = board_size(&self.grid);
        self.term.draw_borders(self.origin, board_w, board_h - 1)?;

        let last = self.run_until_over(&sim)?;
        let final_state = sim.stop()?;
        info!(
            "Game finished ({:?}) with score {} and length {}",
            final_state.phase(),
            final_state.score(),
            final_state.snake().len()
        );

        match last {
            Some(snapshot) => {
                self.game_over(&snapshot)?;
                self.wait_for_quit()
            },
            None => Ok(()),
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    /// Forwards input and draws snapshots. Returns the final frame, or `None` if the player quit.
    fn run_until_over(&mut self, sim: &Simulation) -> Result<Option<Snapshot>> {
        loop {
            for key_ev in self.term.read_key_events_queue(self.config.input_poll)? {
                if is_quit(&key_ev) {
                    info!("Player quit mid-game");
                    return Ok(None);
                }

                if let Some(heading) = heading_for(&key_ev) {
                    sim.turn(heading);
                }
            }

            if let Some(snapshot) = sim.latest() {
                self.print_frame(&snapshot)?;
                if !snapshot.alive() {
                    return Ok(Some(snapshot));
                }
            }
        }
    }

    fn wait_for_quit(&mut self) -> Result<()> {
        loop {
            if is_quit(&self.term.read_key_blocking()?) {
                return Ok(());
            }
        }
    }

    fn game_over(&mut self, snapshot: &Snapshot) -> Result<()> {
        let won = snapshot.phase == Phase::GameOver(Ending::BoardFilled);
        let s = if won {"You won!"} else {"Game over!"};

        if !won {
            for cell in &snapshot.snake {
                self.print_cell(*cell, DEAD_SNAKE_GLYPH)?;
            }
        }

        self.term.show_message(&[
            s,
            &*format!("Score: {}", snapshot.score),
            "",
            "Press Esc or Q to quit",
        ])
    }

    /// Redraws only what changed since the previous frame.
    fn print_frame(&mut self, snapshot: &Snapshot) -> Result<()> {
        if let Some(prev) = self.last_frame.take() {
            for cell in prev.snake.iter().filter(|cell| !snapshot.snake.contains(cell)) {
                self.print_cell(*cell, EMPTY_GLYPH)?;
            }

            if prev.food != snapshot.food && !snapshot.snake.contains(&prev.food) {
                self.print_cell(prev.food, EMPTY_GLYPH)?;
            }
        }

        self.print_cell(snapshot.food, FOOD_GLYPH)?;

        for (i, cell) in snapshot.snake.iter().enumerate() {
            let glyph = if i == 0 {head_glyph(snapshot.heading)} else {SNAKE_BODY_GLYPH};
            self.print_cell(*cell, glyph)?;
        }

        let score_pos = (self.origin.0, self.origin.1 - 1);
        self.term.print_at(score_pos, &format!("Score: {}", snapshot.score))?;
        self.term.flush()?;

        self.last_frame = Some(snapshot.clone());
        Ok(())
    }

    /// Cells outside the grid (a head that hit the wall) are skipped.
    fn print_cell(&mut self, cell: Cell, glyph: &str) -> Result<()> {
        if !self.grid.contains(cell) {
            return Ok(());
        }

        let x = self.origin.0 + 1 + 2 * cell.0 as TermInt;
        let y = self.origin.1 + 1 + cell.1 as TermInt;
        self.term.print_at((x, y), glyph)
    }
}

/// Border plus cells, and one extra row for the score line.
fn board_size(grid: &Grid) -> Coords {
    (2 * grid.cols() as TermInt + 2, grid.rows() as TermInt + 3)
}

fn head_glyph(heading: Heading) -> &'static str {
    match heading {
        Up => "/\\",
        Down => "\\/",
        Left => "<:",
        Right => ":>",
    }
}

fn heading_for(ev: &KeyEvent) -> Option<Heading> {
    match ev.code {
        KeyCode::Char('w') | KeyCode::Up => Some(Up),
        KeyCode::Char('a') | KeyCode::Left => Some(Left),
        KeyCode::Char('s') | KeyCode::Down => Some(Down),
        KeyCode::Char('d') | KeyCode::Right => Some(Right),
        _ => None,
    }
}

fn is_quit(ev: &KeyEvent) -> bool {
    matches!(ev.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q')) || is_ctrl_c(ev)
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
