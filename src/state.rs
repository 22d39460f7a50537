//! Game state and the per-tick simulation step.

use log::{debug, info};
use rand::Rng;

use crate::Cell;
use crate::food::spawn_food;
use crate::grid::Grid;
use crate::snake::{Heading, Snake};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Ending {
    HitWall,
    HitSelf,
    /// No free cell was left for the next food item.
    BoardFilled,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    GameOver(Ending),
}

/// What a single call to `GameState::tick` did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickResult {
    Moved,
    Ate,
    Ended(Ending),
    /// The game was already over, nothing changed.
    Idle,
}

/// Immutable copy of the state handed to the renderer after every tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub snake: Vec<Cell>,
    pub food: Cell,
    pub heading: Heading,
    pub score: u32,
    pub phase: Phase,
}

impl Snapshot {
    pub fn alive(&self) -> bool {
        self.phase == Phase::Running
    }
}

#[derive(Clone, Debug)]
pub struct GameState {
    grid: Grid,
    snake: Snake,
    food: Cell,
    score: u32,
    phase: Phase,
}

impl GameState {
    /// One-cell snake at `start` plus a food item. `None` if the grid has no room for the food.
    pub fn new<R: Rng + ?Sized>(grid: Grid, start: Cell, heading: Heading, rng: &mut R) -> Option<Self> {
        let snake = Snake::new(start, heading);
        let food = spawn_food(&grid, &snake, rng)?;
        Some(GameState { grid, snake, food, score: 0, phase: Phase::Running })
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn alive(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Queues a heading for the next tick. Reversals and changes after game over are ignored.
    pub fn set_heading(&mut self, heading: Heading) {
        if !self.alive() {
            return;
        }

        if !self.snake.set_heading(heading) {
            debug!("Ignored reverse turn to {:?}", heading);
        }
    }

    /// Advances the simulation one step: move, wall check, self check, then food.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> TickResult {
        if !self.alive() {
            return TickResult::Idle;
        }

        // Food is always inside the grid and off the body, so growing in place of
        // the plain move cannot hide a collision
        let eats = self.snake.next_head() == self.food;
        if eats {
            self.snake.grow();
        } else {
            self.snake.move_step();
        }

        if !self.grid.contains(self.snake.head()) {
            return self.end(Ending::HitWall);
        }

        if self.snake.bites_itself() {
            return self.end(Ending::HitSelf);
        }

        if !eats {
            return TickResult::Moved;
        }

        self.score += 1;
        debug!("Ate food at {:?}, score {}", self.food, self.score);

        match spawn_food(&self.grid, &self.snake, rng) {
            Some(food) => {
                self.food = food;
                TickResult::Ate
            },
            None => self.end(Ending::BoardFilled),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            snake: self.snake.body().iter().copied().collect(),
            food: self.food,
            heading: self.snake.heading(),
            score: self.score,
            phase: self.phase,
        }
    }

    fn end(&mut self, ending: Ending) -> TickResult {
        info!("Game over ({:?}) with score {}", ending, self.score);
        self.phase = Phase::GameOver(ending);
        TickResult::Ended(ending)
    }
}
