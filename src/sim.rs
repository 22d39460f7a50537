//! Background ticker that owns the game state.
//!
//! The frontend never touches `GameState` directly: it sends `Command`s in and
//! receives a fresh `Snapshot` after every tick.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use log::{info, trace, warn};
use rand::Rng;

use crate::snake::Heading;
use crate::state::{GameState, Snapshot};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Heading),
    Stop,
}

pub struct Simulation {
    commands: Sender<Command>,
    snapshots: Receiver<Snapshot>,
    handle: Option<JoinHandle<GameState>>,
}

impl Simulation {
    pub fn spawn<R>(state: GameState, rng: R, period: Duration) -> Result<Self>
    where
        R: Rng + Send + 'static,
    {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (snap_tx, snap_rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("simulation".into())
            .spawn(move || run(state, rng, period, cmd_rx, snap_tx))?;

        Ok(Simulation { commands: cmd_tx, snapshots: snap_rx, handle: Some(handle) })
    }

    /// Forwards a heading change, it takes effect on the next tick.
    pub fn turn(&self, heading: Heading) {
        if self.commands.send(Command::Turn(heading)).is_err() {
            // The loop is already done, e.g. after game over
            trace!("Dropped turn to {:?}", heading);
        }
    }

    /// Newest snapshot published since the last call, if any.
    pub fn latest(&self) -> Option<Snapshot> {
        self.snapshots.try_iter().last()
    }

    /// Blocks until a snapshot arrives or the loop has ended.
    pub fn wait_snapshot(&self, timeout: Duration) -> Option<Snapshot> {
        self.snapshots.recv_timeout(timeout).ok()
    }

    /// Stops the loop if it is still running and returns the final state.
    pub fn stop(mut self) -> Result<GameState> {
        let _ = self.commands.send(Command::Stop);
        self.join()
    }

    fn join(&mut self) -> Result<GameState> {
        let handle = self.handle.take().ok_or_else(|| anyhow!("simulation already joined"))?;
        handle.join().map_err(|_| anyhow!("simulation thread panicked"))
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        if self.handle.is_some() {
            let _ = self.commands.send(Command::Stop);
            if let Err(e) = self.join() {
                warn!("{}", e);
            }
        }
    }
}

fn run<R: Rng>(
    mut state: GameState,
    mut rng: R,
    period: Duration,
    commands: Receiver<Command>,
    snapshots: Sender<Snapshot>,
) -> GameState {
    info!("Simulation started, tick every {:?}", period);

    if snapshots.send(state.snapshot()).is_err() {
        return state;
    }

    while state.alive() {
        if !wait_for_tick(&mut state, period, &commands) {
            info!("Simulation stopped before game over, score {}", state.score());
            return state;
        }

        state.tick(&mut rng);

        if snapshots.send(state.snapshot()).is_err() {
            warn!("Snapshot receiver gone, stopping simulation");
            return state;
        }
    }

    state
}

/// Sleeps one tick period while applying turns. Returns false when the loop should end early.
fn wait_for_tick(state: &mut GameState, period: Duration, commands: &Receiver<Command>) -> bool {
    let deadline = Instant::now() + period;

    loop {
        let now = Instant::now();
        if now >= deadline {
            return true;
        }

        match commands.recv_timeout(deadline - now) {
            Ok(Command::Turn(heading)) => state.set_heading(heading),
            Ok(Command::Stop) | Err(RecvTimeoutError::Disconnected) => return false,
            Err(RecvTimeoutError::Timeout) => return true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::snake::Heading::*;
    use crate::state::{Ending, Phase};
    use rand::{rngs::StdRng, SeedableRng};

    const PERIOD: Duration = Duration::from_millis(5);
    const WAIT: Duration = Duration::from_secs(2);

    fn new_state(cols: i32, start: (i32, i32)) -> GameState {
        let mut rng = StdRng::seed_from_u64(9);
        GameState::new(Grid::new(cols, 1), start, Right, &mut rng).unwrap()
    }

    fn drain_until_over(sim: &Simulation) -> Vec<Snapshot> {
        let mut seen = vec![];
        while let Some(snapshot) = sim.wait_snapshot(WAIT) {
            let over = !snapshot.alive();
            seen.push(snapshot);
            if over {
                break;
            }
        }
        seen
    }

    #[test]
    fn publishes_initial_snapshot_then_runs_into_the_wall() {
        let state = new_state(30, (0, 0));
        let sim = Simulation::spawn(state, StdRng::seed_from_u64(1), PERIOD).unwrap();

        let seen = drain_until_over(&sim);
        assert_eq!(seen[0].snake[0], (0, 0));
        assert_eq!(seen[0].score, 0);

        let last = seen.last().unwrap();
        assert_eq!(last.phase, Phase::GameOver(Ending::HitWall));
        assert_eq!(last.snake[0], (30, 0));

        // Every tick moves the head exactly one cell right
        for pair in seen.windows(2) {
            assert_eq!(pair[1].snake[0].0, pair[0].snake[0].0 + 1);
        }

        let final_state = sim.stop().unwrap();
        assert!(!final_state.alive());
    }

    #[test]
    fn stop_ends_a_running_game() {
        let state = new_state(30, (0, 0));
        let sim = Simulation::spawn(state, StdRng::seed_from_u64(2), Duration::from_secs(60)).unwrap();

        assert!(sim.wait_snapshot(WAIT).is_some());
        let final_state = sim.stop().unwrap();

        assert!(final_state.alive());
        assert_eq!(final_state.snake().head(), (0, 0));
    }

    #[test]
    fn turns_are_applied_between_ticks() {
        let mut rng = StdRng::seed_from_u64(4);
        let state = GameState::new(Grid::new(10, 10), (0, 0), Right, &mut rng).unwrap();
        let sim = Simulation::spawn(state, rng, Duration::from_millis(200)).unwrap();

        let first = sim.wait_snapshot(WAIT).unwrap();
        assert_eq!(first.heading, Right);

        sim.turn(Down);
        let next = sim.wait_snapshot(WAIT).unwrap();
        assert_eq!(next.heading, Down);
        assert_eq!(next.snake[0], (0, 1));

        sim.stop().unwrap();
    }

    #[test]
    fn latest_keeps_only_the_newest_snapshot() {
        let state = new_state(40, (0, 0));
        let sim = Simulation::spawn(state, StdRng::seed_from_u64(5), Duration::from_millis(1)).unwrap();

        thread::sleep(Duration::from_millis(500));
        let latest = sim.latest().unwrap();

        assert!(!latest.alive());
        assert!(sim.latest().is_none());
    }
}
