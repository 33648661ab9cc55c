use std::time::{Duration, Instant};

use log::info;
use rand::Rng;

use crate::config::{Settings, DEFAULT_RESTART_DELAY};
use crate::error::MazeError;
use crate::generator::{GeneratorConfig, MazeGenerator};
use crate::grid::{Dir, Grid, Pos};
use crate::navigation::{MoveOutcome, NavigationController, PlayerState};

/// One playing session: the current maze, the player on it, and the
/// randomness used to build the next maze after a win.
pub struct Game<R: Rng> {
    grid: Grid,
    nav: NavigationController,
    generator: MazeGenerator,
    rng: R,
    restart_delay: Duration,
    restart_at: Option<Instant>,
    level: u32,
}

impl<R: Rng> Game<R> {
    pub fn new_game(rows: usize, cols: usize, rng: R, move_delay: Duration) -> Result<Self, MazeError> {
        Self::build(
            rows,
            cols,
            rng,
            move_delay,
            MazeGenerator::default(),
            DEFAULT_RESTART_DELAY,
        )
    }

    pub fn with_settings(settings: &Settings, rng: R) -> Result<Self, MazeError> {
        let generator = MazeGenerator::new(GeneratorConfig {
            widen_probability: settings.widen_probability,
        });
        Self::build(
            settings.rows,
            settings.cols,
            rng,
            settings.move_delay,
            generator,
            settings.restart_delay,
        )
    }

    fn build(
        rows: usize,
        cols: usize,
        mut rng: R,
        move_delay: Duration,
        generator: MazeGenerator,
        restart_delay: Duration,
    ) -> Result<Self, MazeError> {
        let grid = generator.generate(rows, cols, &mut rng)?;
        let nav = NavigationController::new(&grid, move_delay);
        Ok(Self {
            grid,
            nav,
            generator,
            rng,
            restart_delay,
            restart_at: None,
            level: 1,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> &PlayerState {
        self.nav.player()
    }

    pub fn position(&self) -> Pos {
        self.nav.position()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn move_delay(&self) -> Duration {
        self.nav.move_delay()
    }

    /// When the next maze is due, if the current one has been solved.
    pub fn restart_at(&self) -> Option<Instant> {
        self.restart_at
    }

    pub fn attempt_move(&mut self, (dx, dy): (i32, i32), now: Instant) -> Result<MoveOutcome, MazeError> {
        let dir = Dir::from_delta(dx, dy)?;
        Ok(self.attempt_step(dir, now))
    }

    pub fn attempt_step(&mut self, dir: Dir, now: Instant) -> MoveOutcome {
        let outcome = self.nav.attempt_step(&self.grid, dir, now);
        if outcome == MoveOutcome::Won {
            info!("level {} solved", self.level);
            self.restart_at = Some(now + self.restart_delay);
        }
        outcome
    }

    /// Regenerates once a scheduled restart is due. Returns true if it did.
    pub fn tick(&mut self, now: Instant) -> Result<bool, MazeError> {
        match self.restart_at {
            Some(at) if now >= at => {
                self.regenerate()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Builds a fresh maze of the same size and puts the player on its start.
    /// On error the current maze, player and level are left as they were.
    pub fn regenerate(&mut self) -> Result<(), MazeError> {
        let grid = self
            .generator
            .generate(self.grid.rows(), self.grid.cols(), &mut self.rng)?;
        self.grid = grid;
        self.nav.reset(&self.grid);
        self.restart_at = None;
        self.level += 1;
        info!(
            "level {}: new {}x{} maze",
            self.level,
            self.grid.rows(),
            self.grid.cols()
        );
        Ok(())
    }
}
