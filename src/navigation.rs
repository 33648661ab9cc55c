use std::time::{Duration, Instant};

use log::trace;

use crate::error::MazeError;
use crate::grid::{Dir, Grid, Pos};

pub const DEFAULT_MOVE_DELAY: Duration = Duration::from_millis(130);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    BlockedByWall,
    BlockedByThrottle,
    Won,
    /// The exit was already reached on this grid; intents are ignored until
    /// the controller is reset.
    AlreadyWon,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerState {
    pub position: Pos,
    /// Time of the last accepted attempt, either a step or a wall bump.
    pub last_move: Option<Instant>,
    pub won: bool,
}

impl PlayerState {
    pub fn at(position: Pos) -> Self {
        Self {
            position,
            last_move: None,
            won: false,
        }
    }
}

/// Owns the player and gates every move behind the grid and the move delay.
#[derive(Clone, Debug)]
pub struct NavigationController {
    player: PlayerState,
    move_delay: Duration,
}

impl NavigationController {
    /// Places the player on the grid's start cell.
    pub fn new(grid: &Grid, move_delay: Duration) -> Self {
        Self {
            player: PlayerState::at(open_start(grid)),
            move_delay,
        }
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn position(&self) -> Pos {
        self.player.position
    }

    pub fn move_delay(&self) -> Duration {
        self.move_delay
    }

    pub fn has_won(&self) -> bool {
        self.player.won
    }

    /// Puts the player back on the start of `grid`; the move delay is kept.
    pub fn reset(&mut self, grid: &Grid) {
        self.player = PlayerState::at(open_start(grid));
    }

    /// Validates a raw `(dx, dy)` intent and applies it.
    pub fn attempt_move(
        &mut self,
        grid: &Grid,
        (dx, dy): (i32, i32),
        now: Instant,
    ) -> Result<MoveOutcome, MazeError> {
        let dir = Dir::from_delta(dx, dy)?;
        Ok(self.attempt_step(grid, dir, now))
    }

    pub fn attempt_step(&mut self, grid: &Grid, dir: Dir, now: Instant) -> MoveOutcome {
        let outcome = self.classify(grid, dir, now);
        trace!("{:?} from {:?}: {:?}", dir, self.player.position, outcome);
        outcome
    }

    fn classify(&mut self, grid: &Grid, dir: Dir, now: Instant) -> MoveOutcome {
        if self.player.won {
            return MoveOutcome::AlreadyWon;
        }
        if let Some(last) = self.player.last_move {
            if now.saturating_duration_since(last) < self.move_delay {
                return MoveOutcome::BlockedByThrottle;
            }
        }

        let (dx, dy) = dir.delta();
        let candidate = self
            .player
            .position
            .offset(dx, dy)
            .filter(|next| grid.is_open(*next));
        self.stamp(now);

        let Some(next) = candidate else {
            return MoveOutcome::BlockedByWall;
        };
        self.player.position = next;
        if next == grid.exit() {
            self.player.won = true;
            MoveOutcome::Won
        } else {
            MoveOutcome::Moved
        }
    }

    fn stamp(&mut self, now: Instant) {
        let last = self.player.last_move.map_or(now, |last| last.max(now));
        self.player.last_move = Some(last);
    }
}

fn open_start(grid: &Grid) -> Pos {
    let start = grid.start();
    debug_assert!(grid.is_open(start), "start {start:?} is a wall");
    start
}

#[cfg(test)]
mod tests {
    use super::*;

    // ###########
    // #S........#
    // #####.#.#.#
    // #.....#.#E#
    // ###########
    fn grid() -> Grid {
        let mut grid = Grid::filled(5, 11).unwrap();
        let open = [
            (1, 1), (2, 1), (3, 1), (4, 1), (5, 1), (5, 2), (5, 3), (4, 3), (3, 3), (2, 3),
            (1, 3), (6, 1), (7, 1), (8, 1), (9, 1), (7, 2), (7, 3), (9, 2), (9, 3),
        ];
        for (x, y) in open {
            grid.carve(Pos::new(x, y));
        }
        grid
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn steps_into_open_cells() {
        let grid = grid();
        let t0 = Instant::now();
        let mut nav = NavigationController::new(&grid, ms(100));
        assert_eq!(nav.attempt_step(&grid, Dir::Right, t0), MoveOutcome::Moved);
        assert_eq!(nav.position(), Pos::new(2, 1));
        assert_eq!(nav.player().last_move, Some(t0));
    }

    #[test]
    fn walls_never_move_the_player() {
        let grid = grid();
        let t0 = Instant::now();
        let mut nav = NavigationController::new(&grid, ms(10));
        for i in 0..20 {
            let now = t0 + ms(10 * i);
            assert_eq!(nav.attempt_step(&grid, Dir::Up, now), MoveOutcome::BlockedByWall);
            assert_eq!(nav.position(), grid.start());
            assert_eq!(nav.player().last_move, Some(now));
        }
    }

    #[test]
    fn throttles_inside_move_delay() {
        let grid = grid();
        let t0 = Instant::now();
        let mut nav = NavigationController::new(&grid, ms(130));
        assert_eq!(nav.attempt_step(&grid, Dir::Right, t0), MoveOutcome::Moved);
        assert_eq!(
            nav.attempt_step(&grid, Dir::Right, t0 + ms(129)),
            MoveOutcome::BlockedByThrottle
        );
        assert_eq!(
            nav.attempt_step(&grid, Dir::Up, t0 + ms(50)),
            MoveOutcome::BlockedByThrottle
        );
        assert_eq!(nav.position(), Pos::new(2, 1));
        assert_eq!(nav.player().last_move, Some(t0));
        assert_eq!(nav.attempt_step(&grid, Dir::Right, t0 + ms(130)), MoveOutcome::Moved);
    }

    #[test]
    fn wall_bumps_are_throttled_too() {
        let grid = grid();
        let t0 = Instant::now();
        let mut nav = NavigationController::new(&grid, ms(100));
        assert_eq!(nav.attempt_step(&grid, Dir::Left, t0), MoveOutcome::BlockedByWall);
        assert_eq!(
            nav.attempt_step(&grid, Dir::Left, t0 + ms(40)),
            MoveOutcome::BlockedByThrottle
        );
    }

    #[test]
    fn earlier_clock_reading_counts_as_no_time() {
        let grid = grid();
        let t0 = Instant::now() + ms(1_000);
        let mut nav = NavigationController::new(&grid, Duration::ZERO);
        assert_eq!(nav.attempt_step(&grid, Dir::Right, t0), MoveOutcome::Moved);
        assert_eq!(nav.attempt_step(&grid, Dir::Right, t0 - ms(5)), MoveOutcome::Moved);
        assert_eq!(nav.player().last_move, Some(t0));
    }

    #[test]
    fn invalid_direction_changes_nothing() {
        let grid = grid();
        let mut nav = NavigationController::new(&grid, ms(100));
        let before = *nav.player();
        assert_eq!(
            nav.attempt_move(&grid, (2, 0), Instant::now()),
            Err(MazeError::InvalidDirection { dx: 2, dy: 0 })
        );
        assert_eq!(*nav.player(), before);
    }

    #[test]
    fn starts_on_open_start_cell() {
        let grid = grid();
        let nav = NavigationController::new(&grid, ms(100));
        assert_eq!(nav.position(), Pos::new(1, 1));
        assert!(grid.is_open(nav.position()));
        assert_eq!(nav.player().last_move, None);
    }

    #[test]
    #[should_panic(expected = "is a wall")]
    #[cfg(debug_assertions)]
    fn refuses_a_walled_start() {
        let grid = Grid::filled(5, 5).unwrap();
        NavigationController::new(&grid, ms(100));
    }

    #[test]
    fn reaching_exit_wins_once() {
        let grid = grid();
        let t0 = Instant::now();
        let mut nav = NavigationController::new(&grid, Duration::ZERO);
        let route = [(1, 0); 8].into_iter().chain([(0, 1); 2]);
        let mut now = t0;
        let mut last = None;
        for delta in route {
            now += ms(1);
            last = Some(nav.attempt_move(&grid, delta, now));
        }
        assert_eq!(last, Some(Ok(MoveOutcome::Won)));
        assert!(nav.has_won());
        for (i, dir) in Dir::ALL.into_iter().enumerate() {
            let later = now + ms(1 + i as u64);
            assert_eq!(nav.attempt_step(&grid, dir, later), MoveOutcome::AlreadyWon);
        }
        assert_eq!(nav.position(), grid.exit());

        nav.reset(&grid);
        assert!(!nav.has_won());
        assert_eq!(nav.position(), grid.start());
        assert_eq!(nav.player().last_move, None);
        assert_eq!(nav.move_delay(), Duration::ZERO);
    }
}
