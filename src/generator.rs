//! Randomized depth-first backtracking over the junction lattice.
//!
//! Junctions are the cells with odd `x` and odd `y`; corridors join two
//! junctions by opening the cell between them. The walk keeps its own stack
//! of frames instead of recursing, so grid size never touches the call stack.

use std::collections::VecDeque;

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::MazeError;
use crate::grid::{Dir, Grid, Pos};

pub const DEFAULT_WIDEN_PROBABILITY: f64 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeneratorConfig {
    /// Chance that a junction's second or later corridor turns into a short
    /// spur instead of a branch the walk descends into.
    pub widen_probability: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            widen_probability: DEFAULT_WIDEN_PROBABILITY,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MazeGenerator {
    config: GeneratorConfig,
}

struct Frame {
    at: Pos,
    candidates: [Dir; 4],
    cursor: usize,
    carved: usize,
}

impl Frame {
    fn new(at: Pos, rng: &mut impl Rng) -> Self {
        Self {
            at,
            candidates: shuffled_dirs(rng),
            cursor: 0,
            carved: 0,
        }
    }
}

impl MazeGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> GeneratorConfig {
        self.config
    }

    pub fn generate(&self, rows: usize, cols: usize, rng: &mut impl Rng) -> Result<Grid, MazeError> {
        let p = self.config.widen_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(MazeError::InvalidWidenProbability(p));
        }
        let mut grid = Grid::filled(rows, cols)?;

        let start = grid.start();
        grid.carve(start);
        let mut deferred = VecDeque::new();
        let mut widened = 0usize;
        let mut stack = vec![Frame::new(start, rng)];

        loop {
            if stack.is_empty() {
                // Resume the junctions widening skipped so none stays sealed.
                let Some(at) = deferred.pop_front() else {
                    break;
                };
                stack.push(Frame::new(at, rng));
            }
            let Some(frame) = stack.last_mut() else {
                break;
            };
            if frame.cursor == frame.candidates.len() {
                stack.pop();
                continue;
            }
            let dir = frame.candidates[frame.cursor];
            frame.cursor += 1;
            let Some((between, next)) = uncarved_neighbor(&grid, frame.at, dir) else {
                continue;
            };
            grid.carve(between);
            grid.carve(next);
            frame.carved += 1;

            if frame.carved > 1 && rng.gen_bool(p) {
                // The spur is postponed, not abandoned: both junctions resume
                // once the primary walk is done, so junctions past them are
                // still reached. Widening only shortens the dead end it makes
                // now.
                widened += 1;
                deferred.push_back(next);
                if let Some(spur) = carve_spur(&mut grid, next, rng) {
                    deferred.push_back(spur);
                }
            } else {
                stack.push(Frame::new(next, rng));
            }
        }

        debug!(
            "generated {}x{} maze: {} open cells, {} widened corridors",
            rows,
            cols,
            grid.open_count(),
            widened
        );
        Ok(grid)
    }
}

/// Generates with the default widening policy.
pub fn generate(rows: usize, cols: usize, rng: &mut impl Rng) -> Result<Grid, MazeError> {
    MazeGenerator::default().generate(rows, cols, rng)
}

fn shuffled_dirs(rng: &mut impl Rng) -> [Dir; 4] {
    let mut dirs = Dir::ALL;
    dirs.shuffle(rng);
    dirs
}

/// The wall between `from` and the junction two steps away in `dir`, plus
/// that junction, if it is inside the border and still solid.
fn uncarved_neighbor(grid: &Grid, from: Pos, dir: Dir) -> Option<(Pos, Pos)> {
    let (dx, dy) = dir.delta();
    let next = from.offset(dx * 2, dy * 2)?;
    if !grid.is_interior(next) || grid.is_open(next) {
        return None;
    }
    let between = from.offset(dx, dy)?;
    Some((between, next))
}

fn carve_spur(grid: &mut Grid, from: Pos, rng: &mut impl Rng) -> Option<Pos> {
    let (between, spur) = shuffled_dirs(rng)
        .into_iter()
        .find_map(|dir| uncarved_neighbor(grid, from, dir))?;
    grid.carve(between);
    grid.carve(spur);
    Some(spur)
}
