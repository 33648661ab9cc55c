//! Procedurally generated mazes and throttled, wall-gated player movement.
//!
//! [`generate`] carves a perfect maze on an odd-sized [`Grid`] with a
//! randomized depth-first backtracker. A [`NavigationController`] walks the
//! player across it and classifies each attempt as a [`MoveOutcome`] for the
//! front-end to draw and sound. [`Game`] ties the two together and builds the
//! next maze after a win.

pub mod config;
pub mod error;
pub mod game;
pub mod generator;
pub mod grid;
pub mod navigation;

pub use config::Settings;
pub use error::MazeError;
pub use game::Game;
pub use generator::{generate, GeneratorConfig, MazeGenerator};
pub use grid::{Cell, Dir, Grid, Pos};
pub use navigation::{MoveOutcome, NavigationController, PlayerState};
