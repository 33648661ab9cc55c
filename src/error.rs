use thiserror::Error;

/// Caller-contract violations raised by generation and navigation.
///
/// Walls and throttling are not errors; they come back as a
/// [`MoveOutcome`](crate::MoveOutcome).
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum MazeError {
    #[error("maze dimensions must be odd and at least 5, got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("direction ({dx}, {dy}) is not a unit step")]
    InvalidDirection { dx: i32, dy: i32 },
    #[error("widen probability {0} must be between 0.0 and 1.0")]
    InvalidWidenProbability(f64),
}
