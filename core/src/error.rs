use thiserror::Error;

use crate::{CellCount, Coord};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: {height}x{width} board with {mines} mines")]
    InvalidConfiguration {
        height: Coord,
        width: Coord,
        mines: CellCount,
    },
    #[error("Not enough room for {required} mines, only {available} cells outside the opening area")]
    InsufficientSpace {
        required: CellCount,
        available: CellCount,
    },
    #[error("Mine layout does not match the game: expected {expected} mines, got {actual}")]
    InvalidLayout {
        expected: CellCount,
        actual: CellCount,
    },
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
}

pub type Result<T> = core::result::Result<T, GameError>;
