//! Engine error type.

use chess_core::{Color, Coord, PlacementError};
use thiserror::Error;

/// Errors reported by board queries, move commands and the undo log.
///
/// Only [`MissingKing`](EngineError::MissingKing) is fatal: it means the
/// board can no longer answer legality questions, and a [`Game`](crate::Game)
/// refuses further commands once it has seen it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("coordinate ({x}, {y}) is outside the board")]
    OutOfRange { x: i8, y: i8 },

    #[error("{0} has no king on the board")]
    MissingKing(Color),

    #[error("no moves to revert")]
    EmptyHistory,

    #[error("illegal move requested: {from} to {to}")]
    IllegalMoveRequested { from: Coord, to: Coord },

    #[error("no piece is selected")]
    NothingSelected,

    #[error("no piece on {0}")]
    EmptySquare(Coord),

    #[error("it is not {color}'s turn")]
    NotYourTurn { color: Color },

    #[error("game has already ended")]
    GameOver,

    #[error("invalid placement: {0}")]
    Placement(#[from] PlacementError),
}

impl EngineError {
    /// Returns true for errors after which play cannot continue.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::MissingKing(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_missing_king_is_fatal() {
        assert!(EngineError::MissingKing(Color::Black).is_fatal());
        assert!(!EngineError::EmptyHistory.is_fatal());
        assert!(!EngineError::OutOfRange { x: 8, y: 0 }.is_fatal());
    }

    #[test]
    fn error_display() {
        let from = Coord::from_algebraic("e2").unwrap();
        let to = Coord::from_algebraic("e5").unwrap();
        let err = EngineError::IllegalMoveRequested { from, to };
        assert_eq!(err.to_string(), "illegal move requested: e2 to e5");
        assert_eq!(
            EngineError::MissingKing(Color::White).to_string(),
            "White has no king on the board"
        );
        let err: EngineError = PlacementError::InvalidRankCount(2).into();
        assert!(err.to_string().contains("expected 8 ranks"));
    }
}
