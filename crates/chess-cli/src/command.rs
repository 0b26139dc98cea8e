//! Parsing of the lines a human player types.

use chess_core::Coord;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0} (try e2e4, moves e2, undo, board, quit)")]
    Unknown(String),
    #[error("not a square: {0}")]
    BadSquare(String),
}

/// One line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move the piece on `from` to `to`, e.g. `e2e4` or `e2 e4`.
    /// Castling is typed as the king's move, `e1g1`.
    Move { from: Coord, to: Coord },
    /// List the legal targets of the piece on a square.
    Moves(Coord),
    Undo,
    Board,
    Quit,
}

fn square(s: &str) -> Result<Coord, CommandError> {
    Coord::from_algebraic(s).ok_or_else(|| CommandError::BadSquare(s.to_string()))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim().to_ascii_lowercase();
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => Err(CommandError::Empty),
            ["undo"] => Ok(Command::Undo),
            ["board"] => Ok(Command::Board),
            ["quit"] | ["exit"] => Ok(Command::Quit),
            ["moves", sq] => Ok(Command::Moves(square(sq)?)),
            [from, to] => Ok(Command::Move {
                from: square(from)?,
                to: square(to)?,
            }),
            [mv] if mv.len() == 4 && mv.is_ascii() => {
                let (from, to) = mv.split_at(2);
                Ok(Command::Move {
                    from: square(from)?,
                    to: square(to)?,
                })
            }
            _ => Err(CommandError::Unknown(line.clone())),
        }
    }
}
