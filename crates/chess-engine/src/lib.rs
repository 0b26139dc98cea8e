//! Chess rules engine with exact move reversal.
//!
//! This crate provides:
//! - [`Board`] - 8x8 grid of [`Piece`] values plus per-color piece registries
//! - [`Game`] - board, undo log and turn counter behind a command/query surface
//! - [`History`] - the undo log that makes every move exactly reversible
//! - Move generation with king-safety filtering, and the check/checkmate tests
//! - [`Searcher`] - fixed-depth minimax over a material and centralization score
//! - Perft counting for validating the generator
//!
//! # Architecture
//!
//! Nothing is copied to test a move. Legality filtering, the search and perft
//! all apply candidate moves to the one live board and revert them through the
//! history, so the history must restore the board bit for bit, special moves
//! included.
//!
//! # Example
//!
//! ```
//! use chess_core::Coord;
//! use chess_engine::{Game, MoveOutcome};
//!
//! let mut game = Game::standard();
//! let e2 = Coord::from_algebraic("e2").unwrap();
//! let e4 = Coord::from_algebraic("e4").unwrap();
//! let outcome = game.play(e2, e4).unwrap();
//! assert!(matches!(outcome, MoveOutcome::Played { check: false, .. }));
//!
//! let reply = game.find_best_move(2).unwrap();
//! println!("Black answers with {:?}", reply);
//! ```

mod board;
mod error;
mod game;
mod history;
pub mod movegen;
mod piece;
pub mod rules;
mod search;

pub use board::Board;
pub use error::EngineError;
pub use game::{AppliedMove, Game, GameEvent, MoveOutcome, Selection};
pub use history::{History, HistoryEntry, PlyRecord};
pub use movegen::{
    has_legal_move, is_in_check, is_in_checkmate, is_square_attacked, legal_moves, raw_moves,
    MoveList,
};
pub use piece::{Handle, Piece};
pub use rules::{CastlingRule, GameOptions};
pub use search::{evaluate, SearchStats, Searcher};
