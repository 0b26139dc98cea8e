//! Core types for the chess engine.
//!
//! This crate provides the value types shared by the engine and its front ends:
//! - [`PieceKind`] and [`Color`] for board occupants
//! - [`Coord`] for grid cells
//! - [`Move`] and [`SpecialMove`] for relative moves
//! - [`Placement`] for rank-compressed placement strings

mod color;
mod coord;
mod mov;
mod piece;
mod placement;

pub use color::Color;
pub use coord::{Coord, BOARD_SIZE};
pub use mov::{Move, SpecialMove};
pub use piece::PieceKind;
pub use placement::{Placement, PlacementError};
