//! Rank-compressed piece placement strings.
//!
//! The format is the first field of FEN: eight ranks separated by `/`,
//! digits for runs of empty squares, letters for pieces with uppercase
//! meaning White. The first rank in the string is row 0 of the grid.

use crate::{Color, Coord, PieceKind};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing placement strings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlacementError {
    #[error("empty placement string")]
    Empty,

    #[error("expected 8 ranks, got {0}")]
    InvalidRankCount(usize),

    #[error("invalid character '{character}' in rank {rank}")]
    InvalidCharacter { character: char, rank: usize },

    #[error("rank {rank} has {squares} squares, expected 8")]
    InvalidRankLength { rank: usize, squares: usize },

    #[error("{0} has more than one king")]
    ExtraKing(Color),
}

/// Parsed piece placement: what stands on each of the 64 cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    squares: [Option<(PieceKind, Color)>; 64],
}

impl Placement {
    /// The standard starting placement.
    pub const STANDARD: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

    /// Creates a placement with no pieces.
    pub const fn empty() -> Self {
        Placement {
            squares: [None; 64],
        }
    }

    /// Parses a placement string.
    ///
    /// A full FEN record is accepted as well; everything after the first
    /// whitespace-separated field is ignored.
    pub fn parse(input: &str) -> Result<Self, PlacementError> {
        let field = input
            .split_whitespace()
            .next()
            .ok_or(PlacementError::Empty)?;

        let ranks: Vec<&str> = field.split('/').collect();
        if ranks.len() != 8 {
            return Err(PlacementError::InvalidRankCount(ranks.len()));
        }

        let mut placement = Placement::empty();
        for (row, rank) in ranks.iter().enumerate() {
            let rank_label = 8 - row;
            let mut file = 0usize;
            for c in rank.chars() {
                if let Some(run) = c.to_digit(10) {
                    file += run as usize;
                } else if let Some((kind, color)) = PieceKind::from_char(c) {
                    if file < 8 {
                        placement.squares[row * 8 + file] = Some((kind, color));
                    }
                    file += 1;
                } else {
                    return Err(PlacementError::InvalidCharacter {
                        character: c,
                        rank: rank_label,
                    });
                }
            }
            if file != 8 {
                return Err(PlacementError::InvalidRankLength {
                    rank: rank_label,
                    squares: file,
                });
            }
        }

        for color in [Color::White, Color::Black] {
            let kings = placement
                .pieces()
                .filter(|&(_, kind, c)| kind == PieceKind::King && c == color)
                .count();
            if kings > 1 {
                return Err(PlacementError::ExtraKing(color));
            }
        }

        Ok(placement)
    }

    /// Returns what stands on `coord`.
    #[inline]
    pub fn get(&self, coord: Coord) -> Option<(PieceKind, Color)> {
        self.squares[coord.index()]
    }

    /// Puts a piece on `coord`, or clears it when `kind` is `Empty`.
    pub fn set(&mut self, coord: Coord, kind: PieceKind, color: Color) {
        self.squares[coord.index()] = if kind.is_empty() {
            None
        } else {
            Some((kind, color))
        };
    }

    /// Iterates over occupied cells in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Coord, PieceKind, Color)> + '_ {
        Coord::all().filter_map(move |c| self.get(c).map(|(kind, color)| (c, kind, color)))
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::parse(Self::STANDARD).expect("STANDARD is valid")
    }
}

impl FromStr for Placement {
    type Err = PlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..8 {
            if row > 0 {
                write!(f, "/")?;
            }
            let mut empty_run = 0;
            for file in 0..8 {
                match self.squares[row * 8 + file] {
                    Some((kind, color)) => {
                        if empty_run > 0 {
                            write!(f, "{}", empty_run)?;
                            empty_run = 0;
                        }
                        write!(f, "{}", kind.to_char(color))?;
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                write!(f, "{}", empty_run)?;
            }
        }
        Ok(())
    }
}
