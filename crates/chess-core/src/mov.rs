//! Move representation.

use crate::Coord;
use std::fmt;

/// Tags for moves whose effect is more than a single relocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum SpecialMove {
    /// Plain relocation, possibly capturing the destination occupant.
    #[default]
    None = 0,
    /// Pawn capture of a pawn that just advanced two squares past it.
    EnPassant = 1,
    /// Rook move that also carries its king across.
    Castling = 2,
    /// Pawn move onto the promotion row.
    Promotion = 3,
}

impl SpecialMove {
    /// Returns true for every tag other than `None`.
    #[inline]
    pub const fn is_special(self) -> bool {
        !matches!(self, SpecialMove::None)
    }
}

/// A move relative to the piece that makes it.
///
/// A move never names its piece: the absolute destination is the acting
/// piece's coordinate plus `(dx, dy)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    dx: i8,
    dy: i8,
    special: SpecialMove,
}

impl Move {
    /// The "stay" sentinel heading every generated move list.
    pub const STAY: Move = Move::normal(0, 0);

    /// Creates a new move.
    #[inline]
    pub const fn new(dx: i8, dy: i8, special: SpecialMove) -> Self {
        Move { dx, dy, special }
    }

    /// Creates a move without special effects.
    #[inline]
    pub const fn normal(dx: i8, dy: i8) -> Self {
        Self::new(dx, dy, SpecialMove::None)
    }

    #[inline]
    pub const fn dx(self) -> i8 {
        self.dx
    }

    #[inline]
    pub const fn dy(self) -> i8 {
        self.dy
    }

    #[inline]
    pub const fn special(self) -> SpecialMove {
        self.special
    }

    /// Returns true for the `(0, 0)` sentinel.
    #[inline]
    pub const fn is_stay(self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    /// Returns the same displacement with a different tag.
    #[inline]
    pub const fn with_special(self, special: SpecialMove) -> Self {
        Move { special, ..self }
    }

    /// Returns the absolute destination when made from `from`.
    #[inline]
    pub const fn target(self, from: Coord) -> Option<Coord> {
        from.offset(self.dx, self.dy)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({:+}, {:+}", self.dx, self.dy)?;
        if self.special.is_special() {
            write!(f, ", {:?}", self.special)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:+},{:+})", self.dx, self.dy)
    }
}
