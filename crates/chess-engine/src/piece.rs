//! Board occupants with their per-game state.

use chess_core::{Color, Coord, PieceKind};

/// Opaque identifier of the visual object a front end keeps for a piece.
///
/// The engine never interprets it; it only carries it along so that a
/// captured piece can be hidden and a restored one shown again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(pub u32);

/// A piece on the board, or the `Empty` sentinel.
///
/// Pieces are plain values. The history keeps snapshots of them, and
/// restoring a snapshot brings back every field, not just the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    /// Where the piece stands now.
    pub coord: Coord,
    /// Where the piece stood when the board was built.
    pub initial: Coord,
    pub has_moved: bool,
    /// Turn on which this pawn last advanced two squares.
    pub two_step_turn: Option<u32>,
    pub handle: Option<Handle>,
}

impl Piece {
    /// Creates a piece that has not moved yet.
    pub const fn new(kind: PieceKind, color: Color, coord: Coord) -> Self {
        Piece {
            kind,
            color,
            coord,
            initial: coord,
            has_moved: false,
            two_step_turn: None,
            handle: None,
        }
    }

    /// Creates the sentinel occupant of a vacant cell.
    ///
    /// The color of an empty occupant is meaningless; every color-sensitive
    /// query checks [`is_empty`](Self::is_empty) first.
    pub const fn empty(coord: Coord) -> Self {
        Self::new(PieceKind::Empty, Color::White, coord)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.kind.is_empty()
    }

    /// Returns true if this is a real piece of the other side.
    #[inline]
    pub fn is_enemy_of(&self, color: Color) -> bool {
        !self.is_empty() && self.color != color
    }

    #[inline]
    pub const fn material_value(&self) -> i32 {
        self.kind.material_value()
    }

    /// Returns true if the piece never left its construction square.
    #[inline]
    pub fn is_unmoved(&self) -> bool {
        !self.has_moved && self.coord == self.initial
    }

    /// Returns the placement character, `.` for empty cells.
    #[inline]
    pub const fn to_char(&self) -> char {
        self.kind.to_char(self.color)
    }
}
