//! Piece kind representation.

use crate::Color;

/// The kinds of board occupant.
///
/// `Empty` is a real kind rather than an absent value: every cell of the
/// board holds an occupant, and vacant cells hold an `Empty` one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    Empty = 0,
    Pawn = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
    King = 6,
}

impl PieceKind {
    /// All kinds that can actually stand on the board, in order.
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Material value of the king. Large enough to dominate every other
    /// term of the evaluation, small enough to keep the sums in `i32`.
    pub const KING_VALUE: i32 = 1000;

    /// Returns the material value of this kind.
    #[inline]
    pub const fn material_value(self) -> i32 {
        match self {
            PieceKind::Empty => 0,
            PieceKind::Pawn => 1,
            PieceKind::Knight => 3,
            PieceKind::Bishop => 3,
            PieceKind::Rook => 5,
            PieceKind::Queen => 9,
            PieceKind::King => Self::KING_VALUE,
        }
    }

    /// Returns the placement character for this kind with the given color.
    pub const fn to_char(self, color: Color) -> char {
        let c = match self {
            PieceKind::Empty => return '.',
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parses a placement character into a kind and color.
    pub const fn from_char(c: char) -> Option<(PieceKind, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some((kind, color))
    }

    /// Returns true for the `Empty` sentinel.
    #[inline]
    pub const fn is_empty(self) -> bool {
        matches!(self, PieceKind::Empty)
    }

    /// Returns true if this kind moves along rays (bishop, rook, or queen).
    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PieceKind::Empty => "Empty",
            PieceKind::Pawn => "Pawn",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Rook => "Rook",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_to_char() {
        assert_eq!(PieceKind::Pawn.to_char(Color::White), 'P');
        assert_eq!(PieceKind::Pawn.to_char(Color::Black), 'p');
        assert_eq!(PieceKind::King.to_char(Color::White), 'K');
        assert_eq!(PieceKind::Knight.to_char(Color::Black), 'n');
        assert_eq!(PieceKind::Empty.to_char(Color::White), '.');
    }

    #[test]
    fn kind_from_char() {
        assert_eq!(
            PieceKind::from_char('P'),
            Some((PieceKind::Pawn, Color::White))
        );
        assert_eq!(
            PieceKind::from_char('q'),
            Some((PieceKind::Queen, Color::Black))
        );
        assert_eq!(PieceKind::from_char('x'), None);
        assert_eq!(PieceKind::from_char('3'), None);
    }

    #[test]
    fn material_values() {
        assert_eq!(PieceKind::Empty.material_value(), 0);
        assert_eq!(PieceKind::Pawn.material_value(), 1);
        assert_eq!(PieceKind::Knight.material_value(), 3);
        assert_eq!(PieceKind::Bishop.material_value(), 3);
        assert_eq!(PieceKind::Rook.material_value(), 5);
        assert_eq!(PieceKind::Queen.material_value(), 9);
        assert!(PieceKind::King.material_value() > 8 * 9 + 4 * 5 + 4 * 3 + 8);
    }

    #[test]
    fn is_slider() {
        assert!(!PieceKind::Pawn.is_slider());
        assert!(!PieceKind::Knight.is_slider());
        assert!(PieceKind::Bishop.is_slider());
        assert!(PieceKind::Rook.is_slider());
        assert!(PieceKind::Queen.is_slider());
        assert!(!PieceKind::King.is_slider());
        assert!(!PieceKind::Empty.is_slider());
    }
}
