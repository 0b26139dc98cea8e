//! Board coordinate representation.

use std::fmt;

/// Number of files and rows on the board.
pub const BOARD_SIZE: i8 = 8;

/// A cell of the 8x8 grid.
///
/// `x` is the file (0 = a, 7 = h). `y` is the row in placement-string order:
/// row 0 is the first rank written in a placement string (rank 8), row 7
/// the last one (rank 1).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    x: u8,
    y: u8,
}

impl Coord {
    /// Creates a coordinate, returning `None` outside `[0, 7]`.
    #[inline]
    pub const fn new(x: i8, y: i8) -> Option<Self> {
        if Self::in_bounds(x, y) {
            Some(Coord {
                x: x as u8,
                y: y as u8,
            })
        } else {
            None
        }
    }

    /// Returns true if `(x, y)` lies on the board.
    #[inline]
    pub const fn in_bounds(x: i8, y: i8) -> bool {
        x >= 0 && x < BOARD_SIZE && y >= 0 && y < BOARD_SIZE
    }

    /// Creates a coordinate from a row-major index (0-63).
    #[inline]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < 64 {
            Some(Coord {
                x: (index % 8) as u8,
                y: (index / 8) as u8,
            })
        } else {
            None
        }
    }

    /// Parses algebraic notation (e.g., "e2").
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return None;
        }
        Coord::new((file - b'a') as i8, (b'8' - rank) as i8)
    }

    #[inline]
    pub const fn x(self) -> i8 {
        self.x as i8
    }

    #[inline]
    pub const fn y(self) -> i8 {
        self.y as i8
    }

    /// Returns the row-major index (0-63).
    #[inline]
    pub const fn index(self) -> usize {
        self.y as usize * 8 + self.x as usize
    }

    /// Returns the coordinate displaced by `(dx, dy)`, if it stays on the board.
    #[inline]
    pub const fn offset(self, dx: i8, dy: i8) -> Option<Self> {
        Coord::new(self.x() + dx, self.y() + dy)
    }

    /// Returns the `(dx, dy)` displacement that leads from `self` to `to`.
    #[inline]
    pub const fn delta_to(self, to: Coord) -> (i8, i8) {
        (to.x() - self.x(), to.y() - self.y())
    }

    /// Manhattan distance to `(cx, cy)`.
    #[inline]
    pub const fn manhattan_to(self, cx: i8, cy: i8) -> i32 {
        ((self.x() - cx).abs() + (self.y() - cy).abs()) as i32
    }

    /// Returns the algebraic notation for this coordinate.
    pub fn to_algebraic(self) -> String {
        format!("{}{}", (b'a' + self.x) as char, 8 - self.y)
    }

    /// Iterates over all 64 coordinates in row-major order.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..64).filter_map(Coord::from_index)
    }

    // Corners and king squares
    pub const A8: Coord = Coord { x: 0, y: 0 };
    pub const E8: Coord = Coord { x: 4, y: 0 };
    pub const H8: Coord = Coord { x: 7, y: 0 };
    pub const A1: Coord = Coord { x: 0, y: 7 };
    pub const E1: Coord = Coord { x: 4, y: 7 };
    pub const H1: Coord = Coord { x: 7, y: 7 };
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coord({}, {} = {})", self.x, self.y, self.to_algebraic())
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}
