//! The 8x8 grid and the per-color piece registries.

use crate::{EngineError, Piece};
use chess_core::{Color, Coord, PieceKind, Placement};
use std::fmt;

/// The board: one occupant per cell plus a registry of live pieces per color.
///
/// Invariants kept by every mutating method:
/// - every non-empty cell appears in exactly one color registry,
/// - every registered coordinate holds a piece of that color whose
///   `coord` field equals the cell.
#[derive(Debug, Clone)]
pub struct Board {
    grid: [Piece; 64],
    registry: [Vec<Coord>; 2],
    game_over: bool,
}

impl Board {
    /// Creates a board with every cell empty.
    pub fn empty() -> Self {
        let mut grid = [Piece::empty(Coord::A8); 64];
        for c in Coord::all() {
            grid[c.index()] = Piece::empty(c);
        }
        Board {
            grid,
            registry: [Vec::with_capacity(16), Vec::with_capacity(16)],
            game_over: false,
        }
    }

    /// Builds a board from parsed placement data.
    pub fn from_placement(placement: &Placement) -> Self {
        let mut board = Board::empty();
        for (coord, kind, color) in placement.pieces() {
            board.place(Piece::new(kind, color, coord));
        }
        board
    }

    /// Parses a placement string and builds the board.
    pub fn from_placement_str(s: &str) -> Result<Self, EngineError> {
        Ok(Self::from_placement(&Placement::parse(s)?))
    }

    /// Bounds-checked access to the occupant of `(x, y)`.
    pub fn occupant(&self, x: i8, y: i8) -> Result<&Piece, EngineError> {
        Coord::new(x, y)
            .map(|c| self.piece_at(c))
            .ok_or(EngineError::OutOfRange { x, y })
    }

    /// Returns the occupant of an already validated coordinate.
    #[inline]
    pub fn piece_at(&self, coord: Coord) -> &Piece {
        &self.grid[coord.index()]
    }

    #[inline]
    pub(crate) fn piece_at_mut(&mut self, coord: Coord) -> &mut Piece {
        &mut self.grid[coord.index()]
    }

    /// True if `piece` may end a move on `(x, y)`: on the board and either
    /// vacant or held by the other side.
    pub fn can_occupy(&self, piece: &Piece, x: i8, y: i8) -> bool {
        match self.occupant(x, y) {
            Ok(target) => target.is_empty() || target.color != piece.color,
            Err(_) => false,
        }
    }

    /// True if `(x, y)` is on the board and vacant. Pawns never capture
    /// straight ahead.
    pub fn pawn_can_advance(&self, x: i8, y: i8) -> bool {
        matches!(self.occupant(x, y), Ok(target) if target.is_empty())
    }

    /// True if `(x, y)` holds a piece of the side opposing `piece`.
    pub fn pawn_can_capture_diagonal(&self, piece: &Piece, x: i8, y: i8) -> bool {
        matches!(self.occupant(x, y), Ok(target) if target.is_enemy_of(piece.color))
    }

    /// True if `(x, y)` holds an opposing pawn that advanced two squares on
    /// the turn right before `current_turn`.
    pub fn en_passant_eligible(&self, pawn: &Piece, x: i8, y: i8, current_turn: u32) -> bool {
        match self.occupant(x, y) {
            Ok(target) => {
                target.kind == PieceKind::Pawn
                    && target.is_enemy_of(pawn.color)
                    && current_turn > 0
                    && target.two_step_turn == Some(current_turn - 1)
            }
            Err(_) => false,
        }
    }

    /// Moves the occupant of `from` to `to` and returns whatever stood on `to`.
    ///
    /// The evicted piece is taken off its registry but otherwise left intact,
    /// so it can be put back later. `from` becomes empty.
    pub fn relocate(&mut self, from: Coord, to: Coord) -> Piece {
        if from == to {
            return Piece::empty(to);
        }
        let captured = self.remove(to);
        let mut mover = self.remove(from);
        if !mover.is_empty() {
            mover.coord = to;
            self.place(mover);
        }
        captured
    }

    /// Takes the occupant off `coord`, leaving the cell empty.
    pub fn remove(&mut self, coord: Coord) -> Piece {
        let piece = std::mem::replace(&mut self.grid[coord.index()], Piece::empty(coord));
        if !piece.is_empty() {
            let list = &mut self.registry[piece.color.index()];
            if let Some(pos) = list.iter().position(|&c| c == coord) {
                list.swap_remove(pos);
            }
        }
        piece
    }

    /// Puts `piece` on the cell named by its own `coord`, evicting any occupant.
    pub fn place(&mut self, piece: Piece) {
        let coord = piece.coord;
        self.remove(coord);
        if !piece.is_empty() {
            self.registry[piece.color.index()].push(coord);
        }
        self.grid[coord.index()] = piece;
    }

    /// Returns the king of `color`.
    pub fn find_king(&self, color: Color) -> Result<&Piece, EngineError> {
        self.registry[color.index()]
            .iter()
            .map(|&c| self.piece_at(c))
            .find(|p| p.kind == PieceKind::King)
            .ok_or(EngineError::MissingKing(color))
    }

    /// Coordinates of the live pieces of `color`, in no particular order.
    #[inline]
    pub fn pieces(&self, color: Color) -> &[Coord] {
        &self.registry[color.index()]
    }

    /// Iterates over the live pieces of both colors.
    pub fn occupied(&self) -> impl Iterator<Item = &Piece> + '_ {
        Color::ALL
            .into_iter()
            .flat_map(move |color| self.registry[color.index()].iter())
            .map(move |&c| self.piece_at(c))
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Latches the game-over flag. There is no way to clear it.
    #[inline]
    pub(crate) fn set_game_over(&mut self) {
        self.game_over = true;
    }

    /// Returns the current placement.
    pub fn placement(&self) -> Placement {
        let mut placement = Placement::empty();
        for piece in self.occupied() {
            placement.set(piece.coord, piece.kind, piece.color);
        }
        placement
    }

    /// Checks the grid/registry invariants, describing the first violation.
    pub fn validate(&self) -> Result<(), String> {
        for color in Color::ALL {
            for &c in self.pieces(color) {
                let p = self.piece_at(c);
                if p.is_empty() || p.color != color || p.coord != c {
                    return Err(format!("{} registry lists {} holding {:?}", color, c, p));
                }
            }
        }
        for c in Coord::all() {
            let p = self.piece_at(c);
            if p.coord != c {
                return Err(format!("cell {} holds piece claiming {}", c, p.coord));
            }
            if !p.is_empty() {
                let listed = self.pieces(p.color).iter().filter(|&&l| l == c).count();
                if listed != 1 {
                    return Err(format!("{} at {} is registered {} times", p.kind, c, listed));
                }
            }
        }
        Ok(())
    }

    fn sorted_registry(&self, color: Color) -> Vec<Coord> {
        let mut coords = self.registry[color.index()].clone();
        coords.sort();
        coords
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::from_placement(&Placement::default())
    }
}

/// Registries are compared as sets: their order carries no meaning.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.grid == other.grid
            && self.game_over == other.game_over
            && Color::ALL
                .into_iter()
                .all(|c| self.sorted_registry(c) == other.sorted_registry(c))
    }
}

impl Eq for Board {}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..8i8 {
            write!(f, "{} ", 8 - y)?;
            for x in 0..8i8 {
                let c = Coord::new(x, y).ok_or(fmt::Error)?;
                write!(f, " {}", self.piece_at(c).to_char())?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> Coord {
        Coord::from_algebraic(s).unwrap()
    }

    #[test]
    fn standard_board() {
        let board = Board::default();
        assert_eq!(board.pieces(Color::White).len(), 16);
        assert_eq!(board.pieces(Color::Black).len(), 16);
        assert!(board.validate().is_ok());
        assert_eq!(board.placement().to_string(), Placement::STANDARD);
        assert!(!board.is_game_over());
    }

    #[test]
    fn occupant_bounds() {
        let board = Board::default();
        assert_eq!(board.occupant(4, 7).unwrap().kind, PieceKind::King);
        assert_eq!(
            board.occupant(8, 0),
            Err(EngineError::OutOfRange { x: 8, y: 0 })
        );
        assert_eq!(
            board.occupant(0, -1),
            Err(EngineError::OutOfRange { x: 0, y: -1 })
        );
    }

    #[test]
    fn occupancy_predicates() {
        let board = Board::from_placement_str("8/8/8/3p4/4P3/8/8/8").unwrap();
        let pawn = *board.piece_at(at("e4"));
        // d5 holds a black pawn, e5 is vacant
        assert!(board.can_occupy(&pawn, 3, 3));
        assert!(board.can_occupy(&pawn, 4, 3));
        assert!(!board.can_occupy(&pawn, 4, 4));
        assert!(!board.can_occupy(&pawn, 8, 3));
        assert!(board.pawn_can_advance(4, 3));
        assert!(!board.pawn_can_advance(3, 3));
        assert!(!board.pawn_can_advance(4, -1));
        assert!(board.pawn_can_capture_diagonal(&pawn, 3, 3));
        assert!(!board.pawn_can_capture_diagonal(&pawn, 5, 3));
    }

    #[test]
    fn en_passant_window() {
        let mut board = Board::from_placement_str("8/8/8/3pP3/8/8/8/8").unwrap();
        board.piece_at_mut(at("d5")).two_step_turn = Some(6);
        let pawn = *board.piece_at(at("e5"));
        assert!(board.en_passant_eligible(&pawn, 3, 3, 7));
        assert!(!board.en_passant_eligible(&pawn, 3, 3, 8));
        assert!(!board.en_passant_eligible(&pawn, 5, 3, 7));
        assert!(!board.en_passant_eligible(&pawn, -1, 3, 7));
    }

    #[test]
    fn relocate_captures() {
        let mut board = Board::from_placement_str("8/8/8/3p4/4P3/8/8/8").unwrap();
        let captured = board.relocate(at("e4"), at("d5"));
        assert_eq!(captured.kind, PieceKind::Pawn);
        assert_eq!(captured.color, Color::Black);
        assert_eq!(captured.coord, at("d5"));
        assert!(board.piece_at(at("e4")).is_empty());
        assert_eq!(board.piece_at(at("d5")).color, Color::White);
        assert_eq!(board.piece_at(at("d5")).coord, at("d5"));
        assert!(board.pieces(Color::Black).is_empty());
        assert_eq!(board.pieces(Color::White), &[at("d5")]);
        assert!(board.validate().is_ok());
    }

    #[test]
    fn relocate_in_place_is_noop() {
        let mut board = Board::default();
        let before = board.clone();
        let captured = board.relocate(at("e2"), at("e2"));
        assert!(captured.is_empty());
        assert_eq!(board, before);
    }

    #[test]
    fn find_king() {
        let board = Board::from_placement_str("8/8/8/8/8/8/PPPPPPPP/RNBQKBNR").unwrap();
        let king = board.find_king(Color::White).unwrap();
        assert_eq!(king.coord, at("e1"));
        assert_eq!(
            board.find_king(Color::Black),
            Err(EngineError::MissingKing(Color::Black))
        );
    }

    #[test]
    fn registry_order_does_not_matter() {
        let mut a = Board::default();
        let b = Board::default();
        let knight = a.remove(at("b1"));
        a.place(knight);
        assert_eq!(a, b);
    }

    #[test]
    fn display() {
        let board = Board::from_placement_str("4k3/8/8/8/8/8/8/4K3").unwrap();
        let text = board.to_string();
        assert!(text.starts_with("8  . . . . k . . ."));
        assert!(text.contains("1  . . . . K . . ."));
        assert!(text.ends_with("a b c d e f g h"));
    }
}
