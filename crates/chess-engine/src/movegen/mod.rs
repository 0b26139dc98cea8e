//! Move generation.
//!
//! Generation happens in two stages. [`raw_moves`] produces the candidates a
//! piece's shape allows on the current occupancy; [`legal_moves`] keeps the
//! candidates that do not leave the mover's own king in check, finding out by
//! playing each one on the live board and taking it back.
//!
//! Every list starts with [`Move::STAY`], the "stay put" sentinel a front end
//! uses to cancel a selection.

mod attacks;
pub mod perft;

use crate::rules::CastlingRule;
use crate::{Board, EngineError, Game, Piece};
use chess_core::{Color, Coord, Move, PieceKind, SpecialMove};

pub use attacks::{is_in_check, is_in_checkmate, is_square_attacked};

/// A list of moves with a fixed maximum capacity.
///
/// A single piece has at most 27 destinations (a centralized queen), so one
/// piece's list never needs the heap.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Maximum number of moves for one piece, sentinel included.
    pub const MAX_MOVES: usize = 32;

    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::STAY; Self::MAX_MOVES],
            len: 0,
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    /// Returns the number of moves.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    /// Returns the moves after the leading sentinel.
    #[inline]
    pub fn without_stay(&self) -> &[Move] {
        match self.as_slice() {
            [first, rest @ ..] if first.is_stay() => rest,
            all => all,
        }
    }

    /// Finds the move that takes a piece standing on `from` to `to`.
    pub fn find_target(&self, from: Coord, to: Coord) -> Option<Move> {
        self.as_slice()
            .iter()
            .copied()
            .find(|m| m.target(from) == Some(to))
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        debug_assert!(index < self.len);
        &self.moves[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

const ORTHOGONALS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Generates the raw candidates of the piece on `from`.
///
/// The list starts with the sentinel and is otherwise empty for a vacant
/// cell. `turn` is the current turn counter; only pawns consult it, for the
/// en passant window.
pub fn raw_moves(board: &Board, from: Coord, turn: u32) -> MoveList {
    let piece = *board.piece_at(from);
    let mut moves = MoveList::new();
    moves.push(Move::STAY);

    match piece.kind {
        PieceKind::Empty => {}
        PieceKind::Pawn => pawn_moves(board, &piece, turn, &mut moves),
        _ => shape_moves(board, &piece, &mut moves),
    }
    if piece.kind == PieceKind::Rook {
        castling_move(board, &piece, &mut moves);
    }
    moves
}

/// Generates the candidates of a non-pawn piece, castling excluded.
///
/// These are exactly the squares the piece attacks.
pub(crate) fn shape_moves(board: &Board, piece: &Piece, moves: &mut MoveList) {
    match piece.kind {
        PieceKind::Knight => leaper_moves(board, piece, &KNIGHT_OFFSETS, moves),
        PieceKind::King => leaper_moves(board, piece, &KING_OFFSETS, moves),
        PieceKind::Bishop => slider_moves(board, piece, &DIAGONALS, moves),
        PieceKind::Rook => slider_moves(board, piece, &ORTHOGONALS, moves),
        PieceKind::Queen => {
            slider_moves(board, piece, &DIAGONALS, moves);
            slider_moves(board, piece, &ORTHOGONALS, moves);
        }
        PieceKind::Pawn | PieceKind::Empty => {}
    }
}

/// Generates pawn advances, captures and en passant captures.
fn pawn_moves(board: &Board, pawn: &Piece, turn: u32, moves: &mut MoveList) {
    let dir = pawn.color.pawn_direction();
    let (x, y) = (pawn.coord.x(), pawn.coord.y());
    let promotion_row = pawn.color.promotion_row() as i8;
    let mut push = |dx: i8, dy: i8, special: SpecialMove| {
        let special = if special == SpecialMove::None && y + dy == promotion_row {
            SpecialMove::Promotion
        } else {
            special
        };
        moves.push(Move::new(dx, dy, special));
    };

    if board.pawn_can_advance(x, y + dir) {
        push(0, dir, SpecialMove::None);
        if pawn.is_unmoved() && board.pawn_can_advance(x, y + 2 * dir) {
            push(0, 2 * dir, SpecialMove::None);
        }
    }

    for dx in [-1, 1] {
        if board.pawn_can_capture_diagonal(pawn, x + dx, y + dir) {
            push(dx, dir, SpecialMove::None);
        }
    }

    for dx in [-1, 1] {
        if board.en_passant_eligible(pawn, x + dx, y, turn)
            && board.pawn_can_advance(x + dx, y + dir)
        {
            push(dx, dir, SpecialMove::EnPassant);
        }
    }
}

/// Generates one-step moves to each offset the piece may occupy.
fn leaper_moves(board: &Board, piece: &Piece, offsets: &[(i8, i8)], moves: &mut MoveList) {
    let (x, y) = (piece.coord.x(), piece.coord.y());
    for &(dx, dy) in offsets {
        if board.can_occupy(piece, x + dx, y + dy) {
            moves.push(Move::normal(dx, dy));
        }
    }
}

/// Walks each ray until the edge, an own piece (excluded) or an enemy piece
/// (included).
fn slider_moves(board: &Board, piece: &Piece, rays: &[(i8, i8)], moves: &mut MoveList) {
    let (x, y) = (piece.coord.x(), piece.coord.y());
    for &(dx, dy) in rays {
        let (mut step_x, mut step_y) = (dx, dy);
        while let Ok(target) = board.occupant(x + step_x, y + step_y) {
            if target.is_empty() {
                moves.push(Move::normal(step_x, step_y));
            } else {
                if target.color != piece.color {
                    moves.push(Move::normal(step_x, step_y));
                }
                break;
            }
            step_x += dx;
            step_y += dy;
        }
    }
}

/// Adds the castling candidate of `rook` when the pieces and the squares
/// between them allow it.
///
/// Only rooks on the a- and h-files castle. The candidate carries the rook's
/// own displacement: it lands on the square the king crosses, next to the
/// king's landing square.
fn castling_move(board: &Board, rook: &Piece, moves: &mut MoveList) {
    if !rook.is_unmoved() || !matches!(rook.coord.x(), 0 | 7) {
        return;
    }
    let Ok(king) = board.find_king(rook.color) else {
        return;
    };
    if !king.is_unmoved() || king.coord.y() != rook.coord.y() || king.coord.x() != 4 {
        return;
    }

    let y = rook.coord.y();
    let dir = (king.coord.x() - rook.coord.x()).signum();
    let mut x = rook.coord.x() + dir;
    while x != king.coord.x() {
        if !board.pawn_can_advance(x, y) {
            return;
        }
        x += dir;
    }

    let rook_landing = king.coord.x() - dir;
    moves.push(Move::new(
        rook_landing - rook.coord.x(),
        0,
        SpecialMove::Castling,
    ));
}

/// Returns the square the king crosses when `rook` castles, and the king's
/// landing square.
pub(crate) fn castling_squares(king: Coord, rook: Coord) -> Option<(Coord, Coord)> {
    let dir = (king.x() - rook.x()).signum();
    Some((king.offset(-dir, 0)?, king.offset(-2 * dir, 0)?))
}

/// Generates the legal moves of the piece on `from`, sentinel first.
///
/// Every candidate is applied to the live board and taken back before the
/// next one is tried, so the game is unchanged on return. A vacant cell
/// yields only the sentinel.
pub fn legal_moves(game: &mut Game, from: Coord) -> Result<MoveList, EngineError> {
    let piece = *game.board().piece_at(from);
    let raw = raw_moves(game.board(), from, game.turn());
    let mut legal = MoveList::new();
    legal.push(Move::STAY);
    if piece.is_empty() {
        return Ok(legal);
    }

    for &m in raw.without_stay() {
        if m.special() == SpecialMove::Castling
            && game.options().castling == CastlingRule::Strict
            && !strict_castling_allowed(game.board(), &piece)?
        {
            continue;
        }
        let safe = game.with_move(from, m, |g| Ok(!is_in_check(g.board(), piece.color)?))?;
        if safe {
            legal.push(m);
        }
    }
    Ok(legal)
}

/// The extra castling test of [`CastlingRule::Strict`]: the king is not in
/// check and the square it crosses is not attacked.
fn strict_castling_allowed(board: &Board, rook: &Piece) -> Result<bool, EngineError> {
    let king = board.find_king(rook.color)?.coord;
    if is_in_check(board, rook.color)? {
        return Ok(false);
    }
    match castling_squares(king, rook.coord) {
        Some((crossed, _)) => Ok(!is_square_attacked(board, crossed, rook.color.opposite())),
        None => Ok(false),
    }
}

/// Returns true if any piece of `color` has a legal move.
pub fn has_legal_move(game: &mut Game, color: Color) -> Result<bool, EngineError> {
    for from in game.board().pieces(color).to_vec() {
        if legal_moves(game, from)?.len() > 1 {
            return Ok(true);
        }
    }
    Ok(false)
}
