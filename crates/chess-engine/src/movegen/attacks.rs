//! Check and checkmate detection.

use super::{has_legal_move, shape_moves, MoveList};
use crate::{Board, EngineError, Game};
use chess_core::{Color, Coord, PieceKind};
use tracing::debug;

/// Returns true if any piece of `by` attacks `target`.
///
/// Pawns attack their two forward diagonals whether or not the square is
/// occupied; every other kind attacks the squares its raw moves reach.
pub fn is_square_attacked(board: &Board, target: Coord, by: Color) -> bool {
    board.pieces(by).iter().any(|&from| {
        let piece = board.piece_at(from);
        if piece.kind == PieceKind::Pawn {
            let (dx, dy) = from.delta_to(target);
            return dy == by.pawn_direction() && dx.abs() == 1;
        }
        let mut moves = MoveList::new();
        shape_moves(board, piece, &mut moves);
        moves.as_slice().iter().any(|m| m.target(from) == Some(target))
    })
}

/// Returns true if the king of `defending` is attacked.
///
/// Fails with [`EngineError::MissingKing`] when `defending` has no king.
pub fn is_in_check(board: &Board, defending: Color) -> Result<bool, EngineError> {
    let king = board.find_king(defending)?.coord;
    Ok(is_square_attacked(board, king, defending.opposite()))
}

/// Returns true if `defending` is in check and no legal move escapes it.
///
/// A confirmed checkmate latches the board's game-over flag.
pub fn is_in_checkmate(game: &mut Game, defending: Color) -> Result<bool, EngineError> {
    if game.is_game_over() {
        return Ok(true);
    }
    if !is_in_check(game.board(), defending)? || has_legal_move(game, defending)? {
        return Ok(false);
    }
    game.board_mut().set_game_over();
    debug!(color = %defending, turn = game.turn(), "checkmate");
    Ok(true)
}
