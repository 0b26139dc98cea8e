//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator and
//! the apply/revert pair: every node is reached by applying a move to the
//! live game and left by reverting it.

use super::legal_moves;
use crate::{EngineError, Game};

/// Counts the number of leaf nodes at the given depth.
pub fn perft(game: &mut Game, depth: u32) -> Result<u64, EngineError> {
    if depth == 0 {
        return Ok(1);
    }

    let color = game.side_to_move();
    let mut nodes = 0u64;
    for from in game.board().pieces(color).to_vec() {
        let moves = legal_moves(game, from)?;
        if depth == 1 {
            nodes += moves.without_stay().len() as u64;
            continue;
        }
        for &m in moves.without_stay() {
            nodes += game.with_move(from, m, |g| perft(g, depth - 1))?;
        }
    }
    Ok(nodes)
}

/// Perft with divide: the node count below each root move, keyed by
/// `"<from><to>"` and sorted. Useful for locating a wrong count.
pub fn perft_divide(game: &mut Game, depth: u32) -> Result<Vec<(String, u64)>, EngineError> {
    let color = game.side_to_move();
    let mut results = Vec::new();

    for from in game.board().pieces(color).to_vec() {
        let moves = legal_moves(game, from)?;
        for &m in moves.without_stay() {
            let Some(to) = m.target(from) else {
                continue;
            };
            let nodes = if depth > 1 {
                game.with_move(from, m, |g| perft(g, depth - 1))?
            } else {
                1
            };
            results.push((format!("{}{}", from, to), nodes));
        }
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(results)
}
