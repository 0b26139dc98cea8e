//! Fixed-depth minimax search.
//!
//! White maximizes and Black minimizes a single static score. The search is
//! full width: every legal move of every piece is played on the live game,
//! searched and taken back. There is no pruning and no move ordering.

use crate::movegen::{is_in_check, legal_moves};
use crate::{Board, EngineError, Game};
use chess_core::{Color, Coord, Move};
use tracing::debug;

/// Multiplier applied to material before the centralization term.
const MATERIAL_WEIGHT: i32 = 6;

/// Reference cell for the centralization term.
const CENTER: (i8, i8) = (3, 3);

/// Static score of the position: positive favours White.
///
/// Each piece contributes `material * 6 - distance to the center`, the
/// distance being measured in the piece's own orientation (White's rows are
/// mirrored), so mirror-symmetric positions score exactly zero.
pub fn evaluate(board: &Board) -> i32 {
    let mut score = 0i32;
    for piece in board.occupied() {
        let (x, y) = (piece.coord.x(), piece.coord.y());
        let y = match piece.color {
            Color::White => 7 - y,
            Color::Black => y,
        };
        let distance = ((x - CENTER.0).abs() + (y - CENTER.1).abs()) as i32;
        let value = piece.material_value() * MATERIAL_WEIGHT - distance;
        match piece.color {
            Color::White => score += value,
            Color::Black => score -= value,
        }
    }
    score
}

/// Counters collected during one search call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Positions visited, the root included.
    pub nodes: u64,
    /// Positions scored by the static evaluator.
    pub leaves: u64,
}

/// Search state.
pub struct Searcher<'a> {
    game: &'a mut Game,
    stats: SearchStats,
}

impl<'a> Searcher<'a> {
    pub fn new(game: &'a mut Game) -> Self {
        Searcher {
            game,
            stats: SearchStats::default(),
        }
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Scores the position `depth` plies deep with `maximizing` (White) or
    /// minimizing (Black) to move.
    ///
    /// A side without legal moves scores its worst value when in check and
    /// zero otherwise.
    pub fn search(&mut self, depth: u32, maximizing: bool) -> Result<i32, EngineError> {
        self.stats.nodes += 1;
        if depth == 0 || self.game.is_game_over() {
            self.stats.leaves += 1;
            return Ok(evaluate(self.game.board()));
        }

        let color = if maximizing { Color::White } else { Color::Black };
        let mut best = if maximizing { i32::MIN } else { i32::MAX };
        let mut any_move = false;

        for from in self.game.board().pieces(color).to_vec() {
            let moves = legal_moves(self.game, from)?;
            for &m in moves.without_stay() {
                any_move = true;
                let score = self.score_move(from, m, depth - 1, !maximizing)?;
                best = if maximizing {
                    best.max(score)
                } else {
                    best.min(score)
                };
            }
        }

        if !any_move && !is_in_check(self.game.board(), color)? {
            return Ok(0);
        }
        Ok(best)
    }

    /// Returns the best move for the side to move, or `None` if it has no
    /// legal move. The first of equally scored moves wins.
    pub fn find_best_move(&mut self, depth: u32) -> Result<Option<(Coord, Move)>, EngineError> {
        let depth = depth.max(1);
        let color = self.game.side_to_move();
        let maximizing = color == Color::White;
        let mut best: Option<(Coord, Move, i32)> = None;

        for from in self.game.board().pieces(color).to_vec() {
            let moves = legal_moves(self.game, from)?;
            for &m in moves.without_stay() {
                let score = self.score_move(from, m, depth - 1, !maximizing)?;
                let better = match best {
                    None => true,
                    Some((_, _, current)) if maximizing => score > current,
                    Some((_, _, current)) => score < current,
                };
                if better {
                    best = Some((from, m, score));
                }
            }
        }

        debug!(
            color = %color,
            depth,
            nodes = self.stats.nodes,
            leaves = self.stats.leaves,
            score = ?best.map(|(_, _, s)| s),
            "search finished"
        );
        Ok(best.map(|(from, m, _)| (from, m)))
    }

    fn score_move(
        &mut self,
        from: Coord,
        m: Move,
        depth: u32,
        maximizing: bool,
    ) -> Result<i32, EngineError> {
        let applied = self.game.apply_move(from, m)?;
        let score = self.search(depth, maximizing);
        if !applied.is_cancelled() {
            self.game.revert()?;
        }
        score
    }
}

impl Game {
    /// Runs [`Searcher::search`] on this game.
    pub fn search(&mut self, depth: u32, maximizing: bool) -> Result<i32, EngineError> {
        Searcher::new(self).search(depth, maximizing)
    }

    /// Runs [`Searcher::find_best_move`] on this game.
    pub fn find_best_move(&mut self, depth: u32) -> Result<Option<(Coord, Move)>, EngineError> {
        Searcher::new(self).find_best_move(depth)
    }
}
