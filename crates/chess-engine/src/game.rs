//! Game state management.
//!
//! [`Game`] owns the board, the undo log and the turn counter, and is the
//! only way to change them. It offers two layers:
//! - the raw primitives [`Game::apply_move`] and [`Game::revert`], used by
//!   legality filtering, the search and perft;
//! - the interactive commands ([`Game::select`], [`Game::attempt_move`],
//!   [`Game::play`], [`Game::undo`]) that validate input, run the
//!   check/checkmate tests and queue [`GameEvent`]s for a front end.
//!
//! Events are queued only by the interactive commands; speculative
//! application leaves no trace.

use crate::history::{History, PlyRecord};
use crate::movegen::{is_in_check, is_in_checkmate, legal_moves, MoveList};
use crate::{Board, EngineError, GameOptions, Handle, HistoryEntry, Piece};
use chess_core::{Color, Coord, Move, PieceKind, Placement, SpecialMove};
use tracing::{debug, trace, warn};

/// Notification for a front end, drained with [`Game::drain_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A piece moved from one cell to another.
    Moved {
        from: Coord,
        to: Coord,
        kind: PieceKind,
        color: Color,
    },
    /// A piece left the board; its visual should be hidden.
    Captured { handle: Option<Handle>, piece: Piece },
    /// An undo put a captured piece back; its visual should be shown again.
    Restored { handle: Option<Handle>, piece: Piece },
    /// A pawn became a queen.
    Promoted { at: Coord, color: Color },
    /// The king of `color` is attacked.
    Check { color: Color },
    /// `checkmated` has lost. Emitted once, when the game-over flag latches.
    Checkmate { checkmated: Color },
}

/// What [`Game::apply_move`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedMove {
    pub from: Coord,
    pub to: Coord,
    pub special: SpecialMove,
    /// The piece taken off the board, en passant victims included.
    pub captured: Option<Piece>,
    pub promoted: bool,
}

impl AppliedMove {
    /// Returns true when origin and destination coincide and nothing happened.
    pub fn is_cancelled(&self) -> bool {
        self.from == self.to
    }
}

/// Result of an interactive move attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The origin was chosen again; the selection was dropped.
    Cancelled,
    /// The move was played.
    Played {
        applied: AppliedMove,
        /// The side now to move is in check.
        check: bool,
        checkmate: bool,
    },
}

/// The selected piece and its cached legal moves.
#[derive(Debug, Clone)]
pub struct Selection {
    origin: Coord,
    moves: MoveList,
}

impl Selection {
    pub fn origin(&self) -> Coord {
        self.origin
    }

    /// Legal moves of the selected piece, sentinel excluded.
    pub fn moves(&self) -> &[Move] {
        self.moves.without_stay()
    }

    /// Absolute destinations of the legal moves.
    pub fn targets(&self) -> impl Iterator<Item = Coord> + '_ {
        self.moves().iter().filter_map(move |m| m.target(self.origin))
    }
}

/// A game in progress.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    history: History,
    turn: u32,
    options: GameOptions,
    selection: Option<Selection>,
    events: Vec<GameEvent>,
    /// Set once a command ran into a board without a king.
    halted: Option<Color>,
}

impl Default for Game {
    fn default() -> Self {
        Self::standard()
    }
}

impl Game {
    /// Creates a game from the standard starting position with default options.
    pub fn standard() -> Self {
        Self::with_board(
            Board::from_placement(&Placement::default()),
            Color::White,
            GameOptions::default(),
        )
    }

    /// Creates a game from a placement string, White to move.
    pub fn from_placement(placement: &str, options: GameOptions) -> Result<Self, EngineError> {
        Self::from_placement_with_side(placement, Color::White, options)
    }

    /// Creates a game from a placement string with the given side to move.
    pub fn from_placement_with_side(
        placement: &str,
        side_to_move: Color,
        options: GameOptions,
    ) -> Result<Self, EngineError> {
        let board = Board::from_placement_str(placement)?;
        Ok(Self::with_board(board, side_to_move, options))
    }

    fn with_board(board: Board, side_to_move: Color, options: GameOptions) -> Self {
        let turn = match side_to_move {
            Color::White => 1,
            Color::Black => 2,
        };
        Game {
            board,
            history: History::new(),
            turn,
            options,
            selection: None,
            events: Vec::new(),
            halted: None,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Returns the turn counter. Odd turns are White's.
    #[inline]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        Color::for_turn(self.turn)
    }

    #[inline]
    pub fn options(&self) -> &GameOptions {
        &self.options
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.board.is_game_over()
    }

    /// Returns the color whose missing king stopped the game, if any.
    pub fn halted(&self) -> Option<Color> {
        self.halted
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Coordinates of the live pieces of `color`.
    pub fn pieces(&self, color: Color) -> &[Coord] {
        self.board.pieces(color)
    }

    /// Returns the legal moves of the piece on `from`, sentinel first.
    pub fn legal_moves(&mut self, from: Coord) -> Result<MoveList, EngineError> {
        legal_moves(self, from)
    }

    /// Returns the legal destinations of the piece on `from`.
    pub fn legal_targets(&mut self, from: Coord) -> Result<Vec<Coord>, EngineError> {
        let moves = legal_moves(self, from)?;
        Ok(moves
            .without_stay()
            .iter()
            .filter_map(|m| m.target(from))
            .collect())
    }

    /// Applies `m` to the piece on `from` without validating it.
    ///
    /// Special side effects run first: an en passant capture removes the
    /// passed pawn, castling carries the king two squares toward the rook.
    /// Each pushes its own tagged entry before the mover's entry. A pawn
    /// reaching its promotion row becomes a queen. The stay move changes
    /// nothing, pushes nothing and does not advance the turn.
    pub fn apply_move(&mut self, from: Coord, m: Move) -> Result<AppliedMove, EngineError> {
        let mover = *self.board.piece_at(from);
        if mover.is_empty() {
            return Err(EngineError::EmptySquare(from));
        }
        let to = m.target(from).ok_or(EngineError::OutOfRange {
            x: from.x() + m.dx(),
            y: from.y() + m.dy(),
        })?;
        let mut applied = AppliedMove {
            from,
            to,
            special: m.special(),
            captured: None,
            promoted: false,
        };
        if m.is_stay() {
            return Ok(applied);
        }

        match m.special() {
            SpecialMove::EnPassant => {
                let passed = Coord::new(to.x(), from.y()).ok_or(EngineError::OutOfRange {
                    x: to.x(),
                    y: from.y(),
                })?;
                let victim = *self.board.piece_at(passed);
                if !victim.is_empty() {
                    self.history
                        .push(HistoryEntry::removal(victim, SpecialMove::EnPassant));
                    self.board.remove(passed);
                    applied.captured = Some(victim);
                }
            }
            SpecialMove::Castling => {
                let king = *self.board.find_king(mover.color)?;
                let (_, landing) = crate::movegen::castling_squares(king.coord, from).ok_or(
                    EngineError::OutOfRange {
                        x: king.coord.x(),
                        y: king.coord.y(),
                    },
                )?;
                let displaced = *self.board.piece_at(landing);
                self.history
                    .push(HistoryEntry::new(king, displaced, SpecialMove::Castling));
                self.board.relocate(king.coord, landing);
                self.board.piece_at_mut(landing).has_moved = true;
            }
            SpecialMove::None | SpecialMove::Promotion => {}
        }

        let displaced = *self.board.piece_at(to);
        self.history
            .push(HistoryEntry::new(mover, displaced, SpecialMove::None));
        let captured = self.board.relocate(from, to);
        if !captured.is_empty() {
            applied.captured = Some(captured);
        }

        let moved = self.board.piece_at_mut(to);
        moved.has_moved = true;
        if moved.kind == PieceKind::Pawn {
            if m.dy().abs() == 2 {
                moved.two_step_turn = Some(self.turn);
            }
            if to.y() == moved.color.promotion_row() as i8 {
                let mut queen = Piece::new(PieceKind::Queen, moved.color, to);
                queen.has_moved = true;
                self.board.place(queen);
                applied.promoted = true;
            }
        }

        trace!(%from, %to, special = ?m.special(), turn = self.turn, "apply");
        self.turn += 1;
        Ok(applied)
    }

    /// Takes back the most recent ply, chained entries included.
    pub fn revert(&mut self) -> Result<PlyRecord, EngineError> {
        let ply = match self.history.pop_ply() {
            Ok(ply) => ply,
            Err(e) => {
                warn!(turn = self.turn, "revert with empty history");
                return Err(e);
            }
        };
        for entry in ply.entries() {
            entry.restore(&mut self.board);
        }
        self.turn -= 1;
        trace!(from = %ply.primary.from.coord, to = %ply.primary.to.coord, turn = self.turn, "revert");
        Ok(ply)
    }

    /// Applies `m`, runs `f` on the changed game and reverts.
    ///
    /// The move is taken back whether `f` succeeds or fails.
    pub fn with_move<T, F>(&mut self, from: Coord, m: Move, f: F) -> Result<T, EngineError>
    where
        F: FnOnce(&mut Game) -> Result<T, EngineError>,
    {
        let applied = self.apply_move(from, m)?;
        let result = f(self);
        if !applied.is_cancelled() {
            self.revert()?;
        }
        result
    }

    /// Selects the piece on `coord` and returns its legal moves.
    pub fn select(&mut self, coord: Coord) -> Result<&[Move], EngineError> {
        self.ensure_playable()?;
        let piece = *self.board.piece_at(coord);
        if piece.is_empty() {
            return Err(EngineError::EmptySquare(coord));
        }
        if self.options.enforce_turn_order && piece.color != self.side_to_move() {
            return Err(EngineError::NotYourTurn { color: piece.color });
        }
        let result = legal_moves(self, coord);
        let moves = self.guard(result)?;
        let selection = self.selection.insert(Selection {
            origin: coord,
            moves,
        });
        Ok(selection.moves())
    }

    /// Drops the current selection.
    pub fn deselect(&mut self) {
        self.selection = None;
    }

    /// Moves the selected piece to `to`.
    ///
    /// Choosing the origin again cancels the selection. A destination outside
    /// the cached legal set is rejected and the board is left unchanged.
    pub fn attempt_move(&mut self, to: Coord) -> Result<MoveOutcome, EngineError> {
        self.ensure_playable()?;
        let selection = self
            .selection
            .as_ref()
            .ok_or(EngineError::NothingSelected)?;
        let from = selection.origin;
        if to == from {
            self.selection = None;
            return Ok(MoveOutcome::Cancelled);
        }
        let m = selection
            .moves
            .find_target(from, to)
            .ok_or(EngineError::IllegalMoveRequested { from, to })?;
        self.commit(from, m)
    }

    /// Selects `from` and moves it to `to`.
    ///
    /// A king moving two files along its row asks for castling with the rook
    /// on that side.
    pub fn play(&mut self, from: Coord, to: Coord) -> Result<MoveOutcome, EngineError> {
        if let Some(rook) = self.castling_rook(from, to) {
            let castle = self
                .select(rook)?
                .iter()
                .copied()
                .find(|m| m.special() == SpecialMove::Castling);
            return match castle {
                Some(m) => self.commit(rook, m),
                None => {
                    self.selection = None;
                    Err(EngineError::IllegalMoveRequested { from, to })
                }
            };
        }
        self.select(from)?;
        let outcome = self.attempt_move(to);
        if outcome.is_err() {
            self.selection = None;
        }
        outcome
    }

    /// Selects `from` and plays exactly `m`, which must be one of its legal
    /// moves.
    pub fn play_move(&mut self, from: Coord, m: Move) -> Result<MoveOutcome, EngineError> {
        let legal = self.select(from)?.contains(&m);
        if !legal {
            self.selection = None;
            let to = m.target(from).unwrap_or(from);
            return Err(EngineError::IllegalMoveRequested { from, to });
        }
        self.commit(from, m)
    }

    /// Plays a validated move and runs the post-move tests.
    fn commit(&mut self, from: Coord, m: Move) -> Result<MoveOutcome, EngineError> {
        let mover = *self.board.piece_at(from);
        let result = self.apply_move(from, m);
        let applied = self.guard(result)?;
        self.selection = None;

        self.events.push(GameEvent::Moved {
            from,
            to: applied.to,
            kind: mover.kind,
            color: mover.color,
        });
        if applied.special == SpecialMove::Castling {
            if let [.., king, _] = self.history.entries() {
                self.events.push(GameEvent::Moved {
                    from: king.from.coord,
                    to: king.to.coord,
                    kind: PieceKind::King,
                    color: mover.color,
                });
            }
        }
        if let Some(piece) = applied.captured {
            self.events.push(GameEvent::Captured {
                handle: piece.handle,
                piece,
            });
        }
        if applied.promoted {
            self.events.push(GameEvent::Promoted {
                at: applied.to,
                color: mover.color,
            });
        }

        let defending = mover.color.opposite();
        let result = is_in_check(&self.board, defending);
        let check = self.guard(result)?;
        let mut checkmate = false;
        if check {
            debug!(color = %defending, turn = self.turn, "check");
            self.events.push(GameEvent::Check { color: defending });
            let result = is_in_checkmate(self, defending);
            checkmate = self.guard(result)?;
            if checkmate {
                self.events.push(GameEvent::Checkmate {
                    checkmated: defending,
                });
            }
        }

        Ok(MoveOutcome::Played {
            applied,
            check,
            checkmate,
        })
    }

    /// The rook a king's two-file move on `from` asks to castle with.
    fn castling_rook(&self, from: Coord, to: Coord) -> Option<Coord> {
        let king = self.board.piece_at(from);
        let (dx, dy) = from.delta_to(to);
        if king.kind != PieceKind::King || dy != 0 || dx.abs() != 2 {
            return None;
        }
        let rook = Coord::new(if dx > 0 { 7 } else { 0 }, from.y())?;
        (self.board.piece_at(rook).kind == PieceKind::Rook).then_some(rook)
    }

    /// Takes back the last ply and announces restored pieces.
    pub fn undo(&mut self) -> Result<(), EngineError> {
        if let Some(color) = self.halted {
            return Err(EngineError::MissingKing(color));
        }
        let ply = self.revert()?;
        self.selection = None;
        for piece in ply.entries().filter_map(HistoryEntry::captured) {
            self.events.push(GameEvent::Restored {
                handle: piece.handle,
                piece,
            });
        }
        Ok(())
    }

    /// Attaches a front end's visual handle to the piece on `coord`.
    pub fn attach_handle(&mut self, coord: Coord, handle: Handle) -> Result<(), EngineError> {
        let piece = self.board.piece_at_mut(coord);
        if piece.is_empty() {
            return Err(EngineError::EmptySquare(coord));
        }
        piece.handle = Some(handle);
        Ok(())
    }

    /// Takes the queued events, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn ensure_playable(&self) -> Result<(), EngineError> {
        if let Some(color) = self.halted {
            return Err(EngineError::MissingKing(color));
        }
        if self.is_game_over() {
            return Err(EngineError::GameOver);
        }
        Ok(())
    }

    /// Records a missing king so that later commands refuse to run.
    fn guard<T>(&mut self, result: Result<T, EngineError>) -> Result<T, EngineError> {
        if let Err(EngineError::MissingKing(color)) = &result {
            self.halted = Some(*color);
        }
        result
    }
}
