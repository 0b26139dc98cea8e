//! The undo log.
//!
//! Every relocation pushes one [`HistoryEntry`] holding value snapshots of
//! the piece that moved and of the occupant it displaced. En passant and
//! castling push a second, tagged entry *before* the primary one; popping a
//! ply therefore pops the primary entry and, when the entry underneath is
//! tagged, that one too.

use crate::{Board, EngineError, Handle, Piece};
use chess_core::SpecialMove;

/// One reversible relocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    /// The piece that moved, as it was before moving.
    pub from: Piece,
    /// The occupant of the destination before the move (maybe `Empty`).
    pub to: Piece,
    /// Visual handle of the displaced occupant.
    pub to_handle: Option<Handle>,
    pub special: SpecialMove,
}

impl HistoryEntry {
    pub fn new(from: Piece, to: Piece, special: SpecialMove) -> Self {
        HistoryEntry {
            from,
            to,
            to_handle: to.handle,
            special,
        }
    }

    /// Entry recording the removal of `piece` from its own cell.
    pub fn removal(piece: Piece, special: SpecialMove) -> Self {
        Self::new(piece, Piece::empty(piece.coord), special)
    }

    /// Returns the piece this entry took off the board, if any.
    ///
    /// A removal entry (origin equals destination) records the removed piece
    /// as its mover; any other entry records it as the displaced occupant.
    pub fn captured(&self) -> Option<Piece> {
        if self.from.coord == self.to.coord {
            Some(self.from)
        } else if !self.to.is_empty() {
            Some(self.to)
        } else {
            None
        }
    }

    /// Puts both snapshots back where they were.
    ///
    /// Whatever currently stands on the destination (the mover, or the queen
    /// it was promoted to) is cleared first.
    pub fn restore(&self, board: &mut Board) {
        board.remove(self.to.coord);
        if !self.to.is_empty() {
            let mut displaced = self.to;
            displaced.handle = self.to_handle;
            board.place(displaced);
        }
        if self.from.coord != self.to.coord {
            board.remove(self.from.coord);
        }
        board.place(self.from);
    }
}

/// The entries one logical ply pushed, most recent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlyRecord {
    pub primary: HistoryEntry,
    pub secondary: Option<HistoryEntry>,
}

impl PlyRecord {
    /// Entries in the order they must be restored.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        std::iter::once(&self.primary).chain(self.secondary.iter())
    }
}

/// LIFO sequence of history entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Returns the most recent entry.
    pub fn peek(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Pops the entries of the most recent ply.
    pub fn pop_ply(&mut self) -> Result<PlyRecord, EngineError> {
        let primary = self.entries.pop().ok_or(EngineError::EmptyHistory)?;
        let secondary = match self.peek() {
            Some(next) if next.special.is_special() => self.entries.pop(),
            _ => None,
        };
        Ok(PlyRecord { primary, secondary })
    }

    /// Number of entries (not plies).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries from oldest to newest.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}
