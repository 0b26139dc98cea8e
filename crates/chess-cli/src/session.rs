//! The terminal game loop.

use crate::command::Command;
use crate::config::{Config, PlayerKind};
use chess_core::{Color, SpecialMove};
use chess_engine::{has_legal_move, Game, GameEvent, MoveOutcome};
use std::io::{BufRead, Write};
use tracing::{debug, info};

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Checkmate { winner: Color },
    Stalemate,
    PlyLimit,
    Quit,
}

/// A game plus who plays it.
pub struct Session {
    game: Game,
    config: Config,
    max_plies: Option<u32>,
    plies: u32,
}

impl Session {
    pub fn new(game: Game, config: Config, max_plies: Option<u32>) -> Self {
        Session {
            game,
            config,
            max_plies,
            plies: 0,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Runs until checkmate, stalemate, the ply limit, `quit`, or end of input.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        out: &mut W,
    ) -> anyhow::Result<SessionEnd> {
        writeln!(out, "{}", self.game.board())?;
        let end = loop {
            let side = self.game.side_to_move();
            if self.game.is_game_over() {
                break SessionEnd::Checkmate {
                    winner: side.opposite(),
                };
            }
            if !has_legal_move(&mut self.game, side)? {
                break SessionEnd::Stalemate;
            }
            if self.max_plies.is_some_and(|limit| self.plies >= limit) {
                break SessionEnd::PlyLimit;
            }

            let keep_going = match self.config.players.kind(side) {
                PlayerKind::Engine => self.engine_turn(out)?,
                PlayerKind::Human => self.human_turn(&mut input, out)?,
            };
            if !keep_going {
                break SessionEnd::Quit;
            }
        };

        match end {
            SessionEnd::Checkmate { winner } => writeln!(out, "Checkmate. {} wins.", winner)?,
            SessionEnd::Stalemate => writeln!(out, "Stalemate.")?,
            SessionEnd::PlyLimit => writeln!(out, "Ply limit reached.")?,
            SessionEnd::Quit => writeln!(out, "Bye.")?,
        }
        info!(?end, plies = self.plies, "session ended");
        Ok(end)
    }

    fn engine_turn<W: Write>(&mut self, out: &mut W) -> anyhow::Result<bool> {
        let depth = self.config.search.depth;
        let Some((from, m)) = self.game.find_best_move(depth)? else {
            // caught by the legal-move check before the turn
            return Ok(true);
        };
        let outcome = self.game.play_move(from, m)?;
        if let MoveOutcome::Played { applied, .. } = outcome {
            let note = if applied.special == SpecialMove::Castling {
                " (castling)"
            } else {
                ""
            };
            writeln!(
                out,
                "{} plays {}{}{}",
                self.game.side_to_move().opposite(),
                applied.from,
                applied.to,
                note
            )?;
        }
        self.after_move(out)?;
        Ok(true)
    }

    /// Reads commands until one of them passes the turn. Returns false to
    /// stop the session.
    fn human_turn<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        out: &mut W,
    ) -> anyhow::Result<bool> {
        loop {
            write!(out, "{}> ", self.game.side_to_move())?;
            out.flush()?;
            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Ok(false);
            }

            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(e) => {
                    writeln!(out, "{}", e)?;
                    continue;
                }
            };
            match command {
                Command::Move { from, to } => match self.game.play(from, to) {
                    Ok(MoveOutcome::Played { .. }) => {
                        self.after_move(out)?;
                        return Ok(true);
                    }
                    Ok(MoveOutcome::Cancelled) => writeln!(out, "Move cancelled.")?,
                    Err(e) if e.is_fatal() => return Err(e.into()),
                    Err(e) => writeln!(out, "{}", e)?,
                },
                Command::Moves(from) => match self.game.legal_targets(from) {
                    Ok(targets) if targets.is_empty() => writeln!(out, "No legal moves.")?,
                    Ok(targets) => {
                        let list: Vec<String> = targets.iter().map(|c| c.to_string()).collect();
                        writeln!(out, "{}", list.join(" "))?;
                    }
                    Err(e) if e.is_fatal() => return Err(e.into()),
                    Err(e) => writeln!(out, "{}", e)?,
                },
                Command::Undo => {
                    self.undo(out)?;
                    return Ok(true);
                }
                Command::Board => writeln!(out, "{}", self.game.board())?,
                Command::Quit => return Ok(false),
            }
        }
    }

    /// Takes back the last ply, and the engine's reply before it so the
    /// human is on move again.
    fn undo<W: Write>(&mut self, out: &mut W) -> anyhow::Result<()> {
        let mut undone = 0;
        while undone < 2 {
            if let Err(e) = self.game.undo() {
                if e.is_fatal() {
                    return Err(e.into());
                }
                if undone == 0 {
                    writeln!(out, "{}", e)?;
                }
                break;
            }
            undone += 1;
            self.plies = self.plies.saturating_sub(1);
            if self.config.players.kind(self.game.side_to_move()) == PlayerKind::Human {
                break;
            }
        }
        if undone > 0 {
            self.game.drain_events();
            debug!(undone, turn = self.game.turn(), "undo");
            writeln!(out, "{}", self.game.board())?;
        }
        Ok(())
    }

    fn after_move<W: Write>(&mut self, out: &mut W) -> anyhow::Result<()> {
        self.plies += 1;
        writeln!(out, "{}", self.game.board())?;
        for event in self.game.drain_events() {
            match event {
                GameEvent::Captured { piece, .. } => {
                    writeln!(out, "{} {:?} captured on {}", piece.color, piece.kind, piece.coord)?
                }
                GameEvent::Promoted { at, color } => {
                    writeln!(out, "{} pawn promoted on {}", color, at)?
                }
                GameEvent::Check { color } => writeln!(out, "{} is in check.", color)?,
                GameEvent::Checkmate { checkmated } => {
                    info!(%checkmated, turn = self.game.turn(), "checkmate");
                }
                GameEvent::Moved { .. } | GameEvent::Restored { .. } => {}
            }
        }
        Ok(())
    }
}
