//! Rule options for a game.
//!
//! The engine implements one rule set. The few points where reasonable
//! implementations differ are exposed as [`GameOptions`] so a front end can
//! pick them from its configuration file.

use serde::Deserialize;

/// How castling interacts with attacked squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CastlingRule {
    /// Only the generic king-safety test on the king's landing square.
    #[default]
    FinalSquare,
    /// Also forbid castling out of check and across an attacked square.
    Strict,
}

/// Per-game rule options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameOptions {
    pub castling: CastlingRule,
    /// Reject selections of pieces whose side is not to move.
    pub enforce_turn_order: bool,
}

impl Default for GameOptions {
    fn default() -> Self {
        GameOptions {
            castling: CastlingRule::FinalSquare,
            enforce_turn_order: true,
        }
    }
}

impl GameOptions {
    /// Options with the strict castling rule.
    pub fn strict() -> Self {
        GameOptions {
            castling: CastlingRule::Strict,
            ..Self::default()
        }
    }
}
