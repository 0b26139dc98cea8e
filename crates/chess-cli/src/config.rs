//! Configuration file loading for the terminal front end.
//!
//! Settings come from a TOML file (`chess.toml` by default). Every key is
//! optional, and a missing file yields the defaults.

use chess_core::{Color, Placement};
use chess_engine::GameOptions;
use clap::ValueEnum;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Who makes the moves of one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    /// Moves are read from standard input.
    Human,
    /// Moves are chosen by the minimax search.
    Engine,
}

/// Search settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchConfig {
    /// Plies searched per engine move. Defaults to 2.
    #[serde(default = "default_depth")]
    pub depth: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: default_depth(),
        }
    }
}

fn default_depth() -> u32 {
    2
}

/// Who plays which side.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlayersConfig {
    #[serde(default = "default_white")]
    pub white: PlayerKind,
    #[serde(default = "default_black")]
    pub black: PlayerKind,
}

impl PlayersConfig {
    pub fn kind(&self, color: Color) -> PlayerKind {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }
}

impl Default for PlayersConfig {
    fn default() -> Self {
        PlayersConfig {
            white: default_white(),
            black: default_black(),
        }
    }
}

fn default_white() -> PlayerKind {
    PlayerKind::Human
}

fn default_black() -> PlayerKind {
    PlayerKind::Engine
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Default log filter, used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Starting placement. Defaults to the standard position.
    #[serde(default = "default_placement")]
    pub placement: String,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub rules: GameOptions,
    #[serde(default)]
    pub players: PlayersConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_placement() -> String {
    Placement::STANDARD.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: default_log_level(),
            placement: default_placement(),
            search: SearchConfig::default(),
            rules: GameOptions::default(),
            players: PlayersConfig::default(),
        }
    }
}

impl Config {
    /// Loads the configuration from `path`.
    ///
    /// If the file does not exist, returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file exists but cannot be read,
    /// or [`ConfigError::Parse`] if the file contains invalid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::parse(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parses configuration text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_engine::CastlingRule;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
log_level = "debug"
placement = "4k3/8/8/8/8/8/8/R3K2R"

[search]
depth = 3

[rules]
castling = "strict"
enforce_turn_order = false

[players]
white = "engine"
black = "human"
"#;
        let config = Config::parse(toml_content).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.placement, "4k3/8/8/8/8/8/8/R3K2R");
        assert_eq!(config.search.depth, 3);
        assert_eq!(config.rules.castling, CastlingRule::Strict);
        assert!(!config.rules.enforce_turn_order);
        assert_eq!(config.players.kind(Color::White), PlayerKind::Engine);
        assert_eq!(config.players.kind(Color::Black), PlayerKind::Human);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.search.depth, 2);
        assert_eq!(config.placement, Placement::STANDARD);
        assert_eq!(config.rules.castling, CastlingRule::FinalSquare);
        assert!(config.rules.enforce_turn_order);
        assert_eq!(config.players.white, PlayerKind::Human);
        assert_eq!(config.players.black, PlayerKind::Engine);
    }

    #[test]
    fn test_partial_tables_keep_defaults() {
        let config = Config::parse("[rules]\ncastling = \"final-square\"\n").unwrap();
        assert!(config.rules.enforce_turn_order);
        let config = Config::parse("[players]\nblack = \"human\"\n").unwrap();
        assert_eq!(config.players.white, PlayerKind::Human);
        assert_eq!(config.players.black, PlayerKind::Human);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let result = Config::parse("[search\ndepth = 2");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
        let result = Config::parse("[players]\nwhite = \"robot\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let path = Path::new("definitely/not/here/chess.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config, Config::default());
    }
}
