//! Terminal chess against the minimax engine. Either side can be a human
//! reading from stdin or the engine.
//!
//! Settings are read from a TOML file and can be overridden on the command
//! line. Logs go to stderr so the board on stdout stays readable.

mod command;
mod config;
mod session;

use anyhow::Context;
use chess_engine::Game;
use clap::Parser;
use config::{Config, PlayerKind};
use session::Session;
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chess-cli")]
#[command(about = "Play chess in the terminal against a minimax engine")]
struct Args {
    /// Configuration file
    #[arg(long, default_value = "chess.toml")]
    config: PathBuf,

    /// Starting placement, e.g. "4k3/8/8/8/8/8/8/R3K2R"
    #[arg(long)]
    placement: Option<String>,

    /// Search depth in plies
    #[arg(long)]
    depth: Option<u32>,

    /// Who plays White
    #[arg(long, value_enum)]
    white: Option<PlayerKind>,

    /// Who plays Black
    #[arg(long, value_enum)]
    black: Option<PlayerKind>,

    /// Stop after this many plies
    #[arg(long)]
    max_plies: Option<u32>,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(placement) = &self.placement {
            config.placement = placement.clone();
        }
        if let Some(depth) = self.depth {
            config.search.depth = depth;
        }
        if let Some(white) = self.white {
            config.players.white = white;
        }
        if let Some(black) = self.black {
            config.players.black = black;
        }
    }
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    args.apply(&mut config);
    init_logging(&config.log_level);

    info!(
        placement = %config.placement,
        depth = config.search.depth,
        white = ?config.players.white,
        black = ?config.players.black,
        castling = ?config.rules.castling,
        "Starting game"
    );

    let game = Game::from_placement(&config.placement, config.rules)
        .context("invalid starting placement")?;
    let mut session = Session::new(game, config, args.max_plies);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    session.run(stdin.lock(), &mut stdout)?;
    Ok(())
}
