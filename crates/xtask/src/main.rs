//! Development tasks for the combat workspace
//!
//! This binary provides development utilities using the cargo-xtask pattern.
//! Run with: `cargo xtask <command>`

mod commands;
mod utils;

use anyhow::Result;
use clap::Parser;
use commands::{CheckContent, Duel, ResolveStat};

/// Development tasks for the combat workspace
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tools for combat content", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Load and validate combat content
    CheckContent(CheckContent),

    /// Print the resolution breakdown of one stat
    ResolveStat(ResolveStat),

    /// Replay a seeded duel between the sample actors
    Duel(Duel),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for COMBAT_DATA_DIR and RUST_LOG)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::CheckContent(cmd) => cmd.execute(),
        Command::ResolveStat(cmd) => cmd.execute(),
        Command::Duel(cmd) => cmd.execute(),
    }
}
