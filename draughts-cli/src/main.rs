//! Draughts CLI - checkers in the terminal
//!
//! Commands:
//! - play: Play against the engine
//! - auto: Watch two engines play each other

use clap::{Parser, Subcommand};

mod display;
mod play;

#[derive(Parser)]
#[command(name = "draughts")]
#[command(about = "Checkers with an alpha-beta engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the engine
    Play(play::PlayArgs),
    /// Watch two engines play each other
    Auto(play::AutoArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play::run_play(&args),
        Commands::Auto(args) => play::run_auto(&args),
    }
}
