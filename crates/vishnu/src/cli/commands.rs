//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Vishnu - dice, quest board and play groups for Discord
#[derive(Parser, Debug)]
#[command(name = "vishnu")]
#[command(about = "Dice, quest board and play groups for Discord", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Connect to Discord and serve chat commands
    Run {
        /// Configuration file layered over the defaults
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Discord bot token
        #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Apply pending database migrations and exit
    Migrate {
        /// Configuration file layered over the defaults
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Roll dice without connecting to Discord
    Roll {
        /// Dice expressions such as 3d8 or 1d20+5
        #[arg(required = true)]
        expressions: Vec<String>,

        /// Seed for reproducible rolls
        #[arg(long)]
        seed: Option<u64>,
    },
}
