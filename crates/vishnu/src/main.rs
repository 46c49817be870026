//! Vishnu CLI binary.
//!
//! - Run the Discord bot
//! - Apply database migrations
//! - Roll dice offline

use clap::Parser;

mod cli;
mod observability;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, migrate, roll, run_bot};

    // A missing .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    observability::init_logging(cli.verbose, cli.json_logs)?;

    match cli.command {
        Commands::Run { config, token } => {
            run_bot(config.as_deref(), &token).await?;
        }

        Commands::Migrate { config } => {
            migrate(config.as_deref()).await?;
        }

        Commands::Roll { expressions, seed } => {
            for line in roll(&expressions, seed) {
                println!("{}", line);
            }
        }
    }

    Ok(())
}
