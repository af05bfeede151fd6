//! Solana wallet CLI
//!
//! # WARNING
//! - The recovery phrase is the wallet. Anyone holding it holds the funds.
//! - Losing both the phrase and the vault password is irrecoverable.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::error;

// Use the library crate
use solwallet::cli::commands;
use solwallet::config::Config;

/// Non-custodial Solana wallet
#[derive(Parser)]
#[command(name = "solwallet")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "wallet.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new wallet (prints the recovery phrase once)
    Create,

    /// Import a wallet from a 12-word recovery phrase
    Import,

    /// Show the wallet address
    Address,

    /// Show the wallet balance
    Balance,

    /// Send SOL to an address
    Send {
        /// Destination address (base58)
        destination: String,

        /// Amount in SOL
        amount: f64,

        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Reveal the stored recovery phrase
    Export,

    /// Delete the stored wallet
    Wipe {
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("solwallet=info".parse().unwrap()),
        )
        .with_target(true)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Execute command
    let result = match cli.command {
        Commands::Create => commands::create(&config).await,
        Commands::Import => commands::import(&config).await,
        Commands::Address => commands::address(&config).await,
        Commands::Balance => commands::balance(&config).await,
        Commands::Send {
            destination,
            amount,
            yes,
        } => commands::send(&config, &destination, amount, yes).await,
        Commands::Export => commands::export(&config).await,
        Commands::Wipe { force } => commands::wipe(&config, force).await,
        Commands::Config => commands::show_config(&config),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
