//! Thin Wallet CLI
//!
//! Manage sealed accounts and submit operations to a node.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tz_wallet::{ClientConfig, Network};

mod commands;

#[derive(Parser)]
#[command(name = "tz-wallet")]
#[command(about = "Thin wallet - keep keys local, let the node forge")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Network to use, overriding the configuration
    #[arg(short, long, global = true)]
    network: Option<Network>,

    /// Unlock with the stored access code instead of an account password
    #[arg(long, global = true)]
    access_code: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account from a fresh mnemonic
    Generate {
        /// Account name
        name: String,
    },

    /// Import an account from a mnemonic or an encoded secret key
    Import {
        /// Account name
        name: String,

        /// Import an encoded seed or secret key instead of a mnemonic
        #[arg(long)]
        secret: bool,
    },

    /// List stored accounts
    Accounts,

    /// Show an account's keys
    Show {
        /// Account name
        name: String,

        /// Also print the secret key
        #[arg(long)]
        secret: bool,
    },

    /// Check a balance
    Balance {
        /// Account name
        name: String,

        /// Query this contract instead of the account itself
        #[arg(long)]
        address: Option<String>,
    },

    /// Send funds
    Transfer {
        /// Account name
        name: String,

        /// Recipient address
        destination: String,

        /// Amount to send
        amount: f64,

        /// Fee
        #[arg(long, default_value = "0")]
        fee: f64,

        /// Pay from this contract instead of the account itself
        #[arg(long)]
        source: Option<String>,

        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Originate a new contract
    Originate {
        /// Account name
        name: String,

        /// Initial balance
        #[arg(long, default_value = "0")]
        balance: f64,

        /// Fee
        #[arg(long, default_value = "0")]
        fee: f64,

        /// Allow the manager to spend from the contract
        #[arg(long)]
        spendable: bool,

        /// Allow the manager to delegate the contract
        #[arg(long)]
        delegatable: bool,

        /// Contract script (JSON file)
        #[arg(long)]
        script: Option<PathBuf>,
    },

    /// Claim test funds
    Faucet {
        /// Account name
        name: String,
    },

    /// Generate an access code that unlocks an account
    AccessCode {
        /// Account name
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    };
    if let Some(network) = cli.network {
        config.network = network;
    }

    let unlock = if cli.access_code {
        commands::Unlock::AccessCode
    } else {
        commands::Unlock::Password
    };

    match cli.command {
        Commands::Generate { name } => commands::generate::run(&config, &name).await,
        Commands::Import { name, secret } => commands::import::run(&config, &name, secret).await,
        Commands::Accounts => commands::accounts::run(&config).await,
        Commands::Show { name, secret } => commands::show::run(&config, &name, unlock, secret).await,
        Commands::Balance { name, address } => {
            commands::balance::run(&config, &name, unlock, address.as_deref()).await
        }
        Commands::Transfer {
            name,
            destination,
            amount,
            fee,
            source,
            yes,
        } => {
            commands::transfer::run(
                &config,
                &name,
                unlock,
                commands::transfer::TransferArgs {
                    destination,
                    amount,
                    fee,
                    source,
                    skip_confirm: yes,
                },
            )
            .await
        }
        Commands::Originate {
            name,
            balance,
            fee,
            spendable,
            delegatable,
            script,
        } => {
            commands::originate::run(
                &config,
                &name,
                unlock,
                commands::originate::OriginateArgs {
                    balance,
                    fee,
                    spendable,
                    delegatable,
                    script,
                },
            )
            .await
        }
        Commands::Faucet { name } => commands::faucet::run(&config, &name, unlock).await,
        Commands::AccessCode { name } => commands::access_code::run(&config, &name).await,
    }
}
