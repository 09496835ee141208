//! Vertebra CLI - Operator commands for the CMS database.
//!
//! # Usage
//!
//! ```bash
//! # Create an admin account
//! vertebra-cli admin create -u editor -p 'a long password'
//!
//! # List admin accounts
//! vertebra-cli admin list
//!
//! # Create the first-run admin account if none exists
//! vertebra-cli seed
//! ```
//!
//! Every command connects with `VERTEBRA_DATABASE_URL` (or `DATABASE_URL`)
//! and applies the embedded schema first.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "vertebra-cli")]
#[command(author, version, about = "Vertebra CMS operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Create the first-run admin account if the database has none
    Seed,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin account
    Create {
        /// Account username (case-sensitive, no spaces)
        #[arg(short, long)]
        username: String,

        /// Account password (at least 8 characters)
        #[arg(short, long)]
        password: String,
    },
    /// List admin accounts
    List,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[allow(clippy::print_stdout)]
async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let pool = commands::connect().await?;
    let accounts = vertebra_cms::db::PgAccountStore::new(pool);

    match cli.command {
        Commands::Admin { action } => match action {
            AdminAction::Create { username, password } => {
                commands::admin::create(&accounts, &username, &password).await?;
            }
            AdminAction::List => {
                let listing = commands::admin::list(&accounts).await?;
                println!("{listing}");
            }
        },
        Commands::Seed => commands::seed::run(&accounts).await?,
    }

    Ok(())
}
