//! costbook CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: User not found
//! - 4: User already exists

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

use commands::{Cli, Commands};
use costbook_core::LedgerError;
use costbook_store::SqliteStore;

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const NOT_FOUND: u8 = 3;
    pub const DUPLICATE: u8 = 4;
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(
            EnvFilter::from_default_env()
                .add_directive("costbook=info".parse().unwrap())
                .add_directive("warn".parse().unwrap()),
        )
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let store = Arc::new(SqliteStore::open(&cli.db)?);

    match cli.command {
        Commands::AddUser(args) => commands::add_user::execute(store, args).await,
        Commands::Users => commands::users::execute(store).await,
        Commands::UserDetails(args) => commands::user_details::execute(store, args).await,
        Commands::AddCost(args) => commands::add_cost::execute(store, args).await,
        Commands::Report(args) => commands::report::execute(store, args).await,
        Commands::About => commands::about::execute(store).await,
        Commands::Logs => commands::logs::execute(store).await,
    }
}

/// Map a command failure to its exit code.
fn categorize_error(e: &anyhow::Error) -> u8 {
    match e.downcast_ref::<LedgerError>() {
        Some(LedgerError::UserNotFound(_)) => ExitCodes::NOT_FOUND,
        Some(LedgerError::DuplicateUser(_)) => ExitCodes::DUPLICATE,
        Some(LedgerError::InvalidMonth(_)) | Some(LedgerError::NegativeSum(_)) => {
            ExitCodes::INVALID_ARGS
        }
        _ => ExitCodes::GENERAL_ERROR,
    }
}
