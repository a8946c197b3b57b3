//! user-details command - Show one user with their total recorded costs.
//!
//! The total is the sum of every cost ever recorded for the user, across
//! all months. It is computed by the ledger and is unrelated to the
//! monthly report engine.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use costbook_core::{AccountDirectory, CostLedger, LedgerError, RequestLog};
use costbook_model::LogRecord;
use costbook_store::SqliteStore;

#[derive(Args)]
pub struct UserDetailsArgs {
    /// User id to look up
    pub id: i64,
}

#[derive(Serialize)]
struct UserDetails {
    first_name: String,
    last_name: String,
    id: i64,
    total: f64,
}

pub async fn execute(store: Arc<SqliteStore>, args: UserDetailsArgs) -> Result<()> {
    store
        .log(LogRecord::info(
            "users",
            format!("user-details id={}", args.id),
        ))
        .await?;

    let user = AccountDirectory::find(store.as_ref(), args.id)
        .await?
        .ok_or(LedgerError::UserNotFound(args.id))?;
    let total = store.total_for_user(args.id).await?;

    let details = UserDetails {
        first_name: user.first_name,
        last_name: user.last_name,
        id: user.id,
        total,
    };
    println!("{}", serde_json::to_string_pretty(&details)?);
    Ok(())
}
