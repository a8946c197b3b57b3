//! add-cost command - Record a cost entry for an existing user.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use tracing::info;

use costbook_core::{AccountDirectory, CostLedger, LedgerError, RequestLog};
use costbook_model::{Category, CostEntry, LogRecord};
use costbook_store::SqliteStore;

#[derive(Args)]
pub struct AddCostArgs {
    /// Id of the owning user; must exist in the account directory
    #[arg(long)]
    pub userid: i64,

    /// One of: food, health, housing, sport, education
    #[arg(long)]
    pub category: Category,

    /// Amount of money spent (non-negative)
    #[arg(long)]
    pub sum: f64,

    #[arg(long)]
    pub description: String,

    /// When the cost was incurred (RFC 3339); defaults to now
    #[arg(long)]
    pub created_at: Option<DateTime<Utc>>,
}

pub async fn execute(store: Arc<SqliteStore>, args: AddCostArgs) -> Result<()> {
    store
        .log(LogRecord::info(
            "costs",
            format!("add-cost userid={} category={}", args.userid, args.category),
        ))
        .await?;

    if args.sum < 0.0 {
        return Err(LedgerError::NegativeSum(args.sum).into());
    }

    // Costs can only be recorded against an existing user.
    store.require(args.userid).await?;

    let mut entry = CostEntry::new(args.userid, args.category, args.sum, args.description);
    if let Some(created_at) = args.created_at {
        entry = entry.with_created_at(created_at);
    }

    let entry = CostLedger::append(store.as_ref(), entry).await?;
    info!("recorded {} cost for user {}", entry.category, entry.userid);

    println!("{}", serde_json::to_string_pretty(&entry)?);
    Ok(())
}
