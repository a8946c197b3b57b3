//! report command - Monthly cost report for a user.
//!
//! The report engine owns the computed pattern: closed months are computed
//! once and served from the cache ever after; the current and future months
//! are recomputed on every request. User existence is checked here, before
//! the engine touches the ledger or the cache.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;

use costbook_core::{AccountDirectory, ReportEngine, RequestLog};
use costbook_model::LogRecord;
use costbook_store::SqliteStore;

#[derive(Args)]
pub struct ReportArgs {
    /// User id to report on
    #[arg(long)]
    pub id: i64,

    #[arg(long)]
    pub year: i32,

    /// Calendar month, 1-12
    #[arg(long)]
    pub month: u32,
}

pub async fn execute(store: Arc<SqliteStore>, args: ReportArgs) -> Result<()> {
    store
        .log(LogRecord::info(
            "costs",
            format!(
                "report id={} year={} month={}",
                args.id, args.year, args.month
            ),
        ))
        .await?;

    store.require(args.id).await?;

    let engine = ReportEngine::with_system_clock(store.clone(), store.clone());
    let body = engine.get_or_compute(args.id, args.year, args.month).await?;

    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
