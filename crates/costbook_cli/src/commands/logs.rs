//! logs command - Dump persisted request log records.

use std::sync::Arc;

use anyhow::Result;

use costbook_core::RequestLog;
use costbook_model::LogRecord;
use costbook_store::SqliteStore;

pub async fn execute(store: Arc<SqliteStore>) -> Result<()> {
    // This request is logged too, and shows up in its own output.
    store
        .log(LogRecord::info("logs", "logs request"))
        .await?;

    let records = store.all().await?;
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
