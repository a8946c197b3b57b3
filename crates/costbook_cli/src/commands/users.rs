//! users command - List all users.

use std::sync::Arc;

use anyhow::Result;

use costbook_core::{AccountDirectory, RequestLog};
use costbook_model::LogRecord;
use costbook_store::SqliteStore;

pub async fn execute(store: Arc<SqliteStore>) -> Result<()> {
    store
        .log(LogRecord::info("users", "users request"))
        .await?;

    let users = store.list().await?;
    println!("{}", serde_json::to_string_pretty(&users)?);
    Ok(())
}
