//! about command - Development team roster.
//!
//! The roster is static and deliberately not stored in the database.

use std::sync::Arc;

use anyhow::Result;

use costbook_core::RequestLog;
use costbook_model::{LogRecord, TeamMember};
use costbook_store::SqliteStore;

pub async fn execute(store: Arc<SqliteStore>) -> Result<()> {
    store
        .log(LogRecord::info("admin", "about request"))
        .await?;

    let team = vec![
        TeamMember::new("Ofir", "Nesher"),
        TeamMember::new("Asaf", "Arusi"),
    ];
    println!("{}", serde_json::to_string_pretty(&team)?);
    Ok(())
}
