//! add-user command - Add a user to the account directory.

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use tracing::info;

use costbook_core::{AccountDirectory, RequestLog};
use costbook_model::{LogRecord, User};
use costbook_store::SqliteStore;

#[derive(Args)]
pub struct AddUserArgs {
    /// Application-assigned user id
    #[arg(long)]
    pub id: i64,

    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    /// Birthday as YYYY-MM-DD
    #[arg(long)]
    pub birthday: NaiveDate,
}

pub async fn execute(store: Arc<SqliteStore>, args: AddUserArgs) -> Result<()> {
    store
        .log(LogRecord::info(
            "users",
            format!("add-user id={}", args.id),
        ))
        .await?;

    let user = User::new(args.id, args.first_name, args.last_name, args.birthday);
    let user = AccountDirectory::insert(store.as_ref(), user).await?;
    info!("added user {}", user.id);

    println!("{}", serde_json::to_string_pretty(&user)?);
    Ok(())
}
