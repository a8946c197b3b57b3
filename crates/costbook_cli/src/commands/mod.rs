//! CLI command definitions.
//!
//! The subcommands map one-to-one to the costbook service surfaces: the
//! account directory (users), the cost ledger and report engine (costs),
//! the static roster (admin), and the request log reader (logs).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod about;
pub mod add_cost;
pub mod add_user;
pub mod logs;
pub mod report;
pub mod user_details;
pub mod users;

/// costbook - cost ledger with computed monthly reports
#[derive(Parser)]
#[command(name = "costbook")]
#[command(version, about = "costbook - cost ledger with computed monthly reports")]
#[command(long_about = r#"
costbook records per-user cost entries and produces categorized monthly
reports. A report for a closed month is computed once and cached; open
months are recomputed on every request.

SURFACES:
  add-user      → Add a user to the account directory
  users         → List all users
  user-details  → Show one user with their total recorded costs
  add-cost      → Record a cost entry for an existing user
  report        → Monthly cost report for a user (cached once closed)
  about         → Development team roster
  logs          → Dump persisted request log records

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - User not found
  4 - User already exists
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the costbook database
    #[arg(long, global = true, env = "COSTBOOK_DB", default_value = "costbook.db")]
    pub db: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a user to the account directory
    #[command(name = "add-user")]
    AddUser(add_user::AddUserArgs),

    /// List all users
    Users,

    /// Show one user with their total recorded costs
    #[command(name = "user-details")]
    UserDetails(user_details::UserDetailsArgs),

    /// Record a cost entry for an existing user
    #[command(name = "add-cost")]
    AddCost(add_cost::AddCostArgs),

    /// Monthly cost report for a user
    Report(report::ReportArgs),

    /// Development team roster
    About,

    /// Dump persisted request log records
    Logs,
}
