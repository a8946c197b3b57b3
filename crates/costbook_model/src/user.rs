//! Account directory entries and the static team roster.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A user in the account directory. The `id` is application-assigned and
/// unique in the directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub birthday: NaiveDate,
}

impl User {
    pub fn new(
        id: i64,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        birthday: NaiveDate,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            birthday,
        }
    }
}

/// A development team member for the static roster. Not stored; hardcoded
/// by the roster surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamMember {
    pub first_name: String,
    pub last_name: String,
}

impl TeamMember {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}
