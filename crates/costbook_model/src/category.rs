//! The closed set of cost categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cost category. The set is closed; a monthly report always contains one
/// bucket per category, in the order given by [`Category::ALL`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Health,
    Housing,
    Sport,
    Education,
}

impl Category {
    /// All categories in the fixed report order.
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Health,
        Category::Housing,
        Category::Sport,
        Category::Education,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Health => "health",
            Category::Housing => "housing",
            Category::Sport => "sport",
            Category::Education => "education",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown category: {0} (expected one of food, health, housing, sport, education)")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "food" => Ok(Category::Food),
            "health" => Ok(Category::Health),
            "housing" => Ok(Category::Housing),
            "sport" => Ok(Category::Sport),
            "education" => Ok(Category::Education),
            other => Err(ParseCategoryError(other.to_string())),
        }
    }
}
