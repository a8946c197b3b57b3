//! Monthly report types: key, per-category buckets, and the report body.
//!
//! The report body is the payload of the computed pattern: a deterministic
//! function of (user, year, month, entry set at computation time). Closed
//! periods are cached write-once under their [`ReportKey`]; the wire shape
//! keeps the five category buckets in a fixed order with empty buckets
//! present, so the bucket collection serializes as an ordered sequence of
//! single-key maps rather than one flat map.

use std::collections::HashMap;
use std::fmt;

use serde::de::{SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::category::Category;

/// Identity of one cached monthly report. Globally unique in the cache
/// store; uniqueness is enforced by the storage layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ReportKey {
    pub userid: i64,
    pub year: i32,
    /// Calendar month, 1..=12.
    pub month: u32,
}

impl ReportKey {
    pub fn new(userid: i64, year: i32, month: u32) -> Self {
        Self { userid, year, month }
    }
}

impl fmt::Display for ReportKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user {} {}-{:02}", self.userid, self.year, self.month)
    }
}

/// One line of a category bucket: the entry's amount, description, and
/// day-of-month taken from its timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportItem {
    pub sum: f64,
    pub description: String,
    pub day: u32,
}

/// The five category buckets of a monthly report, in the fixed order
/// food, health, housing, sport, education. All five are always present,
/// empty or not, and the order never changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CostBuckets {
    pub food: Vec<ReportItem>,
    pub health: Vec<ReportItem>,
    pub housing: Vec<ReportItem>,
    pub sport: Vec<ReportItem>,
    pub education: Vec<ReportItem>,
}

impl CostBuckets {
    pub fn bucket(&self, category: Category) -> &[ReportItem] {
        match category {
            Category::Food => &self.food,
            Category::Health => &self.health,
            Category::Housing => &self.housing,
            Category::Sport => &self.sport,
            Category::Education => &self.education,
        }
    }

    pub fn bucket_mut(&mut self, category: Category) -> &mut Vec<ReportItem> {
        match category {
            Category::Food => &mut self.food,
            Category::Health => &mut self.health,
            Category::Housing => &mut self.housing,
            Category::Sport => &mut self.sport,
            Category::Education => &mut self.education,
        }
    }

    /// Total number of items across all buckets.
    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|c| self.bucket(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Serializes one bucket as a single-key map, e.g. `{"food": [...]}`.
struct BucketEntry<'a> {
    category: Category,
    items: &'a [ReportItem],
}

impl Serialize for BucketEntry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.category.as_str(), self.items)?;
        map.end()
    }
}

impl Serialize for CostBuckets {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(Category::ALL.len()))?;
        for category in Category::ALL {
            seq.serialize_element(&BucketEntry {
                category,
                items: self.bucket(category),
            })?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for CostBuckets {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BucketsVisitor;

        impl<'de> Visitor<'de> for BucketsVisitor {
            type Value = CostBuckets;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a sequence of per-category cost buckets")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut buckets = CostBuckets::default();
                while let Some(entry) =
                    seq.next_element::<HashMap<Category, Vec<ReportItem>>>()?
                {
                    for (category, items) in entry {
                        *buckets.bucket_mut(category) = items;
                    }
                }
                Ok(buckets)
            }
        }

        deserializer.deserialize_seq(BucketsVisitor)
    }
}

/// The monthly report payload, either freshly computed or read back from
/// the cache.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportBody {
    pub userid: i64,
    pub year: i32,
    pub month: u32,
    pub costs: CostBuckets,
}

impl ReportBody {
    /// The key this report is cached under.
    pub fn key(&self) -> ReportKey {
        ReportKey::new(self.userid, self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(sum: f64, description: &str, day: u32) -> ReportItem {
        ReportItem {
            sum,
            description: description.to_string(),
            day,
        }
    }

    #[test]
    fn test_empty_buckets_wire_shape() {
        let body = ReportBody {
            userid: 42,
            year: 2023,
            month: 1,
            costs: CostBuckets::default(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(
            json,
            r#"{"userid":42,"year":2023,"month":1,"costs":[{"food":[]},{"health":[]},{"housing":[]},{"sport":[]},{"education":[]}]}"#
        );
    }

    #[test]
    fn test_buckets_round_trip() {
        let mut costs = CostBuckets::default();
        costs.food.push(item(10.0, "bread", 3));
        costs.food.push(item(5.0, "milk", 20));
        costs.sport.push(item(30.0, "gym", 1));

        let json = serde_json::to_string(&costs).unwrap();
        let back: CostBuckets = serde_json::from_str(&json).unwrap();
        assert_eq!(back, costs);
        assert_eq!(back.len(), 3);
    }

    #[test]
    fn test_bucket_order_in_json() {
        let json = serde_json::to_value(CostBuckets::default()).unwrap();
        let seq = json.as_array().unwrap();
        let keys: Vec<String> = seq
            .iter()
            .map(|b| b.as_object().unwrap().keys().next().unwrap().clone())
            .collect();
        assert_eq!(keys, vec!["food", "health", "housing", "sport", "education"]);
    }

    #[test]
    fn test_report_key_display() {
        let key = ReportKey::new(42, 2023, 1);
        assert_eq!(key.to_string(), "user 42 2023-01");
    }
}
