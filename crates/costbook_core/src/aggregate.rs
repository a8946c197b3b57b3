//! Pure aggregation of cost entries into a monthly report body.

use costbook_model::{CostEntry, ReportBody, ReportItem};

/// Build a [`ReportBody`] from the entries of one (user, year, month).
///
/// The caller guarantees every entry belongs to `userid` and falls within
/// the target month. Entries are partitioned into the five fixed category
/// buckets preserving their ledger order; no additional sort is imposed and
/// no totals are computed. Buckets with no entries stay present and empty.
///
/// Deterministic and infallible: the same input always produces the same
/// report.
pub fn aggregate(userid: i64, year: i32, month: u32, entries: &[CostEntry]) -> ReportBody {
    let mut body = ReportBody {
        userid,
        year,
        month,
        costs: Default::default(),
    };

    for entry in entries {
        body.costs.bucket_mut(entry.category).push(ReportItem {
            sum: entry.sum,
            description: entry.description.clone(),
            day: entry.day_of_month(),
        });
    }

    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use costbook_model::Category;

    fn entry(category: Category, sum: f64, description: &str, day: u32) -> CostEntry {
        CostEntry::new(42, category, sum, description)
            .with_created_at(Utc.with_ymd_and_hms(2023, 1, day, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_all_buckets_present_for_empty_input() {
        let body = aggregate(42, 2023, 1, &[]);
        assert_eq!(body.userid, 42);
        assert!(body.costs.is_empty());
        for category in Category::ALL {
            assert!(body.costs.bucket(category).is_empty());
        }
    }

    #[test]
    fn test_partition_preserves_ledger_order() {
        let entries = vec![
            entry(Category::Food, 10.0, "bread", 3),
            entry(Category::Sport, 30.0, "gym", 1),
            entry(Category::Food, 5.0, "milk", 20),
        ];
        let body = aggregate(42, 2023, 1, &entries);

        let food = body.costs.bucket(Category::Food);
        assert_eq!(food.len(), 2);
        // Ledger order, not day order: bread (day 3) stays before milk (day 20)
        // because it was appended first.
        assert_eq!(food[0].description, "bread");
        assert_eq!(food[0].day, 3);
        assert_eq!(food[1].description, "milk");
        assert_eq!(food[1].day, 20);

        let sport = body.costs.bucket(Category::Sport);
        assert_eq!(sport.len(), 1);
        assert_eq!(sport[0].sum, 30.0);
        assert_eq!(sport[0].day, 1);

        assert!(body.costs.bucket(Category::Health).is_empty());
        assert!(body.costs.bucket(Category::Housing).is_empty());
        assert!(body.costs.bucket(Category::Education).is_empty());
    }

    #[test]
    fn test_deterministic_on_same_input() {
        let entries = vec![
            entry(Category::Housing, 700.0, "rent", 1),
            entry(Category::Health, 12.5, "pharmacy", 14),
        ];
        let first = aggregate(42, 2023, 1, &entries);
        let second = aggregate(42, 2023, 1, &entries);
        assert_eq!(first, second);
    }
}
