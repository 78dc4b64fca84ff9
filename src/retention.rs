// 🔁 Retention-rate trend
// Month over month: how many of last month's buyers came back

use crate::parser::Transaction;
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionPoint {
    /// `YYYY-MM`
    pub month: String,
    pub active_customers: usize,
    /// Active this month and the month before
    pub retained_customers: usize,
    /// `retained / previous month's active`; absent without a previous month
    pub retention_rate: Option<f64>,
}

fn next_month((year, month): (i32, u32)) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// One point per calendar month from the first to the last order
pub fn retention_trend(transactions: &[Transaction]) -> Vec<RetentionPoint> {
    let mut active: BTreeMap<(i32, u32), HashSet<&str>> = BTreeMap::new();
    for tx in transactions {
        let key = (tx.order_date.year(), tx.order_date.month());
        active.entry(key).or_default().insert(tx.customer_id.as_str());
    }

    let (first, last) = match (active.keys().next(), active.keys().next_back()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Vec::new(),
    };

    let empty = HashSet::new();
    let mut points = Vec::new();
    let mut previous: Option<&HashSet<&str>> = None;
    let mut month = first;

    while month <= last {
        let current = active.get(&month).unwrap_or(&empty);

        let (retained_customers, retention_rate) = match previous {
            Some(prev) if !prev.is_empty() => {
                let retained = current.intersection(prev).count();
                (retained, Some(retained as f64 / prev.len() as f64))
            }
            _ => (0, None),
        };

        points.push(RetentionPoint {
            month: format!("{:04}-{:02}", month.0, month.1),
            active_customers: current.len(),
            retained_customers,
            retention_rate,
        });

        previous = Some(current);
        month = next_month(month);
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(customer: &str, y: i32, m: u32) -> Transaction {
        let date = NaiveDate::from_ymd_opt(y, m, 10).unwrap().and_hms_opt(0, 0, 0).unwrap();
        Transaction::new(customer, date, "o", 1.0)
    }

    #[test]
    fn test_retention_over_year_boundary() {
        let rows = vec![
            tx("A", 2023, 11),
            tx("B", 2023, 11),
            tx("A", 2023, 12),
            tx("C", 2023, 12),
            tx("A", 2024, 2),
        ];

        let trend = retention_trend(&rows);
        let months: Vec<&str> = trend.iter().map(|p| p.month.as_str()).collect();
        assert_eq!(months, vec!["2023-11", "2023-12", "2024-01", "2024-02"]);

        assert_eq!(trend[0].retention_rate, None);
        assert_eq!(trend[0].active_customers, 2);

        assert_eq!(trend[1].retained_customers, 1);
        assert_eq!(trend[1].retention_rate, Some(0.5));

        // nobody ordered in January
        assert_eq!(trend[2].active_customers, 0);
        assert_eq!(trend[2].retention_rate, Some(0.0));

        // previous month empty → undefined
        assert_eq!(trend[3].retention_rate, None);
    }

    #[test]
    fn test_empty() {
        assert!(retention_trend(&[]).is_empty());
    }
}
