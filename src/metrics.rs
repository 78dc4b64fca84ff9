// 📐 Metric Aggregation
// Transactions → one Recency / Frequency / Monetary row per customer

use crate::error::{Result, RfmError};
use crate::parser::Transaction;
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-customer behavioural metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerMetrics {
    #[serde(rename = "customerID")]
    pub customer_id: String,

    /// Whole days between the snapshot date and the latest order
    #[serde(rename = "Recency")]
    pub recency: i64,

    /// Number of order rows, duplicates included
    #[serde(rename = "Frequency")]
    pub frequency: u64,

    #[serde(rename = "MonetaryValue")]
    pub monetary_value: f64,
}

/// Snapshot date: one day after the latest order in the whole table
pub fn snapshot_date(transactions: &[Transaction]) -> Result<NaiveDateTime> {
    transactions
        .iter()
        .map(|tx| tx.order_date)
        .max()
        .map(|latest| latest + Duration::days(1))
        .ok_or(RfmError::EmptyInput)
}

/// Group transactions by customer and derive R, F and M.
///
/// Customers come back in ascending `customerID` order.
pub fn aggregate(transactions: &[Transaction]) -> Result<Vec<CustomerMetrics>> {
    let snapshot = snapshot_date(transactions)?;

    // customer → (latest order, order count, value sum)
    let mut groups: BTreeMap<&str, (NaiveDateTime, u64, f64)> = BTreeMap::new();
    for tx in transactions {
        let entry = groups
            .entry(tx.customer_id.as_str())
            .or_insert((tx.order_date, 0, 0.0));
        entry.0 = entry.0.max(tx.order_date);
        entry.1 += 1;
        entry.2 += tx.order_value;
    }

    let metrics: Vec<CustomerMetrics> = groups
        .into_iter()
        .map(|(customer_id, (latest, count, total))| CustomerMetrics {
            customer_id: customer_id.to_string(),
            recency: (snapshot - latest).num_days(),
            frequency: count,
            monetary_value: total,
        })
        .collect();

    tracing::debug!(
        customers = metrics.len(),
        snapshot = %snapshot.date(),
        "customer metrics aggregated"
    );

    Ok(metrics)
}
