// 💶 Core KPIs and dataset metadata

use crate::error::{Result, RfmError};
use crate::parser::{Transaction, REQUIRED_COLUMNS};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Metadata shown next to the raw-data preview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub columns: usize,
    /// Rows with a blank customerID or orderID
    pub missing_values: usize,
    pub unique_customers: usize,
    /// `[dd/mm/yyyy, dd/mm/yyyy]`
    pub time_period: String,
}

impl DatasetSummary {
    pub fn from_transactions(transactions: &[Transaction]) -> Result<Self> {
        let first = transactions.iter().map(|tx| tx.order_date).min().ok_or(RfmError::EmptyInput)?;
        let last = transactions.iter().map(|tx| tx.order_date).max().ok_or(RfmError::EmptyInput)?;

        let missing_values = transactions
            .iter()
            .filter(|tx| tx.customer_id.is_empty() || tx.order_id.is_empty())
            .count();

        let unique_customers = transactions
            .iter()
            .map(|tx| tx.customer_id.as_str())
            .collect::<HashSet<_>>()
            .len();

        Ok(DatasetSummary {
            rows: transactions.len(),
            columns: REQUIRED_COLUMNS.len(),
            missing_values,
            unique_customers,
            time_period: format!("[{}, {}]", first.format("%d/%m/%Y"), last.format("%d/%m/%Y")),
        })
    }
}

/// Headline figures of the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub unique_customers: usize,
    /// Distinct orderIDs
    pub orders: usize,
    pub total_order_value: f64,
    pub mean_order_value: f64,
    /// Orders per customer
    pub order_frequency: f64,
    /// Mean total spend per customer
    pub customer_lifetime_value: f64,
}

impl Kpis {
    pub fn from_transactions(transactions: &[Transaction]) -> Result<Self> {
        if transactions.is_empty() {
            return Err(RfmError::EmptyInput);
        }

        let total_order_value: f64 = transactions.iter().map(|tx| tx.order_value).sum();
        let orders = transactions
            .iter()
            .map(|tx| tx.order_id.as_str())
            .collect::<HashSet<_>>()
            .len();

        let mut per_customer: HashMap<&str, f64> = HashMap::new();
        for tx in transactions {
            *per_customer.entry(tx.customer_id.as_str()).or_insert(0.0) += tx.order_value;
        }
        let unique_customers = per_customer.len();

        Ok(Kpis {
            unique_customers,
            orders,
            total_order_value,
            mean_order_value: total_order_value / orders as f64,
            order_frequency: orders as f64 / unique_customers as f64,
            customer_lifetime_value: per_customer.values().sum::<f64>() / unique_customers as f64,
        })
    }
}
