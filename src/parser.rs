// 📥 Transaction Loader
// Delimited text → typed transactions, day-first dates, line provenance

use crate::error::{Result, RfmError};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Columns every input table must carry
pub const REQUIRED_COLUMNS: [&str; 4] = ["customerID", "orderDate", "orderID", "orderValue"];

/// Older exports name the value column `totalAmount`
const ORDER_VALUE_ALIAS: &str = "totalAmount";

// ============================================================================
// CORE TYPES
// ============================================================================

/// Transaction - one order row of the input table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "customerID")]
    pub customer_id: String,

    /// Day-first date from the source; date-only values land on midnight
    #[serde(rename = "orderDate")]
    pub order_date: NaiveDateTime,

    #[serde(rename = "orderID")]
    pub order_id: String,

    /// May be zero or negative, nothing is rejected here
    #[serde(rename = "orderValue")]
    pub order_value: f64,

    /// Line in the source text (header = 1)
    #[serde(skip)]
    pub line_number: usize,
}

impl Transaction {
    pub fn new(customer_id: &str, order_date: NaiveDateTime, order_id: &str, order_value: f64) -> Self {
        Transaction {
            customer_id: customer_id.to_string(),
            order_date,
            order_id: order_id.to_string(),
            order_value,
            line_number: 0,
        }
    }

    /// Builder pattern: attach source line
    pub fn with_line(mut self, line_number: usize) -> Self {
        self.line_number = line_number;
        self
    }
}

/// Row as it appears in the file, before any typing
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "customerID")]
    customer_id: String,

    #[serde(rename = "orderDate")]
    order_date: String,

    #[serde(rename = "orderID")]
    order_id: String,

    #[serde(rename = "orderValue", alias = "totalAmount")]
    order_value: String,
}

// ============================================================================
// DATE PARSING
// ============================================================================

/// Candidate formats, day-first. Two-digit years are tried before four-digit
/// ones because `%Y` would happily read "24" as the year 24.
fn date_formats() -> Vec<String> {
    let mut formats = Vec::new();
    for sep in ['/', '-', '.'] {
        for year in ["%y", "%Y"] {
            formats.push(format!("%d{sep}%m{sep}{year}"));
        }
    }
    formats.push("%Y-%m-%d".to_string());
    formats
}

/// Parse an order date the way the dashboard reads it: day first, optional
/// time of day, ISO dates accepted as well.
pub fn parse_order_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }

    for date_format in date_formats() {
        if let Ok(date) = NaiveDate::parse_from_str(raw, &date_format) {
            return date.and_hms_opt(0, 0, 0);
        }

        for time_format in [" %H:%M:%S", " %H:%M", "T%H:%M:%S", "T%H:%M"] {
            let full = format!("{date_format}{time_format}");
            if let Ok(dt) = NaiveDateTime::parse_from_str(raw, &full) {
                return Some(dt);
            }
        }
    }

    None
}

fn parse_order_value(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

// ============================================================================
// LOADER
// ============================================================================

/// TransactionLoader - reads the four-column transaction table
#[derive(Debug, Clone)]
pub struct TransactionLoader {
    delimiter: u8,
}

impl TransactionLoader {
    pub fn new() -> Self {
        TransactionLoader { delimiter: b',' }
    }

    /// Builder pattern: field separator
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Load transactions from a file on disk
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Transaction>> {
        let file = File::open(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "loading transactions");
        self.load_reader(file)
    }

    /// Load transactions from any reader (uploads, stdin, tests)
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<Vec<Transaction>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            let present = headers
                .iter()
                .any(|h| h == column || (column == "orderValue" && h == ORDER_VALUE_ALIAS));
            if !present {
                return Err(RfmError::MissingColumn(column.to_string()));
            }
        }

        let mut transactions = Vec::new();

        for (index, result) in reader.deserialize::<RawRecord>().enumerate() {
            // +2 because: 1-indexed + header row
            let line = index + 2;
            let raw = result?;

            let order_date = parse_order_date(&raw.order_date).ok_or_else(|| RfmError::MalformedDate {
                line,
                value: raw.order_date.clone(),
            })?;

            let order_value = parse_order_value(&raw.order_value).ok_or_else(|| RfmError::MalformedValue {
                line,
                value: raw.order_value.clone(),
            })?;

            transactions.push(
                Transaction::new(&raw.customer_id, order_date, &raw.order_id, order_value).with_line(line),
            );
        }

        tracing::info!(rows = transactions.len(), "transactions loaded");
        Ok(transactions)
    }
}

impl Default for TransactionLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a comma-separated transaction file with default settings
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Transaction>> {
    TransactionLoader::new().load_path(path)
}

// ============================================================================
// TESTS
// ============================================================================
