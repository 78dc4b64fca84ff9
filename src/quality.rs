// ✅ Data Quality - flag questionable rows without rejecting them
//
// The segmentation accepts every parsed row. This pass only reports what a
// reviewer may want to look at before trusting the numbers.

use crate::parser::Transaction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// VALIDATION RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Severity {
    Warning, // Value is questionable and skews the metrics
    Info,    // Valid but worth knowing about
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub passed: bool,
    pub rule_name: String,
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

impl ValidationResult {
    pub fn pass(rule_name: &str, field: &str, message: &str) -> Self {
        ValidationResult {
            passed: true,
            rule_name: rule_name.to_string(),
            field: field.to_string(),
            message: message.to_string(),
            severity: Severity::Info,
        }
    }

    pub fn fail(rule_name: &str, field: &str, message: &str, severity: Severity) -> Self {
        ValidationResult {
            passed: false,
            rule_name: rule_name.to_string(),
            field: field.to_string(),
            message: message.to_string(),
            severity,
        }
    }
}

// ============================================================================
// QUALITY REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityIssue {
    pub severity: Severity,
    pub rule_name: String,
    pub field: String,
    pub issue: String,
    /// Source lines affected
    pub lines: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    pub rows_checked: usize,
    pub issues: Vec<QualityIssue>,
}

impl QualityReport {
    pub fn summary(&self) -> String {
        let warnings = self
            .issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count();
        format!(
            "{} rows checked, {} issue kinds ({} warnings)",
            self.rows_checked,
            self.issues.len(),
            warnings
        )
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of affected rows for a rule, 0 if it never fired
    pub fn count(&self, rule_name: &str) -> usize {
        self.issues
            .iter()
            .find(|i| i.rule_name == rule_name)
            .map_or(0, |i| i.lines.len())
    }
}

// ============================================================================
// DATA QUALITY ENGINE
// ============================================================================

pub struct DataQualityEngine;

impl DataQualityEngine {
    pub fn new() -> Self {
        DataQualityEngine
    }

    /// Row-level checks for one transaction
    pub fn validate(&self, tx: &Transaction) -> Vec<ValidationResult> {
        vec![
            self.validate_customer_id(&tx.customer_id),
            self.validate_order_id(&tx.order_id),
            self.validate_order_value(tx.order_value),
        ]
    }

    /// Check every row and fold the failures into one report
    pub fn validate_batch(&self, transactions: &[Transaction]) -> QualityReport {
        let mut issues: Vec<QualityIssue> = Vec::new();

        for tx in transactions {
            for result in self.validate(tx).into_iter().filter(|r| !r.passed) {
                match issues.iter_mut().find(|i| i.rule_name == result.rule_name) {
                    Some(issue) => issue.lines.push(tx.line_number),
                    None => issues.push(QualityIssue {
                        severity: result.severity,
                        rule_name: result.rule_name,
                        field: result.field,
                        issue: result.message,
                        lines: vec![tx.line_number],
                    }),
                }
            }
        }

        if let Some(duplicates) = self.repeated_orders(transactions) {
            issues.push(duplicates);
        }

        for issue in &issues {
            tracing::warn!(
                rule = %issue.rule_name,
                rows = issue.lines.len(),
                "{}",
                issue.issue
            );
        }

        QualityReport {
            rows_checked: transactions.len(),
            issues,
        }
    }

    // ========================================================================
    // VALIDATION RULES
    // ========================================================================

    fn validate_customer_id(&self, customer_id: &str) -> ValidationResult {
        if customer_id.is_empty() {
            return ValidationResult::fail(
                "customer_id_empty",
                "customerID",
                "customerID is empty; rows are grouped under a blank customer",
                Severity::Warning,
            );
        }
        ValidationResult::pass("customer_id_present", "customerID", "customerID present")
    }

    fn validate_order_id(&self, order_id: &str) -> ValidationResult {
        if order_id.is_empty() {
            return ValidationResult::fail(
                "order_id_empty",
                "orderID",
                "orderID is empty",
                Severity::Warning,
            );
        }
        ValidationResult::pass("order_id_present", "orderID", "orderID present")
    }

    fn validate_order_value(&self, value: f64) -> ValidationResult {
        if value == 0.0 {
            return ValidationResult::fail(
                "order_value_zero",
                "orderValue",
                "orderValue is zero",
                Severity::Warning,
            );
        }
        if value < 0.0 {
            return ValidationResult::fail(
                "order_value_negative",
                "orderValue",
                "orderValue is negative; monetary totals include it as is",
                Severity::Warning,
            );
        }
        ValidationResult::pass("order_value_positive", "orderValue", "orderValue positive")
    }

    /// Same (customerID, orderID) on several rows: each row still counts
    /// toward Frequency.
    fn repeated_orders(&self, transactions: &[Transaction]) -> Option<QualityIssue> {
        let mut seen: HashMap<(&str, &str), Vec<usize>> = HashMap::new();
        for tx in transactions.iter().filter(|tx| !tx.order_id.is_empty()) {
            seen.entry((tx.customer_id.as_str(), tx.order_id.as_str()))
                .or_default()
                .push(tx.line_number);
        }

        let mut lines: Vec<usize> = seen
            .into_values()
            .filter(|l| l.len() > 1)
            .flatten()
            .collect();
        if lines.is_empty() {
            return None;
        }
        lines.sort_unstable();

        Some(QualityIssue {
            severity: Severity::Info,
            rule_name: "order_id_repeated".to_string(),
            field: "orderID".to_string(),
            issue: "orderID repeated for the same customer; every row counts toward Frequency"
                .to_string(),
            lines,
        })
    }
}

impl Default for DataQualityEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(customer: &str, order: &str, value: f64, line: usize) -> Transaction {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        Transaction::new(customer, date, order, value).with_line(line)
    }

    #[test]
    fn test_clean_batch() {
        let engine = DataQualityEngine::new();
        let report = engine.validate_batch(&[tx("A", "1", 10.0, 2), tx("B", "2", 3.0, 3)]);

        assert!(report.is_clean());
        assert_eq!(report.rows_checked, 2);
        assert_eq!(report.summary(), "2 rows checked, 0 issue kinds (0 warnings)");
    }

    #[test]
    fn test_row_checks() {
        let engine = DataQualityEngine::new();
        let results = engine.validate(&tx("", "", -1.0, 2));
        assert!(results.iter().all(|r| !r.passed));
        assert!(results.iter().all(|r| r.severity == Severity::Warning));
    }

    #[test]
    fn test_issues_grouped_by_rule() {
        let engine = DataQualityEngine::new();
        let report = engine.validate_batch(&[
            tx("A", "1", 0.0, 2),
            tx("A", "2", -5.0, 3),
            tx("", "3", 0.0, 4),
            tx("B", "4", 1.0, 5),
        ]);

        assert_eq!(report.count("order_value_zero"), 2);
        assert_eq!(report.count("order_value_negative"), 1);
        assert_eq!(report.count("customer_id_empty"), 1);
        assert_eq!(report.count("order_id_empty"), 0);

        let zero = report
            .issues
            .iter()
            .find(|i| i.rule_name == "order_value_zero")
            .unwrap();
        assert_eq!(zero.lines, vec![2, 4]);
    }

    #[test]
    fn test_repeated_orders_flagged_as_info() {
        let engine = DataQualityEngine::new();
        let report = engine.validate_batch(&[
            tx("A", "1", 1.0, 2),
            tx("A", "1", 1.0, 3),
            tx("B", "1", 1.0, 4),
        ]);

        let repeated = report
            .issues
            .iter()
            .find(|i| i.rule_name == "order_id_repeated")
            .unwrap();
        assert_eq!(repeated.severity, Severity::Info);
        assert_eq!(repeated.lines, vec![2, 3]);
        assert_eq!(report.summary(), "3 rows checked, 1 issue kinds (0 warnings)");
    }
}
