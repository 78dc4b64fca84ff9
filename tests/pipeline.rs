//! Integration tests: CSV on disk → loader → segmentation → report

use rfm_dashboard::{
    build_report, classify, load_csv, segment, Profile, RfmError, TransactionLoader,
};
use std::collections::HashSet;
use std::io::Write;
use tempfile::NamedTempFile;

/// Create a test CSV file with sample data
fn create_test_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "customerID,orderDate,orderID,orderValue").unwrap();

    // Customer 1001 - frequent, recent, big spender
    writeln!(file, "1001,02/09/2024,A-1,120.00").unwrap();
    writeln!(file, "1001,16/09/2024,A-2,80.50").unwrap();
    writeln!(file, "1001,30/09/2024,A-3,99.99").unwrap();
    writeln!(file, "1001,14/10/2024,A-4,150.00").unwrap();

    // Customer 1002 - a couple of mid-size orders
    writeln!(file, "1002,05/09/2024,B-1,60.00").unwrap();
    writeln!(file, "1002,03/10/2024,B-2,45.00").unwrap();

    // Customer 1003 - one old order
    writeln!(file, "1003,01/08/2024,C-1,15.00").unwrap();

    // Customer 1004 - three orders, one refund
    writeln!(file, "1004,10/08/2024,D-1,70.00").unwrap();
    writeln!(file, "1004,12/08/2024,D-2,-20.00").unwrap();
    writeln!(file, "1004,20/09/2024,D-3,40.00").unwrap();

    // Customer 1005 - single recent order
    writeln!(file, "1005,13/10/2024,E-1,25.00").unwrap();

    file
}

#[test]
fn test_end_to_end_segmentation() {
    let file = create_test_csv();
    let transactions = load_csv(file.path()).unwrap();
    assert_eq!(transactions.len(), 11);

    let result = segment(&transactions).unwrap();
    assert_eq!(result.customers.len(), 5);
    assert_eq!(result.snapshot_date.date().to_string(), "2024-10-15");

    let ids: Vec<&str> = result.customers.iter().map(|c| c.customer_id.as_str()).collect();
    assert_eq!(ids, vec!["1001", "1002", "1003", "1004", "1005"]);

    for customer in &result.customers {
        for score in [customer.r_quartile, customer.f_quartile, customer.m_quartile] {
            assert!((1..=4).contains(&score));
        }
        assert_eq!(customer.rfm_class.len(), 3);
        assert!(customer.rfm_class.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(classify(&customer.rfm_class).unwrap(), customer.profile);
    }

    let top = &result.customers[0];
    assert_eq!(top.recency, 1);
    assert_eq!(top.frequency, 4);
    assert!((top.monetary_value - 450.49).abs() < 1e-9);
    assert_eq!(top.rfm_class, "111");
    assert_eq!(top.profile, Profile::Champion);

    let refund = &result.customers[3];
    assert_eq!(refund.frequency, 3);
    assert!((refund.monetary_value - 90.0).abs() < 1e-9);
}

#[test]
fn test_expected_scores() {
    let file = create_test_csv();
    let result = segment(&load_csv(file.path()).unwrap()).unwrap();

    // Recency:   1001=1, 1002=12, 1003=75, 1004=25, 1005=2  → P25 2, P50 12, P75 25
    // Frequency: 4, 2, 1, 3, 1                             → P25 1, P50 2, P75 3
    // Monetary:  450.49, 105, 15, 90, 25                   → P25 25, P50 90, P75 105
    let classes: Vec<&str> = result.customers.iter().map(|c| c.rfm_class.as_str()).collect();
    assert_eq!(classes, vec!["111", "232", "444", "323", "144"]);

    let profiles: Vec<Profile> = result.customers.iter().map(|c| c.profile).collect();
    assert_eq!(
        profiles,
        vec![
            Profile::Champion,
            Profile::PotentialLoyalist,
            Profile::AtRisk,
            Profile::Others,
            Profile::Others,
        ]
    );
}

#[test]
fn test_idempotent_across_loads() {
    let file = create_test_csv();

    let first = segment(&load_csv(file.path()).unwrap()).unwrap();
    let second = segment(&load_csv(file.path()).unwrap()).unwrap();

    let as_set = |customers: &[rfm_dashboard::ScoredCustomer]| -> HashSet<String> {
        customers
            .iter()
            .map(|c| format!("{}:{}:{}", c.customer_id, c.rfm_class, c.profile))
            .collect()
    };
    assert_eq!(as_set(&first.customers), as_set(&second.customers));
}

#[test]
fn test_full_report() {
    let file = create_test_csv();
    let transactions = load_csv(file.path()).unwrap();
    let report = build_report(&transactions, 3).unwrap();

    assert_eq!(report.summary.time_period, "[01/08/2024, 14/10/2024]");
    assert_eq!(report.kpis.unique_customers, 5);
    assert_eq!(report.kpis.orders, 11);

    let months: Vec<&str> = report.retention.iter().map(|p| p.month.as_str()).collect();
    assert_eq!(months, vec!["2024-08", "2024-09", "2024-10"]);

    assert_eq!(report.quality.count("order_value_negative"), 1);
    assert!(report.weekly_sales.len() >= 11);
}

#[test]
fn test_header_only_file_is_empty_input() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "customerID,orderDate,orderID,orderValue").unwrap();

    let transactions = load_csv(file.path()).unwrap();
    assert!(matches!(segment(&transactions), Err(RfmError::EmptyInput)));
}

#[test]
fn test_malformed_date_in_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "customerID;orderDate;orderID;orderValue").unwrap();
    writeln!(file, "1;01/01/2024;a;1").unwrap();
    writeln!(file, "2;2024/13/45;b;1").unwrap();

    let err = TransactionLoader::new()
        .with_delimiter(b';')
        .load_path(file.path())
        .unwrap_err();
    assert!(matches!(err, RfmError::MalformedDate { line: 3, .. }));
}
