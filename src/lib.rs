// RFM Dashboard - Core Library
// Transaction analytics behind the customer segmentation dashboard

pub mod config;
pub mod error;
pub mod insights;
pub mod kpis;
pub mod metrics;
pub mod parser;
pub mod quality;
pub mod quartiles;
pub mod report;
pub mod retention;
pub mod rules;
pub mod sales;
pub mod segmentation;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use config::{load_config, Config};
pub use error::{Result, RfmError};
pub use insights::{generate_insights, Insight, InsightKind};
pub use kpis::{DatasetSummary, Kpis};
pub use metrics::{aggregate, snapshot_date, CustomerMetrics};
pub use parser::{load_csv, parse_order_date, Transaction, TransactionLoader};
pub use quality::{DataQualityEngine, QualityIssue, QualityReport, Severity};
pub use quartiles::{quantile, QuartileThresholds, Thresholds};
pub use report::{build_report, DashboardReport};
pub use retention::{retention_trend, RetentionPoint};
pub use rules::{classify, classify_class, ClassificationResult, Profile, ProfileRule, RfmClass, PROFILE_RULES};
pub use sales::{weekly_sales, WeeklySales};
pub use segmentation::{segment, HeatmapCell, ProfileCount, ProfileMeans, ScoredCustomer, Segmentation};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
