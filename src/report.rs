// 🗂️ Dashboard report - every section of the dashboard in one value

use crate::error::Result;
use crate::insights::{generate_insights, Insight};
use crate::kpis::{DatasetSummary, Kpis};
use crate::parser::Transaction;
use crate::quality::{DataQualityEngine, QualityReport};
use crate::retention::{retention_trend, RetentionPoint};
use crate::sales::{weekly_sales, WeeklySales};
use crate::segmentation::{segment, HeatmapCell, ProfileCount, ProfileMeans, Segmentation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub summary: DatasetSummary,
    pub kpis: Kpis,
    pub weekly_sales: Vec<WeeklySales>,
    pub segmentation: Segmentation,
    pub profile_counts: Vec<ProfileCount>,
    pub profile_means: Vec<ProfileMeans>,
    pub heatmap: Vec<HeatmapCell>,
    pub retention: Vec<RetentionPoint>,
    pub insights: Vec<Insight>,
    pub quality: QualityReport,
}

/// Compute the whole dashboard from one transaction table
pub fn build_report(transactions: &[Transaction], smoothing_window: usize) -> Result<DashboardReport> {
    let summary = DatasetSummary::from_transactions(transactions)?;
    let kpis = Kpis::from_transactions(transactions)?;
    let segmentation = segment(transactions)?;
    let weekly_sales = weekly_sales(transactions, smoothing_window);
    let retention = retention_trend(transactions);
    let insights = generate_insights(&kpis, &segmentation, &weekly_sales, &retention);
    let quality = DataQualityEngine::new().validate_batch(transactions);

    tracing::debug!(
        weeks = weekly_sales.len(),
        months = retention.len(),
        insights = insights.len(),
        "dashboard report built"
    );

    Ok(DashboardReport {
        summary,
        kpis,
        profile_counts: segmentation.profile_counts(),
        profile_means: segmentation.profile_means(),
        heatmap: segmentation.monetary_heatmap(),
        weekly_sales,
        segmentation,
        retention,
        insights,
        quality,
    })
}
