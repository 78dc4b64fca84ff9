// 💡 Narrative insights - templated sentences over the computed analytics

use crate::kpis::Kpis;
use crate::retention::RetentionPoint;
use crate::rules::Profile;
use crate::sales::WeeklySales;
use crate::segmentation::Segmentation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    LargestSegment,
    Champions,
    Lapsing,
    SalesTrend,
    Retention,
    Spend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
}

impl Insight {
    fn new(kind: InsightKind, message: String) -> Self {
        Insight { kind, message }
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

/// Build the insight list; sections without data are skipped
pub fn generate_insights(
    kpis: &Kpis,
    segmentation: &Segmentation,
    weekly: &[WeeklySales],
    retention: &[RetentionPoint],
) -> Vec<Insight> {
    let mut insights = Vec::new();
    let customers = segmentation.customers.len();

    insights.push(Insight::new(
        InsightKind::Spend,
        format!(
            "{} customers placed {} orders, {:.2} orders per customer with a mean order value of {:.2}.",
            kpis.unique_customers, kpis.orders, kpis.order_frequency, kpis.mean_order_value
        ),
    ));

    if let Some(largest) = segmentation.profile_counts().first() {
        insights.push(Insight::new(
            InsightKind::LargestSegment,
            format!(
                "The largest segment is {} with {} customers ({:.1}% of the base).",
                largest.profile,
                largest.customers,
                percent(largest.customers, customers)
            ),
        ));
    }

    let champions = segmentation
        .customers
        .iter()
        .filter(|c| c.profile == Profile::Champion)
        .count();
    if champions > 0 {
        let share = segmentation
            .revenue_share()
            .get(&Profile::Champion)
            .copied()
            .unwrap_or(0.0);
        insights.push(Insight::new(
            InsightKind::Champions,
            format!(
                "Champions are {:.1}% of customers and bring in {:.1}% of revenue.",
                percent(champions, customers),
                share * 100.0
            ),
        ));
    }

    let lapsing = [Profile::AtRisk, Profile::AboutToSleep, Profile::Hibernating];
    let lapsing_count = segmentation.filter_by_profiles(&lapsing).len();
    if lapsing_count > 0 {
        insights.push(Insight::new(
            InsightKind::Lapsing,
            format!(
                "{} customers ({:.1}%) are at risk, about to sleep or hibernating and are candidates for win-back campaigns.",
                lapsing_count,
                percent(lapsing_count, customers)
            ),
        ));
    }

    if let (Some(first), Some(last)) = (weekly.first(), weekly.last()) {
        if weekly.len() > 1 && first.order_value_smooth != 0.0 {
            let change = (last.order_value_smooth - first.order_value_smooth) / first.order_value_smooth.abs() * 100.0;
            let direction = if change >= 0.0 { "up" } else { "down" };
            insights.push(Insight::new(
                InsightKind::SalesTrend,
                format!(
                    "Smoothed weekly sales are {} {:.1}% between the weeks ending {} and {}.",
                    direction,
                    change.abs(),
                    first.week.format("%d/%m/%Y"),
                    last.week.format("%d/%m/%Y")
                ),
            ));
        }
    }

    if let Some(point) = retention.iter().rev().find(|p| p.retention_rate.is_some()) {
        let rate = point.retention_rate.unwrap_or(0.0);
        insights.push(Insight::new(
            InsightKind::Retention,
            format!(
                "In {}, {:.1}% of the previous month's customers ordered again.",
                point.month,
                rate * 100.0
            ),
        ));
    }

    insights
}
