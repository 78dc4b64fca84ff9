// 🧩 RFM Segmentation
// Aggregate → score → classify, plus the per-profile views built on top

use crate::error::{Result, RfmError};
use crate::metrics::{aggregate, snapshot_date, CustomerMetrics};
use crate::parser::Transaction;
use crate::quartiles::QuartileThresholds;
use crate::rules::{classify_class, Profile, RfmClass};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// ============================================================================
// SCORED CUSTOMER
// ============================================================================

/// Customer metrics with quartile scores, class code and profile.
///
/// Field names follow the column headers of the exported table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCustomer {
    #[serde(rename = "customerID")]
    pub customer_id: String,

    #[serde(rename = "Recency")]
    pub recency: i64,

    #[serde(rename = "Frequency")]
    pub frequency: u64,

    #[serde(rename = "MonetaryValue")]
    pub monetary_value: f64,

    #[serde(rename = "R_Quartile")]
    pub r_quartile: u8,

    #[serde(rename = "F_Quartile")]
    pub f_quartile: u8,

    #[serde(rename = "M_Quartile")]
    pub m_quartile: u8,

    #[serde(rename = "RFMClass")]
    pub rfm_class: String,

    pub profile: Profile,
}

impl ScoredCustomer {
    fn from_metrics(metrics: CustomerMetrics, thresholds: &QuartileThresholds) -> Result<Self> {
        let (r, f, m) = thresholds.score(&metrics);
        let class = RfmClass::new(r, f, m)?;
        let profile = classify_class(class).profile;

        Ok(ScoredCustomer {
            customer_id: metrics.customer_id,
            recency: metrics.recency,
            frequency: metrics.frequency,
            monetary_value: metrics.monetary_value,
            r_quartile: r,
            f_quartile: f,
            m_quartile: m,
            rfm_class: class.code(),
            profile,
        })
    }
}

// ============================================================================
// SEGMENTATION
// ============================================================================

/// Result of one segmentation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segmentation {
    pub snapshot_date: NaiveDateTime,
    pub thresholds: QuartileThresholds,
    pub customers: Vec<ScoredCustomer>,
}

/// Run the full pipeline over a non-empty transaction table
pub fn segment(transactions: &[Transaction]) -> Result<Segmentation> {
    let snapshot = snapshot_date(transactions)?;
    let metrics = aggregate(transactions)?;
    let thresholds = QuartileThresholds::compute(&metrics).ok_or(RfmError::EmptyInput)?;

    let customers = metrics
        .into_iter()
        .map(|m| ScoredCustomer::from_metrics(m, &thresholds))
        .collect::<Result<Vec<_>>>()?;

    tracing::info!(
        customers = customers.len(),
        transactions = transactions.len(),
        "segmentation complete"
    );

    Ok(Segmentation {
        snapshot_date: snapshot,
        thresholds,
        customers,
    })
}

impl Segmentation {
    /// Customers per profile, largest first (ties by profile order)
    pub fn profile_counts(&self) -> Vec<ProfileCount> {
        let mut counts: BTreeMap<Profile, usize> = BTreeMap::new();
        for customer in &self.customers {
            *counts.entry(customer.profile).or_insert(0) += 1;
        }

        let mut counts: Vec<ProfileCount> = counts
            .into_iter()
            .map(|(profile, customers)| ProfileCount { profile, customers })
            .collect();
        counts.sort_by(|a, b| b.customers.cmp(&a.customers).then(a.profile.cmp(&b.profile)));
        counts
    }

    /// Mean R, F and M for every profile present
    pub fn profile_means(&self) -> Vec<ProfileMeans> {
        let mut groups: BTreeMap<Profile, Vec<&ScoredCustomer>> = BTreeMap::new();
        for customer in &self.customers {
            groups.entry(customer.profile).or_default().push(customer);
        }

        groups
            .into_iter()
            .map(|(profile, members)| {
                let n = members.len() as f64;
                ProfileMeans {
                    profile,
                    customers: members.len(),
                    mean_recency: members.iter().map(|c| c.recency as f64).sum::<f64>() / n,
                    mean_frequency: members.iter().map(|c| c.frequency as f64).sum::<f64>() / n,
                    mean_monetary_value: members.iter().map(|c| c.monetary_value).sum::<f64>() / n,
                }
            })
            .collect()
    }

    /// Mean monetary value per (R, F) score cell, rounded to whole units
    pub fn monetary_heatmap(&self) -> Vec<HeatmapCell> {
        let mut cells: BTreeMap<(u8, u8), (f64, usize)> = BTreeMap::new();
        for customer in &self.customers {
            let cell = cells
                .entry((customer.r_quartile, customer.f_quartile))
                .or_insert((0.0, 0));
            cell.0 += customer.monetary_value;
            cell.1 += 1;
        }

        cells
            .into_iter()
            .map(|((r_quartile, f_quartile), (total, count))| HeatmapCell {
                r_quartile,
                f_quartile,
                customers: count,
                mean_monetary_value: (total / count as f64).round(),
            })
            .collect()
    }

    /// Customers whose profile is in `profiles`; an empty filter keeps everyone
    pub fn filter_by_profiles(&self, profiles: &[Profile]) -> Vec<&ScoredCustomer> {
        self.customers
            .iter()
            .filter(|c| profiles.is_empty() || profiles.contains(&c.profile))
            .collect()
    }

    /// Share of total monetary value per profile, in [0, 1]
    pub fn revenue_share(&self) -> HashMap<Profile, f64> {
        let total: f64 = self.customers.iter().map(|c| c.monetary_value).sum();
        let mut shares: HashMap<Profile, f64> = HashMap::new();
        if total == 0.0 {
            return shares;
        }
        for customer in &self.customers {
            *shares.entry(customer.profile).or_insert(0.0) += customer.monetary_value / total;
        }
        shares
    }
}

// ============================================================================
// SUMMARY TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileCount {
    pub profile: Profile,
    pub customers: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileMeans {
    pub profile: Profile,
    pub customers: usize,
    pub mean_recency: f64,
    pub mean_frequency: f64,
    pub mean_monetary_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub r_quartile: u8,
    pub f_quartile: u8,
    pub customers: usize,
    pub mean_monetary_value: f64,
}

// ============================================================================
// TESTS
// ============================================================================
