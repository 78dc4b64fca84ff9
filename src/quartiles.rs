// 📊 Quartile Scoring
// Population cut points per metric and the 1-4 scores derived from them

use crate::metrics::CustomerMetrics;
use serde::{Deserialize, Serialize};

/// Linear-interpolation quantile over an already sorted slice.
///
/// Returns `None` for an empty slice.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let position = (sorted.len() - 1) as f64 * q;
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    let fraction = position - lower as f64;

    Some(sorted[lower] + fraction * (sorted[upper] - sorted[lower]))
}

/// P25 / P50 / P75 of a single metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
}

impl Thresholds {
    /// Compute cut points from unsorted values; `None` when there are none
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut sorted: Vec<f64> = values.into_iter().collect();
        sorted.sort_by(|a, b| a.total_cmp(b));

        Some(Thresholds {
            p25: quantile(&sorted, 0.25)?,
            p50: quantile(&sorted, 0.50)?,
            p75: quantile(&sorted, 0.75)?,
        })
    }

    /// Score where lower is better (Recency): 1 for the freshest quarter
    pub fn score_ascending(&self, x: f64) -> u8 {
        if x <= self.p25 {
            1
        } else if x <= self.p50 {
            2
        } else if x <= self.p75 {
            3
        } else {
            4
        }
    }

    /// Score where higher is better (Frequency, Monetary): 1 for the top quarter
    pub fn score_descending(&self, x: f64) -> u8 {
        if x <= self.p25 {
            4
        } else if x <= self.p50 {
            3
        } else if x <= self.p75 {
            2
        } else {
            1
        }
    }
}

/// Cut points for all three metrics, derived once per run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuartileThresholds {
    #[serde(rename = "Recency")]
    pub recency: Thresholds,

    #[serde(rename = "Frequency")]
    pub frequency: Thresholds,

    #[serde(rename = "MonetaryValue")]
    pub monetary_value: Thresholds,
}

impl QuartileThresholds {
    /// `None` for an empty population
    pub fn compute(population: &[CustomerMetrics]) -> Option<Self> {
        Some(QuartileThresholds {
            recency: Thresholds::from_values(population.iter().map(|c| c.recency as f64))?,
            frequency: Thresholds::from_values(population.iter().map(|c| c.frequency as f64))?,
            monetary_value: Thresholds::from_values(population.iter().map(|c| c.monetary_value))?,
        })
    }

    /// (R, F, M) scores for one customer
    pub fn score(&self, customer: &CustomerMetrics) -> (u8, u8, u8) {
        (
            self.recency.score_ascending(customer.recency as f64),
            self.frequency.score_descending(customer.frequency as f64),
            self.monetary_value.score_descending(customer.monetary_value),
        )
    }
}
