// 📈 Weekly sales trend

use crate::parser::Transaction;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySales {
    /// Monday closing the week
    pub week: NaiveDate,
    pub order_value: f64,
    /// Trailing rolling mean of `order_value`
    pub order_value_smooth: f64,
}

/// The Monday a date's week is reported under: the date itself when it is
/// a Monday, otherwise the next one.
pub fn week_ending_monday(date: NaiveDate) -> NaiveDate {
    let days_ahead = (7 - date.weekday().num_days_from_monday()) % 7;
    date + Duration::days(days_ahead as i64)
}

/// Weekly order value, gap weeks filled with zero, smoothed over `window`
/// weeks (partial windows at the start average what is there).
pub fn weekly_sales(transactions: &[Transaction], window: usize) -> Vec<WeeklySales> {
    let window = window.max(1);

    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for tx in transactions {
        *totals.entry(week_ending_monday(tx.order_date.date())).or_insert(0.0) += tx.order_value;
    }

    let (first, last) = match (totals.keys().next(), totals.keys().next_back()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Vec::new(),
    };

    let mut weeks = Vec::new();
    let mut week = first;
    while week <= last {
        weeks.push((week, totals.get(&week).copied().unwrap_or(0.0)));
        week += Duration::days(7);
    }

    weeks
        .iter()
        .enumerate()
        .map(|(i, &(week, order_value))| {
            let start = (i + 1).saturating_sub(window);
            let slice = &weeks[start..=i];
            let order_value_smooth = slice.iter().map(|(_, v)| v).sum::<f64>() / slice.len() as f64;
            WeeklySales {
                week,
                order_value,
                order_value_smooth,
            }
        })
        .collect()
}
