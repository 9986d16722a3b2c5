//! Group-by-sum reductions and summary metrics over a (filtered) record set.
//!
//! Everything here is recomputed from scratch on each call.

use crate::record::{Category, SalesRecord};
use serde::Serialize;
use std::collections::BTreeMap;

/// Summed total price for one group key.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupTotal<K> {
    pub key: K,
    pub total: f64,
}

fn group_sum<K: Ord + Clone>(
    records: &[SalesRecord],
    key: impl Fn(&SalesRecord) -> K,
) -> Vec<GroupTotal<K>> {
    let mut sums: BTreeMap<K, f64> = BTreeMap::new();
    for record in records {
        *sums.entry(key(record)).or_insert(0.0) += record.total_price;
    }
    sums.into_iter()
        .map(|(key, total)| GroupTotal { key, total })
        .collect()
}

/// Sales per product type, ascending by summed value.
///
/// Groups start in ascending key order and the sort by value is stable, so
/// equal sums keep key order.
pub fn sales_by_product(records: &[SalesRecord]) -> Vec<GroupTotal<String>> {
    let mut groups = group_sum(records, |r| Category::ProductType.value(r).to_string());
    groups.sort_by(|a, b| a.total.total_cmp(&b.total));
    groups
}

/// Sales per hour of day, ascending by hour. Hours with no rows are absent.
pub fn sales_by_hour(records: &[SalesRecord]) -> Vec<GroupTotal<u8>> {
    group_sum(records, |r| r.hour)
}

/// Scalar figures shown above the charts.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Metrics {
    pub transactions: usize,
    pub total_sales: f64,
    /// Mean rating rounded to one decimal; `None` for an empty set
    pub average_rating: Option<f64>,
    /// Mean total price rounded to two decimals; `None` for an empty set
    pub average_sale: Option<f64>,
}

impl Metrics {
    pub fn compute(records: &[SalesRecord]) -> Self {
        let transactions = records.len();
        let total_sales: f64 = records.iter().map(|r| r.total_price).sum();
        let rating_sum: f64 = records.iter().map(|r| r.rating).sum();

        let mean = |sum: f64| (transactions > 0).then(|| sum / transactions as f64);

        Metrics {
            transactions,
            total_sales,
            average_rating: mean(rating_sum).map(|v| round_to(v, 1)),
            average_sale: mean(total_sales).map(|v| round_to(v, 2)),
        }
    }

    /// Total sales truncated toward zero, as displayed.
    pub fn total_sales_whole(&self) -> i64 {
        self.total_sales.trunc() as i64
    }

    /// Star count for the rating display: the average rounded to a whole number.
    pub fn star_count(&self) -> usize {
        self.average_rating
            .map(|rating| rating.round_ties_even().max(0.0) as usize)
            .unwrap_or(0)
    }
}

/// Rounds half-to-even at `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
