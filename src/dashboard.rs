use crate::aggregate::{GroupTotal, Metrics, sales_by_hour, sales_by_product};
use crate::filter::{FilterControl, FilterSelection, apply_filter, filter_controls};
use crate::record::SalesTable;
use serde::Serialize;

/// Result of one full dashboard run over a loaded table.
///
/// Built from scratch on every interaction: nothing is cached between runs.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardView {
    pub selection: FilterSelection,
    pub controls: Vec<FilterControl>,
    pub filtered: SalesTable,
    pub product_sales: Vec<GroupTotal<String>>,
    pub hourly_sales: Vec<GroupTotal<u8>>,
    pub metrics: Metrics,
}

impl DashboardView {
    /// Filters `table` with `selection` (every observed value when `None`)
    /// and aggregates the result.
    pub fn build(table: &SalesTable, selection: Option<&FilterSelection>) -> Self {
        let selection = selection
            .cloned()
            .unwrap_or_else(|| FilterSelection::all_observed(table));
        let controls = filter_controls(table, &selection);
        let filtered = apply_filter(table, &selection);

        DashboardView {
            product_sales: sales_by_product(&filtered.records),
            hourly_sales: sales_by_hour(&filtered.records),
            metrics: Metrics::compute(&filtered.records),
            controls,
            filtered,
            selection,
        }
    }

    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary {
            rows: self.filtered.len(),
            selection: self.selection.clone(),
            metrics: self.metrics.clone(),
            product_sales: self.product_sales.clone(),
            hourly_sales: self.hourly_sales.clone(),
        }
    }
}

/// JSON shape of a dashboard run, without the rows themselves.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub rows: usize,
    pub selection: FilterSelection,
    pub metrics: Metrics,
    pub product_sales: Vec<GroupTotal<String>>,
    pub hourly_sales: Vec<GroupTotal<u8>>,
}
