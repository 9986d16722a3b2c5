use crate::record::{Category, SalesRecord, SalesTable};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Categories the dashboard filters on, in sidebar order.
pub const FILTER_CATEGORIES: [Category; 3] =
    [Category::City, Category::CustomerType, Category::Gender];

/// The values currently accepted for each filterable category.
///
/// A record passes when its city, customer type and gender are all members of
/// the corresponding set. An empty set rejects every record; it never means
/// "no constraint".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub cities: BTreeSet<String>,
    pub customer_types: BTreeSet<String>,
    pub genders: BTreeSet<String>,
}

impl FilterSelection {
    pub fn new(
        cities: impl IntoIterator<Item = impl Into<String>>,
        customer_types: impl IntoIterator<Item = impl Into<String>>,
        genders: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            cities: cities.into_iter().map(Into::into).collect(),
            customer_types: customer_types.into_iter().map(Into::into).collect(),
            genders: genders.into_iter().map(Into::into).collect(),
        }
    }

    /// Selection accepting every value observed in `table`; the dashboard default.
    pub fn all_observed(table: &SalesTable) -> Self {
        Self {
            cities: table.distinct(Category::City).into_iter().collect(),
            customer_types: table.distinct(Category::CustomerType).into_iter().collect(),
            genders: table.distinct(Category::Gender).into_iter().collect(),
        }
    }

    /// Allowed set for a filterable category; product type is never filtered.
    pub fn allowed(&self, category: Category) -> Option<&BTreeSet<String>> {
        match category {
            Category::City => Some(&self.cities),
            Category::CustomerType => Some(&self.customer_types),
            Category::Gender => Some(&self.genders),
            Category::ProductType => None,
        }
    }

    pub fn allows(&self, record: &SalesRecord) -> bool {
        self.cities.contains(&record.city)
            && self.customer_types.contains(&record.customer_type)
            && self.genders.contains(&record.gender)
    }
}

/// One selectable value in a filter control.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub value: String,
    pub selected: bool,
}

/// Options for one filter control: every observed value, first-appearance order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilterControl {
    pub field: &'static str,
    pub label: &'static str,
    pub options: Vec<FilterOption>,
}

/// Builds the three sidebar controls from the unfiltered table.
pub fn filter_controls(table: &SalesTable, selection: &FilterSelection) -> Vec<FilterControl> {
    FILTER_CATEGORIES
        .iter()
        .map(|&category| {
            let allowed = selection.allowed(category);
            FilterControl {
                field: form_field(category),
                label: category.column_name(),
                options: table
                    .distinct(category)
                    .into_iter()
                    .map(|value| FilterOption {
                        selected: allowed.is_some_and(|set| set.contains(&value)),
                        value,
                    })
                    .collect(),
            }
        })
        .collect()
}

/// Form field name carrying a category's selected values.
pub fn form_field(category: Category) -> &'static str {
    match category {
        Category::City => "city",
        Category::CustomerType => "customer_type",
        Category::Gender => "gender",
        Category::ProductType => "product_type",
    }
}

/// Keeps the records `selection` allows, in their original order.
///
/// The input table is left untouched; columns are carried over unchanged.
pub fn apply_filter(table: &SalesTable, selection: &FilterSelection) -> SalesTable {
    let records: Vec<SalesRecord> = table
        .records
        .iter()
        .filter(|record| selection.allows(record))
        .cloned()
        .collect();

    info!("rows after filtering: {} of {}", records.len(), table.len());

    SalesTable::new(table.columns.clone(), records)
}
