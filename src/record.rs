use serde::Serialize;

/// Column headers the sales workbook must provide, after whitespace stripping.
pub const ORDER_ID: &str = "订单号";
pub const CITY: &str = "城市";
pub const CUSTOMER_TYPE: &str = "顾客类型";
pub const GENDER: &str = "性别";
pub const PRODUCT_TYPE: &str = "产品类型";
pub const TOTAL_PRICE: &str = "总价";
pub const RATING: &str = "评分";
pub const TIME: &str = "时间";

/// Header of the derived hour column appended to exports and the raw data view.
pub const HOUR: &str = "小时数";

pub const REQUIRED_COLUMNS: [&str; 8] = [
    ORDER_ID,
    CITY,
    CUSTOMER_TYPE,
    GENDER,
    PRODUCT_TYPE,
    TOTAL_PRICE,
    RATING,
    TIME,
];

/// One validated transaction row.
///
/// `total_price`, `rating` and `hour` are always present: rows where any of
/// them failed to parse never make it into a [`SalesTable`]. `cells` keeps the
/// display text of every source column, in header order, so the raw data view
/// and exports can show columns the pipeline itself does not use.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SalesRecord {
    pub order_id: String,
    pub city: String,
    pub customer_type: String,
    pub gender: String,
    pub product_type: String,
    pub total_price: f64,
    pub rating: f64,
    pub time: String,
    pub hour: u8,
    #[serde(skip)]
    pub cells: Vec<String>,
}

/// Categorical fields a record can be grouped or filtered by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    City,
    CustomerType,
    Gender,
    ProductType,
}

impl Category {
    pub fn column_name(self) -> &'static str {
        match self {
            Category::City => CITY,
            Category::CustomerType => CUSTOMER_TYPE,
            Category::Gender => GENDER,
            Category::ProductType => PRODUCT_TYPE,
        }
    }

    pub fn value(self, record: &SalesRecord) -> &str {
        match self {
            Category::City => &record.city,
            Category::CustomerType => &record.customer_type,
            Category::Gender => &record.gender,
            Category::ProductType => &record.product_type,
        }
    }
}

/// An ordered set of records plus the source header row.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SalesTable {
    pub columns: Vec<String>,
    pub records: Vec<SalesRecord>,
}

impl SalesTable {
    pub fn new(columns: Vec<String>, records: Vec<SalesRecord>) -> Self {
        Self { columns, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct values of `category` in order of first appearance.
    pub fn distinct(&self, category: Category) -> Vec<String> {
        let mut seen = Vec::new();
        for record in &self.records {
            let value = category.value(record);
            if !seen.iter().any(|v: &String| v == value) {
                seen.push(value.to_string());
            }
        }
        seen
    }

    /// Source headers followed by the derived hour column.
    pub fn display_columns(&self) -> Vec<String> {
        let mut headers = self.columns.clone();
        headers.push(HOUR.to_string());
        headers
    }

    /// One display row per record, aligned with [`SalesTable::display_columns`].
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        self.records
            .iter()
            .map(|record| {
                let mut row = record.cells.clone();
                row.resize(self.columns.len(), String::new());
                row.push(record.hour.to_string());
                row
            })
            .collect()
    }
}
