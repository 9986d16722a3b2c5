//! Fixture helpers shared by the integration tests.
#![allow(dead_code)]

use dashpage::record::{SalesRecord, SalesTable};
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};

pub const HEADER: [&str; 8] = [
    "订单号",
    "城市",
    "顾客类型",
    "性别",
    "产品类型",
    "总价",
    "评分",
    "时间",
];

/// Three complete rows: two in 太原 (25.0 total) and one in 大同 (20.0).
pub fn sample_rows() -> Vec<Vec<&'static str>> {
    vec![
        vec!["1", "太原", "会员", "女性", "食品饮料", "10", "8", "10:15:00"],
        vec!["2", "大同", "普通", "男性", "电子配件", "20", "6", "11:20:00"],
        vec!["3", "太原", "普通", "女性", "电子配件", "15", "7", "10:45:00"],
    ]
}

/// Writes a CSV file with an optional title row above `header`.
pub fn write_csv(dir: &Path, name: &str, title: bool, header: &[&str], rows: &[Vec<&str>]) -> PathBuf {
    let path = dir.join(name);
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(&path)
        .unwrap();
    if title {
        writer.write_record(["超市销售数据"]).unwrap();
    }
    writer.write_record(header).unwrap();
    for row in rows {
        writer.write_record(row).unwrap();
    }
    writer.flush().unwrap();
    path
}

/// Writes a one-sheet workbook: a title row, `header`, then `rows`.
///
/// Cells that parse as numbers are written as numbers; empty strings are left blank.
pub fn write_xlsx(path: &Path, sheet: &str, header: &[&str], rows: &[Vec<&str>]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet).unwrap();

    worksheet.write_string(0, 0, "超市销售数据").unwrap();
    for (c, name) in header.iter().enumerate() {
        worksheet.write_string(1, c as u16, *name).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        let r = (r + 2) as u32;
        for (c, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            match value.parse::<f64>() {
                Ok(number) => worksheet.write_number(r, c as u16, number).unwrap(),
                Err(_) => worksheet.write_string(r, c as u16, *value).unwrap(),
            };
        }
    }

    workbook.save(path).unwrap();
}

/// A record with only the fields the filter and aggregator look at.
pub fn record(city: &str, customer_type: &str, gender: &str, product: &str, price: f64, rating: f64, hour: u8) -> SalesRecord {
    SalesRecord {
        order_id: String::new(),
        city: city.to_string(),
        customer_type: customer_type.to_string(),
        gender: gender.to_string(),
        product_type: product.to_string(),
        total_price: price,
        rating,
        time: format!("{:02}:00:00", hour),
        hour,
        cells: Vec::new(),
    }
}

pub fn table(records: Vec<SalesRecord>) -> SalesTable {
    SalesTable::new(HEADER.iter().map(|h| h.to_string()).collect(), records)
}
