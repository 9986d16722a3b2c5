#![cfg(not(tarpaulin_include))]

use crate::error::ExportError;
use crate::record::SalesTable;

/// Convert a table to CSV format
///
/// Writes the source headers plus the derived hour column, then one line per
/// record in table order. Quoting and escaping are handled by the csv writer.
///
/// # Arguments
/// * `table` - Reference to the (usually filtered) table to convert
///
/// # Returns
/// * `Result<String, ExportError>` - CSV content as a string or an error
pub fn to_csv(table: &SalesTable) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(table.display_columns())?;
    for row in table.display_rows() {
        writer.write_record(&row)?;
    }
    writer.flush()?;

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Convert a table to XLSX format
///
/// Uses rust_xlsxwriter to build a single worksheet with the same layout as
/// [`to_csv`]. Cells that read as numbers are written as numbers so the
/// workbook stays sortable in a spreadsheet application.
///
/// # Returns
/// * `Result<Vec<u8>, ExportError>` - XLSX file content as bytes or an error
#[cfg(feature = "web")]
pub fn to_xlsx(table: &SalesTable) -> Result<Vec<u8>, ExportError> {
    use rust_xlsxwriter::{Workbook, Worksheet};

    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();
    worksheet.set_name("筛选数据")?;

    for (c, header) in table.display_columns().iter().enumerate() {
        worksheet.write_string(0, c as u16, header.as_str())?;
    }

    for (r, row) in table.display_rows().iter().enumerate() {
        let r = (r + 1) as u32;
        for (c, value) in row.iter().enumerate() {
            match value.parse::<f64>() {
                Ok(number) if number.is_finite() => {
                    worksheet.write_number(r, c as u16, number)?;
                }
                _ => {
                    worksheet.write_string(r, c as u16, value.as_str())?;
                }
            }
        }
    }

    workbook.push_worksheet(worksheet);

    let buffer = workbook.save_to_buffer()?;

    Ok(buffer)
}
