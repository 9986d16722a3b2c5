#![cfg(not(tarpaulin_include))]

use crate::error::LoadError;
use crate::record::{
    CITY, CUSTOMER_TYPE, GENDER, ORDER_ID, PRODUCT_TYPE, RATING, REQUIRED_COLUMNS, SalesRecord,
    SalesTable, TIME, TOTAL_PRICE,
};
use calamine::{Data, Reader, open_workbook_auto};
use chrono::{Duration, NaiveDate, NaiveTime, Timelike};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Sheet the sales workbook is expected to keep its rows in.
pub const DEFAULT_SHEET: &str = "销售数据";

/// Where the sales workbook is read from and how.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadOptions {
    /// Spreadsheet path; relative paths are resolved by [`resolve_path`]
    pub path: PathBuf,
    /// Preferred sheet name; the first sheet is used when it is absent
    pub sheet: String,
    /// Rows above the header row (a title line in the sample workbook)
    pub skip_rows: usize,
    /// Extra directories a relative path is tried against, after the working directory
    pub search_roots: Vec<PathBuf>,
}

impl LoadOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sheet: DEFAULT_SHEET.to_string(),
            skip_rows: 1,
            search_roots: Vec::new(),
        }
    }
}

/// A single cell as read from the source file, before any typing.
#[derive(Clone, Debug, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Excel serial date/time: whole days since 1899-12-30 plus a day fraction
    DateTime(f64),
}

static EMPTY_CELL: RawCell = RawCell::Empty;

impl RawCell {
    /// Text shown for this cell in the raw data view and exports.
    pub fn display(&self) -> String {
        match self {
            RawCell::Empty => String::new(),
            RawCell::Text(s) => s.clone(),
            RawCell::Number(n) => format_number(*n),
            RawCell::Bool(b) => b.to_string(),
            RawCell::DateTime(serial) => format_serial(*serial),
        }
    }

    /// Numeric value, accepting numeric text. Non-finite values count as missing.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            RawCell::Number(n) => *n,
            RawCell::Text(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<&Data> for RawCell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Int(i) => RawCell::Number(*i as f64),
            Data::Float(f) => RawCell::Number(*f),
            Data::String(s) => RawCell::Text(s.clone()),
            Data::Bool(b) => RawCell::Bool(*b),
            Data::DateTime(dt) => RawCell::DateTime(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::Text(s.clone()),
            Data::Error(_) | Data::Empty => RawCell::Empty,
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn format_serial(serial: f64) -> String {
    let seconds = (serial * 86_400.0).round() as i64;
    if (0..86_400).contains(&seconds) {
        return NaiveTime::from_num_seconds_from_midnight_opt(seconds as u32, 0)
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| serial.to_string());
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .and_then(|epoch| epoch.checked_add_signed(Duration::seconds(seconds)))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| serial.to_string())
}

/// Header row plus data rows of one sheet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawSheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<RawCell>>,
}

impl RawSheet {
    /// Builds a sheet from every row of the source, skipping `skip_rows` rows
    /// before the header. Headers are whitespace-stripped and rows that are
    /// entirely blank are discarded.
    pub fn from_rows(rows: Vec<Vec<RawCell>>, skip_rows: usize) -> Result<Self, LoadError> {
        let mut rows = rows.into_iter().skip(skip_rows);
        let header_row = rows.next().ok_or(LoadError::MissingHeader(skip_rows))?;

        let headers = header_row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let name = cell.display().trim().to_string();
                if name.is_empty() {
                    format!("Unnamed: {}", i)
                } else {
                    name
                }
            })
            .collect();

        let rows = rows
            .filter(|row| !row.iter().all(RawCell::is_empty))
            .collect();

        Ok(RawSheet { headers, rows })
    }
}

/// Which sheet of a workbook was read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SheetChoice {
    /// The requested sheet exists
    Named(String),
    /// The requested sheet is absent; this is the workbook's first sheet
    First(String),
}

impl SheetChoice {
    pub fn name(&self) -> &str {
        match self {
            SheetChoice::Named(name) | SheetChoice::First(name) => name,
        }
    }
}

/// Picks the sheet to read: `wanted` when present, the first sheet otherwise.
///
/// # Errors
/// * `LoadError::NoSheets` when the workbook has no sheets at all
pub fn choose_sheet(available: &[String], wanted: &str) -> Result<SheetChoice, LoadError> {
    if available.iter().any(|name| name == wanted) {
        return Ok(SheetChoice::Named(wanted.to_string()));
    }
    available
        .first()
        .map(|first| SheetChoice::First(first.clone()))
        .ok_or(LoadError::NoSheets)
}

/// Accepted layouts of the time column, in the order they are tried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeFormat {
    HourMinuteSecond,
    HourMinute,
}

impl TimeFormat {
    pub fn pattern(self) -> &'static str {
        match self {
            TimeFormat::HourMinuteSecond => "%H:%M:%S",
            TimeFormat::HourMinute => "%H:%M",
        }
    }

    /// Hour of day for one cell, or `None` when the cell does not match this format.
    ///
    /// Native spreadsheet time values carry no textual layout and are accepted
    /// under either format.
    pub fn parse_hour(self, cell: &RawCell) -> Option<u8> {
        match cell {
            RawCell::Text(s) => NaiveTime::parse_from_str(s, self.pattern())
                .ok()
                .map(|t| t.hour() as u8),
            RawCell::DateTime(serial) => hour_of_serial(*serial),
            _ => None,
        }
    }
}

fn hour_of_serial(serial: f64) -> Option<u8> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let seconds = (serial.fract() * 86_400.0).round() as u32 % 86_400;
    Some((seconds / 3600) as u8)
}

/// Parses every cell with a single format.
pub fn parse_hours(cells: &[&RawCell], format: TimeFormat) -> Vec<Option<u8>> {
    cells.iter().map(|cell| format.parse_hour(cell)).collect()
}

/// Derives the hour column.
///
/// `HH:MM:SS` is tried first over the whole column. Only when it yields no
/// successful parse at all is the column parsed again as `HH:MM`; a column
/// with a single `HH:MM:SS` match keeps the first format and every `HH:MM`
/// cell in it stays unparsed.
pub fn derive_hours(cells: &[&RawCell]) -> (TimeFormat, Vec<Option<u8>>) {
    let hours = parse_hours(cells, TimeFormat::HourMinuteSecond);
    if hours.iter().any(Option::is_some) {
        return (TimeFormat::HourMinuteSecond, hours);
    }
    (TimeFormat::HourMinute, parse_hours(cells, TimeFormat::HourMinute))
}

struct ColumnIndex {
    order_id: usize,
    city: usize,
    customer_type: usize,
    gender: usize,
    product_type: usize,
    total_price: usize,
    rating: usize,
    time: usize,
}

/// Checks that every required column is present.
///
/// # Errors
/// * `LoadError::MissingColumns` naming every absent column, in declaration order
pub fn check_columns(headers: &[String]) -> Result<(), LoadError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|h| h == *required))
        .map(|required| required.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(LoadError::MissingColumns(missing))
    }
}

fn locate_columns(headers: &[String]) -> Result<ColumnIndex, LoadError> {
    check_columns(headers)?;
    let position = |name: &str| headers.iter().position(|h| h == name).unwrap_or_default();
    Ok(ColumnIndex {
        order_id: position(ORDER_ID),
        city: position(CITY),
        customer_type: position(CUSTOMER_TYPE),
        gender: position(GENDER),
        product_type: position(PRODUCT_TYPE),
        total_price: position(TOTAL_PRICE),
        rating: position(RATING),
        time: position(TIME),
    })
}

fn cell_at(row: &[RawCell], index: usize) -> &RawCell {
    row.get(index).unwrap_or(&EMPTY_CELL)
}

/// Turns a raw sheet into validated records.
///
/// Rows whose total price, rating or derived hour is missing are dropped, not
/// repaired. Row order is preserved.
pub fn build_table(sheet: RawSheet) -> Result<SalesTable, LoadError> {
    let columns = locate_columns(&sheet.headers)?;

    let times: Vec<&RawCell> = sheet
        .rows
        .iter()
        .map(|row| cell_at(row, columns.time))
        .collect();
    let (format, hours) = derive_hours(&times);
    if format == TimeFormat::HourMinute {
        warn!("no time matched %H:%M:%S, parsed the time column as %H:%M");
    }

    let mut records = Vec::with_capacity(sheet.rows.len());
    let mut dropped = 0usize;

    for (row, hour) in sheet.rows.iter().zip(hours) {
        let total_price = cell_at(row, columns.total_price).as_number();
        let rating = cell_at(row, columns.rating).as_number();
        let (Some(total_price), Some(rating), Some(hour)) = (total_price, rating, hour) else {
            dropped += 1;
            continue;
        };

        let text = |index: usize| cell_at(row, index).display();
        records.push(SalesRecord {
            order_id: text(columns.order_id),
            city: text(columns.city),
            customer_type: text(columns.customer_type),
            gender: text(columns.gender),
            product_type: text(columns.product_type),
            total_price,
            rating,
            time: text(columns.time),
            hour,
            cells: (0..sheet.headers.len()).map(text).collect(),
        });
    }

    if dropped > 0 {
        info!("dropped {} incomplete rows", dropped);
    }
    info!("loaded {} sales records", records.len());

    Ok(SalesTable::new(sheet.headers, records))
}

/// Resolves a configured spreadsheet path.
///
/// Absolute paths are used as given. Relative paths are tried against the
/// working directory first and then each search root in order.
///
/// # Errors
/// * `LoadError::MissingFile` with the working-directory candidate and the
///   contents of the directory it should be in
pub fn resolve_path(path: &Path, search_roots: &[PathBuf]) -> Result<PathBuf, LoadError> {
    if path.is_absolute() {
        return if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(missing_file(path.to_path_buf()))
        };
    }

    let candidates = std::iter::once(path.to_path_buf())
        .chain(search_roots.iter().map(|root| root.join(path)));
    for candidate in candidates {
        if candidate.is_file() {
            debug!("resolved {} to {}", path.display(), candidate.display());
            return Ok(candidate);
        }
    }

    let expected = std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf());
    Err(missing_file(expected))
}

fn missing_file(path: PathBuf) -> LoadError {
    let listing = path.parent().map(directory_listing).unwrap_or_default();
    LoadError::MissingFile { path, listing }
}

/// Sorted entry names of `dir`; empty when it cannot be read.
pub fn directory_listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .flatten()
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

/// Reads one sheet of an Excel or OpenDocument workbook.
///
/// # Arguments
/// * `path` - Workbook file (xlsx, xlsm, xls, xlsb or ods)
/// * `wanted` - Preferred sheet name
/// * `skip_rows` - Rows above the header row
pub fn from_excel(path: &Path, wanted: &str, skip_rows: usize) -> Result<RawSheet, LoadError> {
    let mut workbook = open_workbook_auto(path)?;

    let choice = choose_sheet(&workbook.sheet_names(), wanted)?;
    if let SheetChoice::First(name) = &choice {
        warn!("sheet {:?} not found, reading first sheet {:?}", wanted, name);
    }

    let range = workbook.worksheet_range(choice.name())?;
    let rows = range
        .rows()
        .map(|row| row.iter().map(RawCell::from).collect())
        .collect();

    RawSheet::from_rows(rows, skip_rows)
}

/// Reads a CSV file. Every non-empty field is kept as text.
pub fn from_csv(path: &Path, skip_rows: usize) -> Result<RawSheet, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        RawCell::Empty
                    } else {
                        RawCell::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }

    RawSheet::from_rows(rows, skip_rows)
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Resolves and reads the configured file without validating columns.
pub fn read_sheet(options: &LoadOptions) -> Result<RawSheet, LoadError> {
    let path = resolve_path(&options.path, &options.search_roots)?;
    info!("reading sales data from {}", path.display());

    let sheet = if is_csv(&path) {
        from_csv(&path, options.skip_rows)?
    } else {
        from_excel(&path, &options.sheet, options.skip_rows)?
    };
    debug!("columns after stripping: {:?}", sheet.headers);
    Ok(sheet)
}

/// Full load: resolve, read, validate columns, derive hours, drop incomplete rows.
///
/// # Examples
/// ```no_run
/// use dashpage::loader::{LoadOptions, load_sales};
///
/// match load_sales(&LoadOptions::new("data/supermarket_sales.xlsx")) {
///     Ok(table) => println!("{} records", table.len()),
///     Err(e) => eprintln!("load failed: {}", e),
/// }
/// ```
pub fn load_sales(options: &LoadOptions) -> Result<SalesTable, LoadError> {
    build_table(read_sheet(options)?)
}
