//! Error types shared by the loader, the video selector and the exporters.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop a spreadsheet load.
///
/// A load either produces a complete [`crate::record::SalesTable`] or one of
/// these; there is no partial result. Unparseable time cells are not an error:
/// they yield no hour and the row is dropped.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The configured path did not resolve to a file.
    #[error("spreadsheet not found at {}", path.display())]
    MissingFile {
        /// The path that was expected to exist
        path: PathBuf,
        /// Entries of the directory that should have contained it, sorted
        listing: Vec<String>,
    },

    /// One or more of the required columns is absent after header stripping.
    #[error("spreadsheet is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// The workbook opened but has no worksheets at all.
    #[error("workbook contains no sheets")]
    NoSheets,

    /// Fewer rows than `skip_rows + 1`, so there is no header to read.
    #[error("no header row found after skipping {0} rows")]
    MissingHeader(usize),

    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("failed to read csv: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LoadError {
    /// Common causes shown next to the error on the dashboard.
    pub fn hints(&self) -> Vec<&'static str> {
        match self {
            LoadError::MissingFile { .. } => vec![
                "文件路径正确",
                "文件名（包括括号/中文）完全匹配",
                "文件在指定目录下",
            ],
            LoadError::MissingColumns(_) => vec!["列名不匹配", "跳过的标题行数不对"],
            _ => vec![
                "sheet名错误",
                "列名不匹配",
                "跳过的标题行数不对",
                "Excel文件损坏",
            ],
        }
    }
}

/// Errors raised by the video selector.
#[derive(Debug, Error)]
pub enum VideoError {
    #[error("episode index {index} is out of range for a catalog of {len} entries")]
    OutOfRange { index: usize, len: usize },

    #[error("video catalog has no episodes")]
    EmptyCatalog,

    #[error("failed to read video catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid video catalog: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while exporting the filtered rows.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("csv export produced invalid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("csv export failed: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "web")]
    #[error("xlsx export failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Errors raised while drawing a chart.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("chart rendering failed: {0}")]
    Render(String),
}

/// Errors raised while building an HTML page.
#[cfg(feature = "web")]
#[derive(Debug, Error)]
pub enum PageError {
    #[error("template rendering failed: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}
