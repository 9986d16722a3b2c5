//! Command-line and environment configuration.

use crate::loader::{DEFAULT_SHEET, LoadOptions};
use clap::Args;
use std::path::PathBuf;

/// Default session lifetime in seconds: 24 hours.
pub const SESSION_DURATION: u64 = 24 * 60 * 60;

/// Where the sales spreadsheet lives and how to read it.
#[derive(Args, Clone, Debug, PartialEq, Eq)]
pub struct SalesSource {
    /// Sales spreadsheet (xlsx, xls, ods or csv)
    #[arg(long, env = "DASHPAGE_SALES_FILE", default_value = "data/supermarket_sales.csv")]
    pub sales_file: PathBuf,

    /// Sheet to read; the first sheet is used when it does not exist
    #[arg(long, env = "DASHPAGE_SHEET", default_value = DEFAULT_SHEET)]
    pub sheet: String,

    /// Rows above the header row
    #[arg(long, env = "DASHPAGE_SKIP_ROWS", default_value_t = 1)]
    pub skip_rows: usize,

    /// Directories a relative sales file is looked up in after the working directory
    #[arg(
        long = "search-root",
        env = "DASHPAGE_SEARCH_ROOTS",
        value_delimiter = ','
    )]
    pub search_roots: Vec<PathBuf>,
}

impl SalesSource {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            path: self.sales_file.clone(),
            sheet: self.sheet.clone(),
            skip_rows: self.skip_rows,
            search_roots: self.search_roots.clone(),
        }
    }
}

/// Settings of the web server.
#[derive(Args, Clone, Debug, PartialEq, Eq)]
pub struct ServerSettings {
    /// Address to listen on
    #[arg(long, env = "DASHPAGE_ADDR", default_value = "127.0.0.1:3000")]
    pub addr: String,

    /// JSON episode list for the player page
    #[arg(long, env = "DASHPAGE_VIDEOS_FILE", default_value = "data/videos.json")]
    pub videos_file: PathBuf,

    /// Directory served under /static
    #[arg(long, env = "DASHPAGE_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// Session lifetime in seconds
    #[arg(long, env = "DASHPAGE_SESSION_TTL", default_value_t = SESSION_DURATION)]
    pub session_ttl_secs: u64,

    #[command(flatten)]
    pub source: SalesSource,
}
