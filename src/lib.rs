/*!
# dashpage

A two-page web application: an episode player and a supermarket sales dashboard.

## Overview

The dashboard reads a sales spreadsheet (one title row, then a header row),
lets a visitor narrow it by city, customer type and gender, and shows three
headline metrics plus two bar charts: sales per product line and sales per
hour of day. The player page shows one video from a fixed, ordered episode
list with one button per episode.

Every dashboard interaction is a full run: the spreadsheet is read again,
filtered, aggregated and rendered. Nothing is cached between runs; the only
values that outlive a run are the session's selected episode and its filter.

## Architecture

### Data layer
- **loader**: path resolution, sheet choice, header stripping, column checks,
  hour derivation and null dropping. xlsx/xls/ods through calamine, csv
  through the csv crate
- **record**: `SalesRecord` and the loaded `SalesTable`
- **filter**: multi-select filters over city, customer type and gender
- **aggregate**: product and hour groupings, headline metrics

### Presentation layer (`web` feature)
- **graph**: bar charts rendered to SVG with plotters
- **presenter** / **templates**: handlebars pages
- **downloader**: filtered rows as CSV or XLSX
- **session**: per-visitor state behind a `session` cookie
- **app**: axum routing and error responses

## Binaries

- `website` - the web server
- `dashpage-cli` - prints a dashboard report or the column names of a sheet

## Routes

- `/` - landing page
- `/player`, `/player/select/{index}` - episode player
- `/dashboard`, `/dashboard/filter`, `/dashboard/reset` - sales dashboard
- `/dashboard/charts/{kind}`, `/dashboard/export/{format}` - downloads
- `/api/dashboard`, `/api/videos` - JSON
*/

pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod downloader;
pub mod error;
pub mod filter;
pub mod format;
pub mod loader;
pub mod record;
pub mod video;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod graph;
#[cfg(feature = "web")]
pub mod presenter;
#[cfg(feature = "web")]
pub mod session;
#[cfg(feature = "web")]
pub mod templates;

pub use aggregate::{GroupTotal, Metrics, sales_by_hour, sales_by_product};
pub use dashboard::{DashboardSummary, DashboardView};
pub use error::{ExportError, GraphError, LoadError, VideoError};
pub use filter::{FilterSelection, apply_filter};
pub use loader::{LoadOptions, load_sales};
pub use record::{SalesRecord, SalesTable};
pub use video::{PlayerState, VideoCatalog, VideoEntry};
