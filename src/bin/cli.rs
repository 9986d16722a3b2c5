#![cfg(not(tarpaulin_include))]

//! Command-line access to the sales dashboard without a browser.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dashpage::config::SalesSource;
use dashpage::dashboard::DashboardView;
use dashpage::downloader::to_csv;
use dashpage::error::LoadError;
use dashpage::filter::FilterSelection;
use dashpage::format::metric_cards;
use dashpage::graph::{hourly_sales_chart, product_sales_chart};
use dashpage::loader::{load_sales, read_sheet};
use dashpage::record::SalesTable;
use env_logger::Env;
use log::error;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dashpage-cli")]
#[command(about = "Sales dashboard reports from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the metrics and both groupings for a filter
    Report {
        #[command(flatten)]
        source: SalesSource,

        /// Cities to keep (repeatable; all when omitted)
        #[arg(long)]
        city: Vec<String>,

        /// Customer types to keep (repeatable; all when omitted)
        #[arg(long)]
        customer_type: Vec<String>,

        /// Genders to keep (repeatable; all when omitted)
        #[arg(long)]
        gender: Vec<String>,

        /// Directory to write hour_sales.svg and product_sales.svg into
        #[arg(long)]
        charts_dir: Option<PathBuf>,

        /// File to write the filtered rows to as CSV
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Print the column names of the sheet after header stripping
    Columns {
        #[command(flatten)]
        source: SalesSource,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            source,
            city,
            customer_type,
            gender,
            charts_dir,
            export,
        } => {
            let table = load_sales(&source.load_options()).map_err(report_load_error)?;
            let selection = selection_from_args(&table, city, customer_type, gender);
            let view = DashboardView::build(&table, Some(&selection));
            print_report(&view);

            if let Some(dir) = charts_dir {
                std::fs::create_dir_all(&dir)
                    .with_context(|| format!("cannot create {}", dir.display()))?;
                let hour = dir.join("hour_sales.svg");
                std::fs::write(&hour, hourly_sales_chart(&view.hourly_sales)?)?;
                let product = dir.join("product_sales.svg");
                std::fs::write(&product, product_sales_chart(&view.product_sales)?)?;
                println!("charts written to {}", dir.display());
            }

            if let Some(path) = export {
                std::fs::write(&path, to_csv(&view.filtered)?)
                    .with_context(|| format!("cannot write {}", path.display()))?;
                println!("{} rows written to {}", view.filtered.len(), path.display());
            }
        }
        Commands::Columns { source } => {
            let sheet = read_sheet(&source.load_options()).map_err(report_load_error)?;
            for header in &sheet.headers {
                println!("{}", header);
            }
        }
    }

    Ok(())
}

/// Omitted categories accept every observed value.
fn selection_from_args(
    table: &SalesTable,
    city: Vec<String>,
    customer_type: Vec<String>,
    gender: Vec<String>,
) -> FilterSelection {
    let mut selection = FilterSelection::all_observed(table);
    if !city.is_empty() {
        selection.cities = city.into_iter().collect();
    }
    if !customer_type.is_empty() {
        selection.customer_types = customer_type.into_iter().collect();
    }
    if !gender.is_empty() {
        selection.genders = gender.into_iter().collect();
    }
    selection
}

fn report_load_error(e: LoadError) -> anyhow::Error {
    error!("failed to load sales data: {}", e);
    if let LoadError::MissingFile { listing, .. } = &e {
        eprintln!("当前目录下的文件：");
        for name in listing {
            eprintln!("  {}", name);
        }
    }
    eprintln!("请检查：");
    for (i, hint) in e.hints().iter().enumerate() {
        eprintln!("  {}. {}", i + 1, hint);
    }
    anyhow::Error::new(e)
}

fn print_report(view: &DashboardView) {
    println!("rows: {}", view.filtered.len());
    for card in metric_cards(&view.metrics) {
        println!("{}: {} ({})", card.label, card.value, card.caption);
    }

    println!();
    println!("按小时划分的销售额:");
    for group in &view.hourly_sales {
        println!("  {:>2}  {:.2}", group.key, group.total);
    }

    println!();
    println!("按产品类型划分的销售额:");
    for group in &view.product_sales {
        println!("  {}  {:.2}", group.key, group.total);
    }
}
