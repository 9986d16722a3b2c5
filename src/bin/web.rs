#![cfg(not(tarpaulin_include))]

use clap::Parser;
use dashpage::app;
use dashpage::config::ServerSettings;
use env_logger::Env;

#[derive(Parser)]
#[command(name = "website")]
#[command(about = "Episode player and sales dashboard", long_about = None)]
struct Cli {
    #[command(flatten)]
    settings: ServerSettings,
}

/// Main entry point for the web application
///
/// Reads settings from the command line and environment, sets up logging
/// (`RUST_LOG`, default `info`) and serves until interrupted.
///
/// # Returns
/// * `anyhow::Result<()>` - Success or the error that stopped the server
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    app::run(cli.settings).await
}
