//! Budgetweb main entry point

use budgetweb_api::start_server;
use budgetweb_config::Config;
use budgetweb_core::Workbook;
use budgetweb_parser::DefaultSheetParser;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio::sync::RwLock;

#[derive(Parser, Debug)]
#[command(name = "budgetweb")]
#[command(author = "Budgetweb Contributors")]
#[command(version = "0.1.0")]
#[command(about = "A lightweight monthly budget and tool-expense dashboard", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Purchase sheet to load at startup (overrides the configured path)
    #[arg(short, long)]
    sheet: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    let rt = Runtime::new()?;

    rt.block_on(async {
        let config = Config::load(args.config.clone()).unwrap_or_else(|e| {
            log::warn!("Could not load {}: {}; using defaults", args.config.display(), e);
            Config::default()
        });

        log::info!(
            "Config loaded: data path={}, sheet_file={}",
            config.data.path.to_string_lossy(),
            config.data.sheet_file
        );

        let parser = Arc::new(DefaultSheetParser::default());
        let workbook = Arc::new(RwLock::new(Workbook::new(config.clone(), parser)));

        // Load the purchase sheet if one is available; the dashboard also
        // accepts uploads at runtime, so a missing file is not fatal.
        let sheet_path = args.sheet.unwrap_or_else(|| config.sheet_path());
        log::info!("Looking for purchase sheet: {}", sheet_path.display());

        if sheet_path.exists() {
            let mut wb = workbook.write().await;
            match wb.load(sheet_path).await {
                Ok(stats) => log::info!(
                    "Sheet loaded: {} rows, {} allocable",
                    stats.source_rows,
                    stats.allocated_rows
                ),
                Err(e) => log::error!("Failed to load sheet: {}", e),
            }
        } else {
            log::warn!("Purchase sheet not found: {}", sheet_path.display());
        }

        start_server(config, workbook).await
    });

    Ok(())
}
