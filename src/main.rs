mod cli;
mod config;
mod models;
mod output;
mod scrapers;

use clap::Parser;
use cli::Cli;
use config::ScrapeConfig;
use output::JsonWriter;
use scrapers::{ApartmentsScraper, ChromeDriver, ScraperTrait, TracingReporter};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let mut config = ScrapeConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    config.validate()?;

    info!("🏠 Apartments Scout");
    info!("Start page: {}", config.start_url);
    info!("Target: {} apartments", config.max_apartments);

    let driver = ChromeDriver::launch(config.headless, config.window_size)?;
    let reporter = Arc::new(TracingReporter::new());
    let scraper = ApartmentsScraper::new(driver, config, reporter.clone());

    info!("Scraping from {}...", scraper.source_name());
    let apartments = scraper.scrape().await?;

    let summary = reporter.summary();
    info!(
        "✅ Scraped {} apartments ({} pages, {} defaulted fields, {} without photos)",
        apartments.len(),
        summary.pages,
        summary.defaulted_fields,
        summary.galleries_missing
    );

    JsonWriter::from_base_name(&cli.output)
        .write(&apartments)
        .await?;

    Ok(())
}
