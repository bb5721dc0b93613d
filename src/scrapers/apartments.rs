use crate::config::ScrapeConfig;
use crate::models::Apartment;
use crate::scrapers::detail::DetailAssembler;
use crate::scrapers::pager::ListingPager;
use crate::scrapers::report::Reporter;
use crate::scrapers::traits::{PageDriver, ScraperTrait};
use crate::scrapers::types::{DriverError, ScrapeError};
use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::{info, warn};

/// Walks the rental result list, then every listing it links to
pub struct ApartmentsScraper<D: PageDriver> {
    driver: D,
    config: ScrapeConfig,
    reporter: Arc<dyn Reporter>,
}

impl<D: PageDriver> ApartmentsScraper<D> {
    pub fn new(driver: D, config: ScrapeConfig, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            driver,
            config,
            reporter,
        }
    }

    /// Scrape up to `target` apartments, in the order the list shows them
    pub fn run(&self, start_url: &str, target: usize) -> Result<Vec<Apartment>, ScrapeError> {
        let result = self.scrape_all(start_url, target);
        if let Err(err) = &result {
            self.save_debug_artifacts(err);
        }
        result
    }

    fn scrape_all(&self, start_url: &str, target: usize) -> Result<Vec<Apartment>, ScrapeError> {
        info!("Opening listing page {}", start_url);
        self.driver.navigate(start_url)?;
        self.reporter.page_visited(start_url);

        self.driver
            .wait_visible(&self.config.selectors.results, self.config.timeouts.list())
            .map_err(|err| match err {
                DriverError::Timeout { .. } => ScrapeError::ListTimeout(err),
                other => ScrapeError::Driver(other),
            })?;

        let links = ListingPager::new(
            &self.driver,
            &self.config.selectors,
            self.reporter.as_ref(),
            self.config.timeouts.list(),
        )
        .collect_links(target)?;

        let assembler = DetailAssembler::new(&self.driver, &self.config, self.reporter.as_ref());
        let mut apartments = Vec::with_capacity(links.len());
        for (idx, link) in links.iter().enumerate() {
            info!("[{}/{}] Scraping {}", idx + 1, links.len(), link);
            apartments.push(assembler.assemble(link)?);
        }

        info!("Scraped {} apartments", apartments.len());
        Ok(apartments)
    }

    /// Dump the page that failed to render, when a debug directory is configured
    fn save_debug_artifacts(&self, err: &ScrapeError) {
        let Some(dir) = &self.config.debug_dir else {
            return;
        };
        let label = match err {
            ScrapeError::ListTimeout(_) => "list",
            ScrapeError::PageTurnTimeout { .. } => "page_turn",
            ScrapeError::DetailTimeout { .. } => "detail",
            _ => return,
        };

        if let Err(e) = self.write_debug_files(dir, label) {
            warn!("Could not save debug artifacts to {}: {}", dir.display(), e);
        }
    }

    fn write_debug_files(&self, dir: &Path, label: &str) -> Result<()> {
        std::fs::create_dir_all(dir)?;

        let html_path = dir.join(format!("{}_page.html", label));
        std::fs::write(&html_path, self.driver.page_source()?)?;
        info!("Saved page HTML to {}", html_path.display());

        let screenshot_path = dir.join(format!("{}_screenshot.png", label));
        std::fs::write(&screenshot_path, self.driver.screenshot()?)?;
        info!("Saved screenshot to {}", screenshot_path.display());

        Ok(())
    }
}

#[async_trait]
impl<D: PageDriver> ScraperTrait for ApartmentsScraper<D> {
    async fn scrape(&self) -> Result<Vec<Apartment>> {
        let run = || self.run(&self.config.start_url, self.config.max_apartments);

        // The browser session blocks. `block_in_place` moves it off the async
        // worker but panics on a current-thread runtime, which runs it inline.
        let apartments = match Handle::current().runtime_flavor() {
            RuntimeFlavor::CurrentThread => run()?,
            _ => tokio::task::block_in_place(run)?,
        };
        Ok(apartments)
    }

    fn source_name(&self) -> &'static str {
        "Centris"
    }
}
