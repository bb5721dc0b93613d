use crate::models::Apartment;
use crate::scrapers::types::DriverError;
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Common trait for all listing scrapers
#[async_trait]
pub trait ScraperTrait: Send + Sync {
    /// Scrape apartments from the source
    async fn scrape(&self) -> Result<Vec<Apartment>>;

    /// Get the name of the scraper source
    fn source_name(&self) -> &'static str;
}

/// One browser session, driven one step at a time
///
/// Reads go through [`PageDriver::page_source`] so that parsing never
/// depends on the live session.
pub trait PageDriver: Send + Sync {
    /// Load `url` and wait for the navigation to settle
    fn navigate(&self, url: &str) -> Result<(), DriverError>;

    /// URL of the page currently shown
    fn current_url(&self) -> String;

    /// Block until `selector` matches a visible element or `timeout` elapses
    fn wait_visible(&self, selector: &str, timeout: Duration) -> Result<(), DriverError>;

    fn click(&self, selector: &str) -> Result<(), DriverError>;

    /// Send a single key press to the focused page, e.g. `"ArrowRight"`
    fn press_key(&self, key: &str) -> Result<(), DriverError>;

    /// Serialized DOM of the current page
    fn page_source(&self) -> Result<String, DriverError>;

    /// PNG capture of the viewport
    fn screenshot(&self) -> Result<Vec<u8>, DriverError>;
}
