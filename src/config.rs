//! Scrape configuration: site selectors, wait bounds and run limits.

use crate::scrapers::document::parse_selector;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CSS selectors for every element the engine touches
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSelectors {
    /// Container that marks a rendered result list
    pub results: String,
    /// Links from a result card to its detail page
    pub item_link: String,
    /// "Next page" list item, carries the inactive marker on the last page
    pub next_page: String,
    /// Clickable part of the "next page" control
    pub next_page_link: String,
    /// Element present once a detail page has rendered
    pub detail_marker: String,
    pub title: String,
    pub address: String,
    pub description: String,
    pub price: String,
    pub floor_area: String,
    pub bedrooms: String,
    pub bathrooms: String,
    /// Primary photo that opens the viewer
    pub gallery_opener: String,
    /// "current/total" counter inside the viewer
    pub gallery_counter: String,
    /// Full-size image inside the viewer
    pub gallery_image: String,
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            results: "div.wrapper.even.wrapper-results".to_string(),
            item_link: "a.property-thumbnail-summary-link".to_string(),
            next_page: "li.next".to_string(),
            next_page_link: "li.next > a".to_string(),
            detail_marker: "#pre-localisation-section".to_string(),
            title: "h1[itemprop='category'] > span[data-id='PageTitle']".to_string(),
            address: "h2[itemprop='address']".to_string(),
            description: "div[itemprop='description']".to_string(),
            price: "div.price.text-right > span:nth-child(6)".to_string(),
            floor_area: "div.carac-value > span".to_string(),
            bedrooms: "div.row.teaser > div.cac".to_string(),
            bathrooms: "div.row.teaser > div.sdb".to_string(),
            gallery_opener: "div.primary-photo-container > a".to_string(),
            gallery_counter: "div.description > strong".to_string(),
            gallery_image: "#fullImg".to_string(),
        }
    }
}

impl SiteSelectors {
    fn all(&self) -> [(&'static str, &str); 15] {
        [
            ("results", self.results.as_str()),
            ("item_link", self.item_link.as_str()),
            ("next_page", self.next_page.as_str()),
            ("next_page_link", self.next_page_link.as_str()),
            ("detail_marker", self.detail_marker.as_str()),
            ("title", self.title.as_str()),
            ("address", self.address.as_str()),
            ("description", self.description.as_str()),
            ("price", self.price.as_str()),
            ("floor_area", self.floor_area.as_str()),
            ("bedrooms", self.bedrooms.as_str()),
            ("bathrooms", self.bathrooms.as_str()),
            ("gallery_opener", self.gallery_opener.as_str()),
            ("gallery_counter", self.gallery_counter.as_str()),
            ("gallery_image", self.gallery_image.as_str()),
        ]
    }
}

/// Upper bounds for every blocking wait
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    pub list_secs: u64,
    pub detail_secs: u64,
    pub gallery_secs: u64,
    /// How long one "next photo" press may take to change the frame
    pub frame_millis: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            list_secs: 10,
            detail_secs: 10,
            gallery_secs: 3,
            frame_millis: 2000,
        }
    }
}

impl Timeouts {
    pub fn list(&self) -> Duration {
        Duration::from_secs(self.list_secs)
    }

    pub fn detail(&self) -> Duration {
        Duration::from_secs(self.detail_secs)
    }

    pub fn gallery(&self) -> Duration {
        Duration::from_secs(self.gallery_secs)
    }

    pub fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_millis)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    #[serde(default = "default_start_url")]
    pub start_url: String,
    #[serde(default = "default_max_apartments")]
    pub max_apartments: usize,
    #[serde(default)]
    pub timeouts: Timeouts,
    /// Extra "next photo" presses allowed beyond the declared photo count
    #[serde(default = "default_photo_step_margin")]
    pub photo_step_margin: usize,
    /// Treat a broken photo viewer as fatal for the whole run
    #[serde(default)]
    pub strict_gallery: bool,
    #[serde(default = "default_headless")]
    pub headless: bool,
    #[serde(default = "default_window_size")]
    pub window_size: (u32, u32),
    /// Where to dump page HTML and a screenshot when a fatal wait times out
    #[serde(default)]
    pub debug_dir: Option<PathBuf>,
    #[serde(default)]
    pub selectors: SiteSelectors,
}

fn default_start_url() -> String {
    "https://www.centris.ca/en/properties~for-rent?view=Thumbnail".to_string()
}

fn default_max_apartments() -> usize {
    60
}

fn default_photo_step_margin() -> usize {
    3
}

fn default_headless() -> bool {
    true
}

fn default_window_size() -> (u32, u32) {
    (1920, 1080)
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            start_url: default_start_url(),
            max_apartments: default_max_apartments(),
            timeouts: Timeouts::default(),
            photo_step_margin: default_photo_step_margin(),
            strict_gallery: false,
            headless: default_headless(),
            window_size: default_window_size(),
            debug_dir: None,
            selectors: SiteSelectors::default(),
        }
    }
}

impl ScrapeConfig {
    /// Load from a JSON file, or fall back to defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_apartments == 0 {
            bail!("max_apartments must be at least 1");
        }
        if self.start_url.trim().is_empty() {
            bail!("start_url must not be empty");
        }
        for (name, selector) in self.selectors.all() {
            parse_selector(selector).with_context(|| format!("Bad selector for {}", name))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScrapeConfig::default();
        assert_eq!(config.max_apartments, 60);
        assert_eq!(config.timeouts.gallery(), Duration::from_secs(3));
        assert!(config.headless);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ScrapeConfig = serde_json::from_str(
            r#"{
                "max_apartments": 5,
                "timeouts": { "list_secs": 4 },
                "selectors": { "title": "h1.title" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.max_apartments, 5);
        assert_eq!(config.timeouts.list_secs, 4);
        assert_eq!(config.timeouts.detail_secs, 10);
        assert_eq!(config.selectors.title, "h1.title");
        assert_eq!(config.selectors.gallery_image, "#fullImg");
        assert_eq!(config.start_url, default_start_url());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ScrapeConfig::default();
        config.max_apartments = 0;
        assert!(config.validate().is_err());

        let mut config = ScrapeConfig::default();
        config.selectors.price = "div[[".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_without_path() {
        let config = ScrapeConfig::load(None).unwrap();
        assert_eq!(config.selectors.next_page, "li.next");
    }
}
