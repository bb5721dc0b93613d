//! Command-line surface of the scraper.

use crate::config::ScrapeConfig;
use crate::output::DEFAULT_BASE_NAME;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "apartments-scout")]
#[command(version, about = "Scrape rental listings into a JSON file", long_about = None)]
pub struct Cli {
    /// Output file base name (".json" is appended)
    #[arg(short, long, default_value = DEFAULT_BASE_NAME)]
    pub output: String,

    /// Result list to start from
    #[arg(long)]
    pub url: Option<String>,

    /// Maximum number of apartments to scrape
    #[arg(short = 'n', long = "max")]
    pub max_apartments: Option<usize>,

    /// JSON config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    pub headful: bool,

    /// Save page HTML and a screenshot here when a page fails to load
    #[arg(long, value_name = "DIR")]
    pub debug_dir: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Flags win over values from the config file
    pub fn apply(&self, config: &mut ScrapeConfig) {
        if let Some(url) = &self.url {
            config.start_url = url.clone();
        }
        if let Some(max) = self.max_apartments {
            config.max_apartments = max;
        }
        if self.headful {
            config.headless = false;
        }
        if let Some(dir) = &self.debug_dir {
            config.debug_dir = Some(dir.clone());
        }
    }
}
