pub mod apartments;
pub mod browser;
pub mod detail;
pub mod document;
pub mod fields;
pub mod gallery;
pub mod pager;
pub mod poll;
pub mod report;
pub mod traits;
pub mod types;

#[cfg(test)]
pub mod fake;

pub use apartments::ApartmentsScraper;
pub use browser::ChromeDriver;
pub use report::TracingReporter;
pub use traits::ScraperTrait;
