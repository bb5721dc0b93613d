use crate::scrapers::types::{ExtractError, GalleryError};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{error, info, warn};

/// Sink for the diagnostics of one run
pub trait Reporter: Send + Sync {
    fn page_visited(&self, url: &str);

    /// A field fell back to its default
    fn field_defaulted(&self, link: &str, field: &str, err: &ExtractError);

    /// The photo viewer was unavailable or broke; the record keeps no photos
    fn gallery_failed(&self, link: &str, err: &GalleryError);

    fn gallery_unavailable(&self, link: &str);
}

/// Reports through `tracing` and keeps counts for the run summary
#[derive(Debug, Default)]
pub struct TracingReporter {
    pages: AtomicUsize,
    defaulted: AtomicUsize,
    galleries_missing: AtomicUsize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub pages: usize,
    pub defaulted_fields: usize,
    pub galleries_missing: usize,
}

impl TracingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            pages: self.pages.load(Ordering::Relaxed),
            defaulted_fields: self.defaulted.load(Ordering::Relaxed),
            galleries_missing: self.galleries_missing.load(Ordering::Relaxed),
        }
    }
}

impl Reporter for TracingReporter {
    fn page_visited(&self, url: &str) {
        self.pages.fetch_add(1, Ordering::Relaxed);
        info!(url, "visiting page");
    }

    fn field_defaulted(&self, link: &str, field: &str, err: &ExtractError) {
        self.defaulted.fetch_add(1, Ordering::Relaxed);
        match err {
            ExtractError::Format { .. } => error!(
                link,
                field,
                kind = err.kind(),
                text = err.offending_text().unwrap_or_default(),
                "field defaulted: {}",
                err
            ),
            _ => info!(link, field, kind = err.kind(), "field defaulted: {}", err),
        }
    }

    fn gallery_failed(&self, link: &str, err: &GalleryError) {
        self.galleries_missing.fetch_add(1, Ordering::Relaxed);
        error!(link, kind = err.kind(), "photo collection failed: {}", err);
    }

    fn gallery_unavailable(&self, link: &str) {
        self.galleries_missing.fetch_add(1, Ordering::Relaxed);
        warn!(link, "photo viewer did not open, no photos collected");
    }
}
