use std::time::Duration;

/// Errors raised by a browser session
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("Browser launch failed: {0}")]
    Launch(String),

    #[error("Navigation error: {0}")]
    Navigation(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Timeout after {timeout:?} waiting for: {selector}")]
    Timeout { selector: String, timeout: Duration },

    #[error("JavaScript execution error: {0}")]
    Script(String),
}

/// Why a single field could not be read from a detail page
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractError {
    /// The element does not exist in the rendered document
    #[error("element not found: {selector}")]
    ElementNotFound { selector: String },

    /// The element exists but its text has an unexpected shape
    #[error("expected {expected}, got {text:?}")]
    Format { expected: &'static str, text: String },

    #[error("invalid selector: {0}")]
    InvalidSelector(String),
}

impl ExtractError {
    pub fn format(expected: &'static str, text: impl Into<String>) -> Self {
        Self::Format {
            expected,
            text: text.into(),
        }
    }

    /// Short diagnostic label used in log events
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ElementNotFound { .. } => "element_not_found",
            Self::Format { .. } => "format_violation",
            Self::InvalidSelector(_) => "invalid_selector",
        }
    }

    /// Text that failed to parse, when there was any
    pub fn offending_text(&self) -> Option<&str> {
        match self {
            Self::Format { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// Failures of the photo viewer walk that are not plain "no gallery"
#[derive(Debug, thiserror::Error)]
pub enum GalleryError {
    #[error("photo counter {text:?} does not contain exactly one '/'")]
    MalformedCounter { text: String },

    #[error("photo counter {text:?} has a non-numeric total")]
    InvalidCount { text: String },

    #[error("full-size image has no source")]
    MissingFrame,

    #[error("photo viewer stalled after {collected} of {total} photos")]
    Stalled { collected: usize, total: usize },

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl GalleryError {
    /// Short diagnostic label used in log events
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedCounter { .. } => "malformed_counter",
            Self::InvalidCount { .. } => "invalid_count",
            Self::MissingFrame => "missing_frame",
            Self::Stalled { .. } => "stalled",
            Self::Extract(err) => err.kind(),
            Self::Driver(_) => "driver",
        }
    }
}

/// Conditions that end a scrape run
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("listing page never rendered: {0}")]
    ListTimeout(#[source] DriverError),

    #[error("next listing page never replaced {previous}")]
    PageTurnTimeout { previous: String },

    #[error("detail page {link} never rendered: {source}")]
    DetailTimeout {
        link: String,
        #[source]
        source: DriverError,
    },

    #[error("photo gallery failed on {link}: {source}")]
    Gallery {
        link: String,
        #[source]
        source: GalleryError,
    },

    #[error("could not read listing links: {0}")]
    Links(#[from] ExtractError),

    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// Outcome of reading one field: the parsed value or the reason it fell back
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction<T> {
    Found(T),
    Defaulted(ExtractError),
}

impl<T> From<Result<T, ExtractError>> for Extraction<T> {
    fn from(result: Result<T, ExtractError>) -> Self {
        match result {
            Ok(value) => Self::Found(value),
            Err(err) => Self::Defaulted(err),
        }
    }
}
