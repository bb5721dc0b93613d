//! Read-only queries over a snapshot of the current page.

use crate::scrapers::types::ExtractError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Parsed page snapshot plus the URL it was taken from
pub struct Document {
    html: Html,
    base: Option<Url>,
}

impl Document {
    pub fn parse(source: &str, url: &str) -> Self {
        Self {
            html: Html::parse_document(source),
            base: Url::parse(url).ok(),
        }
    }

    /// Whitespace-normalized text of the first element matching `selector`
    pub fn text(&self, selector: &str) -> Result<String, ExtractError> {
        let element = self.first(selector)?;
        Ok(normalized_text(&element))
    }

    /// Attribute of the first match, resolved to an absolute URL when possible
    pub fn link(&self, selector: &str, attr: &str) -> Result<Option<String>, ExtractError> {
        let element = self.first(selector)?;
        Ok(element.value().attr(attr).map(|value| self.resolve(value)))
    }

    /// Attribute of every match in document order, resolved against the page URL
    pub fn links(&self, selector: &str, attr: &str) -> Result<Vec<String>, ExtractError> {
        let parsed = parse_selector(selector)?;
        Ok(self
            .html
            .select(&parsed)
            .filter_map(|element| element.value().attr(attr))
            .map(|value| self.resolve(value))
            .collect())
    }

    /// Raw attribute of the first match
    pub fn attr(&self, selector: &str, attr: &str) -> Result<Option<String>, ExtractError> {
        let element = self.first(selector)?;
        Ok(element.value().attr(attr).map(str::to_string))
    }

    pub fn exists(&self, selector: &str) -> Result<bool, ExtractError> {
        let parsed = parse_selector(selector)?;
        Ok(self.html.select(&parsed).next().is_some())
    }

    fn first(&self, selector: &str) -> Result<ElementRef<'_>, ExtractError> {
        let parsed = parse_selector(selector)?;
        self.html
            .select(&parsed)
            .next()
            .ok_or_else(|| ExtractError::ElementNotFound {
                selector: selector.to_string(),
            })
    }

    fn resolve(&self, value: &str) -> String {
        let value = value.trim();
        match &self.base {
            Some(base) => base
                .join(value)
                .map(|url| url.to_string())
                .unwrap_or_else(|_| value.to_string()),
            None => value.to_string(),
        }
    }
}

pub fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|_| ExtractError::InvalidSelector(selector.to_string()))
}

fn normalized_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
