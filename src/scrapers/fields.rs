//! Per-field reads of a detail page.
//!
//! Every read yields an [`Extraction`]: either the parsed value or the
//! reason it could not be produced. Nothing here fails the record.

use crate::config::SiteSelectors;
use crate::scrapers::document::Document;
use crate::scrapers::report::Reporter;
use crate::scrapers::types::{ExtractError, Extraction};

const CURRENCY_MARKER: char = '$';
const THOUSANDS_SEPARATOR: char = ',';
const REGION_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Region,
    Address,
    Description,
    Price,
    FloorArea,
    Bedrooms,
    Bathrooms,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Region => "region",
            Field::Address => "address",
            Field::Description => "description",
            Field::Price => "price",
            Field::FloorArea => "floor_area",
            Field::Bedrooms => "bedrooms",
            Field::Bathrooms => "bathrooms",
        }
    }
}

/// Reads the listing fields out of one detail page snapshot
pub struct FieldExtractor<'a> {
    selectors: &'a SiteSelectors,
    doc: &'a Document,
}

impl<'a> FieldExtractor<'a> {
    pub fn new(selectors: &'a SiteSelectors, doc: &'a Document) -> Self {
        Self { selectors, doc }
    }

    pub fn title(&self) -> Extraction<String> {
        self.doc.text(&self.selectors.title).into()
    }

    pub fn address(&self) -> Extraction<String> {
        self.doc.text(&self.selectors.address).into()
    }

    pub fn region(&self) -> Extraction<String> {
        self.doc
            .text(&self.selectors.address)
            .and_then(|text| parse_region(&text))
            .into()
    }

    pub fn description(&self) -> Extraction<String> {
        self.doc.text(&self.selectors.description).into()
    }

    pub fn price(&self) -> Extraction<i64> {
        self.doc
            .text(&self.selectors.price)
            .and_then(|text| parse_price(&text))
            .into()
    }

    pub fn floor_area(&self) -> Extraction<i64> {
        self.doc
            .text(&self.selectors.floor_area)
            .and_then(|text| parse_floor_area(&text))
            .into()
    }

    pub fn bedrooms(&self) -> Extraction<u32> {
        self.doc
            .text(&self.selectors.bedrooms)
            .and_then(|text| parse_count(&text))
            .into()
    }

    pub fn bathrooms(&self) -> Extraction<u32> {
        self.doc
            .text(&self.selectors.bathrooms)
            .and_then(|text| parse_count(&text))
            .into()
    }
}

/// Unwrap an extraction to its value, or report it and use `default`
pub fn attempt_with_default<T>(
    reporter: &dyn Reporter,
    link: &str,
    field: Field,
    default: T,
    extraction: Extraction<T>,
) -> T {
    match extraction {
        Extraction::Found(value) => value,
        Extraction::Defaulted(err) => {
            reporter.field_defaulted(link, field.as_str(), &err);
            default
        }
    }
}

/// Last two comma-separated segments of an address
pub fn parse_region(text: &str) -> Result<String, ExtractError> {
    if !text.contains(REGION_SEPARATOR) {
        return Err(ExtractError::format("a comma-separated address", text));
    }
    let segments: Vec<&str> = text.split(REGION_SEPARATOR).collect();
    let start = segments.len().saturating_sub(2);
    Ok(segments[start..].join(REGION_SEPARATOR))
}

/// `"$1,250 / month"` -> `1250`
pub fn parse_price(text: &str) -> Result<i64, ExtractError> {
    if !text.contains(CURRENCY_MARKER) {
        return Err(ExtractError::format("a currency marker", text));
    }
    let amount = numeric_prefix(text).replace(CURRENCY_MARKER, "");
    parse_integer(&amount, text)
}

/// `"1,200 sqft"` -> `1200`
pub fn parse_floor_area(text: &str) -> Result<i64, ExtractError> {
    if !text.contains(' ') {
        return Err(ExtractError::format("a value followed by a unit", text));
    }
    parse_integer(numeric_prefix(text), text)
}

/// `"2 bedrooms"` -> `2`
pub fn parse_count(text: &str) -> Result<u32, ExtractError> {
    numeric_prefix(text)
        .parse::<u32>()
        .map_err(|_| ExtractError::format("a leading count", text))
}

fn numeric_prefix(text: &str) -> &str {
    text.split(' ').next().unwrap_or_default()
}

fn parse_integer(prefix: &str, text: &str) -> Result<i64, ExtractError> {
    prefix
        .replace(THOUSANDS_SEPARATOR, "")
        .parse::<i64>()
        .map_err(|_| ExtractError::format("a numeric prefix", text))
}
