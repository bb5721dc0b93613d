use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder stored when a listing has no description block
pub const NO_DESCRIPTION: &str = "No description";

/// One rental listing, assembled from its detail page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Apartment {
    /// Detail page URL, identity of the record
    pub link: String,
    pub title: String,
    /// Last two comma-separated segments of the address
    pub region: String,
    pub address: String,
    pub description: String,
    /// Monthly rent, unit-less
    pub price: i64,
    /// Bedrooms plus bathrooms
    pub rooms: u32,
    /// In whatever unit the site displays
    pub floor_area: i64,
    /// `None` when the photo viewer could not be opened
    pub image_array: Option<Vec<String>>,
    pub scraped_at: DateTime<Utc>,
}
