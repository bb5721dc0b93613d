use crate::config::ScrapeConfig;
use crate::models::{Apartment, NO_DESCRIPTION};
use crate::scrapers::document::Document;
use crate::scrapers::fields::{attempt_with_default, Field, FieldExtractor};
use crate::scrapers::gallery::GalleryWalker;
use crate::scrapers::report::Reporter;
use crate::scrapers::traits::PageDriver;
use crate::scrapers::types::{DriverError, ScrapeError};
use chrono::Utc;
use tracing::debug;

/// Builds one [`Apartment`] from its detail page
pub struct DetailAssembler<'a, D: PageDriver + ?Sized> {
    driver: &'a D,
    config: &'a ScrapeConfig,
    reporter: &'a dyn Reporter,
}

impl<'a, D: PageDriver + ?Sized> DetailAssembler<'a, D> {
    pub fn new(driver: &'a D, config: &'a ScrapeConfig, reporter: &'a dyn Reporter) -> Self {
        Self {
            driver,
            config,
            reporter,
        }
    }

    pub fn assemble(&self, link: &str) -> Result<Apartment, ScrapeError> {
        self.driver.navigate(link)?;
        self.reporter.page_visited(link);

        self.driver
            .wait_visible(&self.config.selectors.detail_marker, self.config.timeouts.detail())
            .map_err(|source| match source {
                DriverError::Timeout { .. } => ScrapeError::DetailTimeout {
                    link: link.to_string(),
                    source,
                },
                other => ScrapeError::Driver(other),
            })?;

        let source = self.driver.page_source()?;
        let doc = Document::parse(&source, link);
        let fields = FieldExtractor::new(&self.config.selectors, &doc);
        let reporter = self.reporter;

        let title = attempt_with_default(reporter, link, Field::Title, String::new(), fields.title());
        let region =
            attempt_with_default(reporter, link, Field::Region, String::new(), fields.region());
        let address =
            attempt_with_default(reporter, link, Field::Address, String::new(), fields.address());
        let description = attempt_with_default(
            reporter,
            link,
            Field::Description,
            NO_DESCRIPTION.to_string(),
            fields.description(),
        );
        let price = attempt_with_default(reporter, link, Field::Price, 0, fields.price());
        let floor_area =
            attempt_with_default(reporter, link, Field::FloorArea, 0, fields.floor_area());

        // Each count falls back on its own before they are added up.
        let bedrooms = attempt_with_default(reporter, link, Field::Bedrooms, 0, fields.bedrooms());
        let bathrooms =
            attempt_with_default(reporter, link, Field::Bathrooms, 0, fields.bathrooms());

        let image_array = self.photos(link)?;
        debug!(
            link,
            photos = image_array.as_ref().map(Vec::len).unwrap_or(0),
            "assembled apartment"
        );

        Ok(Apartment {
            link: link.to_string(),
            title,
            region,
            address,
            description,
            price,
            rooms: bedrooms.saturating_add(bathrooms),
            floor_area,
            image_array,
            scraped_at: Utc::now(),
        })
    }

    fn photos(&self, link: &str) -> Result<Option<Vec<String>>, ScrapeError> {
        let walker = GalleryWalker::new(
            self.driver,
            &self.config.selectors,
            self.config.timeouts.gallery(),
            self.config.timeouts.frame(),
            self.config.photo_step_margin,
        );

        match walker.collect_photos() {
            Ok(Some(photos)) => Ok(Some(photos)),
            Ok(None) => {
                self.reporter.gallery_unavailable(link);
                Ok(None)
            }
            Err(source) if self.config.strict_gallery => Err(ScrapeError::Gallery {
                link: link.to_string(),
                source,
            }),
            Err(err) => {
                self.reporter.gallery_failed(link, &err);
                Ok(None)
            }
        }
    }
}
