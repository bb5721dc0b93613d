use crate::config::SiteSelectors;
use crate::scrapers::document::Document;
use crate::scrapers::poll::poll_until;
use crate::scrapers::traits::PageDriver;
use crate::scrapers::types::{DriverError, GalleryError};
use std::time::Duration;
use tracing::{debug, warn};

const NEXT_PHOTO_KEY: &str = "ArrowRight";

/// Steps through the photo viewer of the current detail page
pub struct GalleryWalker<'a, D: PageDriver + ?Sized> {
    driver: &'a D,
    selectors: &'a SiteSelectors,
    open_timeout: Duration,
    frame_timeout: Duration,
    step_margin: usize,
}

impl<'a, D: PageDriver + ?Sized> GalleryWalker<'a, D> {
    pub fn new(
        driver: &'a D,
        selectors: &'a SiteSelectors,
        open_timeout: Duration,
        frame_timeout: Duration,
        step_margin: usize,
    ) -> Self {
        Self {
            driver,
            selectors,
            open_timeout,
            frame_timeout,
            step_margin,
        }
    }

    /// Photo sources in viewer order, or `None` when the viewer never opens
    pub fn collect_photos(&self) -> Result<Option<Vec<String>>, GalleryError> {
        if !self.open_viewer()? {
            return Ok(None);
        }

        let counter = self.snapshot()?.text(&self.selectors.gallery_counter)?;
        let total = parse_photo_total(&counter)?;
        debug!(total, "photo viewer open");
        if total == 0 {
            return Ok(Some(Vec::new()));
        }

        let mut current = self.current_frame()?;
        let mut photos = Vec::with_capacity(total);
        photos.push(current.clone());

        // Each press should reveal a new frame; presses that don't still count.
        let cap = total + self.step_margin;
        let mut presses = 0;
        while photos.len() < total {
            if presses >= cap {
                return Err(GalleryError::Stalled {
                    collected: photos.len(),
                    total,
                });
            }

            self.driver.press_key(NEXT_PHOTO_KEY)?;
            presses += 1;

            match self.await_next_frame(&current)? {
                Some(frame) => {
                    photos.push(frame.clone());
                    current = frame;
                }
                None => warn!(
                    "Photo viewer did not advance past {} ({} of {})",
                    current,
                    photos.len(),
                    total
                ),
            }
        }

        Ok(Some(photos))
    }

    /// Click the primary photo; `false` when the viewer is not available
    fn open_viewer(&self) -> Result<bool, GalleryError> {
        let opener = &self.selectors.gallery_opener;

        if let Err(err) = self.driver.wait_visible(opener, self.open_timeout) {
            return absent_viewer(err);
        }
        if let Err(err) = self.driver.click(opener) {
            return absent_viewer(err);
        }
        if let Err(err) = self
            .driver
            .wait_visible(&self.selectors.gallery_counter, self.open_timeout)
        {
            return absent_viewer(err);
        }

        Ok(true)
    }

    fn snapshot(&self) -> Result<Document, DriverError> {
        let source = self.driver.page_source()?;
        Ok(Document::parse(&source, &self.driver.current_url()))
    }

    fn current_frame(&self) -> Result<String, GalleryError> {
        self.snapshot()?
            .link(&self.selectors.gallery_image, "src")?
            .filter(|src| !src.is_empty())
            .ok_or(GalleryError::MissingFrame)
    }

    fn await_next_frame(&self, previous: &str) -> Result<Option<String>, GalleryError> {
        poll_until(self.frame_timeout, || {
            let frame = self.current_frame()?;
            Ok((frame != previous).then_some(frame))
        })
    }
}

fn absent_viewer(err: DriverError) -> Result<bool, GalleryError> {
    match err {
        DriverError::Timeout { .. } | DriverError::ElementNotFound(_) => Ok(false),
        other => Err(other.into()),
    }
}

/// Total from a `"current/total"` counter
pub fn parse_photo_total(text: &str) -> Result<usize, GalleryError> {
    let Some((_, total)) = text.split_once('/') else {
        return Err(GalleryError::MalformedCounter {
            text: text.to_string(),
        });
    };
    if total.contains('/') {
        return Err(GalleryError::MalformedCounter {
            text: text.to_string(),
        });
    }

    total
        .trim()
        .parse::<usize>()
        .map_err(|_| GalleryError::InvalidCount {
            text: text.to_string(),
        })
}
