use crate::config::SiteSelectors;
use crate::scrapers::document::Document;
use crate::scrapers::poll::poll_until;
use crate::scrapers::report::Reporter;
use crate::scrapers::traits::PageDriver;
use crate::scrapers::types::{DriverError, ScrapeError};
use std::time::Duration;
use tracing::{debug, info};

/// Class names that mark the "next page" control as disabled
const INACTIVE_MARKERS: [&str; 2] = ["inactive", "disabled"];

/// Walks the paginated result list and harvests detail page links
pub struct ListingPager<'a, D: PageDriver + ?Sized> {
    driver: &'a D,
    selectors: &'a SiteSelectors,
    reporter: &'a dyn Reporter,
    timeout: Duration,
}

impl<'a, D: PageDriver + ?Sized> ListingPager<'a, D> {
    pub fn new(
        driver: &'a D,
        selectors: &'a SiteSelectors,
        reporter: &'a dyn Reporter,
        timeout: Duration,
    ) -> Self {
        Self {
            driver,
            selectors,
            reporter,
            timeout,
        }
    }

    /// Collect at most `target` links, starting from the list page currently shown
    pub fn collect_links(&self, target: usize) -> Result<Vec<String>, ScrapeError> {
        let mut links = Vec::with_capacity(target);
        if target == 0 {
            return Ok(links);
        }

        let mut page = 1;
        loop {
            self.driver
                .wait_visible(&self.selectors.item_link, self.timeout)
                .map_err(list_wait_error)?;

            let doc = self.snapshot()?;
            let page_links = doc.links(&self.selectors.item_link, "href")?;
            let first = page_links.first().cloned();
            debug!(page, found = page_links.len(), "read listing page");

            for link in page_links {
                links.push(link);
                if links.len() == target {
                    info!("Collected {} links from {} page(s)", links.len(), page);
                    return Ok(links);
                }
            }

            if !self.has_active_next(&doc)? {
                info!(
                    "Pagination exhausted after {} page(s) with {} of {} links",
                    page,
                    links.len(),
                    target
                );
                return Ok(links);
            }

            self.driver.click(&self.selectors.next_page_link)?;
            self.await_page_turn(first)?;
            page += 1;
            self.reporter.page_visited(&self.driver.current_url());
        }
    }

    fn snapshot(&self) -> Result<Document, DriverError> {
        let source = self.driver.page_source()?;
        Ok(Document::parse(&source, &self.driver.current_url()))
    }

    fn has_active_next(&self, doc: &Document) -> Result<bool, ScrapeError> {
        if !doc.exists(&self.selectors.next_page)? || !doc.exists(&self.selectors.next_page_link)? {
            return Ok(false);
        }

        let class = doc.attr(&self.selectors.next_page, "class")?.unwrap_or_default();
        let inactive = class
            .split_whitespace()
            .any(|name| INACTIVE_MARKERS.contains(&name));
        let aria_disabled = doc
            .attr(&self.selectors.next_page_link, "aria-disabled")?
            .is_some_and(|value| value == "true");

        Ok(!inactive && !aria_disabled)
    }

    /// Wait until the list no longer starts with the previous page's first link
    fn await_page_turn(&self, previous: Option<String>) -> Result<(), ScrapeError> {
        let Some(previous) = previous else {
            return Ok(());
        };

        let turned = poll_until(self.timeout, || -> Result<Option<()>, ScrapeError> {
            let doc = self.snapshot()?;
            let first = doc.links(&self.selectors.item_link, "href")?.into_iter().next();
            Ok(first.filter(|link| *link != previous).map(|_| ()))
        })?;

        turned.ok_or(ScrapeError::PageTurnTimeout { previous })
    }
}

fn list_wait_error(err: DriverError) -> ScrapeError {
    match err {
        DriverError::Timeout { .. } => ScrapeError::ListTimeout(err),
        other => ScrapeError::Driver(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::fake::{FakeSite, LastPage, START_URL};
    use crate::scrapers::report::testing::RecordingReporter;

    const TIMEOUT: Duration = Duration::from_millis(50);

    fn page(prefix: &str, count: usize) -> Vec<String> {
        (1..=count)
            .map(|i| format!("https://rentals.test/en/listing/{prefix}{i}"))
            .collect()
    }

    fn collect(site: &FakeSite, target: usize) -> Result<Vec<String>, ScrapeError> {
        let selectors = SiteSelectors::default();
        let reporter = RecordingReporter::default();
        site.navigate(START_URL).unwrap();
        ListingPager::new(site, &selectors, &reporter, TIMEOUT).collect_links(target)
    }

    #[test]
    fn test_walks_all_pages_in_order() {
        let site = FakeSite::new(vec![page("a", 3), page("b", 3), page("c", 2)]);
        let links = collect(&site, 60).unwrap();

        let mut expected = page("a", 3);
        expected.extend(page("b", 3));
        expected.extend(page("c", 2));
        assert_eq!(links, expected);
        assert_eq!(site.clicks().len(), 2);
    }

    #[test]
    fn test_truncates_mid_page() {
        let site = FakeSite::new(vec![page("a", 3), page("b", 3)]);
        let links = collect(&site, 4).unwrap();

        assert_eq!(links.len(), 4);
        assert_eq!(links[3], "https://rentals.test/en/listing/b1");
    }

    #[test]
    fn test_exact_fill_does_not_click_next() {
        let site = FakeSite::new(vec![page("a", 2), page("b", 2)]);
        let links = collect(&site, 4).unwrap();

        assert_eq!(links.len(), 4);
        assert_eq!(site.clicks().len(), 1);
    }

    #[test]
    fn test_stops_at_inactive_next() {
        let site = FakeSite::new(vec![page("a", 2), page("b", 1)]).last_page(LastPage::InactiveNext);
        let links = collect(&site, 10).unwrap();

        assert_eq!(links.len(), 3);
        assert_eq!(site.clicks().len(), 1);
    }

    #[test]
    fn test_stops_without_next_control() {
        let site = FakeSite::new(vec![page("a", 3)]).last_page(LastPage::NoNextControl);
        let links = collect(&site, 60).unwrap();

        assert_eq!(links, page("a", 3));
        assert!(site.clicks().is_empty());
    }

    #[test]
    fn test_list_timeout_is_fatal() {
        let site = FakeSite::new(vec![page("a", 3)]).list_never_renders();
        assert!(matches!(collect(&site, 5), Err(ScrapeError::ListTimeout(_))));
    }

    #[test]
    fn test_page_that_never_turns_is_fatal() {
        let site = FakeSite::new(vec![page("a", 2), page("b", 2)]).next_is_noop();
        assert!(matches!(
            collect(&site, 10),
            Err(ScrapeError::PageTurnTimeout { .. })
        ));
    }

    #[test]
    fn test_zero_target() {
        let site = FakeSite::new(vec![page("a", 2)]);
        assert!(collect(&site, 0).unwrap().is_empty());
    }
}
