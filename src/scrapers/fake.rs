//! Scripted in-memory site for exercising the engine without Chrome.

use crate::scrapers::document::Document;
use crate::scrapers::traits::PageDriver;
use crate::scrapers::types::DriverError;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub const START_URL: &str = "https://rentals.test/en/for-rent";

/// How the last list page shows its "next" control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastPage {
    NoNextControl,
    InactiveNext,
}

#[derive(Debug, Clone, Default)]
pub struct DetailFixture {
    /// Field markup of the page, without the marker or the gallery
    pub body: String,
    pub photos: Option<Vec<String>>,
    /// Counter text to show instead of `"1/<len>"`
    pub counter: Option<String>,
    /// Photo index where "next" presses stop having any effect
    pub stall_at: Option<usize>,
    /// Page never shows its render marker
    pub never_renders: bool,
}

#[derive(Debug, Default)]
struct State {
    url: String,
    list_page: Option<usize>,
    gallery_open: bool,
    photo: usize,
    clicks: Vec<String>,
    key_presses: usize,
}

pub struct FakeSite {
    list_pages: Vec<Vec<String>>,
    last_page: LastPage,
    list_renders: bool,
    next_is_noop: bool,
    details: HashMap<String, DetailFixture>,
    state: Mutex<State>,
}

impl FakeSite {
    pub fn new(list_pages: Vec<Vec<String>>) -> Self {
        Self {
            list_pages,
            last_page: LastPage::InactiveNext,
            list_renders: true,
            next_is_noop: false,
            details: HashMap::new(),
            state: Mutex::new(State::default()),
        }
    }

    pub fn last_page(mut self, last_page: LastPage) -> Self {
        self.last_page = last_page;
        self
    }

    pub fn list_never_renders(mut self) -> Self {
        self.list_renders = false;
        self
    }

    pub fn next_is_noop(mut self) -> Self {
        self.next_is_noop = true;
        self
    }

    pub fn detail(mut self, link: &str, fixture: DetailFixture) -> Self {
        self.details.insert(link.to_string(), fixture);
        self
    }

    /// Start on a detail page with its viewer closed
    pub fn open_detail(&self, link: &str) {
        let mut state = self.state.lock().unwrap();
        state.url = link.to_string();
        state.list_page = None;
        state.gallery_open = false;
        state.photo = 0;
    }

    pub fn clicks(&self) -> Vec<String> {
        self.state.lock().unwrap().clicks.clone()
    }

    pub fn key_presses(&self) -> usize {
        self.state.lock().unwrap().key_presses
    }

    fn render(&self, state: &State) -> String {
        match state.list_page {
            Some(page) => self.render_list(page),
            None => self.render_detail(state),
        }
    }

    fn render_list(&self, page: usize) -> String {
        if !self.list_renders {
            return "<html><body><p>Loading…</p></body></html>".to_string();
        }

        let links: String = self.list_pages[page]
            .iter()
            .map(|href| {
                format!(r#"<a class="property-thumbnail-summary-link" href="{href}">listing</a>"#)
            })
            .collect();

        let next = if page + 1 < self.list_pages.len() {
            r##"<ul class="pager"><li class="next"><a href="#">Next</a></li></ul>"##
        } else {
            match self.last_page {
                LastPage::NoNextControl => "",
                LastPage::InactiveNext => {
                    r##"<ul class="pager"><li class="next inactive"><a href="#">Next</a></li></ul>"##
                }
            }
        };

        format!(
            r#"<html><body><div class="wrapper even wrapper-results">{links}</div>{next}</body></html>"#
        )
    }

    fn render_detail(&self, state: &State) -> String {
        let Some(fixture) = self.details.get(&state.url) else {
            return "<html><body><h1>Not found</h1></body></html>".to_string();
        };

        let marker = if fixture.never_renders {
            ""
        } else {
            r#"<section id="pre-localisation-section"></section>"#
        };

        let gallery = match &fixture.photos {
            None => String::new(),
            Some(photos) => {
                let opener = r##"<div class="primary-photo-container"><a href="#">photos</a></div>"##;
                if state.gallery_open {
                    let counter = fixture
                        .counter
                        .clone()
                        .unwrap_or_else(|| format!("{}/{}", state.photo + 1, photos.len()));
                    let src = photos.get(state.photo).cloned().unwrap_or_default();
                    format!(
                        r#"{opener}<div class="description"><strong>{counter}</strong></div><img id="fullImg" src="{src}">"#
                    )
                } else {
                    opener.to_string()
                }
            }
        };

        format!("<html><body>{marker}{}{gallery}</body></html>", fixture.body)
    }
}

impl PageDriver for FakeSite {
    fn navigate(&self, url: &str) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        if url == START_URL {
            state.list_page = Some(0);
        } else if self.details.contains_key(url) {
            state.list_page = None;
            state.gallery_open = false;
            state.photo = 0;
        } else {
            return Err(DriverError::Navigation(format!("no such page: {url}")));
        }
        state.url = url.to_string();
        Ok(())
    }

    fn current_url(&self) -> String {
        self.state.lock().unwrap().url.clone()
    }

    fn wait_visible(&self, selector: &str, timeout: Duration) -> Result<(), DriverError> {
        let source = self.page_source()?;
        let doc = Document::parse(&source, &self.current_url());
        match doc.exists(selector) {
            Ok(true) => Ok(()),
            _ => Err(DriverError::Timeout {
                selector: selector.to_string(),
                timeout,
            }),
        }
    }

    fn click(&self, selector: &str) -> Result<(), DriverError> {
        let source = self.page_source()?;
        let doc = Document::parse(&source, &self.current_url());
        if !doc.exists(selector).unwrap_or(false) {
            return Err(DriverError::ElementNotFound(selector.to_string()));
        }

        let mut state = self.state.lock().unwrap();
        state.clicks.push(selector.to_string());
        let list_page = state.list_page;
        match list_page {
            Some(page) if selector.contains("next") => {
                if !self.next_is_noop && page + 1 < self.list_pages.len() {
                    state.list_page = Some(page + 1);
                }
            }
            None if selector.contains("primary-photo") => {
                state.gallery_open = true;
                state.photo = 0;
            }
            _ => {}
        }
        Ok(())
    }

    fn press_key(&self, key: &str) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        state.key_presses += 1;
        if key != "ArrowRight" || !state.gallery_open {
            return Ok(());
        }

        let fixture = self.details.get(&state.url).cloned().unwrap_or_default();
        let len = fixture.photos.map(|p| p.len()).unwrap_or(0);
        if fixture.stall_at == Some(state.photo) || len == 0 {
            return Ok(());
        }
        state.photo = (state.photo + 1) % len;
        Ok(())
    }

    fn page_source(&self) -> Result<String, DriverError> {
        let state = self.state.lock().unwrap();
        Ok(self.render(&state))
    }

    fn screenshot(&self) -> Result<Vec<u8>, DriverError> {
        Ok(Vec::new())
    }
}

/// Detail markup with every field present
pub fn full_detail_body(n: usize) -> String {
    format!(
        r#"<h1 itemprop="category"><span data-id="PageTitle">Apartment {n} for rent</span></h1>
        <h2 itemprop="address">{n} Main St, Springfield, Some Province</h2>
        <div itemprop="description"> Bright unit near the park. </div>
        <div class="price text-right"><span></span><span></span><span></span><span></span><span></span><span>$1,{n}00 / month</span></div>
        <div class="carac-value"><span>{n}50 sqft</span></div>
        <div class="row teaser"><div class="cac">2 bedrooms</div><div class="sdb">1 bathroom</div></div>"#
    )
}

pub fn photos(link: &str, count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("{link}/photo-{i}.jpg")).collect()
}
