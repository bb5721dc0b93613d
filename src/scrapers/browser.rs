use crate::scrapers::poll::poll_until;
use crate::scrapers::traits::PageDriver;
use crate::scrapers::types::DriverError;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// `headless_chrome` session with a single tab
pub struct ChromeDriver {
    // Chrome exits when the browser handle is dropped
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeDriver {
    /// Launch Chrome and open the tab every page of the run is loaded into
    pub fn launch(headless: bool, window_size: (u32, u32)) -> Result<Self, DriverError> {
        info!("Launching Chrome (headless: {})...", headless);

        let options = LaunchOptions::default_builder()
            .headless(headless)
            .window_size(Some(window_size))
            .build()
            .map_err(|e| DriverError::Launch(format!("Failed to build launch options: {}", e)))?;

        let browser = Browser::new(options)
            .map_err(|e| DriverError::Launch(format!("Failed to launch Chrome browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| DriverError::Launch(format!("Failed to open tab: {}", e)))?;

        Ok(Self {
            _browser: browser,
            tab,
        })
    }

    fn evaluate(&self, script: &str) -> Result<Option<Value>, DriverError> {
        self.tab
            .evaluate(script, false)
            .map(|result| result.value)
            .map_err(|e| DriverError::Script(e.to_string()))
    }

    fn is_visible(&self, selector: &str) -> Result<bool, DriverError> {
        let quoted =
            serde_json::to_string(selector).map_err(|e| DriverError::Script(e.to_string()))?;
        let script = format!(
            r#"(() => {{
                const el = document.querySelector({quoted});
                if (!el) return false;
                const style = window.getComputedStyle(el);
                return style.display !== 'none'
                    && style.visibility !== 'hidden'
                    && el.getClientRects().length > 0;
            }})()"#
        );

        Ok(self.evaluate(&script)?.and_then(|v| v.as_bool()).unwrap_or(false))
    }
}

impl PageDriver for ChromeDriver {
    fn navigate(&self, url: &str) -> Result<(), DriverError> {
        debug!("Navigating to {}", url);
        self.tab
            .navigate_to(url)
            .map_err(|e| DriverError::Navigation(format!("Failed to navigate to {}: {}", url, e)))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| DriverError::Navigation(format!("Navigation timeout for {}: {}", url, e)))?;
        Ok(())
    }

    fn current_url(&self) -> String {
        self.tab.get_url()
    }

    fn wait_visible(&self, selector: &str, timeout: Duration) -> Result<(), DriverError> {
        let visible = poll_until(timeout, || {
            Ok::<_, DriverError>(self.is_visible(selector)?.then_some(()))
        })?;

        visible.ok_or_else(|| DriverError::Timeout {
            selector: selector.to_string(),
            timeout,
        })
    }

    fn click(&self, selector: &str) -> Result<(), DriverError> {
        let element = self
            .tab
            .find_element(selector)
            .map_err(|_| DriverError::ElementNotFound(selector.to_string()))?;
        element
            .click()
            .map_err(|e| DriverError::Script(format!("Click on {} failed: {}", selector, e)))?;
        Ok(())
    }

    fn press_key(&self, key: &str) -> Result<(), DriverError> {
        self.tab
            .press_key(key)
            .map_err(|e| DriverError::Script(format!("Key press {} failed: {}", key, e)))?;
        Ok(())
    }

    fn page_source(&self) -> Result<String, DriverError> {
        self.tab
            .get_content()
            .map_err(|e| DriverError::Script(format!("Failed to read page HTML: {}", e)))
    }

    fn screenshot(&self) -> Result<Vec<u8>, DriverError> {
        self.tab
            .capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| DriverError::Script(format!("Screenshot failed: {}", e)))
    }
}
