//! Browser automation using chromiumoxide.

use anyhow::Result;
use chromiumoxide::browser::{Browser as ChromeBrowser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Poll interval while waiting for a selector to appear
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Browser wrapper for rendered page fetches
pub struct Browser {
    browser: ChromeBrowser,
    handle: tokio::task::JoinHandle<()>,
}

impl Browser {
    /// Launch a new headless browser instance
    pub async fn launch() -> Result<Self> {
        // Find Chrome executable
        let chrome_path = if cfg!(target_os = "macos") {
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"
        } else if cfg!(target_os = "windows") {
            "C:\\Program Files\\Google\\Chrome\\Application\\chrome.exe"
        } else {
            "google-chrome"
        };

        let config = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .no_sandbox()
            .disable_default_args()
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-software-rasterizer")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .arg("--disable-sync")
            .arg("--disable-translate")
            .arg("--mute-audio")
            .window_size(1920, 1080)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build browser config: {}", e))?;

        let (browser, mut handler) = ChromeBrowser::launch(config)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to launch browser: {}", e))?;

        // Spawn handler task - must keep running for browser to work
        let handle = tokio::spawn(async move {
            loop {
                match handler.next().await {
                    Some(Ok(_)) => continue,
                    Some(Err(_)) => continue, // Don't break on errors
                    None => break,
                }
            }
        });

        // Wait for browser to be ready
        sleep(Duration::from_secs(1)).await;

        Ok(Self { browser, handle })
    }

    /// Open a page and return its handle without waiting for readiness
    pub async fn open(&self, url: &str) -> Result<Page> {
        self.browser
            .new_page(url)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to open {}: {}", url, e))
    }

    /// Poll until `selector` matches an element or `timeout` elapses.
    /// Returns whether the selector appeared.
    pub async fn wait_for_selector(page: &Page, selector: &str, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if page.find_element(selector).await.is_ok() {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    /// Page identity line: title, falling back to the first h1 heading.
    pub async fn page_identity(page: &Page) -> Option<String> {
        if let Ok(Some(title)) = page.get_title().await {
            if !title.trim().is_empty() {
                return Some(title);
            }
        }
        if let Ok(heading) = page.find_element("h1").await {
            if let Ok(Some(text)) = heading.inner_text().await {
                return Some(text);
            }
        }
        None
    }

    /// Close the browser
    pub async fn close(mut self) -> Result<()> {
        let _ = self.browser.close().await;
        self.handle.abort();
        Ok(())
    }
}
