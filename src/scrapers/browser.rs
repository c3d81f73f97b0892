use anyhow::{Context, Result};
use headless_chrome::{Browser, LaunchOptions};
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Element that signals the client-side render of the search results has
/// happened. Waiting on it is bounded; a page that never produces it is a
/// failed run, not a hang.
const RESULTS_SELECTOR: &str = "div.cards-v2";
/// Anchor wrapping one listing card on the search page.
const CARD_LINK_SELECTOR: &str = "a.ot-card-v2";

const SITE_ORIGIN: &str = "https://asunnot.oikotie.fi";

const RENDER_TIMEOUT: Duration = Duration::from_secs(20);
/// Pause between scroll rounds while lazy-loaded cards come in.
const SCROLL_SETTLE: Duration = Duration::from_millis(500);
const MAX_SCROLL_ROUNDS: usize = 20;

/// Browser-based link collector for oikotie search pages
///
/// The search page renders its result cards client side, so a plain HTTP
/// fetch sees none of them; this drives headless Chrome instead. The Chrome
/// process is tied to the collector and shut down when it is dropped.
pub struct OikotieLinkCollector {
    browser: Browser,
}

impl OikotieLinkCollector {
    /// Launch headless Chrome.
    pub fn new() -> Result<Self> {
        info!("Launching headless Chrome...");

        let options = LaunchOptions::default_builder()
            .headless(true)
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;

        Ok(Self { browser })
    }

    /// Collect the detail-page URLs linked from one search page.
    ///
    /// Returns the deduplicated URLs in page order. An empty Vec means the
    /// page rendered but carried no recognizable cards; a render timeout is
    /// an error.
    pub fn collect(&self, listings_url: &str) -> Result<Vec<String>> {
        info!("Opening search page {}", listings_url);
        let tab = self.browser.new_tab()?;

        tab.navigate_to(listings_url)?;
        tab.wait_until_navigated()?;

        info!("Waiting for search results to render...");
        tab.wait_for_element_with_custom_timeout(RESULTS_SELECTOR, RENDER_TIMEOUT)
            .with_context(|| {
                format!(
                    "Search results did not render within {}s: {}",
                    RENDER_TIMEOUT.as_secs(),
                    listings_url
                )
            })?;

        // Cards below the fold are lazy loaded; keep scrolling until the
        // page height stops growing.
        let mut last_height = 0.0;
        for round in 0..MAX_SCROLL_ROUNDS {
            tab.evaluate("window.scrollTo(0, document.body.scrollHeight)", false)?;
            thread::sleep(SCROLL_SETTLE);

            let height = tab
                .evaluate("document.body.scrollHeight", false)?
                .value
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0);
            debug!("Scroll round {}: page height {}", round + 1, height);
            if height <= last_height {
                break;
            }
            last_height = height;
        }

        let html_result = tab.evaluate("document.documentElement.outerHTML", false)?;
        let html = match html_result.value {
            Some(value) => value.as_str().unwrap_or("").to_string(),
            None => {
                warn!("Could not get HTML from page");
                String::new()
            }
        };

        if html.is_empty() {
            warn!("HTML is empty");
            return Ok(Vec::new());
        }

        let urls = Self::extract_listing_urls(&html);
        if urls.is_empty() {
            warn!(
                "No listing cards found on {}; page structure may have changed",
                listings_url
            );
            if tracing::enabled!(tracing::Level::TRACE) {
                if let Err(e) = std::fs::write("debug_search_page.html", &html) {
                    warn!("Failed to write debug HTML: {}", e);
                }
            }
        } else {
            info!("Found {} listing links", urls.len());
        }

        Ok(urls)
    }

    /// Pull the card links out of rendered search-page HTML.
    ///
    /// Order preserving; when the same listing appears twice, the first
    /// occurrence wins.
    pub fn extract_listing_urls(html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        let card_selector = Selector::parse(CARD_LINK_SELECTOR).unwrap();

        let mut seen = HashSet::new();
        let mut urls = Vec::new();

        for card in document.select(&card_selector) {
            let href = card.value().attr("href").unwrap_or("");
            if href.is_empty() {
                continue;
            }
            let url = if href.starts_with("http") {
                href.to_string()
            } else {
                format!("{}{}", SITE_ORIGIN, href)
            };
            if seen.insert(url.clone()) {
                urls.push(url);
            }
        }

        urls
    }
}
