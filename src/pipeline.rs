use crate::output::CsvAppender;
use crate::scrapers::ListingScraper;
use anyhow::Result;
use std::time::Duration;
use tracing::{info, warn};

/// Pause between detail-page fetches to stay polite.
const FETCH_DELAY: Duration = Duration::from_secs(1);

/// Outcome of one run over a batch of listing URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    /// Rows appended to the output file.
    pub written: usize,
    /// Listings skipped after a scrape failure.
    pub skipped: usize,
}

/// Scrape every URL in order, appending each record as soon as it exists.
///
/// A listing that fails to scrape is logged and skipped; the rest of the
/// batch still runs. Failing to write a row aborts, since every later row
/// would be lost the same way.
pub async fn scrape_listings<S: ListingScraper>(
    scraper: &S,
    urls: &[String],
    sink: &mut CsvAppender,
) -> Result<RunStats> {
    let mut stats = RunStats {
        written: 0,
        skipped: 0,
    };

    for (i, url) in urls.iter().enumerate() {
        info!("Scraping listing {}/{}: {}", i + 1, urls.len(), url);

        match scraper.scrape_listing(url).await {
            Ok(record) => {
                sink.append(&record)?;
                stats.written += 1;
            }
            Err(e) => {
                warn!("Skipping {}: {:#}", url, e);
                stats.skipped += 1;
            }
        }

        if i + 1 < urls.len() {
            tokio::time::sleep(FETCH_DELAY).await;
        }
    }

    info!("{} of {} listings written", stats.written, urls.len());
    Ok(stats)
}
