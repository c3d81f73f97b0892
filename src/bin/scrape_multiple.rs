use oikotie_scraper::config::{self, DEFAULT_LISTINGS_URL};
use oikotie_scraper::output::CsvAppender;
use oikotie_scraper::pipeline;
use oikotie_scraper::scrapers::{OikotieDetailScraper, OikotieLinkCollector};
use tracing::{info, Level};

const OUTPUT_PATH: &str = "properties.csv";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("🏠 Oikotie Scraper - search page to {}", OUTPUT_PATH);

    let listings_url = config::prompt_url("Search page URL", DEFAULT_LISTINGS_URL)?;

    // Collect detail-page links from the rendered search page
    let collector = OikotieLinkCollector::new()?;
    let urls = collector.collect(&listings_url)?;

    if urls.is_empty() {
        info!("No listings found; nothing to append");
        return Ok(());
    }

    // Visit every listing and append it as soon as it is scraped
    let scraper = OikotieDetailScraper::new()?;
    let mut sink = CsvAppender::open(OUTPUT_PATH)?;
    let stats = pipeline::scrape_listings(&scraper, &urls, &mut sink).await?;

    info!(
        "💾 Saved {} rows to {} ({} skipped)",
        stats.written, OUTPUT_PATH, stats.skipped
    );

    Ok(())
}
