use oikotie_scraper::config::{self, DEFAULT_LISTING_URL};
use oikotie_scraper::output::CsvAppender;
use oikotie_scraper::scrapers::{ListingScraper, OikotieDetailScraper};
use tracing::{info, Level};

const OUTPUT_PATH: &str = "property_details.csv";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("🏠 Oikotie Scraper - one listing to {}", OUTPUT_PATH);

    let url = config::prompt_url("Listing URL", DEFAULT_LISTING_URL)?;

    let scraper = OikotieDetailScraper::new()?;
    let record = scraper.scrape_listing(&url).await?;

    // Display the listing before saving
    println!("{} ({} €)", record.title, record.price);
    println!("   {}", record.address);
    println!(
        "   {} huonetta, {} m², rakennettu {}",
        record.rooms, record.size_m2, record.year_built
    );

    let mut sink = CsvAppender::open(OUTPUT_PATH)?;
    sink.append(&record)?;

    info!("💾 Saved listing to {}", OUTPUT_PATH);

    Ok(())
}
