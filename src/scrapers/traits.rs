use crate::models::ListingRecord;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for detail-page scrapers
/// Lets the pipeline run against any source that can turn a listing URL into
/// a record, including stub implementations in tests.
#[async_trait]
pub trait ListingScraper: Send + Sync {
    /// Fetch and parse one detail page.
    async fn scrape_listing(&self, url: &str) -> Result<ListingRecord>;

    /// Get the name of the scraped source
    fn source_name(&self) -> &'static str;
}
