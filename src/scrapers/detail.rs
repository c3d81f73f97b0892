use crate::models::ListingRecord;
use crate::scrapers::traits::ListingScraper;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, warn};

/// Detail-page scraper for oikotie listings
///
/// Detail pages carry their data in the server-rendered HTML, so a plain
/// HTTP fetch is enough here; only the search page needs a browser.
pub struct OikotieDetailScraper {
    client: Client,
}

impl OikotieDetailScraper {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Fetch the raw HTML of one detail page.
    async fn fetch_page(&self, url: &str) -> Result<String> {
        debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        if !response.status().is_success() {
            warn!("{} returned status {}", url, response.status());
            anyhow::bail!("Failed to fetch {}: {}", url, response.status());
        }

        response.text().await.context("Failed to read response body")
    }

    /// Apply the per-field extraction rules to one detail page.
    ///
    /// Fields are extracted independently; a missing element leaves that
    /// column empty and never touches the others, so this cannot fail.
    pub fn extract_record(url: &str, html: &str) -> ListingRecord {
        let document = Html::parse_document(html);

        let record = ListingRecord {
            title: Self::extract_title(&document).unwrap_or_default(),
            price: Self::extract_price_text(&document)
                .map(|raw| Self::numeric_field(&raw))
                .unwrap_or_default(),
            address: Self::extract_address(&document).unwrap_or_default(),
            rooms: Self::info_table_value(&document, &["Huoneita"])
                .map(|raw| Self::numeric_field(&raw))
                .unwrap_or_default(),
            size_m2: Self::extract_size_text(&document)
                .map(|raw| Self::numeric_field(&raw))
                .unwrap_or_default(),
            year_built: Self::info_table_value(&document, &["Rakennusvuosi"])
                .map(|raw| Self::numeric_field(&raw))
                .unwrap_or_default(),
            description: Self::extract_description(&document).unwrap_or_default(),
            url: url.to_string(),
            scraped_at: Utc::now().to_rfc3339(),
        };

        let missing: Vec<&str> = record
            .fields()
            .iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            warn!("{}: no value for {}", url, missing.join(", "));
        }

        record
    }

    fn extract_title(document: &Html) -> Option<String> {
        let selector = Selector::parse("h1.listing-header__headline").unwrap();
        let text = document
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())?;
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Price as shown in the boxed summary card, falling back to the
    /// info-table rows used by older listings.
    fn extract_price_text(document: &Html) -> Option<String> {
        let selector = Selector::parse("div.card-v2-text-container__group--boxed div.card-v2-text-container__column--desktop-wide > h2.card-v2-text-container__title").unwrap();
        document
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
            .or_else(|| Self::info_table_value(document, &["Velaton hinta", "Myyntihinta"]))
    }

    /// Living area from the summary card (the column that is not the price),
    /// falling back to the info table.
    fn extract_size_text(document: &Html) -> Option<String> {
        let selector = Selector::parse("div.card-v2-text-container__group--boxed div.card-v2-text-container__column:not(.card-v2-text-container__column--desktop-wide) > h2.card-v2-text-container__title").unwrap();
        document
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
            .or_else(|| Self::info_table_value(document, &["Asuinpinta-ala", "Pinta-ala"]))
    }

    /// Address parts are rendered as separate location links (street,
    /// district, city); join them into one line.
    fn extract_address(document: &Html) -> Option<String> {
        let selector = Selector::parse("dd.info-table__value span.link__text").unwrap();
        let parts: Vec<String> = document
            .select(&selector)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
            .collect();
        if !parts.is_empty() {
            return Some(parts.join(" "));
        }
        Self::info_table_value(document, &["Sijainti"])
    }

    fn extract_description(document: &Html) -> Option<String> {
        let selector = Selector::parse("div.listing-overview p").unwrap();
        let paragraphs: Vec<String> = document
            .select(&selector)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
            .collect();
        if paragraphs.is_empty() {
            None
        } else {
            Some(paragraphs.join(" "))
        }
    }

    /// Look up a value in the detail page's info table by its Finnish label.
    fn info_table_value(document: &Html, labels: &[&str]) -> Option<String> {
        let row_selector = Selector::parse("div.info-table__row").unwrap();
        let title_selector = Selector::parse("dt.info-table__title").unwrap();
        let value_selector = Selector::parse("dd.info-table__value").unwrap();

        for row in document.select(&row_selector) {
            let title = match row.select(&title_selector).next() {
                Some(el) => el.text().collect::<String>(),
                None => continue,
            };
            let title = title.trim();
            if !labels.iter().any(|label| title.eq_ignore_ascii_case(label)) {
                continue;
            }
            let value = row
                .select(&value_selector)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())?;
            if !value.is_empty() {
                return Some(value);
            }
        }
        None
    }

    /// Normalize a Finnish-formatted number ("250 000 €", "52,5 m²") for the
    /// CSV. Values that still contain digits but refuse to parse (price
    /// ranges and the like) are kept verbatim; values with no digits at all
    /// ("N/A", "-") become the empty string.
    fn numeric_field(raw: &str) -> String {
        match Self::parse_number(raw) {
            Some(n) => Self::format_number(n),
            None if raw.chars().any(|c| c.is_ascii_digit()) => raw.trim().to_string(),
            None => String::new(),
        }
    }

    fn parse_number(raw: &str) -> Option<f64> {
        let cleaned = raw
            .replace('€', "")
            .replace("m²", "")
            .replace(' ', "")
            .replace('\u{a0}', "")
            .replace('\u{202f}', "")
            .replace(',', ".");
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            return None;
        }
        cleaned.parse::<f64>().ok()
    }

    fn format_number(n: f64) -> String {
        if n.fract() == 0.0 {
            format!("{}", n as i64)
        } else {
            n.to_string()
        }
    }
}

#[async_trait]
impl ListingScraper for OikotieDetailScraper {
    async fn scrape_listing(&self, url: &str) -> Result<ListingRecord> {
        let html = self.fetch_page(url).await?;
        debug!("Downloaded {} bytes of HTML", html.len());
        Ok(Self::extract_record(url, &html))
    }

    fn source_name(&self) -> &'static str {
        "Oikotie"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::COLUMNS;

    const FULL_PAGE: &str = r#"
        <html><body>
            <h1 class="listing-header__headline">Upea kaksio Kalasatamassa</h1>
            <div class="card-v2-text-container__group--boxed">
                <div class="card-v2-text-container__column card-v2-text-container__column--desktop-wide">
                    <h2 class="card-v2-text-container__title">250 000 €</h2>
                </div>
                <div class="card-v2-text-container__column">
                    <h2 class="card-v2-text-container__title">52,5 m²</h2>
                </div>
            </div>
            <dl class="info-table">
                <div class="info-table__row">
                    <dt class="info-table__title">Sijainti</dt>
                    <dd class="info-table__value">
                        <a class="link"><span class="link__text">Kalasatamankatu 5</span></a>
                        <a class="link"><span class="link__text">Helsinki</span></a>
                    </dd>
                </div>
                <div class="info-table__row">
                    <dt class="info-table__title">Huoneita</dt>
                    <dd class="info-table__value">2</dd>
                </div>
                <div class="info-table__row">
                    <dt class="info-table__title">Rakennusvuosi</dt>
                    <dd class="info-table__value">2019</dd>
                </div>
            </dl>
            <div class="listing-overview">
                <p>Valoisa kaksio.</p>
                <p>Meri näkyy ikkunasta.</p>
            </div>
        </body></html>
    "#;

    const URL: &str = "https://asunnot.oikotie.fi/myytavat-asunnot/helsinki/12345";

    #[test]
    fn extracts_every_field_from_a_full_page() {
        let record = OikotieDetailScraper::extract_record(URL, FULL_PAGE);

        assert_eq!(record.title, "Upea kaksio Kalasatamassa");
        assert_eq!(record.price, "250000");
        assert_eq!(record.address, "Kalasatamankatu 5 Helsinki");
        assert_eq!(record.rooms, "2");
        assert_eq!(record.size_m2, "52.5");
        assert_eq!(record.year_built, "2019");
        assert_eq!(record.description, "Valoisa kaksio. Meri näkyy ikkunasta.");
        assert_eq!(record.url, URL);
        assert!(!record.scraped_at.is_empty());
    }

    #[test]
    fn missing_fields_stay_empty_without_touching_the_rest() {
        let html = r#"
            <html><body>
                <h1 class="listing-header__headline">Myydään yksiö</h1>
                <div class="card-v2-text-container__group--boxed">
                    <div class="card-v2-text-container__column card-v2-text-container__column--desktop-wide">
                        <h2 class="card-v2-text-container__title">99 000 €</h2>
                    </div>
                </div>
            </body></html>
        "#;
        let record = OikotieDetailScraper::extract_record(URL, html);

        assert_eq!(record.title, "Myydään yksiö");
        assert_eq!(record.price, "99000");
        assert_eq!(record.address, "");
        assert_eq!(record.rooms, "");
        assert_eq!(record.size_m2, "");
        assert_eq!(record.year_built, "");
        assert_eq!(record.description, "");
        assert_eq!(record.url, URL);
    }

    #[test]
    fn unrecognizable_page_still_yields_a_complete_record() {
        let record = OikotieDetailScraper::extract_record(URL, "<html><body><p>ei mitään</p></body></html>");

        assert_eq!(record.fields().len(), COLUMNS.len());
        assert_eq!(record.url, URL);
        assert!(!record.scraped_at.is_empty());
        assert_eq!(record.title, "");
        assert_eq!(record.price, "");
    }

    #[test]
    fn info_table_fallback_covers_price_and_size() {
        let html = r#"
            <html><body>
                <dl class="info-table">
                    <div class="info-table__row">
                        <dt class="info-table__title">Velaton hinta</dt>
                        <dd class="info-table__value">185 000 €</dd>
                    </div>
                    <div class="info-table__row">
                        <dt class="info-table__title">Asuinpinta-ala</dt>
                        <dd class="info-table__value">38 m²</dd>
                    </div>
                </dl>
            </body></html>
        "#;
        let record = OikotieDetailScraper::extract_record(URL, html);

        assert_eq!(record.price, "185000");
        assert_eq!(record.size_m2, "38");
    }

    #[test]
    fn normalizes_thousands_separated_prices() {
        assert_eq!(OikotieDetailScraper::numeric_field("250 000 €"), "250000");
        assert_eq!(OikotieDetailScraper::numeric_field("1\u{a0}250\u{a0}000 €"), "1250000");
    }

    #[test]
    fn normalizes_decimal_commas() {
        assert_eq!(OikotieDetailScraper::numeric_field("52,5 m²"), "52.5");
        assert_eq!(OikotieDetailScraper::numeric_field("2,5"), "2.5");
    }

    #[test]
    fn placeholder_values_become_empty() {
        assert_eq!(OikotieDetailScraper::numeric_field("N/A"), "");
        assert_eq!(OikotieDetailScraper::numeric_field("-"), "");
        assert_eq!(OikotieDetailScraper::numeric_field(""), "");
    }

    #[test]
    fn unparseable_values_with_digits_are_kept_raw() {
        assert_eq!(
            OikotieDetailScraper::numeric_field("250 000 - 300 000 €"),
            "250 000 - 300 000 €"
        );
    }
}
