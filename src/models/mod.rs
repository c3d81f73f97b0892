use serde::{Deserialize, Serialize};

/// Header row of the output CSV files. Must stay in step with the field
/// order of [`ListingRecord`], which is what `csv` serializes.
pub const COLUMNS: [&str; 9] = [
    "title",
    "price",
    "address",
    "rooms",
    "size_m2",
    "year_built",
    "description",
    "url",
    "scraped_at",
];

/// One scraped listing, one CSV row.
///
/// Every column is always present. An empty string means the detail page did
/// not yield a value for that field. Numeric columns hold the normalized
/// number as text ("250000", "52.5"); when normalization failed on a value
/// that still contained digits, they hold the raw page text instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingRecord {
    pub title: String,
    pub price: String,
    pub address: String,
    pub rooms: String,
    pub size_m2: String,
    pub year_built: String,
    pub description: String,
    pub url: String,
    pub scraped_at: String,
}

impl ListingRecord {
    /// Column/value pairs in output order.
    pub fn fields(&self) -> [(&'static str, &str); 9] {
        [
            ("title", self.title.as_str()),
            ("price", self.price.as_str()),
            ("address", self.address.as_str()),
            ("rooms", self.rooms.as_str()),
            ("size_m2", self.size_m2.as_str()),
            ("year_built", self.year_built.as_str()),
            ("description", self.description.as_str()),
            ("url", self.url.as_str()),
            ("scraped_at", self.scraped_at.as_str()),
        ]
    }
}
