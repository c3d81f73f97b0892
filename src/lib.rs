//! Sequential scraper for oikotie.fi apartment listings.
//!
//! Collects detail-page URLs from a JavaScript-rendered search page with
//! headless Chrome, fetches each listing over plain HTTP, and appends the
//! parsed fields to a CSV file.

pub mod config;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod scrapers;
