pub mod browser;
pub mod detail;
pub mod traits;

pub use browser::OikotieLinkCollector;
pub use detail::OikotieDetailScraper;
pub use traits::ListingScraper;
