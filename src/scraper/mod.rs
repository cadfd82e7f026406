mod catalog;
mod episodes;
mod fetcher;
mod parser;
mod stream;
mod types;


pub use catalog::CatalogScraper;
pub use episodes::EpisodeResolver;
pub use fetcher::{FetchConfig, Fetcher};
pub use stream::StreamLocator;
pub use types::{CatalogEntry, Episode, SeasonMap};

/// Scraper result type
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Scraper error types
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("Gave up on {url} after {attempts} attempts")]
    Exhausted { url: String, attempts: u32 },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Not found: {0}")]
    NotFound(String),
}
