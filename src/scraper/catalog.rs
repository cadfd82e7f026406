use super::{
    fetcher::Fetcher,
    parser::{ListingCard, ListingParser},
    types::CatalogEntry,
};
use futures::{stream, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Crawls one listing section across its pages and normalizes the result
/// into a numbered, url-deduplicated snapshot.
pub struct CatalogScraper {
    fetcher: Arc<Fetcher>,
    base_url: String,
    page_concurrency: usize,
}

impl CatalogScraper {
    pub fn new(fetcher: Arc<Fetcher>, base_url: impl Into<String>, page_concurrency: usize) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            page_concurrency: page_concurrency.max(1),
        }
    }

    /// Scrape pages 1..=page_count of a section. A failed page contributes
    /// zero entries; the crawl itself never fails.
    pub async fn scrape_section(&self, section: &str, page_count: u32) -> Vec<CatalogEntry> {
        let pages: Vec<Vec<ListingCard>> = stream::iter(1..=page_count)
            .map(|page| {
                let url = format!("{}/{}/{}", self.base_url, section, page);
                async move {
                    match self.fetcher.fetch(&url).await {
                        Ok(body) => {
                            let cards = ListingParser::cards(&body);
                            info!("Section {section} page {page}: {} cards", cards.len());
                            cards
                        }
                        Err(e) => {
                            warn!("Section {section} page {page} failed: {e}");
                            Vec::new()
                        }
                    }
                }
            })
            .buffer_unordered(self.page_concurrency)
            .collect()
            .await;

        dedupe_and_number(pages.into_iter().flatten())
    }
}

/// Collapse duplicate urls (first occurrence wins) and assign display ids
/// 1..=N over the surviving order. Completion order of concurrent page
/// fetches feeds this, so ids are not stable across refreshes.
pub(super) fn dedupe_and_number(cards: impl IntoIterator<Item = ListingCard>) -> Vec<CatalogEntry> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for card in cards {
        if seen.insert(card.url.clone()) {
            entries.push(CatalogEntry {
                id: entries.len() as u32 + 1,
                title: card.title,
                url: card.url,
                image: card.image,
            });
        }
    }

    entries
}
