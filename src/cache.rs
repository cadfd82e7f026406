use crate::config::SectionSettings;
use crate::scraper::{CatalogEntry, CatalogScraper};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

/// Process-wide holder of the two catalog snapshots. Readers clone an Arc
/// and always observe one complete generation; a refresh builds the
/// replacement off to the side and publishes it with a single swap.
pub struct CatalogCache {
    releases: RwLock<Arc<Vec<CatalogEntry>>>,
    updated: RwLock<Arc<Vec<CatalogEntry>>>,
    refresh_gate: tokio::sync::Mutex<()>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self {
            releases: RwLock::new(Arc::new(Vec::new())),
            updated: RwLock::new(Arc::new(Vec::new())),
            refresh_gate: tokio::sync::Mutex::new(()),
        }
    }

    pub fn releases(&self) -> Arc<Vec<CatalogEntry>> {
        self.releases.read().clone()
    }

    pub fn updated(&self) -> Arc<Vec<CatalogEntry>> {
        self.updated.read().clone()
    }

    /// Look an entry up by display id, releases first. Ids repeat across
    /// sections, so the lookup order is part of the contract.
    pub fn find(&self, id: u32) -> Option<CatalogEntry> {
        let releases = self.releases();
        let updated = self.updated();

        releases
            .iter()
            .chain(updated.iter())
            .find(|entry| entry.id == id)
            .cloned()
    }

    /// Crawl both sections and swap the snapshots in. At most one refresh
    /// runs at a time; readers are never blocked while it does.
    pub async fn refresh(
        &self,
        scraper: &CatalogScraper,
        releases: &SectionSettings,
        updated: &SectionSettings,
    ) {
        let _running = self.refresh_gate.lock().await;

        let snapshot = scraper.scrape_section(&releases.slug, releases.pages).await;
        info!("Releases snapshot ready: {} entries", snapshot.len());
        *self.releases.write() = Arc::new(snapshot);

        let snapshot = scraper.scrape_section(&updated.slug, updated.pages).await;
        info!("Updated snapshot ready: {} entries", snapshot.len());
        *self.updated.write() = Arc::new(snapshot);
    }
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u32, title: &str) -> CatalogEntry {
        CatalogEntry {
            id,
            title: title.to_string(),
            url: format!("https://site/animes/{title}"),
            image: String::new(),
        }
    }

    #[test]
    fn starts_empty() {
        let cache = CatalogCache::new();

        assert!(cache.releases().is_empty());
        assert!(cache.updated().is_empty());
        assert!(cache.find(1).is_none());
    }

    #[test]
    fn find_prefers_releases_section() {
        let cache = CatalogCache::new();
        *cache.releases.write() = Arc::new(vec![entry(1, "alpha")]);
        *cache.updated.write() = Arc::new(vec![entry(1, "beta"), entry(2, "gamma")]);

        assert_eq!(cache.find(1).unwrap().title, "alpha");
        assert_eq!(cache.find(2).unwrap().title, "gamma");
        assert!(cache.find(3).is_none());
    }

    #[test]
    fn readers_keep_their_snapshot_across_a_swap() {
        let cache = CatalogCache::new();
        *cache.releases.write() = Arc::new(vec![entry(1, "alpha")]);

        let before = cache.releases();
        *cache.releases.write() = Arc::new(vec![entry(1, "beta"), entry(2, "gamma")]);

        assert_eq!(before.len(), 1);
        assert_eq!(before[0].title, "alpha");
        assert_eq!(cache.releases().len(), 2);
    }
}
