use serde::Serialize;
use std::collections::BTreeMap;

/// One catalog listing entry. Display ids are assigned per snapshot
/// generation and are only meaningful within that snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub id: u32,
    pub title: String,
    pub url: String,
    pub image: String,
}

/// A single episode extracted from an anime detail page. The cover falls
/// back to the anime-level art when the episode page has no thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Episode {
    pub title: String,
    pub link: String,
    pub cover: String,
}

/// Episodes grouped by season key ("1", "2", ...), ordered within each
/// bucket by the number embedded in the episode title.
pub type SeasonMap = BTreeMap<String, Vec<Episode>>;
