mod api_types;

pub use api_types::Media;

use super::http::HttpClient;
use crate::scraper::{Result, ScrapeError};
use api_types::{GraphQLResponse, MediaData};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const ANILIST_API_URL: &str = "https://graphql.anilist.co";

const MEDIA_QUERY: &str = r#"
    query ($search: String) {
        Media(search: $search, type: ANIME) {
            id
            title { romaji english native }
            description(asHtml: false)
            coverImage { large }
            episodes
            genres
            season
            seasonYear
            averageScore
            studios { nodes { name } }
            trailer { id site thumbnail }
        }
    }
"#;

/// AniList lookup with a fixed query shape. A failed lookup degrades to
/// None; it never fails the enclosing request.
pub struct AniListProvider {
    client: HttpClient,
    cache: Cache<String, Arc<Media>>,
}

impl AniListProvider {
    pub fn new() -> Self {
        Self {
            client: HttpClient::new(ANILIST_API_URL, Duration::from_secs(8)),
            cache: Cache::builder()
                .max_capacity(500)
                .time_to_live(Duration::from_secs(3600))
                .build(),
        }
    }

    pub async fn lookup(&self, title: &str) -> Option<Media> {
        let key = title.to_lowercase();
        if let Some(hit) = self.cache.get(&key).await {
            debug!("AniList cache hit for {title}");
            return Some((*hit).clone());
        }

        match self.search(title).await {
            Ok(media) => {
                self.cache.insert(key, Arc::new(media.clone())).await;
                Some(media)
            }
            Err(e) => {
                warn!("AniList lookup for {title} failed: {e}");
                None
            }
        }
    }

    async fn search(&self, title: &str) -> Result<Media> {
        let body = serde_json::json!({
            "query": MEDIA_QUERY,
            "variables": { "search": title }
        });

        let response: GraphQLResponse<MediaData> = self.client.post_json(&body).await?;

        if let Some(errors) = response.errors {
            if let Some(error) = errors.first() {
                return Err(ScrapeError::Parse(error.message.clone()));
            }
        }

        response
            .data
            .map(|data| data.media)
            .ok_or_else(|| ScrapeError::Parse("No data in response".to_string()))
    }
}

impl Default for AniListProvider {
    fn default() -> Self {
        Self::new()
    }
}
