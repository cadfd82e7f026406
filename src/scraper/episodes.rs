use super::{
    fetcher::Fetcher,
    parser::{DetailParser, EpisodeParser},
    types::{Episode, SeasonMap},
};
use futures::{stream, StreamExt};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{debug, info, warn};

static SEASON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:season|temporada|s)\s?(\d+)").expect("Invalid season regex")
});

/// Resolves the full episode listing for one catalog entry, live. Results
/// are never cached; detail pages change too often between refreshes.
pub struct EpisodeResolver {
    fetcher: Arc<Fetcher>,
    base_url: String,
    thumb_concurrency: usize,
}

impl EpisodeResolver {
    pub fn new(fetcher: Arc<Fetcher>, base_url: impl Into<String>, thumb_concurrency: usize) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            thumb_concurrency: thumb_concurrency.max(1),
        }
    }

    /// Crawl an anime detail page into season-bucketed episodes. An empty
    /// map means the detail page itself could not be fetched.
    pub async fn resolve(&self, anime_url: &str) -> SeasonMap {
        let body = match self.fetcher.fetch(anime_url).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Detail page {anime_url} failed: {e}");
                return SeasonMap::new();
            }
        };

        let cover = DetailParser::cover(&body).unwrap_or_default();
        let links = DetailParser::episode_links(&body);
        info!("{anime_url}: {} episode links", links.len());

        // Thumbnail lookups default to one in flight; the per-episode fetch
        // already dominates wall-clock time and the site rate-limits bursts.
        let episodes: Vec<Episode> = stream::iter(links)
            .map(|(title, href)| {
                let link = self.absolute(&href);
                let cover = cover.clone();
                async move {
                    let cover = self.episode_thumbnail(&link).await.unwrap_or(cover);
                    Episode { title, link, cover }
                }
            })
            .buffered(self.thumb_concurrency)
            .collect()
            .await;

        bucket_by_season(episodes)
    }

    /// Episode pages sometimes carry a sharper thumbnail than the series
    /// cover. Missing one is not an error.
    async fn episode_thumbnail(&self, link: &str) -> Option<String> {
        match self.fetcher.fetch(link).await {
            Ok(body) => EpisodeParser::thumbnail(&body),
            Err(e) => {
                debug!("Thumbnail fetch for {link} failed: {e}");
                None
            }
        }
    }

    fn absolute(&self, href: &str) -> String {
        if href.starts_with("http") {
            href.to_string()
        } else {
            format!("{}{}", self.base_url, href)
        }
    }
}

/// Group episodes by the season number found in their titles (default
/// season "1") and order each bucket by episode number.
pub(super) fn bucket_by_season(episodes: Vec<Episode>) -> SeasonMap {
    let mut seasons = SeasonMap::new();

    for episode in episodes {
        let key = season_key(&episode.title);
        seasons.entry(key).or_default().push(episode);
    }

    for bucket in seasons.values_mut() {
        bucket.sort_by_key(|episode| episode_number(&episode.title));
    }

    seasons
}

/// "Season 2", "Temporada 2" and "S2" all bucket under "2"; titles with no
/// season marker land in "1".
pub(super) fn season_key(title: &str) -> String {
    SEASON
        .captures(title)
        .map_or_else(|| "1".to_string(), |caps| caps[1].to_string())
}

/// All digits in the title read as one number; titles without digits sort
/// first. Mirrors how the source site labels its episodes.
pub(super) fn episode_number(title: &str) -> u64 {
    let digits: String = title.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}
