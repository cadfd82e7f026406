use super::{fetcher::Fetcher, parser::EpisodeParser, Result, ScrapeError};
use std::sync::Arc;
use tracing::info;

/// Extracts the direct media URL from an episode page. Best effort: the
/// player fragment this matches on is unversioned external markup.
pub struct StreamLocator {
    fetcher: Arc<Fetcher>,
}

impl StreamLocator {
    pub fn new(fetcher: Arc<Fetcher>) -> Self {
        Self { fetcher }
    }

    pub async fn locate(&self, episode_link: &str) -> Result<String> {
        let body = self.fetcher.fetch(episode_link).await?;

        match EpisodeParser::stream_url(&body) {
            Some(url) => {
                info!("Media URL found for {episode_link}");
                Ok(url)
            }
            None => Err(ScrapeError::NotFound(format!(
                "no media URL in {episode_link}"
            ))),
        }
    }
}
