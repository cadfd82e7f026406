use super::{Result, ScrapeError};
use reqwest::Client;
use std::time::Duration;
use tracing::warn;

/// Fetch behavior knobs. The delays are fixed rather than exponential: the
/// source site tolerates a slow, steady crawl better than bursts.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Total attempt budget per URL.
    pub attempts: u32,
    /// Per-request timeout; a timeout counts as a failed attempt.
    pub timeout: Duration,
    /// Pause before every attempt.
    pub courtesy_delay: Duration,
    /// Extra pause after a failed attempt.
    pub retry_delay: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            timeout: Duration::from_secs(15),
            courtesy_delay: Duration::from_millis(1500),
            retry_delay: Duration::from_secs(2),
            user_agent: concat!("ghostvault/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Resilient HTTP GET. Every network access in the crawler funnels through
/// here so the retry budget and pacing apply uniformly.
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Self {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self { client, config }
    }

    /// Fetch a page body, retrying on any failure. Exhaustion is an error
    /// value; callers decide how far the failure spreads.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        for attempt in 1..=self.config.attempts {
            tokio::time::sleep(self.config.courtesy_delay).await;

            match self.try_fetch(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    warn!("Attempt {attempt} failed for {url}: {e}");
                    if attempt < self.config.attempts {
                        tokio::time::sleep(self.config.retry_delay).await;
                    }
                }
            }
        }

        Err(ScrapeError::Exhausted {
            url: url.to_string(),
            attempts: self.config.attempts,
        })
    }

    async fn try_fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ScrapeError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(ScrapeError::Network)
    }
}
