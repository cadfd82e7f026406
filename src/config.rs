use crate::scraper::FetchConfig;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// External base URL used when composing player links.
    pub public_url: String,
}

/// One listing section: site slug plus how many pages to crawl per refresh.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionSettings {
    pub slug: String,
    pub pages: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceSettings {
    pub base_url: String,
    pub user_agent: String,
    pub releases: SectionSettings,
    pub updated: SectionSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchSettings {
    pub attempts: u32,
    pub timeout_secs: u64,
    pub courtesy_delay_ms: u64,
    pub retry_delay_ms: u64,
    /// In-flight page fetches per section crawl.
    pub page_concurrency: usize,
    /// In-flight thumbnail fetches per detail resolve.
    pub thumb_concurrency: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenSettings {
    pub secret: String,
    pub ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub source: SourceSettings,
    pub fetch: FetchSettings,
    pub token: TokenSettings,
}

impl Settings {
    /// Defaults, overridden by an optional ghostvault.toml, overridden by
    /// GHOSTVAULT_* environment variables (e.g. GHOSTVAULT_SERVER__PORT).
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("server.public_url", "http://localhost:5000")?
            .set_default("source.base_url", "https://animefire.plus")?
            .set_default(
                "source.user_agent",
                "Mozilla/5.0 (Linux; Android 13) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Mobile Safari/537.36",
            )?
            .set_default("source.releases.slug", "em-lancamento")?
            .set_default("source.releases.pages", 6)?
            .set_default("source.updated.slug", "animes-atualizados")?
            .set_default("source.updated.pages", 30)?
            .set_default("fetch.attempts", 3)?
            .set_default("fetch.timeout_secs", 15)?
            .set_default("fetch.courtesy_delay_ms", 1500)?
            .set_default("fetch.retry_delay_ms", 2000)?
            .set_default("fetch.page_concurrency", 2)?
            .set_default("fetch.thumb_concurrency", 1)?
            .set_default("token.secret", "chave_ultra_segura")?
            .set_default("token.ttl_secs", 600)?
            .add_source(File::with_name("ghostvault").required(false))
            .add_source(Environment::with_prefix("GHOSTVAULT").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            attempts: self.fetch.attempts,
            timeout: Duration::from_secs(self.fetch.timeout_secs),
            courtesy_delay: Duration::from_millis(self.fetch.courtesy_delay_ms),
            retry_delay: Duration::from_millis(self.fetch.retry_delay_ms),
            user_agent: self.source.user_agent.clone(),
        }
    }
}
