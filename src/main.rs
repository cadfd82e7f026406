mod cache;
mod config;
mod provider;
mod routes;
mod scraper;
mod token;

use std::sync::Arc;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    cache::CatalogCache,
    config::Settings,
    provider::AniListProvider,
    scraper::{CatalogScraper, EpisodeResolver, Fetcher, StreamLocator},
    token::TokenCodec,
};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct Ctx {
    pub settings: Arc<Settings>,
    pub cache: Arc<CatalogCache>,
    pub catalog: Arc<CatalogScraper>,
    pub episodes: Arc<EpisodeResolver>,
    pub streams: Arc<StreamLocator>,
    pub tokens: Arc<TokenCodec>,
    pub anilist: Arc<AniListProvider>,
}

impl Ctx {
    fn new(settings: Settings) -> Self {
        let fetcher = Arc::new(Fetcher::new(settings.fetch_config()));
        let base_url = settings.source.base_url.trim_end_matches('/').to_string();

        Self {
            cache: Arc::new(CatalogCache::new()),
            catalog: Arc::new(CatalogScraper::new(
                fetcher.clone(),
                base_url.clone(),
                settings.fetch.page_concurrency,
            )),
            episodes: Arc::new(EpisodeResolver::new(
                fetcher.clone(),
                base_url,
                settings.fetch.thumb_concurrency,
            )),
            streams: Arc::new(StreamLocator::new(fetcher)),
            tokens: Arc::new(TokenCodec::new(
                settings.token.secret.clone(),
                settings.token.ttl_secs,
            )),
            anilist: Arc::new(AniListProvider::new()),
            settings: Arc::new(settings),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ghostvault=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::load()?;
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let ctx = Ctx::new(settings);

    tracing::info!("Priming catalog snapshots");
    ctx.cache
        .refresh(
            &ctx.catalog,
            &ctx.settings.source.releases,
            &ctx.settings.source.updated,
        )
        .await;
    tracing::info!("Catalog snapshots ready");

    let app = Router::new()
        .merge(routes::mount())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(ctx);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
