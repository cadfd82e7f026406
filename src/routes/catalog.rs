use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::info;

use super::{reject, ErrorBody};
use crate::{
    provider::Media,
    scraper::{CatalogEntry, Episode},
    Ctx,
};

#[derive(Debug, Deserialize)]
struct VaultQuery {
    id: Option<u32>,
}

/// One episode in the detail response, with its minted player link.
#[derive(Debug, Serialize)]
struct PlayerEpisode {
    title: String,
    link: String,
    cover: String,
    player: String,
}

#[derive(Debug, Serialize)]
struct VaultResponse {
    id: u32,
    title: String,
    image: String,
    anilist: Option<Media>,
    episodes: BTreeMap<String, Vec<PlayerEpisode>>,
}

/// Re-crawl both sections and swap the snapshots in.
/// GET /refresh
async fn refresh(State(ctx): State<Ctx>) -> Json<Value> {
    info!("Refreshing catalog snapshots");
    ctx.cache
        .refresh(
            &ctx.catalog,
            &ctx.settings.source.releases,
            &ctx.settings.source.updated,
        )
        .await;

    Json(json!({ "status": "cache refreshed" }))
}

/// Cached new-releases snapshot.
/// GET /Releases
async fn releases(State(ctx): State<Ctx>) -> Json<Vec<CatalogEntry>> {
    Json(ctx.cache.releases().as_ref().clone())
}

/// Cached recently-updated snapshot.
/// GET /updated
async fn updated(State(ctx): State<Ctx>) -> Json<Vec<CatalogEntry>> {
    Json(ctx.cache.updated().as_ref().clone())
}

/// Compose the detail object for one cached entry: live episode resolve,
/// AniList metadata (nullable), and one player token per episode.
/// GET /vault?id=...
async fn vault(
    State(ctx): State<Ctx>,
    Query(params): Query<VaultQuery>,
) -> Result<Json<VaultResponse>, (StatusCode, Json<ErrorBody>)> {
    let id = params
        .id
        .ok_or_else(|| reject(StatusCode::BAD_REQUEST, "missing 'id' parameter"))?;

    let entry = ctx
        .cache
        .find(id)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "unknown catalog id"))?;

    info!("Detail request for #{id}: {}", entry.title);

    let anilist = ctx.anilist.lookup(&entry.title).await;
    let seasons = ctx.episodes.resolve(&entry.url).await;
    if seasons.is_empty() {
        return Err(reject(StatusCode::NOT_FOUND, "no episodes found"));
    }

    let public_url = ctx.settings.server.public_url.trim_end_matches('/');
    let episodes = seasons
        .into_iter()
        .map(|(season, bucket)| {
            let bucket = bucket
                .into_iter()
                .map(|episode| with_player(episode, &entry.title, public_url, &ctx))
                .collect();
            (season, bucket)
        })
        .collect();

    Ok(Json(VaultResponse {
        id: entry.id,
        title: entry.title.clone(),
        image: entry.image.clone(),
        anilist,
        episodes,
    }))
}

fn with_player(episode: Episode, title: &str, public_url: &str, ctx: &Ctx) -> PlayerEpisode {
    let token = ctx.tokens.issue(title, &episode.link);

    PlayerEpisode {
        player: format!("{public_url}/phantom/{token}"),
        title: episode.title,
        link: episode.link,
        cover: episode.cover,
    }
}

pub fn mount() -> Router<Ctx> {
    Router::new()
        .route("/refresh", get(refresh))
        .route("/Releases", get(releases))
        .route("/updated", get(updated))
        .route("/vault", get(vault))
}
