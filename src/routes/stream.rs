use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Redirect,
    routing::get,
    Json, Router,
};
use tracing::info;

use super::{reject, ErrorBody};
use crate::Ctx;

/// Redeem a player token and redirect to the resolved media URL.
/// GET /phantom/{token}
async fn phantom(
    State(ctx): State<Ctx>,
    Path(token): Path<String>,
) -> Result<Redirect, (StatusCode, Json<ErrorBody>)> {
    let claims = ctx
        .tokens
        .redeem(&token)
        .map_err(|e| reject(StatusCode::FORBIDDEN, e.to_string()))?;

    info!("Token redeemed for {}", claims.title);

    let media_url = ctx
        .streams
        .locate(&claims.link)
        .await
        .map_err(|e| reject(StatusCode::NOT_FOUND, e.to_string()))?;

    Ok(Redirect::temporary(&media_url))
}

pub fn mount() -> Router<Ctx> {
    Router::new().route("/phantom/{token}", get(phantom))
}
