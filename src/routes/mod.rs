use axum::{http::StatusCode, Json, Router};
use serde::Serialize;

use crate::Ctx;

pub mod catalog;
pub mod health;
pub mod stream;

#[cfg(test)]
mod tests;

/// Error body for boundary failures (400/403/404).
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
}

pub(crate) fn reject(
    status: StatusCode,
    message: impl Into<String>,
) -> (StatusCode, Json<ErrorBody>) {
    (
        status,
        Json(ErrorBody {
            code: status.as_u16(),
            message: message.into(),
        }),
    )
}

/// Mount all routes
pub fn mount() -> Router<Ctx> {
    Router::new()
        .merge(catalog::mount())
        .merge(health::mount())
        .merge(stream::mount())
}
