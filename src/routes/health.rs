use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use crate::Ctx;

/// Liveness probe
/// GET /echo
async fn echo() -> Json<Value> {
    Json(json!({ "ghost": "online" }))
}

pub fn mount() -> Router<Ctx> {
    Router::new().route("/echo", get(echo))
}
