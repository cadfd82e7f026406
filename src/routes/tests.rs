//! Boundary behavior of the HTTP surface: requests that must fail do so
//! with the right status before any crawl is attempted.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use tower::ServiceExt;

use crate::{
    config::{
        FetchSettings, SectionSettings, ServerSettings, Settings, SourceSettings, TokenSettings,
    },
    routes,
    Ctx,
};

fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
            public_url: "http://localhost:5000".to_string(),
        },
        source: SourceSettings {
            // Unroutable on purpose: these tests must not touch the network.
            base_url: "http://127.0.0.1:9".to_string(),
            user_agent: "ghostvault-test".to_string(),
            releases: SectionSettings {
                slug: "em-lancamento".to_string(),
                pages: 1,
            },
            updated: SectionSettings {
                slug: "animes-atualizados".to_string(),
                pages: 1,
            },
        },
        fetch: FetchSettings {
            attempts: 1,
            timeout_secs: 1,
            courtesy_delay_ms: 0,
            retry_delay_ms: 0,
            page_concurrency: 2,
            thumb_concurrency: 1,
        },
        token: TokenSettings {
            secret: "test-secret".to_string(),
            ttl_secs: 600,
        },
    }
}

fn app() -> (Router, Ctx) {
    let ctx = Ctx::new(test_settings());
    let router = Router::new().merge(routes::mount()).with_state(ctx.clone());
    (router, ctx)
}

async fn get(router: Router, uri: &str) -> (StatusCode, String) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn echo_reports_online() {
    let (router, _) = app();
    let (status, body) = get(router, "/echo").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"ghost":"online"}"#);
}

#[tokio::test]
async fn snapshots_start_as_empty_lists() {
    let (router, _) = app();

    let (status, body) = get(router.clone(), "/Releases").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");

    let (status, body) = get(router, "/updated").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}

#[tokio::test]
async fn vault_without_id_is_bad_request() {
    let (router, _) = app();
    let (status, body) = get(router, "/vault").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("missing 'id' parameter"));
}

#[tokio::test]
async fn vault_unknown_id_is_not_found() {
    let (router, _) = app();
    let (status, body) = get(router, "/vault?id=999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("unknown catalog id"));
}

#[tokio::test]
async fn phantom_rejects_expired_token() {
    let (router, ctx) = app();
    let token = ctx
        .tokens
        .issue_at("Alpha", "http://127.0.0.1:9/ep/1", Utc::now().timestamp() - 601);

    let (status, body) = get(router, &format!("/phantom/{token}")).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.contains("expired"));
}

#[tokio::test]
async fn phantom_rejects_garbage_token() {
    let (router, _) = app();
    let (status, _) = get(router, "/phantom/definitely-not-a-token").await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}
