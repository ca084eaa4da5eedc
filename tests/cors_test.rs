//! CORS layer construction from configuration.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    routing::get,
    Router,
};
use tower::ServiceExt;
use worksite_api::{build_cors_layer, config::AppConfig};

fn production_config() -> AppConfig {
    AppConfig::new(
        "sqlite://worksite.db?mode=rwc".into(),
        "127.0.0.1".into(),
        8080,
        "production".into(),
    )
}

fn probe_router(cfg: &AppConfig) -> Router {
    let layer = build_cors_layer(cfg).expect("cors layer");
    Router::new().route("/", get(|| async { "ok" })).layer(layer)
}

#[tokio::test]
async fn credentials_with_explicit_origins_serves_requests() {
    let mut cfg = production_config();
    cfg.cors_allowed_origins = Some("https://app.example.com".into());
    cfg.cors_allow_credentials = true;

    let router = probe_router(&cfg);

    // Preflight
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/")
                .header(header::ORIGIN, "https://app.example.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .expect("allow-origin"),
        "https://app.example.com"
    );
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .expect("allow-credentials"),
        "true"
    );

    // Actual request
    let response = router
        .oneshot(
            Request::builder()
                .uri("/")
                .header(header::ORIGIN, "https://app.example.com")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .expect("allow-origin"),
        "https://app.example.com"
    );
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .expect("allow-credentials"),
        "true"
    );
}

#[tokio::test]
async fn unlisted_origin_is_not_echoed() {
    let mut cfg = production_config();
    cfg.cors_allowed_origins = Some("https://app.example.com".into());

    let response = probe_router(&cfg)
        .oneshot(
            Request::builder()
                .uri("/")
                .header(header::ORIGIN, "https://evil.example.com")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn development_without_origins_is_permissive() {
    let mut cfg = production_config();
    cfg.environment = "development".into();

    let response = probe_router(&cfg)
        .oneshot(
            Request::builder()
                .uri("/")
                .header(header::ORIGIN, "https://anywhere.example.com")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .expect("allow-origin"),
        "*"
    );
}

#[tokio::test]
async fn production_without_origins_is_an_error() {
    let cfg = production_config();
    assert!(build_cors_layer(&cfg).is_err());
}
