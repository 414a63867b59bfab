//! Dashboard refresh and serving against a fake video API

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use vidpipe_videos::dashboard::{refresh_once, routes, DashboardConfig, DashboardState};

use common::FakeVideoApi;

async fn fetch(state: DashboardState, uri: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = routes().with_state(state).oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_dashboard_renders_enveloped_listing() {
    let api = FakeVideoApi::start().await;
    api.serve_videos(json!({"data": {"videos": [
        {"id": "v1", "title": "Launch <teaser>", "status": "completed",
         "video_url": "https://cdn.example.com/v1.mp4", "duration": 42,
         "thumbnail_url": "https://cdn.example.com/v1.jpg"},
        {"video_id": "v2", "status": "processing"},
        {"id": "v3", "status": "failed", "template_name": "Promo"}
    ]}}))
    .await;

    let state = DashboardState::new();
    let config = DashboardConfig {
        monthly_quota: 200,
        ..DashboardConfig::default()
    };
    refresh_once(api.client().as_ref(), &state, &config).await;

    let (status, html) = fetch(state, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Launch &lt;teaser&gt;"));
    assert!(html.contains("status-completed"));
    assert!(html.contains("status-processing"));
    assert!(html.contains("status-failed"));
    assert!(html.contains("Promo"));
    assert!(html.contains(r#"<img src="https://cdn.example.com/v1.jpg""#));
    assert!(html.contains("1.5%"));
    assert!(html.contains("197 of 200 remaining"));
}

#[tokio::test]
async fn test_dashboard_accepts_bare_array() {
    let api = FakeVideoApi::start().await;
    api.serve_videos(json!([{"id": "only", "title": "Solo"}])).await;

    let state = DashboardState::new();
    refresh_once(api.client().as_ref(), &state, &DashboardConfig::default()).await;

    let (_, html) = fetch(state, "/index.html").await;
    assert!(html.contains("Solo"));
    assert!(html.contains("Unknown Template"));
}

#[tokio::test]
async fn test_dashboard_survives_listing_failure() {
    let api = FakeVideoApi::start().await;
    api.fail_path("GET", "/v1/videos", 500).await;

    let state = DashboardState::new();
    refresh_once(api.client().as_ref(), &state, &DashboardConfig::default()).await;

    let (status, html) = fetch(state.clone(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("No videos found"));

    let (status, _) = fetch(state, "/admin").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
