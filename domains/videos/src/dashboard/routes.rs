//! Route definitions for the dashboard

use axum::{extract::State, http::StatusCode, response::Html, routing::get, Router};

use super::render::LOADING_PAGE;
use super::DashboardState;

async fn dashboard_page(State(state): State<DashboardState>) -> Html<String> {
    Html(
        state
            .page()
            .await
            .unwrap_or_else(|| LOADING_PAGE.to_string()),
    )
}

async fn health_check() -> &'static str {
    "OK"
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "404 Not Found")
}

/// Create all dashboard routes
pub fn routes() -> Router<DashboardState> {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/index.html", get(dashboard_page))
        .route("/health", get(health_check))
        .fallback(not_found)
}
