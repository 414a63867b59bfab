//! Status dashboard: an HTML overview of recent videos and quota usage
//!
//! The page is rendered by a background task and cached; requests only
//! read the cached copy.

pub mod model;
pub mod render;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use vidpipe_heygen::VideoApi;

pub use model::{DashboardData, UsageStats, VideoSummary, DEFAULT_MONTHLY_QUOTA};
pub use routes::routes;

/// Default listen port
pub const DEFAULT_PORT: u16 = 8000;

/// Default refresh interval in seconds
pub const DEFAULT_REFRESH_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub port: u16,
    pub refresh_interval: Duration,
    pub monthly_quota: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
            monthly_quota: DEFAULT_MONTHLY_QUOTA,
        }
    }
}

impl DashboardConfig {
    /// Read `DASHBOARD_PORT`, `DASHBOARD_REFRESH_SECS` and `MONTHLY_QUOTA`
    pub fn from_env() -> vidpipe_common::Result<Self> {
        use vidpipe_common::config::parse_var;

        let refresh_secs = parse_var("DASHBOARD_REFRESH_SECS", DEFAULT_REFRESH_SECS)?;
        if refresh_secs == 0 {
            return Err(vidpipe_common::Error::Configuration(
                "DASHBOARD_REFRESH_SECS must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            port: parse_var("DASHBOARD_PORT", DEFAULT_PORT)?,
            refresh_interval: Duration::from_secs(refresh_secs),
            monthly_quota: parse_var("MONTHLY_QUOTA", DEFAULT_MONTHLY_QUOTA)?,
        })
    }
}

/// Shared dashboard state: the last rendered page, `None` until first refresh
#[derive(Clone, Default)]
pub struct DashboardState {
    page: Arc<RwLock<Option<String>>>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn page(&self) -> Option<String> {
        self.page.read().await.clone()
    }

    pub async fn store(&self, html: String) {
        *self.page.write().await = Some(html);
    }
}

/// Fetch the video list and build dashboard data.
///
/// A failed fetch is logged and renders as an empty list.
pub async fn collect(api: &dyn VideoApi, monthly_quota: usize) -> DashboardData {
    let records = match api.list_videos().await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch video list for dashboard");
            Vec::new()
        }
    };
    let last_updated = chrono::Utc::now()
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string();

    DashboardData::build(&records, monthly_quota, last_updated)
}

/// Render once and store the page in `state`.
///
/// A render failure is logged and the previously stored page is kept.
pub async fn refresh_once(api: &dyn VideoApi, state: &DashboardState, config: &DashboardConfig) {
    let data = collect(api, config.monthly_quota).await;
    let html = match render::render_dashboard(&data, config.refresh_interval.as_secs()) {
        Ok(html) => html,
        Err(e) => {
            tracing::error!(error = %e, "Failed to render dashboard page");
            return;
        }
    };
    state.store(html).await;
    tracing::info!(
        videos = data.api_usage.total_videos,
        usage_percentage = data.api_usage.usage_percentage,
        "Dashboard refreshed"
    );
}

/// Refresh immediately, then every `refresh_interval`, until the task is aborted
#[mutants::skip] // Endless loop; refresh_once carries the behavior
pub fn spawn_refresh_loop(
    api: Arc<dyn VideoApi>,
    state: DashboardState,
    config: DashboardConfig,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(config.refresh_interval);
        loop {
            ticker.tick().await;
            refresh_once(api.as_ref(), &state, &config).await;
        }
    })
}
