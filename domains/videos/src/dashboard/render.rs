//! HTML rendering for the status dashboard
//!
//! The page is an askama template; every interpolated value is escaped by the
//! template engine.

use askama::Template;

use super::model::{DashboardData, UsageStats, VideoSummary};

const NOT_AVAILABLE: &str = "N/A";

/// One table row with display fallbacks applied
#[derive(Debug, Clone)]
struct VideoRow<'a> {
    id: &'a str,
    title: &'a str,
    template_name: &'a str,
    voice_name: &'a str,
    status: &'a str,
    status_class: String,
    created_at: &'a str,
    completed_at: &'a str,
    duration: &'a str,
    thumbnail_url: &'a str,
    video_url: &'a str,
}

fn or_na(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => NOT_AVAILABLE,
    }
}

impl<'a> From<&'a VideoSummary> for VideoRow<'a> {
    fn from(video: &'a VideoSummary) -> Self {
        Self {
            id: &video.id,
            title: &video.title,
            template_name: &video.template_name,
            voice_name: &video.voice_name,
            status: &video.status,
            status_class: format!("status-{}", video.status.to_lowercase()),
            created_at: or_na(Some(&video.created_at)),
            completed_at: or_na(video.completed_at.as_deref()),
            duration: or_na(video.duration.as_deref()),
            thumbnail_url: video.thumbnail_url.as_deref().unwrap_or_default(),
            video_url: video.video_url.as_deref().unwrap_or_default(),
        }
    }
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardPage<'a> {
    refresh_secs: u64,
    last_updated: &'a str,
    usage: &'a UsageStats,
    rows: Vec<VideoRow<'a>>,
}

/// Full dashboard page; the browser reloads it every `refresh_secs`
pub fn render_dashboard(data: &DashboardData, refresh_secs: u64) -> askama::Result<String> {
    DashboardPage {
        refresh_secs,
        last_updated: &data.last_updated,
        usage: &data.api_usage,
        rows: data.videos.iter().map(VideoRow::from).collect(),
    }
    .render()
}

/// Served until the first refresh finishes
pub const LOADING_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta http-equiv="refresh" content="5">
  <title>Video Generation Dashboard</title>
</head>
<body>
  <h1>Video Generation Dashboard</h1>
  <p>Loading dashboard data...</p>
</body>
</html>
"#;
