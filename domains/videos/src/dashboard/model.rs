//! Dashboard data model: normalised video rows and usage statistics

use serde::Serialize;
use serde_json::Value;
use vidpipe_heygen::VideoRecord;

/// Monthly quota assumed when none is configured
pub const DEFAULT_MONTHLY_QUOTA: usize = 1000;

/// One dashboard row with display defaults applied
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoSummary {
    pub id: String,
    pub title: String,
    pub template_name: String,
    pub voice_name: String,
    pub status: String,
    pub created_at: String,
    pub completed_at: Option<String>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub duration: Option<String>,
}

fn display_value(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl From<&VideoRecord> for VideoSummary {
    fn from(record: &VideoRecord) -> Self {
        Self {
            id: display_value(record.id.as_ref()).unwrap_or_default(),
            title: record.title.clone().unwrap_or_else(|| "Untitled".to_string()),
            template_name: record
                .template_name
                .clone()
                .unwrap_or_else(|| "Unknown Template".to_string()),
            voice_name: record
                .voice_name
                .clone()
                .unwrap_or_else(|| "Unknown Voice".to_string()),
            status: record.status.clone().unwrap_or_else(|| "unknown".to_string()),
            created_at: display_value(record.created_at.as_ref()).unwrap_or_default(),
            completed_at: display_value(record.completed_at.as_ref()),
            thumbnail_url: record.thumbnail_url.clone(),
            video_url: record.video_url.clone(),
            duration: display_value(record.duration.as_ref()),
        }
    }
}

/// API usage derived from the video list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageStats {
    pub total_videos: usize,
    pub completed_videos: usize,
    pub processing_videos: usize,
    pub failed_videos: usize,
    pub monthly_quota: usize,
    pub remaining_quota: usize,
    pub usage_percentage: f64,
}

impl UsageStats {
    pub fn compute(videos: &[VideoSummary], monthly_quota: usize) -> Self {
        let count = |status: &str| videos.iter().filter(|v| v.status == status).count();
        let total = videos.len();
        let usage_percentage = if monthly_quota > 0 {
            let raw = total as f64 / monthly_quota as f64 * 100.0;
            (raw * 100.0).round() / 100.0
        } else {
            0.0
        };

        Self {
            total_videos: total,
            completed_videos: count("completed"),
            processing_videos: count("processing"),
            failed_videos: count("failed"),
            monthly_quota,
            remaining_quota: monthly_quota.saturating_sub(total),
            usage_percentage,
        }
    }
}

/// Everything one dashboard render needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardData {
    pub videos: Vec<VideoSummary>,
    pub api_usage: UsageStats,
    pub last_updated: String,
}

impl DashboardData {
    pub fn build(records: &[VideoRecord], monthly_quota: usize, last_updated: String) -> Self {
        let videos: Vec<VideoSummary> = records.iter().map(VideoSummary::from).collect();
        let api_usage = UsageStats::compute(&videos, monthly_quota);
        Self {
            videos,
            api_usage,
            last_updated,
        }
    }
}
