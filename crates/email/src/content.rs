//! Shared email content templates
//!
//! Canonical content generators for video notifications, used by both
//! production (SMTP) and mock email services.

use askama::Template;

/// Subject line for a video-ready notification.
pub fn video_ready_subject(video_id: &str) -> String {
    format!("Your video is ready: {}", video_id)
}

/// Generate plain-text body for a video-ready notification.
pub fn video_ready_text(video_id: &str, video_url: &str) -> String {
    format!(
        "Hi there!\n\n\
        Your video has finished generating.\n\n\
        Video ID: {}\n\
        Download: {}\n\n\
        Thanks,\n\
        Vidpipe",
        video_id, video_url
    )
}

/// Styled HTML body for a video-ready notification
#[derive(Template)]
#[template(path = "video_ready.html")]
struct VideoReadyHtml<'a> {
    video_id: &'a str,
    video_url: &'a str,
}

/// Generate styled HTML body for a video-ready notification.
pub fn video_ready_html(video_id: &str, video_url: &str) -> askama::Result<String> {
    VideoReadyHtml {
        video_id,
        video_url,
    }
    .render()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_ready_text_contains_all_fields() {
        let text = video_ready_text("vid-123", "https://x/video.mp4");
        assert!(text.contains("vid-123"));
        assert!(text.contains("https://x/video.mp4"));
    }

    #[test]
    fn test_video_ready_html_contains_all_fields() {
        let html = video_ready_html("vid-123", "https://x/video.mp4").unwrap();
        assert!(html.contains("vid-123"));
        assert!(html.contains(r#"href="https://x/video.mp4""#));
    }

    #[test]
    fn test_video_ready_html_escapes_url() {
        let html = video_ready_html("<b>vid</b>", "https://x/v.mp4?a=1&b=\"2\"").unwrap();
        assert!(html.contains("a=1&amp;b="));
        assert!(!html.contains("b=\"2\""));
        assert!(!html.contains("<b>vid</b>"));
    }

    #[test]
    fn test_subject_names_video() {
        assert_eq!(video_ready_subject("abc"), "Your video is ready: abc");
    }
}
