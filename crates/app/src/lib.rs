//! Vidpipe application composition root
//!
//! Wires providers from the environment into the domain flows used by the
//! binaries.

use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use vidpipe_chat::{ChatConfig, ChatServiceFactory};
use vidpipe_common::config::{optional_var, var_or};
use vidpipe_email::{EmailConfig, EmailServiceFactory};
use vidpipe_heygen::{HeygenConfig, VideoApi, VideoApiFactory};
use vidpipe_proxy_tests::{
    report_unavailable, ProxyTestConfig, ProxyTestError, PublishedReport, ReportPublisher,
    SmokeFixture, TestReport, TestRunner,
};
use vidpipe_videos::{
    DashboardState, GenerationPipeline, GenerationRequest, Notifier, PollPolicy, TokioDelay,
};

/// Install the global subscriber.
///
/// `RUST_LOG` controls filtering (default `info`); `LOG_FORMAT=json` switches
/// to JSON lines. Logs go to stderr so stdout stays free for step outputs and
/// workflow annotations.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if var_or("LOG_FORMAT", "pretty") == "json" {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

/// Video API client selected by `VIDEO_API_PROVIDER`
pub fn build_video_api() -> anyhow::Result<Arc<dyn VideoApi>> {
    let config = HeygenConfig::from_env()?;
    Ok(Arc::from(VideoApiFactory::create(config)?))
}

/// Email and chat sinks; the email recipient comes from `NOTIFY_EMAIL_TO`
pub fn build_notifier() -> anyhow::Result<Notifier> {
    let email = EmailServiceFactory::create(EmailConfig::from_env()?)?;
    let chat = ChatServiceFactory::create(ChatConfig::from_env()?)?;
    let recipient = optional_var("NOTIFY_EMAIL_TO").unwrap_or_default();
    if recipient.is_empty() {
        tracing::warn!("NOTIFY_EMAIL_TO is not set; email notifications will fail");
    }

    Ok(Notifier::new(Arc::from(email), Arc::from(chat), recipient))
}

/// Generation pipeline with real sleeps between status checks
pub fn build_generation_pipeline() -> anyhow::Result<GenerationPipeline> {
    Ok(GenerationPipeline::new(
        build_video_api()?,
        Arc::new(TokioDelay),
        PollPolicy::from_env()?,
        build_notifier()?,
    ))
}

/// Generation input from `TEMPLATE_ID`, `VOICE_ID` and `SCRIPT_TEXT`.
///
/// Missing values stay empty here and are rejected by the submitter.
pub fn generation_request_from_env() -> GenerationRequest {
    GenerationRequest::new(
        optional_var("TEMPLATE_ID").unwrap_or_default(),
        optional_var("VOICE_ID").unwrap_or_default(),
        optional_var("SCRIPT_TEXT").unwrap_or_default(),
    )
}

/// Run the configured proxy cases; a client setup failure becomes the report error
pub async fn generate_proxy_report(config: &ProxyTestConfig) -> Result<TestReport, ProxyTestError> {
    tracing::info!(proxy_url = %config.proxy_url, cases = ?config.cases, "Running proxy smoke tests");

    let api = VideoApiFactory::create(config.api_config())
        .map_err(|e| ProxyTestError::Configuration(e.to_string()))?;
    let runner = TestRunner::new(Arc::from(api), SmokeFixture::from_env());

    Ok(runner.run(&config.cases).await)
}

/// Read the configuration, run the cases and publish to `REPORT_PATH`.
///
/// Invalid configuration is annotated and returned as `ReportUnavailable`.
pub async fn run_proxy_tests() -> Result<PublishedReport, ProxyTestError> {
    let config = ProxyTestConfig::from_env().map_err(report_unavailable)?;
    let publisher = ReportPublisher::new(&config.report_path);
    publisher.publish(generate_proxy_report(&config).await)
}

/// Dashboard router with request tracing
pub fn create_dashboard_app(state: DashboardState) -> Router {
    vidpipe_videos::dashboard::routes()
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .into_inner(),
        )
}
