//! Vidpipe - video generation step
//!
//! Submits one generation job, waits for it to finish, notifies, and writes
//! `video_id`, `video_url` and `status` as step outputs.

use tracing::{error, info};

use vidpipe_common::config::{load_dotenv, optional_var};
use vidpipe_videos::failure_outputs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    vidpipe_app::init_tracing();

    info!("Starting video generation");

    let pipeline = vidpipe_app::build_generation_pipeline().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;
    let request = vidpipe_app::generation_request_from_env();
    let webhook_url = optional_var("SLACK_WEBHOOK_URL");

    match pipeline.run(&request, webhook_url.as_deref()).await {
        Ok(outcome) => {
            outcome.step_outputs().emit()?;
            info!(video_id = %outcome.job.video_id, "Video generation finished");
            Ok(())
        }
        Err(e) => {
            error!(error_code = e.error_code(), "Video generation failed: {}", e);
            failure_outputs(&e).emit()?;
            Err(e.into())
        }
    }
}
