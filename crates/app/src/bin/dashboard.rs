//! Vidpipe - status dashboard server

use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use vidpipe_common::config::load_dotenv;
use vidpipe_videos::dashboard::{spawn_refresh_loop, DashboardConfig, DashboardState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    vidpipe_app::init_tracing();

    info!("Starting Vidpipe dashboard");

    let config = DashboardConfig::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;
    let api = vidpipe_app::build_video_api().map_err(|e| {
        error!("Failed to create video API client: {}", e);
        e
    })?;

    let state = DashboardState::new();
    let refresher = spawn_refresh_loop(api, state.clone(), config.clone());

    let app = vidpipe_app::create_dashboard_app(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!("Dashboard available at http://{}", addr);
    info!("Health check available at http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    refresher.abort();
    info!("Dashboard shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
