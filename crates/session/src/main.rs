use anyhow::Context;
use common::wait_for_resource_async;
use session::config::get_configuration;
use session::logging::setup_logging;
use session::{CaptureSession, HttpBackend, WebcamProvider, WsOpener};
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = get_configuration().context("failed to load configuration")?;
    setup_logging(&config);

    let backend = HttpBackend::new(&config.backend_host, config.backend_port, &config.api_token)
        .context("Failed to build backend client")?;

    // Block until the backend is reachable; the roster is required input.
    let roster = wait_for_resource_async(
        || backend.course_roster(&config.course_id),
        1000,
        "Student roster",
    )
    .await;
    tracing::info!(course_id = %config.course_id, students = roster.len(), "roster loaded");

    let camera = WebcamProvider::new(config.device_id);
    let opener = WsOpener::new(
        format!("ws://{}:{}", config.backend_host, config.backend_port),
        Duration::from_millis(config.channel_open_timeout_ms),
    );

    let selected_date = (!config.session_date.is_empty()).then(|| config.session_date.clone());
    let mut session = CaptureSession::new(
        config.course_id.clone(),
        roster,
        selected_date,
        (config.frame_width, config.frame_height),
        camera,
        opener,
        backend,
    );

    session.refresh_ordinal().await;
    tracing::info!(ordinal = session.ordinal(), "session ordinal loaded");

    if let Err(e) = session.start().await {
        tracing::error!(error = %e, "failed to start capture session");
        anyhow::bail!("Capture session start failed: {e}");
    }

    let mut interval = tokio::time::interval(Duration::from_millis(config.frame_interval_ms));
    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Err(e) = session.tick().await {
                    tracing::error!(error = %e, "stream error - session stopped");
                    break;
                }
                if !session.active() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown signal received");
                break;
            }
        }
    }

    session.stop().await;
    tracing::info!("capture session shut down gracefully");
    Ok(())
}
