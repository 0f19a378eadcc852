//! Build a montage end to end.

use std::time::Duration;

use montage_common::config::MontageConfig;
use montage_engine::notify::await_notification;
use montage_engine::{MontagePipeline, MontageRequest};

/// Extra time past the HTTP timeout before giving up on the notification task.
const NOTIFY_GRACE: Duration = Duration::from_secs(1);

pub async fn run(
    config: MontageConfig,
    video: String,
    actions: String,
    user: String,
    token: String,
) -> anyhow::Result<()> {
    let request = MontageRequest::from_args(&video, &actions, &user, &token)?;
    tracing::debug!(?request, "Parsed montage request");
    let notify_limit = Duration::from_secs(config.notify_timeout_secs) + NOTIFY_GRACE;
    let pipeline = MontagePipeline::from_config(config)?;

    println!("Creating montage from: {}", video);
    println!("  Clips: {}", request.timestamps.len());

    let outcome = pipeline.run(request).await?;

    println!("Montage created: {}", outcome.artifact.path.display());
    if let Some(path) = &outcome.watermarked {
        println!("Watermarked copy: {}", path.display());
    }
    if !outcome.cleanup.is_clean() {
        println!(
            "  Warning: {} scratch file(s) could not be deleted",
            outcome.cleanup.failed.len()
        );
    }

    await_notification(outcome.notification, notify_limit).await;
    Ok(())
}
