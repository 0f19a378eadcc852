//! End-to-end montage run.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use montage_common::config::MontageConfig;
use montage_common::error::MontageResult;
use tokio::task::JoinHandle;

use crate::cleanup::{sweep_scratch_dir, CleanupReport, ScratchGuard};
use crate::concat::{concatenate, MontageArtifact};
use crate::encoder::{EncoderBackend, FfmpegEncoder};
use crate::extract::extract_clips;
use crate::notify::{spawn_notification, HttpNotifier, NotificationPayload, Notifier};
use crate::request::MontageRequest;
use crate::staging::prepare_directories;
use crate::watermark::apply_watermark;

/// Result of a successful run.
#[derive(Debug)]
pub struct MontageOutcome {
    /// The concatenated montage.
    pub artifact: MontageArtifact,

    /// Watermarked copy, when the on-complete overlay ran and succeeded.
    pub watermarked: Option<PathBuf>,

    /// What the scratch sweep did.
    pub cleanup: CleanupReport,

    /// Detached completion notification. Its result never affects the run.
    pub notification: JoinHandle<()>,
}

/// Runs one montage request at a time against one scratch directory.
pub struct MontagePipeline<E, N> {
    config: MontageConfig,
    encoder: E,
    notifier: Arc<N>,
}

impl MontagePipeline<FfmpegEncoder, HttpNotifier> {
    /// ffmpeg encoder and HTTP notifier, both configured from `config`.
    pub fn from_config(config: MontageConfig) -> MontageResult<Self> {
        let encoder = FfmpegEncoder::new(config.ffmpeg_binary.clone());
        let notifier = HttpNotifier::from_config(&config)?;
        Self::new(config, encoder, notifier)
    }
}

impl<E: EncoderBackend, N: Notifier> MontagePipeline<E, N> {
    pub fn new(config: MontageConfig, encoder: E, notifier: N) -> MontageResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            encoder,
            notifier: Arc::new(notifier),
        })
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Extract, concatenate, notify, clean up, then optionally watermark.
    ///
    /// Precondition failures return before any directory is touched. Once
    /// staging has happened the scratch directory is swept on every path out
    /// of this function.
    pub async fn run(&self, request: MontageRequest) -> MontageResult<MontageOutcome> {
        let result = self.run_inner(request).await;
        if let Err(err) = &result {
            tracing::error!(kind = err.kind().as_str(), error = %err, "Montage run failed");
        }
        result
    }

    async fn run_inner(&self, request: MontageRequest) -> MontageResult<MontageOutcome> {
        let source = self.config.resolve_source(&request.source_path);
        tracing::info!(
            source = %source.display(),
            timestamps = ?request.timestamps,
            "Starting video montage creation"
        );

        request.validate(&source)?;
        let staged = prepare_directories(&self.config.clips_dir, &self.config.output_dir)?;

        // Dropping the guard on an early return sweeps the scratch directory.
        let scratch = ScratchGuard::new(staged.clips_dir);

        let clips = extract_clips(
            &self.encoder,
            &source,
            &request.timestamps,
            &self.config.clip,
            scratch.dir(),
        )
        .await?;

        let artifact = concatenate(
            &self.encoder,
            &clips,
            scratch.dir(),
            &staged.output_dir,
            &self.config.clip.extension,
        )
        .await?;

        let notification = spawn_notification(
            Arc::clone(&self.notifier),
            NotificationPayload {
                filename: artifact.filename.clone(),
                user: request.user,
            },
            request.auth_token,
        );

        // The notification names the plain montage, so it goes out before the
        // optional overlay and is never held up by it.
        let cleanup = scratch.finish();
        let watermarked = self.watermark_on_complete(&artifact.path).await;

        Ok(MontageOutcome {
            artifact,
            watermarked,
            cleanup,
            notification,
        })
    }

    async fn watermark_on_complete(&self, montage: &Path) -> Option<PathBuf> {
        if !self.config.watermark.on_complete {
            return None;
        }
        match self.watermark(montage).await {
            Ok(path) => Some(path),
            Err(err) => {
                tracing::warn!(error = %err, "Watermark skipped; montage kept without it");
                None
            }
        }
    }

    /// Overlay the configured watermark image on an existing video.
    pub async fn watermark(&self, video: &Path) -> MontageResult<PathBuf> {
        apply_watermark(&self.encoder, video, &self.config.watermark.image).await
    }

    /// Sweep the configured scratch directory.
    pub fn cleanup(&self) -> CleanupReport {
        sweep_scratch_dir(&self.config.clips_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use montage_common::error::MontageError;

    #[test]
    fn test_from_config_rejects_missing_paths() {
        let err = MontagePipeline::from_config(MontageConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, MontageError::Config { .. }));
    }

    #[test]
    fn test_from_config_accepts_complete_config() {
        let config = MontageConfig {
            clips_dir: PathBuf::from("/tmp/montage/clips"),
            output_dir: PathBuf::from("/tmp/montage/complete"),
            notify_base_url: "http://localhost:8080".to_string(),
            ..MontageConfig::default()
        };
        let pipeline = MontagePipeline::from_config(config).unwrap();
        assert_eq!(pipeline.encoder().name(), "ffmpeg");
    }
}
