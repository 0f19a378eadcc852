//! Sequential clip extraction.

use std::path::{Path, PathBuf};

use montage_common::config::ClipSettings;
use montage_common::error::{MontageError, MontageResult};

use crate::clip::plan_clips;
use crate::encoder::EncoderBackend;

/// Extract one clip per timestamp, strictly one after another.
///
/// Returns the produced clip paths in timestamp order. The first failure
/// aborts the remaining extractions and is reported as an
/// [`MontageError::Extraction`] carrying the 1-based clip index.
pub async fn extract_clips<E: EncoderBackend>(
    encoder: &E,
    source: &Path,
    timestamps: &[f64],
    settings: &ClipSettings,
    scratch_dir: &Path,
) -> MontageResult<Vec<PathBuf>> {
    if timestamps.is_empty() {
        return Err(MontageError::precondition("No timestamps provided"));
    }

    let mut clip_paths = Vec::with_capacity(timestamps.len());
    for clip in plan_clips(timestamps, settings, scratch_dir) {
        tracing::info!(
            clip = clip.index,
            start_secs = clip.start_secs,
            duration_secs = clip.duration_secs,
            output = %clip.output_path.display(),
            "Creating clip"
        );

        encoder
            .extract_clip(source, &clip)
            .await
            .map_err(|e| MontageError::extraction(clip.index, e.to_string()))?;

        tracing::info!(clip = clip.index, output = %clip.output_path.display(), "Clip created");
        clip_paths.push(clip.output_path);
    }

    Ok(clip_paths)
}
