//! Clip window planning.

use std::path::{Path, PathBuf};

use montage_common::config::ClipSettings;

/// One clip to cut from the source video.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipSpec {
    /// 1-based position in the montage.
    pub index: usize,

    /// Timestamp the clip was requested around (seconds).
    pub timestamp_secs: f64,

    /// Window start, never before the beginning of the file.
    pub start_secs: f64,

    /// Window length (seconds). Not clamped against the source length.
    pub duration_secs: f64,

    /// `{index}.{ext}` inside the scratch directory.
    pub output_path: PathBuf,
}

impl ClipSpec {
    /// Window and output path for the clip at `index` (1-based).
    pub fn new(index: usize, timestamp_secs: f64, settings: &ClipSettings, scratch_dir: &Path) -> Self {
        Self {
            index,
            timestamp_secs,
            start_secs: clip_start(timestamp_secs, settings.lead_in_secs),
            duration_secs: settings.duration_secs,
            output_path: clip_path(scratch_dir, index, &settings.extension),
        }
    }
}

/// Start of the window around `timestamp_secs`, clamped at zero.
pub fn clip_start(timestamp_secs: f64, lead_in_secs: f64) -> f64 {
    (timestamp_secs - lead_in_secs).max(0.0)
}

/// Deterministic clip location, so a rerun overwrites clips of the same index.
pub fn clip_path(scratch_dir: &Path, index: usize, extension: &str) -> PathBuf {
    scratch_dir.join(format!("{index}.{extension}"))
}

/// Specs for every timestamp, in input order.
pub fn plan_clips(timestamps: &[f64], settings: &ClipSettings, scratch_dir: &Path) -> Vec<ClipSpec> {
    timestamps
        .iter()
        .enumerate()
        .map(|(i, &ts)| ClipSpec::new(i + 1, ts, settings, scratch_dir))
        .collect()
}
