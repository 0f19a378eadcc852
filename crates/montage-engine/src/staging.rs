//! Directory staging for a run.

use std::path::{Path, PathBuf};

use montage_common::error::{MontageError, MontageResult};

/// Scratch and output directories of a run, both absolute.
///
/// The concat demuxer resolves relative manifest entries against the
/// manifest's own directory, so everything written into the manifest has to
/// be anchored to the filesystem root rather than the process cwd.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedDirs {
    pub clips_dir: PathBuf,
    pub output_dir: PathBuf,
}

/// Create the scratch and output directories (with parents) if absent.
///
/// An empty path is a misconfiguration, not something to recover from.
pub fn prepare_directories(clips_dir: &Path, output_dir: &Path) -> MontageResult<StagedDirs> {
    Ok(StagedDirs {
        clips_dir: ensure_directory(clips_dir, "scratch clips")?,
        output_dir: ensure_directory(output_dir, "montage output")?,
    })
}

fn ensure_directory(dir: &Path, label: &str) -> MontageResult<PathBuf> {
    if dir.as_os_str().is_empty() {
        return Err(MontageError::config(format!("{label} directory is not configured")));
    }
    if !dir.is_dir() {
        std::fs::create_dir_all(dir)?;
        tracing::info!(dir = %dir.display(), "Created {label} directory");
    }
    Ok(std::path::absolute(dir)?)
}
