//! Manifest-driven concatenation of extracted clips.

use std::path::{Path, PathBuf};

use chrono::Utc;
use montage_common::error::{MontageError, MontageResult};

use crate::encoder::EncoderBackend;

/// File name of the concat demuxer input inside the scratch directory.
pub const MANIFEST_FILE_NAME: &str = "file_list.txt";

/// Ordered clip list in the concat demuxer's `file '<path>'` format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipManifest {
    entries: Vec<PathBuf>,
}

impl ClipManifest {
    pub fn new(entries: Vec<PathBuf>) -> MontageResult<Self> {
        if entries.is_empty() {
            return Err(MontageError::precondition("Cannot build a manifest from zero clips"));
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    /// One line per clip, newline separated, no trailing newline.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|path| manifest_line(path))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Write the manifest into `scratch_dir`, returning its path.
    pub fn write_to(&self, scratch_dir: &Path) -> MontageResult<PathBuf> {
        let path = scratch_dir.join(MANIFEST_FILE_NAME);
        std::fs::write(&path, self.render())?;
        Ok(path)
    }
}

/// `file '<path>'`, with embedded single quotes escaped the way the concat
/// demuxer expects (`'\''`).
pub fn manifest_line(path: &Path) -> String {
    let raw = path.to_string_lossy();
    format!("file '{}'", raw.replace('\'', r"'\''"))
}

/// A finished montage file.
#[derive(Debug, Clone, PartialEq)]
pub struct MontageArtifact {
    /// Full path in the output directory.
    pub path: PathBuf,

    /// File name only, as reported to the notification service.
    pub filename: String,
}

impl MontageArtifact {
    /// Pick a `montage_<millis>.<ext>` name that does not exist yet.
    ///
    /// The millisecond token is bumped past any existing file so two runs in
    /// the same millisecond never share an output.
    pub fn allocate(output_dir: &Path, extension: &str) -> Self {
        let mut token = Utc::now().timestamp_millis();
        loop {
            let filename = format!("montage_{token}.{extension}");
            let path = output_dir.join(&filename);
            if !path.exists() {
                return Self { path, filename };
            }
            token += 1;
        }
    }
}

/// Write the manifest and merge the clips into one artifact.
///
/// A failed merge leaves any partially written output in place.
pub async fn concatenate<E: EncoderBackend>(
    encoder: &E,
    clip_paths: &[PathBuf],
    scratch_dir: &Path,
    output_dir: &Path,
    extension: &str,
) -> MontageResult<MontageArtifact> {
    let manifest = ClipManifest::new(clip_paths.to_vec())?;
    let manifest_path = manifest.write_to(scratch_dir)?;
    tracing::debug!(
        manifest = %manifest_path.display(),
        content = %manifest.render(),
        "Wrote concat manifest"
    );

    let artifact = MontageArtifact::allocate(output_dir, extension);
    tracing::info!(
        clips = manifest.entries().len(),
        output = %artifact.path.display(),
        "Merging clips"
    );

    encoder
        .concat(&manifest_path, &artifact.path)
        .await
        .map_err(|e| MontageError::concatenation(e.to_string()))?;

    tracing::info!(output = %artifact.path.display(), "Montage created");
    Ok(artifact)
}
