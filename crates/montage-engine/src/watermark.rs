//! Watermark overlay over a finished montage.

use std::path::{Path, PathBuf};

use montage_common::error::{MontageError, MontageResult};

use crate::encoder::EncoderBackend;

pub const WATERMARK_SUFFIX: &str = "_watermarked";

/// `dir/name.ext` becomes `dir/name_watermarked.ext`.
pub fn watermarked_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{stem}{WATERMARK_SUFFIX}.{}", ext.to_string_lossy()),
        None => format!("{stem}{WATERMARK_SUFFIX}"),
    };
    input.with_file_name(name)
}

/// Overlay `image` on `video`, producing a new file next to it.
///
/// The input video is never modified.
pub async fn apply_watermark<E: EncoderBackend>(
    encoder: &E,
    video: &Path,
    image: &Path,
) -> MontageResult<PathBuf> {
    if !video.is_file() {
        return Err(MontageError::watermark(format!(
            "Input video not found: {}",
            video.display()
        )));
    }
    if !image.is_file() {
        return Err(MontageError::watermark(format!(
            "Watermark image not found: {}",
            image.display()
        )));
    }

    let output = watermarked_path(video);
    tracing::info!(
        input = %video.display(),
        image = %image.display(),
        output = %output.display(),
        "Adding watermark"
    );

    encoder
        .overlay(video, image, &output)
        .await
        .map_err(|e| MontageError::watermark(e.to_string()))?;

    tracing::info!(output = %output.display(), "Watermarked video created");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_goes_before_extension() {
        assert_eq!(
            watermarked_path(Path::new("/out/montage_1700000000000.mp4")),
            PathBuf::from("/out/montage_1700000000000_watermarked.mp4")
        );
    }

    #[test]
    fn test_suffix_without_extension() {
        assert_eq!(
            watermarked_path(Path::new("/out/montage")),
            PathBuf::from("/out/montage_watermarked")
        );
    }

    #[test]
    fn test_derived_path_never_equals_input() {
        for input in ["a.mp4", "/x/y.mkv", "noext", "/x/.hidden"] {
            assert_ne!(watermarked_path(Path::new(input)), PathBuf::from(input));
        }
    }
}
