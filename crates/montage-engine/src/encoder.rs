//! External encoder invocation.

use std::ffi::OsString;
use std::future::Future;
use std::path::Path;
use std::process::Stdio;

use montage_common::error::{MontageError, MontageResult};
use tokio::process::Command;

use crate::clip::ClipSpec;

/// Filter graph placing the watermark 10px in from the bottom-left corner.
pub const OVERLAY_FILTER: &str = "[0:v][1:v] overlay=10:main_h-overlay_h-10";

/// Number of stderr lines kept in an encoder failure message.
const STDERR_TAIL_LINES: usize = 20;

/// Trait for encoder backends. Every call blocks (asynchronously) until the
/// underlying process exits.
pub trait EncoderBackend: Send + Sync {
    /// Cut `clip` out of `source` into `clip.output_path`.
    fn extract_clip(
        &self,
        source: &Path,
        clip: &ClipSpec,
    ) -> impl Future<Output = MontageResult<()>> + Send;

    /// Join the files listed in `manifest` into `output` without re-encoding.
    fn concat(&self, manifest: &Path, output: &Path)
        -> impl Future<Output = MontageResult<()>> + Send;

    /// Composite `image` onto `video`, writing `output`.
    fn overlay(
        &self,
        video: &Path,
        image: &Path,
        output: &Path,
    ) -> impl Future<Output = MontageResult<()>> + Send;

    /// Check if this backend is available on the system.
    fn is_available(&self) -> bool;

    /// Backend name.
    fn name(&self) -> &str;
}

/// Encoder backed by the `ffmpeg` executable.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    binary: String,
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl FfmpegEncoder {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    async fn run(&self, args: Vec<OsString>) -> MontageResult<()> {
        tracing::debug!(binary = %self.binary, args = ?args, "Running ffmpeg");
        let mut cmd = Command::new(&self.binary);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let start = std::time::Instant::now();
        let child = cmd
            .spawn()
            .map_err(|e| MontageError::encoder(format!("Failed to start {}: {e}", self.binary)))?;
        tracing::debug!(pid = child.id(), "ffmpeg process started");

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| MontageError::encoder(format!("Failed to wait on ffmpeg: {e}")))?;

        if !output.status.success() {
            return Err(MontageError::encoder(format!(
                "ffmpeg failed (status {}): {}",
                output.status,
                stderr_tail(&output.stderr, STDERR_TAIL_LINES)
            )));
        }

        tracing::debug!(
            elapsed_secs = start.elapsed().as_secs_f64(),
            "ffmpeg process finished"
        );
        Ok(())
    }
}

impl EncoderBackend for FfmpegEncoder {
    async fn extract_clip(&self, source: &Path, clip: &ClipSpec) -> MontageResult<()> {
        self.run(clip_args(source, clip)).await
    }

    async fn concat(&self, manifest: &Path, output: &Path) -> MontageResult<()> {
        self.run(concat_args(manifest, output)).await
    }

    async fn overlay(&self, video: &Path, image: &Path, output: &Path) -> MontageResult<()> {
        self.run(overlay_args(video, image, output)).await
    }

    fn is_available(&self) -> bool {
        command_exists(&self.binary)
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}

/// `-ss` before `-i` seeks the input; `-t` bounds the output length.
pub fn clip_args(source: &Path, clip: &ClipSpec) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-ss".into(),
        format_secs(clip.start_secs).into(),
        "-i".into(),
        source.into(),
        "-t".into(),
        format_secs(clip.duration_secs).into(),
        clip.output_path.as_os_str().to_owned(),
    ]
}

pub fn concat_args(manifest: &Path, output: &Path) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-f".into(),
        "concat".into(),
        "-safe".into(),
        "0".into(),
        "-i".into(),
        manifest.into(),
        "-c".into(),
        "copy".into(),
        output.into(),
    ]
}

pub fn overlay_args(video: &Path, image: &Path, output: &Path) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-i".into(),
        video.into(),
        "-i".into(),
        image.into(),
        "-filter_complex".into(),
        OVERLAY_FILTER.into(),
        output.into(),
    ]
}

pub fn format_secs(secs: f64) -> String {
    format!("{secs:.3}")
}

fn stderr_tail(stderr: &[u8], max_lines: usize) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.trim().lines().collect();
    let skip = lines.len().saturating_sub(max_lines);
    lines[skip..].join("\n")
}

fn command_exists(binary: &str) -> bool {
    if binary.contains(std::path::MAIN_SEPARATOR) {
        return Path::new(binary).is_file();
    }
    std::process::Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
