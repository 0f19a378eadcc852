//! Service configuration.
//!
//! Values come from an optional JSON file, then environment variables
//! (a `.env` file is honoured through `dotenvy`). The merged result is
//! validated once at startup, before any filesystem or encoder work.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MontageError, MontageResult};

pub const ENV_SOURCE_DIR: &str = "PATH_VIDEOS_SOURCE";
pub const ENV_CLIPS_DIR: &str = "PATH_VIDEOS_MONTAGE_CLIPS";
pub const ENV_OUTPUT_DIR: &str = "PATH_VIDEOS_MONTAGE_COMPLETE";
pub const ENV_NOTIFY_BASE_URL: &str = "URL_KV_API";
pub const ENV_CLIP_DURATION: &str = "MONTAGE_CLIP_DURATION_SECS";
pub const ENV_CLIP_LEAD_IN: &str = "MONTAGE_CLIP_LEAD_IN_SECS";
pub const ENV_WATERMARK_IMAGE: &str = "MONTAGE_WATERMARK_IMAGE";
pub const ENV_WATERMARK_ON_COMPLETE: &str = "MONTAGE_WATERMARK_ON_COMPLETE";
pub const ENV_NOTIFY_TIMEOUT: &str = "MONTAGE_NOTIFY_TIMEOUT_SECS";
pub const ENV_FFMPEG_BIN: &str = "MONTAGE_FFMPEG_BIN";
pub const ENV_LOG_LEVEL: &str = "MONTAGE_LOG_LEVEL";
pub const ENV_LOG_JSON: &str = "MONTAGE_LOG_JSON";

/// Global service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MontageConfig {
    /// Base directory that relative source video paths are resolved against.
    pub source_dir: Option<PathBuf>,

    /// Scratch directory for extracted clips and the concat manifest.
    pub clips_dir: PathBuf,

    /// Directory receiving finished montages.
    pub output_dir: PathBuf,

    /// Base URL of the notification service.
    pub notify_base_url: String,

    /// Upper bound on the completion notification round trip.
    pub notify_timeout_secs: u64,

    /// Encoder executable name or path.
    pub ffmpeg_binary: String,

    /// Clip window parameters.
    pub clip: ClipSettings,

    /// Watermark stage parameters.
    pub watermark: WatermarkSettings,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Parameters of the per-timestamp clip window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipSettings {
    /// Length of every extracted clip in seconds.
    pub duration_secs: f64,

    /// How far before the requested timestamp a clip starts.
    pub lead_in_secs: f64,

    /// Container extension for clips and the final montage.
    pub extension: String,
}

/// Watermark overlay parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkSettings {
    /// Image composited onto the montage. A relative path is taken from the
    /// process cwd, or from the config file's directory when one is loaded.
    pub image: PathBuf,

    /// Run the overlay automatically after a successful montage.
    pub on_complete: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "montage_engine=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for MontageConfig {
    fn default() -> Self {
        Self {
            source_dir: None,
            clips_dir: PathBuf::new(),
            output_dir: PathBuf::new(),
            notify_base_url: String::new(),
            notify_timeout_secs: 5,
            ffmpeg_binary: "ffmpeg".to_string(),
            clip: ClipSettings::default(),
            watermark: WatermarkSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ClipSettings {
    fn default() -> Self {
        Self {
            duration_secs: 3.0,
            lead_in_secs: 1.5,
            extension: "mp4".to_string(),
        }
    }
}

impl Default for WatermarkSettings {
    fn default() -> Self {
        Self {
            image: PathBuf::from("images").join("watermark.png"),
            on_complete: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl MontageConfig {
    /// Load configuration from the process environment (and `.env`).
    pub fn from_env() -> MontageResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load a JSON config file, then apply environment overrides.
    ///
    /// A relative watermark image from the file (or the default one) is
    /// anchored next to the config file. Environment overrides are not.
    pub fn load(path: &Path) -> MontageResult<Self> {
        dotenvy::dotenv().ok();
        let content = std::fs::read_to_string(path).map_err(|e| {
            MontageError::config(format!("Failed to read config at {}: {e}", path.display()))
        })?;
        let mut config: Self = serde_json::from_str(&content).map_err(|e| {
            MontageError::config(format!("Failed to parse config at {}: {e}", path.display()))
        })?;
        config.anchor_to(path.parent().unwrap_or(Path::new("")));
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn anchor_to(&mut self, base: &Path) {
        if self.watermark.image.is_relative() {
            self.watermark.image = base.join(&self.watermark.image);
        }
    }

    /// Build a config from defaults plus whatever `lookup` yields.
    pub fn from_lookup<F>(lookup: F) -> MontageResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    /// Overwrite fields for every variable `lookup` resolves to a non-empty value.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> MontageResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_SOURCE_DIR) {
            self.source_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = get(ENV_CLIPS_DIR) {
            self.clips_dir = PathBuf::from(v);
        }
        if let Some(v) = get(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(v);
        }
        if let Some(v) = get(ENV_NOTIFY_BASE_URL) {
            self.notify_base_url = v;
        }
        if let Some(v) = get(ENV_CLIP_DURATION) {
            self.clip.duration_secs = parse_var(ENV_CLIP_DURATION, &v)?;
        }
        if let Some(v) = get(ENV_CLIP_LEAD_IN) {
            self.clip.lead_in_secs = parse_var(ENV_CLIP_LEAD_IN, &v)?;
        }
        if let Some(v) = get(ENV_WATERMARK_IMAGE) {
            self.watermark.image = PathBuf::from(v);
        }
        if let Some(v) = get(ENV_WATERMARK_ON_COMPLETE) {
            self.watermark.on_complete = parse_var(ENV_WATERMARK_ON_COMPLETE, &v)?;
        }
        if let Some(v) = get(ENV_NOTIFY_TIMEOUT) {
            self.notify_timeout_secs = parse_var(ENV_NOTIFY_TIMEOUT, &v)?;
        }
        if let Some(v) = get(ENV_FFMPEG_BIN) {
            self.ffmpeg_binary = v;
        }
        if let Some(v) = get(ENV_LOG_LEVEL) {
            self.logging.level = v;
        }
        if let Some(v) = get(ENV_LOG_JSON) {
            self.logging.json = parse_var(ENV_LOG_JSON, &v)?;
        }
        Ok(())
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> MontageResult<()> {
        if self.clips_dir.as_os_str().is_empty() {
            return Err(MontageError::config(format!(
                "Missing scratch clips directory ({ENV_CLIPS_DIR})"
            )));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(MontageError::config(format!(
                "Missing montage output directory ({ENV_OUTPUT_DIR})"
            )));
        }
        if self.notify_base_url.trim().is_empty() {
            return Err(MontageError::config(format!(
                "Missing notification base URL ({ENV_NOTIFY_BASE_URL})"
            )));
        }
        if !(self.clip.duration_secs.is_finite() && self.clip.duration_secs > 0.0) {
            return Err(MontageError::config(format!(
                "Clip duration must be positive, got {}",
                self.clip.duration_secs
            )));
        }
        if !(self.clip.lead_in_secs.is_finite() && self.clip.lead_in_secs >= 0.0) {
            return Err(MontageError::config(format!(
                "Clip lead-in must be non-negative, got {}",
                self.clip.lead_in_secs
            )));
        }
        if self.clip.extension.is_empty() {
            return Err(MontageError::config("Clip extension must not be empty"));
        }
        Ok(())
    }

    /// Resolve a caller-supplied source path against `source_dir`.
    pub fn resolve_source(&self, path: &Path) -> PathBuf {
        match &self.source_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

fn parse_var<T>(key: &str, value: &str) -> MontageResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| MontageError::config(format!("Invalid value for {key}: {value:?} ({e})")))
}
