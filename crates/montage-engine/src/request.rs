//! Montage requests and their structured-argument parsing.

use std::fmt;
use std::path::{Path, PathBuf};

use montage_common::error::{MontageError, MontageResult};
use serde::Deserialize;

/// Everything needed for one montage run.
#[derive(Clone)]
pub struct MontageRequest {
    /// Source video, absolute or relative to the configured source directory.
    pub source_path: PathBuf,

    /// One entry per clip, in montage order.
    pub timestamps: Vec<f64>,

    /// Opaque user descriptor, forwarded to the notification unchanged.
    pub user: serde_json::Value,

    /// Bearer token for the notification call.
    pub auth_token: String,
}

impl fmt::Debug for MontageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MontageRequest")
            .field("source_path", &self.source_path)
            .field("timestamps", &self.timestamps)
            .field("user", &self.user)
            .field("auth_token", &"<redacted>")
            .finish()
    }
}

impl MontageRequest {
    pub fn new(
        source_path: impl Into<PathBuf>,
        timestamps: Vec<f64>,
        user: serde_json::Value,
        auth_token: impl Into<String>,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            timestamps,
            user,
            auth_token: auth_token.into(),
        }
    }

    /// Build a request from the four positional command-line arguments.
    pub fn from_args(
        source_path: &str,
        actions_json: &str,
        user_json: &str,
        auth_token: &str,
    ) -> MontageResult<Self> {
        Ok(Self::new(
            source_path,
            parse_actions(actions_json)?,
            parse_user(user_json)?,
            auth_token,
        ))
    }

    /// Check the run can start: at least one timestamp and a source on disk.
    pub fn validate(&self, resolved_source: &Path) -> MontageResult<()> {
        if self.timestamps.is_empty() {
            return Err(MontageError::precondition("No timestamps provided"));
        }
        if !resolved_source.is_file() {
            return Err(MontageError::FileNotFound {
                path: resolved_source.to_path_buf(),
            });
        }
        Ok(())
    }
}

/// An action list entry: a bare number or an object with a `timestamp`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ActionEntry {
    Seconds(f64),
    Action { timestamp: f64 },
}

impl ActionEntry {
    fn timestamp(&self) -> f64 {
        match self {
            Self::Seconds(ts) | Self::Action { timestamp: ts } => *ts,
        }
    }
}

/// Parse `[10.5, 30.2]` or `[{"timestamp": 10.5, ...}, ...]` into seconds.
pub fn parse_actions(json: &str) -> MontageResult<Vec<f64>> {
    let entries: Vec<ActionEntry> = serde_json::from_str(json).map_err(|e| {
        MontageError::precondition(format!(
            "Invalid timestamp list, expected a JSON array of numbers or actions: {e}"
        ))
    })?;

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let ts = entry.timestamp();
            if ts.is_finite() && ts >= 0.0 {
                Ok(ts)
            } else {
                Err(MontageError::precondition(format!(
                    "Timestamp {} must be a non-negative number, got {ts}",
                    i + 1
                )))
            }
        })
        .collect()
}

/// Parse the user descriptor. Any JSON value is accepted as-is.
pub fn parse_user(json: &str) -> MontageResult<serde_json::Value> {
    serde_json::from_str(json)
        .map_err(|e| MontageError::precondition(format!("Invalid user descriptor: {e}")))
}
