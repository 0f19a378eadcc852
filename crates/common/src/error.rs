//! Error types shared across montage crates.

use std::path::PathBuf;

/// Top-level error type for montage operations.
#[derive(Debug, thiserror::Error)]
pub enum MontageError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Precondition failed: {message}")]
    Precondition { message: String },

    #[error("Clip {index} extraction failed: {message}")]
    Extraction { index: usize, message: String },

    #[error("Concatenation error: {message}")]
    Concatenation { message: String },

    #[error("Watermark error: {message}")]
    Watermark { message: String },

    #[error("Notification error: {message}")]
    Notification { message: String },

    #[error("Encoder error: {message}")]
    Encoder { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using MontageError.
pub type MontageResult<T> = Result<T, MontageError>;

/// Coarse classification used as a structured log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Precondition,
    Extraction,
    Concatenation,
    Watermark,
    Notification,
    Encoder,
    Io,
    Other,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Precondition => "precondition",
            Self::Extraction => "extraction",
            Self::Concatenation => "concatenation",
            Self::Watermark => "watermark",
            Self::Notification => "notification",
            Self::Encoder => "encoder",
            Self::Io => "io",
            Self::Other => "other",
        }
    }
}

impl MontageError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition {
            message: msg.into(),
        }
    }

    pub fn extraction(index: usize, msg: impl Into<String>) -> Self {
        Self::Extraction {
            index,
            message: msg.into(),
        }
    }

    pub fn concatenation(msg: impl Into<String>) -> Self {
        Self::Concatenation {
            message: msg.into(),
        }
    }

    pub fn watermark(msg: impl Into<String>) -> Self {
        Self::Watermark {
            message: msg.into(),
        }
    }

    pub fn notification(msg: impl Into<String>) -> Self {
        Self::Notification {
            message: msg.into(),
        }
    }

    pub fn encoder(msg: impl Into<String>) -> Self {
        Self::Encoder {
            message: msg.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config { .. } => ErrorKind::Config,
            Self::Precondition { .. } | Self::FileNotFound { .. } => ErrorKind::Precondition,
            Self::Extraction { .. } => ErrorKind::Extraction,
            Self::Concatenation { .. } => ErrorKind::Concatenation,
            Self::Watermark { .. } => ErrorKind::Watermark,
            Self::Notification { .. } => ErrorKind::Notification,
            Self::Encoder { .. } => ErrorKind::Encoder,
            Self::Io(_) => ErrorKind::Io,
            Self::Json(_) | Self::Other(_) => ErrorKind::Other,
        }
    }

    /// Whether this error ends a pipeline run. Notification failures are
    /// logged and discarded.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Notification { .. })
    }
}
