//! Montage Common Utilities
//!
//! Shared infrastructure for the montage crates:
//! - Error taxonomy and result aliases
//! - Configuration loading and validation
//! - Tracing/logging initialization

pub mod config;
pub mod error;
pub mod logging;

pub use config::*;
pub use error::*;
