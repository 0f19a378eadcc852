//! Montage Engine
//!
//! Cuts short clips out of a source video around requested timestamps,
//! stitches them into one montage, and hands the result off.
//!
//! # Pipeline Architecture
//!
//! ```text
//! source.mp4 ──┐
//!              ├── Stage directories (clips/, complete/)
//! timestamps ──┘         │
//!                        ├── Extract clip 1..N  (ffmpeg -ss/-t, sequential)
//!                        │         │
//!                        │         ▼
//!                        │   clips/{1..N}.mp4 + clips/file_list.txt
//!                        │         │
//!                        ├── Concat demuxer, stream copy
//!                        │         │
//!                        │         ▼
//!                        │   complete/montage_<millis>.mp4 ──► notify (detached)
//!                        │
//!                        └── Sweep clips/ (every exit path)
//!
//! montage_<millis>.mp4 ── Watermark overlay ──► montage_<millis>_watermarked.mp4
//! ```

pub mod cleanup;
pub mod clip;
pub mod concat;
pub mod encoder;
pub mod extract;
pub mod notify;
pub mod pipeline;
pub mod request;
pub mod staging;
pub mod watermark;

pub use cleanup::{sweep_scratch_dir, CleanupReport, ScratchGuard};
pub use clip::ClipSpec;
pub use concat::{ClipManifest, MontageArtifact};
pub use encoder::{EncoderBackend, FfmpegEncoder};
pub use notify::{HttpNotifier, NotificationPayload, Notifier};
pub use pipeline::{MontageOutcome, MontagePipeline};
pub use request::MontageRequest;
