//! Scratch directory sweeping.
//!
//! The sweep removes every file in the scratch directory, not only the ones
//! created by the current run, so two runs must never share a scratch path.

use std::path::{Path, PathBuf};

/// What a sweep removed and what it could not.
#[derive(Debug, Default, Clone)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Delete every file in `dir`. Individual failures are logged and skipped.
pub fn sweep_scratch_dir(dir: &Path) -> CleanupReport {
    let mut report = CleanupReport::default();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::error!(dir = %dir.display(), error = %err, "Failed to read scratch directory");
            report.failed.push((dir.to_path_buf(), err.to_string()));
            return report;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(dir = %dir.display(), error = %err, "Failed to read scratch entry");
                report.failed.push((dir.to_path_buf(), err.to_string()));
                continue;
            }
        };
        let path = entry.path();

        if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            tracing::warn!(path = %path.display(), "Skipping directory in scratch area");
            continue;
        }

        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Deleted");
                report.removed.push(path);
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Failed to delete scratch file");
                report.failed.push((path, err.to_string()));
            }
        }
    }

    tracing::info!(
        removed = report.removed.len(),
        failed = report.failed.len(),
        "Scratch clips cleaned up"
    );
    report
}

/// Sweeps the scratch directory when dropped unless [`ScratchGuard::finish`]
/// already did.
#[derive(Debug)]
pub struct ScratchGuard {
    dir: PathBuf,
    armed: bool,
}

impl ScratchGuard {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            armed: true,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Sweep now and return the report.
    pub fn finish(mut self) -> CleanupReport {
        self.armed = false;
        sweep_scratch_dir(&self.dir)
    }
}

impl Drop for ScratchGuard {
    fn drop(&mut self) {
        if self.armed {
            sweep_scratch_dir(&self.dir);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populate(dir: &Path, names: &[&str]) {
        for name in names {
            std::fs::write(dir.join(name), b"clip").unwrap();
        }
    }

    fn file_count(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .unwrap()
            .filter(|e| e.as_ref().unwrap().file_type().unwrap().is_file())
            .count()
    }

    #[test]
    fn test_sweep_removes_every_file() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path(), &["1.mp4", "2.mp4", "file_list.txt", "stale.mp4"]);

        let report = sweep_scratch_dir(dir.path());
        assert!(report.is_clean());
        assert_eq!(report.removed.len(), 4);
        assert_eq!(file_count(dir.path()), 0);
    }

    #[test]
    fn test_sweep_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path(), &["1.mp4"]);
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let report = sweep_scratch_dir(dir.path());
        assert_eq!(report.removed.len(), 1);
        assert!(dir.path().join("nested").is_dir());
    }

    #[test]
    fn test_missing_directory_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let report = sweep_scratch_dir(&dir.path().join("absent"));
        assert!(!report.is_clean());
        assert!(report.removed.is_empty());
    }

    #[test]
    fn test_guard_sweeps_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path(), &["1.mp4", "2.mp4"]);
        {
            let _guard = ScratchGuard::new(dir.path());
        }
        assert_eq!(file_count(dir.path()), 0);
    }

    #[test]
    fn test_guard_finish_sweeps_once() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path(), &["1.mp4"]);
        let guard = ScratchGuard::new(dir.path());
        let report = guard.finish();
        assert_eq!(report.removed, vec![dir.path().join("1.mp4")]);
    }
}
