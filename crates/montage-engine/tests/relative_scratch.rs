//! Runs with relative configured directories. Changing the process cwd is
//! global, so this lives in its own test binary.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use montage_common::config::MontageConfig;
use montage_common::error::MontageResult;
use montage_engine::{
    ClipSpec, EncoderBackend, MontagePipeline, MontageRequest, NotificationPayload, Notifier,
};
use serde_json::json;

/// Checks every manifest entry the way the concat demuxer resolves it.
#[derive(Debug, Clone, Default)]
struct ResolvingEncoder {
    resolved: Arc<Mutex<Vec<(PathBuf, bool)>>>,
}

impl EncoderBackend for ResolvingEncoder {
    async fn extract_clip(&self, _source: &Path, clip: &ClipSpec) -> MontageResult<()> {
        std::fs::write(&clip.output_path, b"clip")?;
        Ok(())
    }

    async fn concat(&self, manifest: &Path, output: &Path) -> MontageResult<()> {
        let base = manifest.parent().unwrap();
        let content = std::fs::read_to_string(manifest)?;
        let mut resolved = self.resolved.lock().unwrap();
        for line in content.lines() {
            let entry = line
                .strip_prefix("file '")
                .and_then(|rest| rest.strip_suffix('\''))
                .unwrap();
            let path = base.join(entry);
            let exists = path.is_file();
            resolved.push((path, exists));
        }
        std::fs::write(output, b"montage")?;
        Ok(())
    }

    async fn overlay(&self, _video: &Path, _image: &Path, output: &Path) -> MontageResult<()> {
        std::fs::write(output, b"watermarked")?;
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "resolving"
    }
}

struct NullNotifier;

impl Notifier for NullNotifier {
    async fn notify(
        &self,
        _payload: &NotificationPayload,
        _token: &str,
    ) -> MontageResult<serde_json::Value> {
        Ok(json!({}))
    }
}

#[tokio::test]
async fn relative_scratch_dir_yields_resolvable_manifest_entries() {
    let root = tempfile::tempdir().unwrap();
    std::env::set_current_dir(root.path()).unwrap();
    std::fs::create_dir_all("videos").unwrap();
    std::fs::write("videos/match.mp4", b"video").unwrap();

    let config = MontageConfig {
        clips_dir: PathBuf::from("montage/clips"),
        output_dir: PathBuf::from("montage/complete"),
        notify_base_url: "http://notify.invalid".to_string(),
        ..MontageConfig::default()
    };
    let encoder = ResolvingEncoder::default();
    let pipeline = MontagePipeline::new(config, encoder.clone(), NullNotifier).unwrap();

    let request = MontageRequest::new("videos/match.mp4", vec![4.0, 12.0], json!({"id": 1}), "t");
    let outcome = pipeline.run(request).await.unwrap();
    outcome.notification.await.unwrap();

    let resolved = encoder.resolved.lock().unwrap();
    assert_eq!(resolved.len(), 2);
    for (path, exists) in resolved.iter() {
        assert!(path.is_absolute(), "{} is not absolute", path.display());
        assert!(*exists, "{} did not resolve to a clip", path.display());
    }
    assert!(outcome.artifact.path.is_absolute());
    assert!(outcome.artifact.path.is_file());
}
