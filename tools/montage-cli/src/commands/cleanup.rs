//! Sweep the scratch clips directory.

use montage_common::config::{MontageConfig, ENV_CLIPS_DIR};
use montage_engine::sweep_scratch_dir;

pub fn run(config: MontageConfig) -> anyhow::Result<()> {
    if config.clips_dir.as_os_str().is_empty() {
        anyhow::bail!("Missing scratch clips directory ({ENV_CLIPS_DIR})");
    }

    let report = sweep_scratch_dir(&config.clips_dir);
    println!(
        "Deleted {} file(s) from {}",
        report.removed.len(),
        config.clips_dir.display()
    );
    for (path, error) in &report.failed {
        println!("  [WARN] {}: {error}", path.display());
    }
    Ok(())
}
