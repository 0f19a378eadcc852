//! Check encoder availability and configuration.

use montage_common::config::MontageConfig;
use montage_engine::{EncoderBackend, FfmpegEncoder};

pub fn run(config: MontageConfig) -> anyhow::Result<()> {
    println!("Montage System Check");
    println!("{}", "=".repeat(50));

    let encoder = FfmpegEncoder::new(config.ffmpeg_binary.clone());
    let encoder_ok = encoder.is_available();
    if encoder_ok {
        println!("[OK] Encoder: {} ({})", encoder.name(), config.ffmpeg_binary);
    } else {
        println!("[FAIL] Encoder: {} not found", config.ffmpeg_binary);
    }

    let config_ok = match config.validate() {
        Ok(()) => {
            println!("[OK] Configuration");
            true
        }
        Err(err) => {
            println!("[FAIL] Configuration: {err}");
            false
        }
    };

    for (label, dir) in [
        ("Scratch clips", &config.clips_dir),
        ("Montage output", &config.output_dir),
    ] {
        if dir.is_dir() {
            println!("[OK] {label} directory: {}", dir.display());
        } else {
            println!("[INFO] {label} directory will be created: {}", dir.display());
        }
    }

    if config.watermark.image.is_file() {
        println!("[OK] Watermark image: {}", config.watermark.image.display());
    } else {
        println!(
            "[WARN] Watermark image missing: {}",
            config.watermark.image.display()
        );
    }

    println!(
        "     Clip window: {}s before timestamp, {}s long",
        config.clip.lead_in_secs, config.clip.duration_secs
    );

    println!();
    if encoder_ok && config_ok {
        println!("All required capabilities are available. Montage service is ready.");
        Ok(())
    } else {
        anyhow::bail!("Some required capabilities are missing. See above for fixes.")
    }
}
