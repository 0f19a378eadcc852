//! Standalone watermark stage over an existing montage.

use std::path::PathBuf;

use montage_common::config::MontageConfig;
use montage_engine::watermark::apply_watermark;
use montage_engine::FfmpegEncoder;

pub async fn run(
    config: MontageConfig,
    video: PathBuf,
    image: Option<PathBuf>,
) -> anyhow::Result<()> {
    let image = image.unwrap_or(config.watermark.image);
    let encoder = FfmpegEncoder::new(config.ffmpeg_binary);

    println!("Watermarking: {}", video.display());
    let output = apply_watermark(&encoder, &video, &image).await?;
    println!("Watermarked video created: {}", output.display());
    Ok(())
}
