use crate::domain::model::{ProcessedImage, PROCESSED_PREFIX};
use crate::utils::error::{BotError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::ImageReader;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// 1000 KB, the largest blob the default PDS accepts for post images.
pub const DEFAULT_SIZE_THRESHOLD: u64 = 1_000_000;
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Produces the `processed_` copy that gets uploaded, re-encoding when the original is too big.
#[derive(Debug, Clone)]
pub struct ImageNormalizer {
    threshold_bytes: u64,
    jpeg_quality: u8,
}

impl Default for ImageNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE_THRESHOLD, DEFAULT_JPEG_QUALITY)
    }
}

impl ImageNormalizer {
    pub fn new(threshold_bytes: u64, jpeg_quality: u8) -> Self {
        Self {
            threshold_bytes,
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    pub fn normalize(&self, source_dir: &Path, file_name: &str) -> Result<ProcessedImage> {
        let original = source_dir.join(file_name);
        let size = fs::metadata(&original)
            .map_err(|e| BotError::NormalizationError {
                message: format!("cannot stat {}: {}", original.display(), e),
            })?
            .len();

        if size >= self.threshold_bytes {
            let target = source_dir.join(reencoded_name(file_name));
            tracing::info!(
                "Compressing '{}' ({} bytes >= {} bytes)",
                file_name,
                size,
                self.threshold_bytes
            );
            if let Err(e) = self.reencode(&original, &target) {
                let _ = fs::remove_file(&target);
                return Err(e);
            }
            tracing::debug!(
                "Re-encoded copy is {} bytes",
                fs::metadata(&target).map(|m| m.len()).unwrap_or(0)
            );
            Ok(processed(file_name, target, true))
        } else {
            let target = source_dir.join(copied_name(file_name));
            tracing::info!("'{}' is {} bytes, uploading as is", file_name, size);
            fs::copy(&original, &target).map_err(|e| BotError::NormalizationError {
                message: format!("cannot copy {} to {}: {}", original.display(), target.display(), e),
            })?;
            Ok(processed(file_name, target, false))
        }
    }

    fn reencode(&self, original: &Path, target: &Path) -> Result<()> {
        let decoded = ImageReader::open(original)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| BotError::NormalizationError {
                message: format!("failed to decode {}: {}", original.display(), e),
            })?;
        let rgb = decoded.to_rgb8();

        let file = fs::File::create(target)?;
        let mut writer = BufWriter::new(file);
        JpegEncoder::new_with_quality(&mut writer, self.jpeg_quality).encode_image(&rgb)?;
        writer.flush()?;
        Ok(())
    }
}

fn processed(original: &str, path: PathBuf, reencoded: bool) -> ProcessedImage {
    let mime = mime_guess::from_path(&path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    ProcessedImage {
        original: original.to_string(),
        path,
        mime,
        reencoded,
    }
}

fn copied_name(file_name: &str) -> String {
    format!("{PROCESSED_PREFIX}{file_name}")
}

fn reencoded_name(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    format!("{PROCESSED_PREFIX}{stem}.jpg")
}
