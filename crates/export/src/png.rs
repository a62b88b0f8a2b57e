//! PNG export

use crate::{ExportError, ExportResult};
use capture::{ImageWriter, PixelBuffer};
use image::{ExtendedColorType, ImageFormat};
use std::fs;
use std::path::Path;

/// Writes 24-bit RGB PNG files
#[derive(Debug, Clone, Copy, Default)]
pub struct PngWriter;

impl PngWriter {
    pub fn new() -> Self {
        Self
    }

    /// Encode `buffer` as PNG at `path`, creating the parent directory
    pub fn save(&self, buffer: &PixelBuffer, path: &Path) -> ExportResult<()> {
        let expected = buffer.width as usize * buffer.height as usize * PixelBuffer::BYTES_PER_PIXEL;
        if buffer.data.len() != expected {
            return Err(ExportError::MalformedBuffer {
                width: buffer.width,
                height: buffer.height,
                expected,
                actual: buffer.data.len(),
            });
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        image::save_buffer_with_format(
            path,
            &buffer.data,
            buffer.width,
            buffer.height,
            ExtendedColorType::Rgb8,
            ImageFormat::Png,
        )?;

        log::debug!("Wrote {}x{} PNG to {}", buffer.width, buffer.height, path.display());
        Ok(())
    }
}

impl ImageWriter for PngWriter {
    type Error = ExportError;

    fn encode_and_write(&mut self, buffer: &PixelBuffer, path: &Path) -> ExportResult<()> {
        self.save(buffer, path)
    }
}
