//! Region capture
//!
//! Reads exactly the requested rectangle from a pixel source and hands the
//! buffer to an image writer. Zero-area rectangles are skipped on purpose.

use crate::{CaptureError, CaptureResult, PixelBuffer, Rect};
use std::path::{Path, PathBuf};

/// Source of virtual-desktop pixels
pub trait PixelSource {
    /// Read a `rect.width x rect.height` block at `(rect.x, rect.y)` in
    /// desktop coordinates.
    fn read_pixels(&mut self, rect: Rect) -> CaptureResult<PixelBuffer>;
}

/// Encodes a buffer and writes it to disk
pub trait ImageWriter {
    type Error: std::error::Error + Send + Sync + 'static;

    fn encode_and_write(&mut self, buffer: &PixelBuffer, path: &Path) -> Result<(), Self::Error>;
}

/// Result of a successful capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Zero width or height; nothing read, nothing written
    Skipped,
    /// Image written to this path
    Saved(PathBuf),
}

/// Captures one region to one output file
pub struct RegionCapturer<S, W> {
    source: S,
    writer: W,
    output_path: PathBuf,
}

impl<S: PixelSource, W: ImageWriter> RegionCapturer<S, W> {
    pub fn new(source: S, writer: W, output_path: impl Into<PathBuf>) -> Self {
        Self {
            source,
            writer,
            output_path: output_path.into(),
        }
    }

    /// Capture `rect` (desktop pixels). No retry, no fallback location.
    pub fn capture(&mut self, rect: Rect) -> CaptureResult<CaptureOutcome> {
        if rect.is_degenerate() {
            log::warn!("Selection {:?} has zero area, nothing captured", rect);
            return Ok(CaptureOutcome::Skipped);
        }

        let buffer = self.source.read_pixels(rect)?;
        if buffer.width != rect.width || buffer.height != rect.height {
            return Err(CaptureError::SourceUnavailable(format!(
                "pixel source returned {}x{} for {:?}",
                buffer.width, buffer.height, rect
            )));
        }

        self.writer
            .encode_and_write(&buffer, &self.output_path)
            .map_err(|e| CaptureError::EncodeOrWriteFailed(Box::new(e)))?;

        log::info!(
            "Captured {}x{} at ({}, {}) to {}",
            rect.width,
            rect.height,
            rect.x,
            rect.y,
            self.output_path.display()
        );

        Ok(CaptureOutcome::Saved(self.output_path.clone()))
    }

    pub fn into_parts(self) -> (S, W) {
        (self.source, self.writer)
    }
}
