//! Export module for RegionSnap
//!
//! Encodes captured pixel buffers and writes them to disk.

mod png;

pub use png::PngWriter;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Pixel buffer holds {actual} bytes, expected {expected} for {width}x{height}")]
    MalformedBuffer {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

pub type ExportResult<T> = Result<T, ExportError>;
