//! Capture module for RegionSnap
//!
//! Virtual desktop geometry, pixel buffers and region capture.

pub mod desktop;
pub mod frame;
#[cfg(windows)]
pub mod gdi;
pub mod region;

pub use desktop::{compute, compute_with, BoundsPolicy, DisplaySurface, VirtualDesktopRect};
pub use frame::{DesktopSnapshot, PixelBuffer};
pub use region::{CaptureOutcome, ImageWriter, PixelSource, RegionCapturer};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Pixel source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Encode or write failed: {0}")]
    EncodeOrWriteFailed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(windows)]
impl From<windows::core::Error> for CaptureError {
    fn from(err: windows::core::Error) -> Self {
        CaptureError::SourceUnavailable(err.to_string())
    }
}

pub type CaptureResult<T> = Result<T, CaptureError>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("No display surfaces could be enumerated")]
    NoDisplaySurfaces,

    #[error("Invalid setting {key}: {value}")]
    InvalidSetting { key: &'static str, value: String },

    #[error("Virtual desktop of {width}x{height} does not fit 32-bit pixel dimensions")]
    DesktopTooLarge { width: u64, height: u64 },

    #[error("Cannot resolve output directory: {0}")]
    OutputDirectory(String),
}

/// Point in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Shifted point, clamped to the `i32` range
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

/// Rectangle in physical pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Normalized rectangle spanned by two corner points, whichever way round
    pub fn from_points(a: Point, b: Point) -> Self {
        Rect::new(
            a.x.min(b.x),
            a.y.min(b.y),
            a.x.abs_diff(b.x),
            a.y.abs_diff(b.y),
        )
    }

    /// Exclusive right edge; may lie past `i32::MAX`
    pub fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    /// Exclusive bottom edge; may lie past `i32::MAX`
    pub fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    /// Zero width or zero height
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && i64::from(x) < self.right()
            && y >= self.y
            && i64::from(y) < self.bottom()
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}
