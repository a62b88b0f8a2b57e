//! Pixel buffers and the frozen desktop frame

use crate::{CaptureError, CaptureResult, PixelSource, Rect};
use std::sync::Arc;

/// Tightly packed 24-bit RGB pixels, row-major, top-down
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl PixelBuffer {
    pub const BYTES_PER_PIXEL: usize = 3;

    /// Black buffer of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0; width as usize * height as usize * Self::BYTES_PER_PIXEL],
            width,
            height,
        }
    }

    /// Convert BGRA rows (GDI DIB layout) to RGB
    pub fn from_bgra(bgra: &[u8], width: u32, height: u32) -> Option<Self> {
        let expected = width as usize * height as usize * 4;
        if bgra.len() != expected {
            return None;
        }

        let mut data = Vec::with_capacity(width as usize * height as usize * Self::BYTES_PER_PIXEL);
        for px in bgra.chunks_exact(4) {
            data.extend_from_slice(&[px[2], px[1], px[0]]);
        }

        Some(Self { data, width, height })
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * Self::BYTES_PER_PIXEL;
        Some([self.data[offset], self.data[offset + 1], self.data[offset + 2]])
    }
}

/// Virtual desktop frozen at one instant
///
/// Holds BGRA pixels for the whole overlay area and the desktop coordinate of
/// its top-left corner. Reads against it are atomic with respect to that one
/// frame.
pub struct DesktopSnapshot {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub virtual_left: i32,
    pub virtual_top: i32,
}

impl DesktopSnapshot {
    /// Black snapshot covering `bounds`
    pub fn blank(bounds: Rect) -> Self {
        Self {
            data: vec![0; bounds.width as usize * bounds.height as usize * 4],
            width: bounds.width,
            height: bounds.height,
            virtual_left: bounds.x,
            virtual_top: bounds.y,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.virtual_left, self.virtual_top, self.width, self.height)
    }

    /// Set one pixel by desktop coordinates; ignored outside the snapshot
    pub fn put_pixel(&mut self, x: i32, y: i32, rgb: [u8; 3]) {
        if !self.bounds().contains(x, y) {
            return;
        }
        let (lx, ly) = self.screen_to_local(x, y);
        let offset = (ly as usize * self.width as usize + lx as usize) * 4;
        self.data[offset..offset + 4].copy_from_slice(&[rgb[2], rgb[1], rgb[0], 0xFF]);
    }

    /// Convert screen coordinates to snapshot coordinates
    pub fn screen_to_local(&self, x: i32, y: i32) -> (i32, i32) {
        (
            x.saturating_sub(self.virtual_left),
            y.saturating_sub(self.virtual_top),
        )
    }

    /// Copy `rect` (desktop coordinates) out of the frozen frame as RGB
    pub fn read(&self, rect: Rect) -> CaptureResult<PixelBuffer> {
        if !self.bounds().contains_rect(&rect) {
            return Err(CaptureError::SourceUnavailable(format!(
                "region {:?} lies outside the desktop snapshot {:?}",
                rect,
                self.bounds()
            )));
        }

        let (src_x, src_y) = self.screen_to_local(rect.x, rect.y);
        let (src_x, src_y) = (src_x as usize, src_y as usize);
        let row_bytes = rect.width as usize * 4;

        let mut bgra = Vec::with_capacity(row_bytes * rect.height as usize);
        for y in 0..rect.height as usize {
            let src_offset = ((src_y + y) * self.width as usize + src_x) * 4;
            bgra.extend_from_slice(&self.data[src_offset..src_offset + row_bytes]);
        }

        PixelBuffer::from_bgra(&bgra, rect.width, rect.height).ok_or_else(|| {
            CaptureError::SourceUnavailable("snapshot row copy was truncated".into())
        })
    }
}

impl PixelSource for DesktopSnapshot {
    fn read_pixels(&mut self, rect: Rect) -> CaptureResult<PixelBuffer> {
        self.read(rect)
    }
}

impl PixelSource for Arc<DesktopSnapshot> {
    fn read_pixels(&mut self, rect: Rect) -> CaptureResult<PixelBuffer> {
        self.read(rect)
    }
}
