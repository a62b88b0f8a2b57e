//! GDI rendering for overlay

use capture::{DesktopSnapshot, Rect};
use std::mem::size_of;
use std::sync::Arc;
use windows::Win32::Foundation::{COLORREF, HWND};
use windows::Win32::Graphics::Gdi::{
    BeginPaint, CreatePen, DeleteObject, EndPaint, GetStockObject, Rectangle, SelectObject,
    SetBkMode, SetDIBitsToDevice, SetTextColor, TextOutW, BITMAPINFO, BITMAPINFOHEADER, BI_RGB,
    DIB_RGB_COLORS, HDC, NULL_BRUSH, PAINTSTRUCT, PS_SOLID, TRANSPARENT,
};

/// Paints the frozen desktop with the live selection frame on top
pub struct OverlayRenderer {
    snapshot: Arc<DesktopSnapshot>,
    selection_rect: Option<Rect>,
}

impl OverlayRenderer {
    pub fn new(snapshot: Arc<DesktopSnapshot>) -> Self {
        Self {
            snapshot,
            selection_rect: None,
        }
    }

    /// Set selection rectangle (client coordinates)
    pub fn set_selection(&mut self, rect: Option<Rect>) {
        self.selection_rect = rect;
    }

    /// Render to window
    pub fn render(&self, hwnd: HWND) {
        unsafe {
            let mut ps = PAINTSTRUCT::default();
            let hdc = BeginPaint(hwnd, &mut ps);

            self.draw_snapshot(hdc);

            if let Some(ref rect) = self.selection_rect {
                self.draw_selection(hdc, rect);
            }

            let _ = EndPaint(hwnd, &ps);
        }
    }

    unsafe fn draw_snapshot(&self, hdc: HDC) {
        let width = self.snapshot.width as i32;
        let height = self.snapshot.height as i32;

        let bmi = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: width,
                biHeight: -height, // Top-down
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB.0,
                biSizeImage: 0,
                biXPelsPerMeter: 0,
                biYPelsPerMeter: 0,
                biClrUsed: 0,
                biClrImportant: 0,
            },
            bmiColors: [Default::default()],
        };

        SetDIBitsToDevice(
            hdc,
            0,
            0,
            width as u32,
            height as u32,
            0,
            0,
            0,
            height as u32,
            self.snapshot.data.as_ptr() as *const _,
            &bmi,
            DIB_RGB_COLORS,
        );
    }

    unsafe fn draw_selection(&self, hdc: HDC, rect: &Rect) {
        let pen = CreatePen(PS_SOLID, 1, COLORREF(0x000000FF)); // Red
        let old_pen = SelectObject(hdc, pen);
        let old_brush = SelectObject(hdc, GetStockObject(NULL_BRUSH));

        // GDI coordinates are i32; clamp edges that run off the surface
        let right = i32::try_from(rect.right()).unwrap_or(i32::MAX);
        let bottom = i32::try_from(rect.bottom()).unwrap_or(i32::MAX);
        let _ = Rectangle(hdc, rect.x, rect.y, right, bottom);

        SelectObject(hdc, old_brush);
        SelectObject(hdc, old_pen);
        let _ = DeleteObject(pen);

        let size_text: Vec<u16> = format!("{}x{}", rect.width, rect.height)
            .encode_utf16()
            .collect();

        SetBkMode(hdc, TRANSPARENT);
        SetTextColor(hdc, COLORREF(0x00FFFFFF)); // White
        let _ = TextOutW(hdc, rect.x.saturating_add(4), bottom.saturating_add(4), &size_text);
    }
}
