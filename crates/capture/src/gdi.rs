//! Display enumeration and desktop snapshot using GDI

use crate::{CaptureError, CaptureResult, ConfigurationError, DesktopSnapshot, DisplaySurface, Rect};
use windows::Win32::Foundation::{BOOL, LPARAM, RECT};
use windows::Win32::Graphics::Gdi::{
    BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject,
    EnumDisplayMonitors, GetDC, GetDIBits, GetMonitorInfoW, ReleaseDC, SelectObject,
    BITMAPINFO, BITMAPINFOHEADER, BI_RGB, DIB_RGB_COLORS, HDC, HMONITOR, MONITORINFO,
    MONITORINFOF_PRIMARY, SRCCOPY,
};

/// Enumerate attached monitors in desktop coordinates
pub fn list_display_surfaces() -> Result<Vec<DisplaySurface>, ConfigurationError> {
    let mut surfaces: Vec<DisplaySurface> = Vec::new();

    unsafe {
        let _ = EnumDisplayMonitors(
            None,
            None,
            Some(enum_monitor_callback),
            LPARAM(&mut surfaces as *mut Vec<DisplaySurface> as isize),
        );
    }

    if surfaces.is_empty() {
        return Err(ConfigurationError::NoDisplaySurfaces);
    }

    log::info!("Found {} display(s): {:?}", surfaces.len(), surfaces);
    Ok(surfaces)
}

unsafe extern "system" fn enum_monitor_callback(
    hmonitor: HMONITOR,
    _hdc: HDC,
    _clip: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    let surfaces = &mut *(lparam.0 as *mut Vec<DisplaySurface>);

    let mut info = MONITORINFO {
        cbSize: std::mem::size_of::<MONITORINFO>() as u32,
        ..Default::default()
    };

    if GetMonitorInfoW(hmonitor, &mut info).as_bool() {
        let rc = info.rcMonitor;
        surfaces.push(DisplaySurface {
            bounds: Rect::new(
                rc.left,
                rc.top,
                (rc.right - rc.left) as u32,
                (rc.bottom - rc.top) as u32,
            ),
            is_primary: info.dwFlags & MONITORINFOF_PRIMARY != 0,
        });
    }

    BOOL(1) // Continue enumeration
}

/// Copy the screen inside `bounds` into a snapshot.
///
/// Areas of `bounds` not covered by any monitor come back black.
pub fn snapshot_desktop(bounds: Rect) -> CaptureResult<DesktopSnapshot> {
    if bounds.is_degenerate() {
        return Err(CaptureError::SourceUnavailable(format!(
            "cannot snapshot empty desktop {:?}",
            bounds
        )));
    }

    let width = bounds.width as i32;
    let height = bounds.height as i32;

    unsafe {
        let screen_dc = GetDC(None);
        if screen_dc.is_invalid() {
            return Err(CaptureError::SourceUnavailable("Failed to get screen DC".into()));
        }

        let mem_dc = CreateCompatibleDC(screen_dc);
        let bitmap = CreateCompatibleBitmap(screen_dc, width, height);
        let old_bitmap = SelectObject(mem_dc, bitmap);

        let blit = BitBlt(
            mem_dc,
            0,
            0,
            width,
            height,
            screen_dc,
            bounds.x,
            bounds.y,
            SRCCOPY,
        );

        let mut bmi = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: width,
                biHeight: -height, // Top-down DIB
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

        let mut data = vec![0u8; bounds.width as usize * bounds.height as usize * 4];
        let lines = if blit.is_ok() {
            GetDIBits(
                mem_dc,
                bitmap,
                0,
                bounds.height,
                Some(data.as_mut_ptr() as *mut _),
                &mut bmi,
                DIB_RGB_COLORS,
            )
        } else {
            0
        };

        SelectObject(mem_dc, old_bitmap);
        let _ = DeleteObject(bitmap);
        let _ = DeleteDC(mem_dc);
        ReleaseDC(None, screen_dc);

        blit?;
        if lines != height {
            return Err(CaptureError::SourceUnavailable(format!(
                "GetDIBits copied {} of {} rows",
                lines, height
            )));
        }

        log::info!("Snapshot of {:?} taken", bounds);

        Ok(DesktopSnapshot {
            data,
            width: bounds.width,
            height: bounds.height,
            virtual_left: bounds.x,
            virtual_top: bounds.y,
        })
    }
}
