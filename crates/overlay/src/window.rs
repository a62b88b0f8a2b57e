//! Overlay window implementation

use crate::{
    render::OverlayRenderer,
    selection::{CursorAffordance, PointToScreen, SelectionHost},
    session::{Capturer, SelectionSession},
    OverlayError, OverlayResult,
};
use capture::{CaptureOutcome, DesktopSnapshot, Point, Rect, VirtualDesktopRect};
use std::cell::RefCell;
use std::sync::Arc;
use windows::core::{w, PCWSTR};
use windows::Win32::Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, POINT, WPARAM};
use windows::Win32::Graphics::Gdi::{ClientToScreen, InvalidateRect, UpdateWindow};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Input::KeyboardAndMouse::{ReleaseCapture, SetCapture};
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetMessageW, LoadCursorW,
    RegisterClassExW, SetCursor, ShowWindow, TranslateMessage, CS_HREDRAW, CS_VREDRAW,
    IDC_ARROW, IDC_CROSS, MSG, SW_SHOW, WM_CLOSE, WM_DESTROY, WM_LBUTTONDOWN, WM_LBUTTONUP,
    WM_MOUSEMOVE, WM_PAINT, WM_SETCURSOR, WNDCLASSEXW, WS_EX_TOOLWINDOW, WS_EX_TOPMOST,
    WS_POPUP,
};

type OverlaySession = SelectionSession<WindowHost, WindowTransform, Box<dyn Capturer>>;

thread_local! {
    static OVERLAY_STATE: RefCell<Option<Box<OverlayState>>> = RefCell::new(None);
}

struct OverlayState {
    session: OverlaySession,
    result: Option<OverlayResult<CaptureOutcome>>,
}

/// Host side effects for a Win32 overlay window
struct WindowHost {
    hwnd: HWND,
    renderer: OverlayRenderer,
    cursor: CursorAffordance,
}

impl SelectionHost for WindowHost {
    fn set_pointer_capture(&mut self, captured: bool) {
        unsafe {
            if captured {
                SetCapture(self.hwnd);
            } else {
                let _ = ReleaseCapture();
            }
        }
    }

    fn set_cursor(&mut self, cursor: CursorAffordance) {
        self.cursor = cursor;
        apply_cursor(cursor);
    }

    fn render_selection(&mut self, rect: Rect) {
        self.renderer.set_selection(Some(rect));
        unsafe {
            let _ = InvalidateRect(self.hwnd, None, false);
        }
    }
}

/// Client-to-screen mapping of the overlay window
struct WindowTransform {
    hwnd: HWND,
}

impl PointToScreen for WindowTransform {
    fn point_to_screen(&self, point: Point) -> Point {
        let mut pt = POINT { x: point.x, y: point.y };
        unsafe {
            let _ = ClientToScreen(self.hwnd, &mut pt);
        }
        Point::new(pt.x, pt.y)
    }
}

fn apply_cursor(cursor: CursorAffordance) {
    let id = match cursor {
        CursorAffordance::Arrow => IDC_ARROW,
        CursorAffordance::Crosshair => IDC_CROSS,
    };
    unsafe {
        if let Ok(handle) = LoadCursorW(None, id) {
            SetCursor(handle);
        }
    }
}

fn point_from_lparam(lparam: LPARAM) -> Point {
    let x = (lparam.0 & 0xFFFF) as i16 as i32;
    let y = ((lparam.0 >> 16) & 0xFFFF) as i16 as i32;
    Point::new(x, y)
}

/// Full-desktop overlay window hosting one selection session
pub struct OverlayWindow;

impl OverlayWindow {
    const CLASS_NAME: PCWSTR = w!("RegionSnapOverlay");

    /// Cover `bounds` with the frozen `snapshot`, run one drag selection and
    /// capture it through `capturer`.
    pub fn run(
        bounds: VirtualDesktopRect,
        snapshot: Arc<DesktopSnapshot>,
        capturer: Box<dyn Capturer>,
    ) -> OverlayResult<CaptureOutcome> {
        unsafe {
            let hmodule = GetModuleHandleW(None)?;
            let hinstance = HINSTANCE(hmodule.0);

            let wc = WNDCLASSEXW {
                cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
                style: CS_HREDRAW | CS_VREDRAW,
                lpfnWndProc: Some(Self::wnd_proc),
                hInstance: hinstance,
                hCursor: LoadCursorW(None, IDC_ARROW)?,
                lpszClassName: Self::CLASS_NAME,
                ..Default::default()
            };

            RegisterClassExW(&wc);

            let hwnd = CreateWindowExW(
                WS_EX_TOPMOST | WS_EX_TOOLWINDOW,
                Self::CLASS_NAME,
                w!("RegionSnap Selection"),
                WS_POPUP,
                bounds.left,
                bounds.top,
                bounds.width as i32,
                bounds.height as i32,
                None,
                None,
                hinstance,
                None,
            )?;

            let host = WindowHost {
                hwnd,
                renderer: OverlayRenderer::new(snapshot),
                cursor: CursorAffordance::Arrow,
            };
            let session = SelectionSession::new(host, WindowTransform { hwnd }, capturer);

            OVERLAY_STATE.with(|s| {
                *s.borrow_mut() = Some(Box::new(OverlayState {
                    session,
                    result: None,
                }));
            });

            log::info!("Overlay shown over {:?}", bounds);
            let _ = ShowWindow(hwnd, SW_SHOW);
            let _ = UpdateWindow(hwnd);

            // Message loop
            let mut msg = MSG::default();
            loop {
                let ret = GetMessageW(&mut msg, None, 0, 0);
                if !ret.as_bool() {
                    break;
                }
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);

                let has_result = OVERLAY_STATE.with(|s| {
                    s.borrow().as_ref().map(|state| state.result.is_some()).unwrap_or(false)
                });
                if has_result {
                    break;
                }
            }

            let result = OVERLAY_STATE.with(|s| s.borrow_mut().take().and_then(|state| state.result));

            let _ = DestroyWindow(hwnd);

            result.unwrap_or(Err(OverlayError::Closed))
        }
    }

    unsafe extern "system" fn wnd_proc(
        hwnd: HWND,
        msg: u32,
        wparam: WPARAM,
        lparam: LPARAM,
    ) -> LRESULT {
        match msg {
            WM_PAINT => {
                OVERLAY_STATE.with(|s| {
                    if let Ok(state) = s.try_borrow() {
                        if let Some(ref state) = *state {
                            state.session.host().renderer.render(hwnd);
                        }
                    }
                });
                LRESULT(0)
            }

            WM_SETCURSOR => {
                let cursor = OVERLAY_STATE.with(|s| {
                    s.try_borrow()
                        .ok()
                        .and_then(|state| state.as_ref().map(|st| st.session.host().cursor))
                });
                match cursor {
                    Some(cursor) => {
                        apply_cursor(cursor);
                        LRESULT(1)
                    }
                    None => DefWindowProcW(hwnd, msg, wparam, lparam),
                }
            }

            WM_LBUTTONDOWN => {
                Self::handle_mouse_down(point_from_lparam(lparam));
                LRESULT(0)
            }

            WM_MOUSEMOVE => {
                Self::handle_mouse_move(point_from_lparam(lparam));
                LRESULT(0)
            }

            WM_LBUTTONUP => {
                Self::handle_mouse_up(point_from_lparam(lparam));
                LRESULT(0)
            }

            WM_CLOSE => {
                OVERLAY_STATE.with(|s| {
                    if let Ok(mut state) = s.try_borrow_mut() {
                        if let Some(ref mut state) = *state {
                            if state.result.is_none() {
                                state.result = Some(Err(OverlayError::Closed));
                            }
                        }
                    }
                });
                LRESULT(0)
            }

            WM_DESTROY => LRESULT(0),

            _ => DefWindowProcW(hwnd, msg, wparam, lparam),
        }
    }

    fn handle_mouse_down(point: Point) {
        OVERLAY_STATE.with(|s| {
            if let Some(ref mut state) = *s.borrow_mut() {
                if let Err(err) = state.session.on_pointer_down(point) {
                    log::debug!("Ignoring button press: {}", err);
                }
            }
        });
    }

    fn handle_mouse_move(point: Point) {
        OVERLAY_STATE.with(|s| {
            if let Some(ref mut state) = *s.borrow_mut() {
                // Hover before the button goes down is not part of the drag
                if state.session.machine().is_selecting() {
                    let _ = state.session.on_pointer_move(point);
                }
            }
        });
    }

    fn handle_mouse_up(point: Point) {
        OVERLAY_STATE.with(|s| {
            if let Some(ref mut state) = *s.borrow_mut() {
                if state.session.machine().is_selecting() {
                    state.result = Some(state.session.on_pointer_up(point));
                }
            }
        });
    }
}
