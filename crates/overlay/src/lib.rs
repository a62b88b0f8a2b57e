//! Overlay module for RegionSnap
//!
//! Drag-to-select state machine, the session that turns a finished drag into
//! exactly one capture, and the Win32 overlay window hosting it.

#[cfg(windows)]
pub mod render;
pub mod selection;
pub mod session;
#[cfg(windows)]
pub mod window;

pub use selection::{
    selection_rect, CursorAffordance, OffsetTransform, PointToScreen, PointerEvent,
    SelectionError, SelectionHost, SelectionState, SelectionStateMachine,
};
pub use session::{Capturer, SelectionSession};
#[cfg(windows)]
pub use window::OverlayWindow;

use capture::CaptureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OverlayError {
    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    Windows(#[from] windows::core::Error),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Overlay closed before a selection was made")]
    Closed,
}

pub type OverlayResult<T> = Result<T, OverlayError>;
