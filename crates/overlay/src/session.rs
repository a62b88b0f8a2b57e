//! One selection session: drag, finalize, capture once

use crate::selection::{
    PointToScreen, SelectionHost, SelectionResult, SelectionState, SelectionStateMachine,
};
use crate::OverlayResult;
use capture::{
    CaptureOutcome, CaptureResult, ImageWriter, PixelSource, Point, Rect, RegionCapturer,
};

/// Performs the capture for a finalized selection
pub trait Capturer {
    fn capture(&mut self, rect: Rect) -> CaptureResult<CaptureOutcome>;
}

impl<S: PixelSource, W: ImageWriter> Capturer for RegionCapturer<S, W> {
    fn capture(&mut self, rect: Rect) -> CaptureResult<CaptureOutcome> {
        RegionCapturer::capture(self, rect)
    }
}

impl<C: Capturer + ?Sized> Capturer for Box<C> {
    fn capture(&mut self, rect: Rect) -> CaptureResult<CaptureOutcome> {
        (**self).capture(rect)
    }
}

/// Drives a [`SelectionStateMachine`] and captures on release
pub struct SelectionSession<H, T, C> {
    machine: SelectionStateMachine,
    host: H,
    transform: T,
    capturer: C,
}

impl<H, T, C> SelectionSession<H, T, C>
where
    H: SelectionHost,
    T: PointToScreen,
    C: Capturer,
{
    pub fn new(host: H, transform: T, capturer: C) -> Self {
        Self {
            machine: SelectionStateMachine::new(),
            host,
            transform,
            capturer,
        }
    }

    pub fn state(&self) -> SelectionState {
        self.machine.state()
    }

    pub fn machine(&self) -> &SelectionStateMachine {
        &self.machine
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn on_pointer_down(&mut self, point: Point) -> SelectionResult<()> {
        self.machine.on_pointer_down(&mut self.host, point)
    }

    pub fn on_pointer_move(&mut self, point: Point) -> SelectionResult<Rect> {
        self.machine.on_pointer_move(&mut self.host, point)
    }

    /// Finalize the selection, then capture it exactly once.
    ///
    /// The session is Finalized afterwards even when the capture fails.
    pub fn on_pointer_up(&mut self, point: Point) -> OverlayResult<CaptureOutcome> {
        let rect = self.finalize(point)?;
        match self.capturer.capture(rect) {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                log::error!("Capture of {:?} failed: {}", rect, err);
                Err(err.into())
            }
        }
    }

    /// Finalize without capturing; returns the capture rectangle
    pub fn finalize(&mut self, point: Point) -> SelectionResult<Rect> {
        self.machine
            .on_pointer_up(&mut self.host, &self.transform, point)
    }

    pub fn into_parts(self) -> (H, T, C) {
        (self.host, self.transform, self.capturer)
    }
}
