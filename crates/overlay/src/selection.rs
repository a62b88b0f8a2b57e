//! Drag selection state machine
//!
//! `Idle -> Selecting -> Finalized`. Finalized is terminal; a new selection
//! needs a fresh machine. Pointer capture and cursor affordance live here as
//! fields and only change on transitions.

use capture::{Point, Rect};
use thiserror::Error;

/// Selection lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Idle,
    Selecting,
    Finalized,
}

/// Pointer event kinds, for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Down,
    Move,
    Up,
}

/// Cursor shown over the overlay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CursorAffordance {
    #[default]
    Arrow,
    Crosshair,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Pointer {event:?} is not valid while {state:?}")]
    InvalidState {
        event: PointerEvent,
        state: SelectionState,
    },
}

pub type SelectionResult<T> = Result<T, SelectionError>;

/// UI side effects requested by the state machine
pub trait SelectionHost {
    /// Route all pointer input to the overlay (`true`) or release it
    fn set_pointer_capture(&mut self, captured: bool);

    fn set_cursor(&mut self, cursor: CursorAffordance);

    /// Draw the live selection frame, overlay-local coordinates
    fn render_selection(&mut self, rect: Rect);
}

/// Maps overlay-local points to virtual desktop pixels
pub trait PointToScreen {
    fn point_to_screen(&self, point: Point) -> Point;
}

/// Translation by a fixed offset, typically the overlay's desktop origin
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OffsetTransform {
    pub dx: i32,
    pub dy: i32,
}

impl OffsetTransform {
    pub fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

impl PointToScreen for OffsetTransform {
    fn point_to_screen(&self, point: Point) -> Point {
        point.offset(self.dx, self.dy)
    }
}

/// Normalized rectangle between anchor and current point
pub fn selection_rect(anchor: Point, current: Point) -> Rect {
    Rect::from_points(anchor, current)
}

/// Single drag selection
#[derive(Debug)]
pub struct SelectionStateMachine {
    state: SelectionState,
    anchor: Point,
    current: Point,
    pointer_captured: bool,
    cursor: CursorAffordance,
}

impl SelectionStateMachine {
    pub fn new() -> Self {
        Self {
            state: SelectionState::Idle,
            anchor: Point::default(),
            current: Point::default(),
            pointer_captured: false,
            cursor: CursorAffordance::Arrow,
        }
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn is_selecting(&self) -> bool {
        self.state == SelectionState::Selecting
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    pub fn current(&self) -> Point {
        self.current
    }

    pub fn pointer_captured(&self) -> bool {
        self.pointer_captured
    }

    pub fn cursor(&self) -> CursorAffordance {
        self.cursor
    }

    /// Current selection in overlay coordinates, once a drag has started
    pub fn selection_rect(&self) -> Option<Rect> {
        match self.state {
            SelectionState::Idle => None,
            _ => Some(selection_rect(self.anchor, self.current)),
        }
    }

    /// Start the drag at `point`
    pub fn on_pointer_down(
        &mut self,
        host: &mut impl SelectionHost,
        point: Point,
    ) -> SelectionResult<()> {
        self.require_state(SelectionState::Idle, PointerEvent::Down)?;

        self.anchor = point;
        self.current = point;
        self.state = SelectionState::Selecting;

        self.pointer_captured = true;
        host.set_pointer_capture(true);
        self.cursor = CursorAffordance::Crosshair;
        host.set_cursor(CursorAffordance::Crosshair);

        log::debug!("Selection anchored at {:?}", point);
        Ok(())
    }

    /// Track the pointer and emit the updated frame to the host
    pub fn on_pointer_move(
        &mut self,
        host: &mut impl SelectionHost,
        point: Point,
    ) -> SelectionResult<Rect> {
        self.require_state(SelectionState::Selecting, PointerEvent::Move)?;

        self.current = point;
        let rect = selection_rect(self.anchor, self.current);
        host.render_selection(rect);
        Ok(rect)
    }

    /// Finish the drag. Releases the pointer, restores the cursor and
    /// returns the capture rectangle in desktop pixels.
    pub fn on_pointer_up(
        &mut self,
        host: &mut impl SelectionHost,
        transform: &impl PointToScreen,
        point: Point,
    ) -> SelectionResult<Rect> {
        self.require_state(SelectionState::Selecting, PointerEvent::Up)?;

        self.current = point;

        self.pointer_captured = false;
        host.set_pointer_capture(false);
        self.cursor = CursorAffordance::Arrow;
        host.set_cursor(CursorAffordance::Arrow);

        self.state = SelectionState::Finalized;

        let start = transform.point_to_screen(self.anchor);
        let end = transform.point_to_screen(self.current);
        let capture_rect = selection_rect(start, end);

        log::debug!(
            "Selection finalized: {:?} -> {:?} (desktop {:?})",
            self.anchor,
            self.current,
            capture_rect
        );
        Ok(capture_rect)
    }

    fn require_state(&self, state: SelectionState, event: PointerEvent) -> SelectionResult<()> {
        if self.state == state {
            Ok(())
        } else {
            log::warn!("Rejected pointer {:?} while {:?}", event, self.state);
            Err(SelectionError::InvalidState {
                event,
                state: self.state,
            })
        }
    }
}

impl Default for SelectionStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
