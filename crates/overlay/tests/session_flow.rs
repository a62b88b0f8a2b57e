//! End-to-end selection sessions against an in-memory desktop

use capture::{
    compute, CaptureError, CaptureOutcome, CaptureResult, DesktopSnapshot, DisplaySurface,
    ImageWriter, PixelBuffer, PixelSource, Point, Rect, RegionCapturer,
};
use export::{ExportError, PngWriter};
use overlay::{
    CursorAffordance, OffsetTransform, OverlayError, SelectionHost, SelectionSession,
    SelectionState,
};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

#[derive(Default)]
struct CallLog {
    reads: Vec<Rect>,
    writes: Vec<(u32, u32, PathBuf)>,
    frames: Vec<Rect>,
    pointer_captured: bool,
    cursor: CursorAffordance,
}

type SharedLog = Arc<Mutex<CallLog>>;

struct LoggingHost(SharedLog);

impl SelectionHost for LoggingHost {
    fn set_pointer_capture(&mut self, captured: bool) {
        self.0.lock().pointer_captured = captured;
    }

    fn set_cursor(&mut self, cursor: CursorAffordance) {
        self.0.lock().cursor = cursor;
    }

    fn render_selection(&mut self, rect: Rect) {
        self.0.lock().frames.push(rect);
    }
}

struct LoggingSource {
    log: SharedLog,
    snapshot: Arc<DesktopSnapshot>,
    available: bool,
}

impl PixelSource for LoggingSource {
    fn read_pixels(&mut self, rect: Rect) -> CaptureResult<PixelBuffer> {
        self.log.lock().reads.push(rect);
        if !self.available {
            return Err(CaptureError::SourceUnavailable("screen recording denied".into()));
        }
        self.snapshot.read(rect)
    }
}

struct LoggingWriter {
    log: SharedLog,
    inner: PngWriter,
}

impl ImageWriter for LoggingWriter {
    type Error = ExportError;

    fn encode_and_write(&mut self, buffer: &PixelBuffer, path: &Path) -> Result<(), ExportError> {
        self.log
            .lock()
            .writes
            .push((buffer.width, buffer.height, path.to_path_buf()));
        self.inner.encode_and_write(buffer, path)
    }
}

/// Output path inside a fresh directory that lives as long as the `TempDir`
fn scratch_output() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("shots").join("image.png");
    (dir, output)
}

/// Two monitors: primary at the origin, a shorter one to its left
fn two_monitor_snapshot() -> Arc<DesktopSnapshot> {
    let surfaces = [
        DisplaySurface::primary(0, 0, 64, 48),
        DisplaySurface::new(-32, 0, 32, 40),
    ];
    let bounds = compute(&surfaces).unwrap();
    let mut snapshot = DesktopSnapshot::blank(bounds.to_rect());
    for surface in &surfaces {
        let shade = if surface.is_primary { 200 } else { 90 };
        let b = surface.bounds;
        for dy in 0..b.height as i32 {
            for dx in 0..b.width as i32 {
                let (x, y) = (b.x + dx, b.y + dy);
                snapshot.put_pixel(x, y, [shade, (x & 0xFF) as u8, y as u8]);
            }
        }
    }
    Arc::new(snapshot)
}

fn session(
    log: &SharedLog,
    snapshot: Arc<DesktopSnapshot>,
    transform: OffsetTransform,
    output: &Path,
    available: bool,
) -> SelectionSession<LoggingHost, OffsetTransform, RegionCapturer<LoggingSource, LoggingWriter>> {
    let source = LoggingSource {
        log: Arc::clone(log),
        snapshot,
        available,
    };
    let writer = LoggingWriter {
        log: Arc::clone(log),
        inner: PngWriter::new(),
    };
    SelectionSession::new(
        LoggingHost(Arc::clone(log)),
        transform,
        RegionCapturer::new(source, writer, output),
    )
}

#[test]
fn drag_writes_exact_region() {
    let log = SharedLog::default();
    let (_dir, output) = scratch_output();
    let mut session = session(&log, two_monitor_snapshot(), OffsetTransform::default(), &output, true);

    session.on_pointer_down(Point::new(10, 10)).unwrap();
    assert!(log.lock().pointer_captured);
    assert_eq!(log.lock().cursor, CursorAffordance::Crosshair);

    session.on_pointer_move(Point::new(50, 40)).unwrap();
    let outcome = session.on_pointer_up(Point::new(50, 40)).unwrap();

    assert_eq!(outcome, CaptureOutcome::Saved(output.clone()));
    assert_eq!(session.state(), SelectionState::Finalized);

    let log = log.lock();
    assert_eq!(log.reads, vec![Rect::new(10, 10, 40, 30)]);
    assert_eq!(log.writes, vec![(40, 30, output.clone())]);
    assert_eq!(log.frames, vec![Rect::new(10, 10, 40, 30)]);
    assert!(!log.pointer_captured);
    assert_eq!(log.cursor, CursorAffordance::Arrow);

    let image = image::open(&output).unwrap().to_rgb8();
    assert_eq!(image.dimensions(), (40, 30));
    assert_eq!(image.get_pixel(0, 0).0, [200, 10, 10]);
    assert_eq!(image.get_pixel(39, 29).0, [200, 49, 39]);
}

#[test]
fn overlay_local_points_map_onto_left_monitor() {
    let log = SharedLog::default();
    let (_dir, output) = scratch_output();
    let snapshot = two_monitor_snapshot();
    // Overlay client origin sits at the virtual desktop's top-left corner
    let transform = OffsetTransform::new(snapshot.virtual_left, snapshot.virtual_top);
    let mut session = session(&log, snapshot, transform, &output, true);

    // Drag up-left from overlay (40, 20) to (2, 4)
    session.on_pointer_down(Point::new(40, 20)).unwrap();
    session.on_pointer_move(Point::new(20, 10)).unwrap();
    session.on_pointer_move(Point::new(2, 4)).unwrap();
    session.on_pointer_up(Point::new(2, 4)).unwrap();

    let log = log.lock();
    assert_eq!(log.reads, vec![Rect::new(-30, 4, 38, 16)]);
    assert_eq!(log.frames.last(), Some(&Rect::new(2, 4, 38, 16)));

    let image = image::open(&output).unwrap().to_rgb8();
    assert_eq!(image.dimensions(), (38, 16));
    // Left monitor pixel, then primary pixel across the seam
    assert_eq!(image.get_pixel(0, 0).0, [90, (-30i32 & 0xFF) as u8, 4]);
    assert_eq!(image.get_pixel(37, 0).0, [200, 7, 4]);
}

#[test]
fn click_without_drag_produces_no_file() {
    let log = SharedLog::default();
    let (_dir, output) = scratch_output();
    let mut session = session(&log, two_monitor_snapshot(), OffsetTransform::default(), &output, true);

    session.on_pointer_down(Point::new(25, 25)).unwrap();
    session.on_pointer_move(Point::new(25, 25)).unwrap();
    let outcome = session.on_pointer_up(Point::new(25, 25)).unwrap();

    assert_eq!(outcome, CaptureOutcome::Skipped);
    assert_eq!(session.state(), SelectionState::Finalized);
    let log = log.lock();
    assert!(log.reads.is_empty());
    assert!(log.writes.is_empty());
    assert!(!log.pointer_captured);
    assert!(!output.exists());
}

#[test]
fn horizontal_line_selection_is_skipped() {
    let log = SharedLog::default();
    let (_dir, output) = scratch_output();
    let mut session = session(&log, two_monitor_snapshot(), OffsetTransform::default(), &output, true);

    session.on_pointer_down(Point::new(5, 30)).unwrap();
    let outcome = session.on_pointer_up(Point::new(60, 30)).unwrap();

    assert_eq!(outcome, CaptureOutcome::Skipped);
    assert!(!output.exists());
}

#[test]
fn unavailable_source_ends_session_without_output() {
    let log = SharedLog::default();
    let (_dir, output) = scratch_output();
    let mut session = session(&log, two_monitor_snapshot(), OffsetTransform::default(), &output, false);

    session.on_pointer_down(Point::new(0, 0)).unwrap();
    let err = session.on_pointer_up(Point::new(20, 20)).unwrap_err();

    assert!(matches!(err, OverlayError::Capture(CaptureError::SourceUnavailable(_))));
    assert_eq!(session.state(), SelectionState::Finalized);
    let log = log.lock();
    assert_eq!(log.reads.len(), 1);
    assert!(log.writes.is_empty());
    assert!(!log.pointer_captured);
    assert!(!output.exists());
}

#[test]
fn selection_past_desktop_edge_is_source_unavailable() {
    let log = SharedLog::default();
    let (_dir, output) = scratch_output();
    let mut session = session(&log, two_monitor_snapshot(), OffsetTransform::default(), &output, true);

    session.on_pointer_down(Point::new(50, 40)).unwrap();
    let err = session.on_pointer_up(Point::new(70, 60)).unwrap_err();

    assert!(matches!(err, OverlayError::Capture(CaptureError::SourceUnavailable(_))));
    assert!(log.lock().writes.is_empty());
}

#[test]
fn far_apart_corners_are_source_unavailable() {
    let log = SharedLog::default();
    let (_dir, output) = scratch_output();
    let snapshot = Arc::new(DesktopSnapshot::blank(Rect::new(0, 0, 16, 16)));
    let mut session = session(&log, snapshot, OffsetTransform::default(), &output, true);

    session.on_pointer_down(Point::new(-2_000_000_000, 0)).unwrap();
    session.on_pointer_move(Point::new(2_000_000_000, 10)).unwrap();
    let err = session.on_pointer_up(Point::new(2_000_000_000, 10)).unwrap_err();

    assert!(matches!(err, OverlayError::Capture(CaptureError::SourceUnavailable(_))));
    assert_eq!(session.state(), SelectionState::Finalized);
    let log = log.lock();
    assert_eq!(log.reads, vec![Rect::new(-2_000_000_000, 0, 4_000_000_000, 10)]);
    assert!(log.writes.is_empty());
    assert!(!output.exists());
}

#[test]
fn transform_near_i32_limits_does_not_wrap() {
    let log = SharedLog::default();
    let (_dir, output) = scratch_output();
    let mut session = session(
        &log,
        two_monitor_snapshot(),
        OffsetTransform::new(i32::MAX, 0),
        &output,
        true,
    );

    // Right corner clamps to i32::MAX instead of wrapping negative
    session.on_pointer_down(Point::new(-10, 10)).unwrap();
    let err = session.on_pointer_up(Point::new(30, 20)).unwrap_err();

    assert!(matches!(err, OverlayError::Capture(CaptureError::SourceUnavailable(_))));
    assert_eq!(log.lock().reads, vec![Rect::new(i32::MAX - 10, 10, 10, 10)]);
}

#[test]
fn gap_under_summed_width_reads_black() {
    let log = SharedLog::default();
    let (_dir, output) = scratch_output();
    let snapshot = two_monitor_snapshot();
    // Summed width 96 matches the extent here; rows 40..48 of the left
    // monitor's column are outside every display.
    assert_eq!(snapshot.bounds(), Rect::new(-32, 0, 96, 48));
    let mut session = session(&log, snapshot, OffsetTransform::default(), &output, true);

    session.on_pointer_down(Point::new(-32, 40)).unwrap();
    session.on_pointer_up(Point::new(-28, 44)).unwrap();

    let image = image::open(&output).unwrap().to_rgb8();
    assert!(image.pixels().all(|p| p.0 == [0, 0, 0]));
}
