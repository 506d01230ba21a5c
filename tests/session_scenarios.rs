//! End-to-end scan sessions driven with synthetic frames.
//!
//! No camera, window or ffmpeg involved: frames are generated in memory and
//! exports land in an in-memory sink.

use std::path::PathBuf;

use time_warp_scan::filters::{self, FilterKind};
use time_warp_scan::frame::{Frame, Region};
use time_warp_scan::recording::{ExportOutcome, SinkError, VideoSink};
use time_warp_scan::scan::{ScanAxis, SessionPhase};
use time_warp_scan::session::{Action, SessionController, SessionSettings};

/// Keeps every export in memory. Fails the first `failures` writes.
#[derive(Default)]
struct MemorySink {
    exports: Vec<(usize, f64, (u32, u32))>,
    failures: usize,
}

impl VideoSink for MemorySink {
    fn write(&mut self, frames: &[Frame], fps: f64, dims: (u32, u32)) -> Result<PathBuf, SinkError> {
        if self.failures > 0 {
            self.failures -= 1;
            return Err(SinkError::ProcessFailed {
                exit_code: Some(1),
                stderr: "disk full".to_string(),
            });
        }
        self.exports.push((frames.len(), fps, dims));
        Ok(PathBuf::from(format!("time_warp_{}.avi", self.exports.len())))
    }
}

fn gradient(w: u32, h: u32) -> Frame {
    Frame::from_fn(w, h, |x, y| [(x * 3 % 256) as u8, (y * 5 % 256) as u8, ((x ^ y) % 256) as u8])
}

fn settings(axis: ScanAxis, speed: u32, filter: FilterKind) -> SessionSettings {
    SessionSettings {
        axis,
        speed,
        filter,
        ..Default::default()
    }
}

#[test]
fn test_vertical_scan_completes_after_height_over_speed_ticks() {
    let mut sink = MemorySink::default();
    let mut session =
        SessionController::new(settings(ScanAxis::Vertical, 2, FilterKind::Identity), 16, 480, &mut sink).unwrap();
    let frame = gradient(16, 480);

    for _ in 0..239 {
        session.tick(&frame, None);
    }
    assert!(!session.state().completed_v);
    assert_eq!(session.phase(), SessionPhase::Scanning);

    session.tick(&frame, None);
    assert!(session.state().completed_v);
    assert_eq!(session.state().position_v, 480);
    assert_eq!(session.phase(), SessionPhase::Completed);

    // Further ticks leave the finished pointer alone
    session.tick(&frame, None);
    assert_eq!(session.state().position_v, 480);

    // The export tick records its own frame before saving
    let report = session.tick(&frame, Some(Action::Export));
    match report.export {
        Some(Ok(ExportOutcome::Exported { frames, .. })) => assert_eq!(frames, 242),
        other => panic!("Expected export, got {:?}", other),
    }
    assert!(session.recording().is_empty());
    assert_eq!(session.finish(), 0);
    assert_eq!(sink.exports, vec![(242, 20.0, (16, 480))]);
}

#[test]
fn test_fully_scanned_canvas_is_the_filtered_frame_for_pointwise_filters() {
    let mut session = SessionController::new(
        settings(ScanAxis::Horizontal, 3, FilterKind::Sepia),
        20,
        10,
        MemorySink::default(),
    )
    .unwrap();
    let frame = gradient(20, 10);
    while !session.state().completed_h {
        session.tick(&frame, None);
    }
    // 20 is not a multiple of 3: the last strip is clamped, not skipped
    assert_eq!(session.state().position_h, 20);
    assert_eq!(session.buffer().frame(), &filters::sepia(&frame));
}

#[test]
fn test_dual_axis_vertical_finishes_first_and_wins_on_overlap() {
    let (w, h) = (160, 120);
    let mut session =
        SessionController::new(settings(ScanAxis::Both, 1, FilterKind::Mosaic), w, h, MemorySink::default()).unwrap();
    let frame = gradient(w, h);

    for _ in 0..120 {
        session.tick(&frame, None);
    }
    let state = session.state();
    assert!(state.completed_v);
    assert!(!state.completed_h);
    assert_eq!(state.position_v, 120);
    assert_eq!(state.position_h, 120);
    assert_eq!(session.phase(), SessionPhase::Scanning);

    // Each cell holds whichever strip crossed it last; on the tick both cross
    // it the vertical strip is committed second.
    let canvas = session.buffer().frame();
    for y in (0..h).step_by(7) {
        let row = filters::apply(&frame.crop(Region::new(0, y, w, 1)).unwrap(), FilterKind::Mosaic);
        for x in (0..state.position_h).step_by(5) {
            if x <= y {
                assert_eq!(canvas.pixel(x, y), row.pixel(x, 0), "cell ({}, {})", x, y);
            } else {
                let col = filters::apply(&frame.crop(Region::new(x, 0, 1, h)).unwrap(), FilterKind::Mosaic);
                assert_eq!(canvas.pixel(x, y), col.pixel(0, y), "cell ({}, {})", x, y);
            }
        }
    }

    // Right of the horizontal pointer the output is still live
    let recorded = session.recording().frames().last().unwrap();
    assert_eq!(recorded.pixel(150, 60), frame.pixel(150, 60));
    assert_eq!(recorded.pixel(10, 60), canvas.pixel(10, 60));

    // One finished axis is enough to export
    let report = session.tick(&frame, Some(Action::Export));
    assert!(matches!(
        report.export,
        Some(Ok(ExportOutcome::Exported { frames: 121, .. }))
    ));
}

#[test]
fn test_pause_then_reset_mid_scan() {
    let mut session = SessionController::new(
        settings(ScanAxis::Vertical, 4, FilterKind::Grayscale),
        32,
        64,
        MemorySink::default(),
    )
    .unwrap();
    let frame = gradient(32, 64);

    for _ in 0..3 {
        session.tick(&frame, None);
    }
    session.tick(&frame, Some(Action::TogglePause));
    let frozen = session.state().position_v;
    assert_eq!(frozen, 16);

    for _ in 0..10 {
        let report = session.tick(&frame, None);
        assert!(report.display.is_some());
    }
    assert_eq!(session.state().position_v, frozen);
    // Frames keep being recorded while paused
    assert_eq!(session.recording().len(), 14);

    session.tick(&frame, Some(Action::Reset));
    assert_eq!(session.state().position_v, 0);
    assert!(!session.state().paused);
    assert!(session.buffer().is_blank());
    assert!(session.recording().is_empty());

    session.tick(&frame, None);
    assert_eq!(session.state().position_v, 4);
    assert_eq!(session.recording().len(), 1);
}

#[test]
fn test_export_counts_only_frames_since_reset() {
    let mut sink = MemorySink::default();
    let mut session =
        SessionController::new(settings(ScanAxis::Vertical, 2, FilterKind::Identity), 16, 480, &mut sink).unwrap();
    let frame = gradient(16, 480);

    for _ in 0..50 {
        session.tick(&frame, None);
    }
    assert_eq!(session.recording().len(), 50);

    // The reset tick's own frame is dropped along with the rest
    session.tick(&frame, Some(Action::Reset));
    assert!(session.recording().is_empty());

    for _ in 0..240 {
        session.tick(&frame, None);
    }
    assert!(session.state().completed_v);

    let report = session.tick(&frame, Some(Action::Export));
    assert!(matches!(
        report.export,
        Some(Ok(ExportOutcome::Exported { frames: 241, .. }))
    ));
    drop(session);
    assert_eq!(sink.exports, vec![(241, 20.0, (16, 480))]);
}

#[test]
fn test_export_before_completion_changes_nothing() {
    let mut sink = MemorySink::default();
    let mut session =
        SessionController::new(settings(ScanAxis::Both, 2, FilterKind::Invert), 10, 10, &mut sink).unwrap();
    let frame = gradient(10, 10);
    session.tick(&frame, None);

    let before = session.state().clone();
    let report = session.tick(&frame, Some(Action::Export));
    assert!(matches!(report.export, Some(Ok(ExportOutcome::NotReady))));
    assert_eq!(session.recording().len(), 2);
    assert_eq!(session.state().position_v, before.position_v + 2);
    assert_eq!(session.finish(), 2);
    assert!(sink.exports.is_empty());
}

#[test]
fn test_failed_export_can_be_retried() {
    let mut sink = MemorySink {
        failures: 1,
        ..Default::default()
    };
    let mut session =
        SessionController::new(settings(ScanAxis::Vertical, 4, FilterKind::Identity), 4, 4, &mut sink).unwrap();
    let frame = gradient(4, 4);

    session.tick(&frame, None);
    assert!(session.state().completed_v);

    let report = session.tick(&frame, Some(Action::Export));
    assert!(matches!(report.export, Some(Err(SinkError::ProcessFailed { .. }))));
    assert_eq!(session.recording().len(), 2);

    let report = session.tick(&frame, Some(Action::Export));
    assert!(matches!(
        report.export,
        Some(Ok(ExportOutcome::Exported { frames: 3, .. }))
    ));
    drop(session);
    assert_eq!(sink.exports, vec![(3, 20.0, (4, 4))]);
}
