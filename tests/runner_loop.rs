//! The processing loop against scripted sources and a fake window.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use time_warp_scan::camera::CameraError;
use time_warp_scan::display::DisplayError;
use time_warp_scan::frame::Frame;
use time_warp_scan::recording::{SinkError, VideoSink};
use time_warp_scan::runner::{self, ActionInput, ExitReason, FramePresenter, FrameSource};
use time_warp_scan::scan::ScanAxis;
use time_warp_scan::session::{Action, SessionController, SessionSettings};

/// Yields `remaining` copies of a frame, then fails like an unplugged camera.
struct ScriptedSource {
    frame: Frame,
    remaining: usize,
}

impl FrameSource for ScriptedSource {
    fn next_frame(&mut self) -> Result<Frame, CameraError> {
        if self.remaining == 0 {
            return Err(CameraError::CaptureFailed("device unplugged".to_string()));
        }
        self.remaining -= 1;
        Ok(self.frame.clone())
    }
}

/// One scripted action slot per tick; closes itself after `close_after` presents.
#[derive(Default)]
struct FakeWindow {
    script: VecDeque<Option<Action>>,
    presented: Vec<Frame>,
    close_after: Option<usize>,
}

impl FakeWindow {
    fn scripted(script: impl IntoIterator<Item = Option<Action>>) -> Self {
        Self {
            script: script.into_iter().collect(),
            ..Default::default()
        }
    }
}

impl FramePresenter for FakeWindow {
    fn is_open(&self) -> bool {
        self.close_after.map_or(true, |n| self.presented.len() < n)
    }

    fn present(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        self.presented.push(frame.clone());
        Ok(())
    }
}

impl ActionInput for FakeWindow {
    fn poll(&mut self) -> Option<Action> {
        self.script.pop_front().flatten()
    }
}

#[derive(Default)]
struct CountingSink {
    written: Vec<usize>,
}

impl VideoSink for CountingSink {
    fn write(&mut self, frames: &[Frame], _fps: f64, _dims: (u32, u32)) -> Result<PathBuf, SinkError> {
        self.written.push(frames.len());
        Ok(PathBuf::from("out.avi"))
    }
}

fn source(w: u32, h: u32, frames: usize) -> ScriptedSource {
    ScriptedSource {
        frame: Frame::from_fn(w, h, |x, y| [x as u8, y as u8, 200]),
        remaining: frames,
    }
}

fn vertical(speed: u32) -> SessionSettings {
    SessionSettings {
        axis: ScanAxis::Vertical,
        speed,
        ..Default::default()
    }
}

#[test]
fn test_quit_key_stops_without_saving() {
    let mut sink = CountingSink::default();
    let session = SessionController::new(vertical(2), 8, 8, &mut sink).unwrap();
    let mut camera = source(8, 8, 100);
    let mut window = FakeWindow::scripted([None, None, Some(Action::Terminate)]);

    let summary = runner::run(&mut camera, &mut window, session, &AtomicBool::new(false));

    assert_eq!(summary.exit, ExitReason::UserQuit);
    assert_eq!(summary.ticks, 3);
    assert_eq!(summary.exports, 0);
    assert_eq!(summary.discarded, 3);
    // The quitting tick's frame is still shown
    assert_eq!(window.presented.len(), 3);
    assert!(sink.written.is_empty());
}

#[test]
fn test_save_then_quit() {
    let mut sink = CountingSink::default();
    let session = SessionController::new(vertical(2), 8, 8, &mut sink).unwrap();
    let mut camera = source(8, 8, 100);
    let mut window =
        FakeWindow::scripted([None, None, None, None, Some(Action::Export), Some(Action::Terminate)]);

    let summary = runner::run(&mut camera, &mut window, session, &AtomicBool::new(false));

    assert_eq!(summary.exit, ExitReason::UserQuit);
    assert_eq!(summary.ticks, 6);
    assert_eq!(summary.exports, 1);
    assert_eq!(summary.discarded, 1);
    assert_eq!(sink.written, vec![5]);
}

#[test]
fn test_camera_failure_ends_the_session() {
    let session = SessionController::new(vertical(1), 4, 4, CountingSink::default()).unwrap();
    let mut camera = source(4, 4, 7);
    let mut window = FakeWindow::default();

    let summary = runner::run(&mut camera, &mut window, session, &AtomicBool::new(false));

    assert!(matches!(summary.exit, ExitReason::SourceFailed(ref msg) if msg.contains("unplugged")));
    assert!(summary.exit.is_clean());
    assert_eq!(summary.ticks, 7);
    assert_eq!(summary.discarded, 7);
}

#[test]
fn test_only_a_broken_display_is_an_unclean_exit() {
    assert!(ExitReason::UserQuit.is_clean());
    assert!(ExitReason::WindowClosed.is_clean());
    assert!(ExitReason::Interrupted.is_clean());
    assert!(ExitReason::SourceFailed("timeout".to_string()).is_clean());
    assert!(!ExitReason::DisplayFailed("lost surface".to_string()).is_clean());
}

#[test]
fn test_closing_the_window_ends_the_session() {
    let session = SessionController::new(vertical(1), 4, 4, CountingSink::default()).unwrap();
    let mut camera = source(4, 4, 100);
    let mut window = FakeWindow {
        close_after: Some(5),
        ..Default::default()
    };

    let summary = runner::run(&mut camera, &mut window, session, &AtomicBool::new(false));

    assert_eq!(summary.exit, ExitReason::WindowClosed);
    assert_eq!(summary.ticks, 5);
}

#[test]
fn test_interrupt_flag_is_checked_before_reading() {
    let session = SessionController::new(vertical(1), 4, 4, CountingSink::default()).unwrap();
    let mut camera = source(4, 4, 100);
    let mut window = FakeWindow::default();

    let summary = runner::run(&mut camera, &mut window, session, &AtomicBool::new(true));

    assert_eq!(summary.exit, ExitReason::Interrupted);
    assert_eq!(summary.ticks, 0);
    assert_eq!(camera.remaining, 100);
}

#[test]
fn test_mismatched_frames_are_skipped_not_fatal() {
    let session = SessionController::new(vertical(1), 6, 6, CountingSink::default()).unwrap();
    let mut camera = source(4, 4, 3);
    let mut window = FakeWindow::default();

    let summary = runner::run(&mut camera, &mut window, session, &AtomicBool::new(false));

    assert!(matches!(summary.exit, ExitReason::SourceFailed(_)));
    assert_eq!(summary.ticks, 3);
    assert_eq!(summary.skipped, 3);
    assert_eq!(summary.discarded, 0);
    assert!(window.presented.is_empty());
}
