//! The per-frame processing loop.
//!
//! Pulls a frame from a [`FrameSource`], takes at most one action from the
//! user interface, ticks the session and shows the result. The loop is generic
//! so it runs the same against a webcam window and against in-memory fakes.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::camera::CameraError;
use crate::display::DisplayError;
use crate::frame::Frame;
use crate::recording::{ExportOutcome, VideoSink};
use crate::session::{Action, Control, SessionController};

/// Produces camera frames, blocking until one is available.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Frame, CameraError>;
}

/// Produces user actions without blocking.
pub trait ActionInput {
    fn poll(&mut self) -> Option<Action>;
}

/// Shows composed frames to the user.
pub trait FramePresenter {
    /// `false` once the user has closed the output.
    fn is_open(&self) -> bool;

    fn present(&mut self, frame: &Frame) -> Result<(), DisplayError>;

    /// Keep the output responsive on ticks that produced no frame.
    fn refresh(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    /// The user asked to quit
    UserQuit,
    /// The output window was closed
    WindowClosed,
    /// Ctrl+C
    Interrupted,
    /// The camera stopped delivering frames
    SourceFailed(String),
    /// The output could not be updated
    DisplayFailed(String),
}

impl ExitReason {
    /// Whether the process should still exit successfully.
    ///
    /// A camera that stops delivering frames ends the session like a quit;
    /// the cause has already been logged. Only a broken display is an error.
    pub fn is_clean(&self) -> bool {
        !matches!(self, ExitReason::DisplayFailed(_))
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::UserQuit => write!(f, "quit requested"),
            ExitReason::WindowClosed => write!(f, "window closed"),
            ExitReason::Interrupted => write!(f, "interrupted"),
            ExitReason::SourceFailed(msg) => write!(f, "camera failed: {}", msg),
            ExitReason::DisplayFailed(msg) => write!(f, "display failed: {}", msg),
        }
    }
}

/// What happened over a whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub exit: ExitReason,
    pub ticks: u64,
    /// Ticks whose frame step faulted and was skipped
    pub skipped: u64,
    /// Videos written
    pub exports: u32,
    /// Recorded frames dropped at shutdown
    pub discarded: usize,
}

/// Drive `session` until the user quits, the window closes, `stop` is raised
/// or the source fails. Unexported frames are discarded on exit.
///
/// `ui` both shows frames and supplies actions, the way a window does.
pub fn run<F, U, S>(
    source: &mut F,
    ui: &mut U,
    mut session: SessionController<S>,
    stop: &AtomicBool,
) -> RunSummary
where
    F: FrameSource + ?Sized,
    U: FramePresenter + ActionInput + ?Sized,
    S: VideoSink,
{
    let mut ticks = 0;
    let mut skipped = 0;
    let mut exports = 0;

    let exit = loop {
        if stop.load(Ordering::SeqCst) {
            break ExitReason::Interrupted;
        }
        if !ui.is_open() {
            break ExitReason::WindowClosed;
        }

        let frame = match source.next_frame() {
            Ok(frame) => frame,
            Err(e) => {
                log::error!("Camera read failed: {}", e);
                break ExitReason::SourceFailed(e.to_string());
            }
        };

        let report = session.tick(&frame, ui.poll());
        ticks += 1;

        if report.fault.is_some() {
            skipped += 1;
        }
        if let Some(Ok(ExportOutcome::Exported { .. })) = report.export {
            exports += 1;
        }

        let shown = match &report.display {
            Some(display) => ui.present(display),
            None => ui.refresh(),
        };
        if let Err(e) = shown {
            log::error!("{}", e);
            break ExitReason::DisplayFailed(e.to_string());
        }

        if report.control == Control::Terminate {
            break ExitReason::UserQuit;
        }
    };

    log::info!("Stopping after {} frames: {}", ticks, exit);
    let discarded = session.finish();

    RunSummary {
        exit,
        ticks,
        skipped,
        exports,
        discarded,
    }
}
