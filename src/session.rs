//! Session controller: owns the scan state, canvas and recording, and advances
//! them by one tick per camera frame.
//!
//! A tick processes the frame first (advance → filter → commit → composite →
//! record) and then applies at most one action. A fault in the frame step
//! skips compositing and recording for that tick only; the action still runs
//! and the session carries on with the next frame.

use crate::filters::FilterKind;
use crate::frame::{Frame, OutOfBounds, Region};
use crate::recording::{ExportOutcome, RecordingController, SinkError, VideoSink, DEFAULT_EXPORT_FPS};
use crate::scan::{AdvanceReport, Compositor, PersistentBuffer, ScanAxis, ScanState, SessionPhase, StatusOverlay};

/// Discrete user commands, independent of the input device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Terminate,
    TogglePause,
    Reset,
    Export,
    CycleFilter,
}

/// Session parameters fixed at start.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub axis: ScanAxis,
    /// Pixels each pointer advances per tick
    pub speed: u32,
    /// Filter in effect when the session starts
    pub filter: FilterKind,
    /// Frame rate written into exported videos
    pub export_fps: f64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            axis: ScanAxis::Vertical,
            speed: 2,
            filter: FilterKind::Identity,
            export_fps: DEFAULT_EXPORT_FPS,
        }
    }
}

/// Reasons a session cannot be created.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SessionError {
    #[error("A scan axis must be selected (vertical, horizontal or both)")]
    NoScanAxis,
    #[error("Scan speed must be at least 1 pixel per frame")]
    ZeroSpeed,
    #[error("Frame dimensions must be non-zero, got {0}x{1}")]
    EmptyFrame(u32, u32),
    #[error("Export frame rate must be positive, got {0}")]
    InvalidFps(f64),
}

/// Recoverable per-tick failure. The tick is skipped and the session continues.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ScanFault {
    #[error("Frame is {got_width}x{got_height}, session expects {width}x{height}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        got_width: u32,
        got_height: u32,
    },
    #[error("Slice out of bounds: {0}")]
    Slice(#[from] OutOfBounds),
}

/// Whether the processing loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Terminate,
}

/// Everything a tick produced.
#[derive(Debug)]
pub struct TickReport {
    /// Frame to show, overlays included. `None` when the frame step faulted.
    pub display: Option<Frame>,
    pub fault: Option<ScanFault>,
    pub control: Control,
    /// Set when the tick's action was an export request
    pub export: Option<Result<ExportOutcome, SinkError>>,
}

/// Owns all mutable session state and the sink recordings are exported to.
pub struct SessionController<S: VideoSink> {
    settings: SessionSettings,
    width: u32,
    height: u32,
    state: ScanState,
    buffer: PersistentBuffer,
    recording: RecordingController,
    compositor: Compositor,
    filter: FilterKind,
    sink: S,
}

impl<S: VideoSink> std::fmt::Debug for SessionController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("settings", &self.settings)
            .field("state", &self.state)
            .field("filter", &self.filter)
            .field("recorded", &self.recording.len())
            .finish_non_exhaustive()
    }
}

impl<S: VideoSink> SessionController<S> {
    /// Start a session for `width`×`height` frames.
    pub fn new(settings: SessionSettings, width: u32, height: u32, sink: S) -> Result<Self, SessionError> {
        if settings.axis == ScanAxis::None {
            return Err(SessionError::NoScanAxis);
        }
        if settings.speed == 0 {
            return Err(SessionError::ZeroSpeed);
        }
        if width == 0 || height == 0 {
            return Err(SessionError::EmptyFrame(width, height));
        }
        if !(settings.export_fps.is_finite() && settings.export_fps > 0.0) {
            return Err(SessionError::InvalidFps(settings.export_fps));
        }

        log::info!(
            "Session started: {}x{}, axis={}, speed={}, filter={}",
            width,
            height,
            settings.axis,
            settings.speed,
            settings.filter
        );

        Ok(Self {
            state: ScanState::new(settings.axis, width, height),
            buffer: PersistentBuffer::new(width, height),
            recording: RecordingController::new((width, height), settings.export_fps),
            compositor: Compositor::default(),
            filter: settings.filter,
            settings,
            width,
            height,
            sink,
        })
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    pub fn buffer(&self) -> &PersistentBuffer {
        &self.buffer
    }

    pub fn recording(&self) -> &RecordingController {
        &self.recording
    }

    pub fn filter(&self) -> FilterKind {
        self.filter
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Process one camera frame, then apply `action` if any.
    pub fn tick(&mut self, frame: &Frame, action: Option<Action>) -> TickReport {
        let (display, fault) = match self.scan_step(frame) {
            Ok(composite) => {
                let mut display = composite.clone();
                self.recording.append(composite);
                self.compositor.draw_overlays(&mut display, &self.status());
                (Some(display), None)
            }
            Err(fault) => {
                log::warn!("Skipping frame: {}", fault);
                (None, Some(fault))
            }
        };

        let mut report = TickReport {
            display,
            fault,
            control: Control::Continue,
            export: None,
        };

        match action {
            Some(Action::Terminate) => report.control = Control::Terminate,
            Some(Action::Export) => report.export = Some(self.export()),
            Some(other) => self.apply(other),
            None => {}
        }

        report
    }

    /// Advance, commit and composite. Returns the composite without status overlays.
    fn scan_step(&mut self, frame: &Frame) -> Result<Frame, ScanFault> {
        if frame.dimensions() != (self.width, self.height) {
            return Err(ScanFault::DimensionMismatch {
                width: self.width,
                height: self.height,
                got_width: frame.width,
                got_height: frame.height,
            });
        }

        let report = self.state.advance(self.settings.speed);
        self.commit(frame, &report)?;

        if report.completed_h {
            log::info!("Horizontal scan complete");
        }
        if report.completed_v {
            log::info!("Vertical scan complete");
        }
        if report.completed_h || report.completed_v {
            log::info!("Press S to save the video");
        }

        Ok(self.compositor.render(frame, &self.buffer, &self.state)?)
    }

    /// Horizontal strip first, then vertical, so the vertical strip wins where they cross.
    fn commit(&mut self, frame: &Frame, report: &AdvanceReport) -> Result<(), ScanFault> {
        if let Some(cols) = report.horizontal.filter(|a| !a.is_empty()) {
            let region = Region::new(cols.start, 0, cols.len(), self.height);
            self.buffer.commit(frame, region, self.filter)?;
        }
        if let Some(rows) = report.vertical.filter(|a| !a.is_empty()) {
            let region = Region::new(0, rows.start, self.width, rows.len());
            self.buffer.commit(frame, region, self.filter)?;
        }
        Ok(())
    }

    fn status(&self) -> StatusOverlay {
        StatusOverlay {
            recording: self.recording.is_active(),
            filter: self.filter,
            paused: self.state.paused,
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::TogglePause => {
                if self.state.toggle_pause() {
                    log::info!("Scan paused. Press SPACE to resume");
                } else {
                    log::info!("Scan resumed");
                }
            }
            Action::Reset => self.reset(),
            Action::CycleFilter => {
                self.filter = self.filter.next();
                log::info!("Filter changed: {}", self.filter);
            }
            Action::Terminate | Action::Export => {}
        }
    }

    /// Return to the initial state: pointers at zero, blank canvas, empty active recording.
    pub fn reset(&mut self) {
        self.state.reset();
        self.buffer.clear();
        self.recording.reset();
        log::info!("Scan reset");
    }

    /// Export the recording if at least one axis has completed.
    pub fn export(&mut self) -> Result<ExportOutcome, SinkError> {
        if !self.state.any_completed() {
            log::warn!("Scan not complete yet; nothing saved");
            return Ok(ExportOutcome::NotReady);
        }
        self.recording.export(&mut self.sink).inspect_err(|e| {
            log::error!("Failed to save video: {}", e);
        })
    }

    /// End the session, discarding any unexported frames. Returns the discarded count.
    pub fn finish(mut self) -> usize {
        let discarded = self.recording.clear();
        if discarded > 0 {
            log::info!("Discarded {} unsaved frames", discarded);
        }
        discarded
    }
}
