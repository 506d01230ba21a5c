//! In-memory recording of composed frames and on-demand export.
//!
//! Frames accumulate for the whole session and are only released by an export
//! or a reset. Memory grows with session length; streaming straight to the sink
//! would bound it.

mod sink;

pub use sink::{build_ffmpeg_args, FfmpegSink, SinkError, VideoSink};

use std::path::PathBuf;

use crate::frame::Frame;

/// Frame rate of exported videos.
pub const DEFAULT_EXPORT_FPS: f64 = 20.0;

/// Result of an export request that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    /// Nothing recorded since the last export or reset
    Empty,
    /// Export refused because no scan axis has completed yet
    NotReady,
    /// Frames written to `path` and cleared from memory
    Exported { path: PathBuf, frames: usize },
}

/// Accumulates composed frames while active and hands them to a [`VideoSink`].
#[derive(Debug)]
pub struct RecordingController {
    active: bool,
    frames: Vec<Frame>,
    fps: f64,
    dims: (u32, u32),
}

impl RecordingController {
    /// Start recording immediately at `dims`, exporting at `fps`.
    pub fn new(dims: (u32, u32), fps: f64) -> Self {
        Self {
            active: true,
            frames: Vec::new(),
            fps,
            dims,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Store `frame` if recording is active.
    pub fn append(&mut self, frame: Frame) {
        if self.active {
            self.frames.push(frame);
        }
    }

    /// Drop stored frames; returns how many were discarded.
    pub fn clear(&mut self) -> usize {
        let n = self.frames.len();
        self.frames.clear();
        n
    }

    /// Clear stored frames and resume recording.
    pub fn reset(&mut self) {
        self.clear();
        self.active = true;
    }

    /// Write all stored frames, in order, to `sink` and clear them.
    ///
    /// An empty recording is a no-op. On sink failure the frames are kept so the
    /// export can be retried.
    pub fn export<S: VideoSink + ?Sized>(&mut self, sink: &mut S) -> Result<ExportOutcome, SinkError> {
        if self.frames.is_empty() {
            log::warn!("No frames to save");
            return Ok(ExportOutcome::Empty);
        }

        let path = sink.write(&self.frames, self.fps, self.dims)?;
        let frames = self.clear();
        log::info!("Video saved: {} ({} frames)", path.display(), frames);
        Ok(ExportOutcome::Exported { path, frames })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CollectingSink {
        calls: Vec<(usize, f64, (u32, u32))>,
        first_pixels: Vec<u8>,
        fail: bool,
    }

    impl VideoSink for CollectingSink {
        fn write(&mut self, frames: &[Frame], fps: f64, dims: (u32, u32)) -> Result<PathBuf, SinkError> {
            if self.fail {
                return Err(SinkError::ProcessFailed {
                    exit_code: Some(1),
                    stderr: String::new(),
                });
            }
            self.calls.push((frames.len(), fps, dims));
            self.first_pixels = frames.iter().map(|f| f.data[0]).collect();
            Ok(PathBuf::from("memory.avi"))
        }
    }

    fn numbered(n: u8) -> Frame {
        Frame::from_fn(2, 2, |_, _| [n, 0, 0])
    }

    #[test]
    fn test_append_only_when_active() {
        let mut rec = RecordingController::new((2, 2), DEFAULT_EXPORT_FPS);
        rec.append(numbered(1));
        rec.active = false;
        rec.append(numbered(2));
        assert_eq!(rec.len(), 1);
    }

    #[test]
    fn test_export_empty_is_noop() {
        let mut rec = RecordingController::new((2, 2), DEFAULT_EXPORT_FPS);
        let mut sink = CollectingSink::default();
        assert_eq!(rec.export(&mut sink).unwrap(), ExportOutcome::Empty);
        assert!(sink.calls.is_empty());
    }

    #[test]
    fn test_export_preserves_order_and_drains() {
        let mut rec = RecordingController::new((2, 2), 20.0);
        for n in 1..=5 {
            rec.append(numbered(n));
        }
        let mut sink = CollectingSink::default();
        let outcome = rec.export(&mut sink).unwrap();
        assert_eq!(
            outcome,
            ExportOutcome::Exported {
                path: PathBuf::from("memory.avi"),
                frames: 5
            }
        );
        assert_eq!(sink.calls, vec![(5, 20.0, (2, 2))]);
        assert_eq!(sink.first_pixels, vec![1, 2, 3, 4, 5]);
        assert!(rec.is_empty());
        assert!(rec.is_active());
    }

    #[test]
    fn test_failed_export_keeps_frames() {
        let mut rec = RecordingController::new((2, 2), 20.0);
        rec.append(numbered(1));
        let mut sink = CollectingSink {
            fail: true,
            ..Default::default()
        };
        assert!(rec.export(&mut sink).is_err());
        assert_eq!(rec.len(), 1);
    }

    #[test]
    fn test_reset_reactivates() {
        let mut rec = RecordingController::new((2, 2), 20.0);
        rec.append(numbered(1));
        rec.active = false;
        rec.reset();
        assert!(rec.is_empty());
        assert!(rec.is_active());
    }
}
