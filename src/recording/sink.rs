//! Video sinks: where exported recordings go.
//!
//! [`FfmpegSink`] spawns an `ffmpeg` child process, streams raw RGB24 frames to
//! its stdin and lets it encode an AVI file named after the export time.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::frame::Frame;

/// Errors that can occur while writing a recording.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// FFmpeg executable not found
    #[error("FFmpeg not found at '{}'. Install ffmpeg or set recording.ffmpeg in the config file", .0.display())]
    FfmpegNotFound(PathBuf),
    /// Failed to spawn FFmpeg process
    #[error("Failed to spawn FFmpeg: {0}")]
    SpawnFailed(std::io::Error),
    /// FFmpeg process exited with non-zero status
    #[error("FFmpeg exited with code {exit_code:?}\n{stderr}")]
    ProcessFailed { exit_code: Option<i32>, stderr: String },
    /// A frame did not match the declared dimensions
    #[error("Frame {index} is {got_width}x{got_height}, expected {width}x{height}")]
    FrameSize {
        index: usize,
        width: u32,
        height: u32,
        got_width: u32,
        got_height: u32,
    },
    /// Could not create the output directory
    #[error("Failed to create output directory '{}': {source}", path.display())]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// I/O error while streaming frames
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Consumer of an ordered frame sequence.
pub trait VideoSink {
    /// Write `frames` in order at `fps`, each `dims.0`×`dims.1`. Returns where the video went.
    fn write(&mut self, frames: &[Frame], fps: f64, dims: (u32, u32)) -> Result<PathBuf, SinkError>;
}

impl<S: VideoSink + ?Sized> VideoSink for &mut S {
    fn write(&mut self, frames: &[Frame], fps: f64, dims: (u32, u32)) -> Result<PathBuf, SinkError> {
        (**self).write(frames, fps, dims)
    }
}

impl<S: VideoSink + ?Sized> VideoSink for Box<S> {
    fn write(&mut self, frames: &[Frame], fps: f64, dims: (u32, u32)) -> Result<PathBuf, SinkError> {
        (**self).write(frames, fps, dims)
    }
}

/// Encodes recordings with an external `ffmpeg` binary.
#[derive(Debug, Clone)]
pub struct FfmpegSink {
    ffmpeg: PathBuf,
    output_dir: PathBuf,
}

impl FfmpegSink {
    pub fn new(ffmpeg: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            output_dir: output_dir.into(),
        }
    }

    /// `time_warp_YYYYMMDD-HHMMSS.avi` inside the output directory.
    pub fn next_output_path(&self) -> PathBuf {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        self.output_dir.join(format!("time_warp_{}.avi", stamp))
    }
}

/// Build the ffmpeg argument list for raw RGB24 on stdin → XviD-tagged MPEG-4 AVI.
pub fn build_ffmpeg_args(width: u32, height: u32, fps: f64, output: &Path) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        // Raw RGB input from stdin
        "-f".to_string(),
        "rawvideo".to_string(),
        "-pix_fmt".to_string(),
        "rgb24".to_string(),
        "-s".to_string(),
        format!("{}x{}", width, height),
        "-r".to_string(),
        format!("{}", fps),
        "-i".to_string(),
        "-".to_string(),
        "-c:v".to_string(),
        "mpeg4".to_string(),
        "-vtag".to_string(),
        "xvid".to_string(),
        "-q:v".to_string(),
        "3".to_string(),
        output.to_string_lossy().to_string(),
    ]
}

fn check_frames(frames: &[Frame], (width, height): (u32, u32)) -> Result<(), SinkError> {
    match frames
        .iter()
        .enumerate()
        .find(|(_, f)| f.dimensions() != (width, height))
    {
        Some((index, f)) => Err(SinkError::FrameSize {
            index,
            width,
            height,
            got_width: f.width,
            got_height: f.height,
        }),
        None => Ok(()),
    }
}

impl VideoSink for FfmpegSink {
    fn write(&mut self, frames: &[Frame], fps: f64, dims: (u32, u32)) -> Result<PathBuf, SinkError> {
        check_frames(frames, dims)?;

        std::fs::create_dir_all(&self.output_dir).map_err(|source| SinkError::OutputDir {
            path: self.output_dir.clone(),
            source,
        })?;

        let output = self.next_output_path();
        let args = build_ffmpeg_args(dims.0, dims.1, fps, &output);
        log::info!("Saving video: {}", output.display());
        log::debug!("ffmpeg {}", args.join(" "));

        let mut child = Command::new(&self.ffmpeg)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    SinkError::FfmpegNotFound(self.ffmpeg.clone())
                } else {
                    SinkError::SpawnFailed(e)
                }
            })?;

        // Feed frames; a write error usually means ffmpeg died, so fall through
        // to collect its exit status and stderr.
        let mut write_error = None;
        if let Some(mut stdin) = child.stdin.take() {
            for frame in frames {
                if let Err(e) = stdin.write_all(&frame.data) {
                    write_error = Some(e);
                    break;
                }
            }
        }

        let result = child.wait_with_output()?;
        if !result.status.success() {
            return Err(SinkError::ProcessFailed {
                exit_code: result.status.code(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        if let Some(e) = write_error {
            return Err(SinkError::Io(e));
        }

        Ok(output)
    }
}
