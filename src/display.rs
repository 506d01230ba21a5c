//! On-screen window showing the composed frames.

use minifb::{KeyRepeat, Window, WindowOptions};

use crate::frame::{Frame, CHANNELS};
use crate::input::ActionQueue;
use crate::runner::{ActionInput, FramePresenter};
use crate::session::Action;

/// Window title.
pub const WINDOW_TITLE: &str = "Time Warp Scan";

#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("Failed to open window: {0}")]
    Open(#[source] minifb::Error),
    #[error("Failed to update window: {0}")]
    Update(#[source] minifb::Error),
    #[error("Frame is {got_width}x{got_height}, window is {width}x{height}")]
    FrameSize {
        width: u32,
        height: u32,
        got_width: u32,
        got_height: u32,
    },
}

/// Pack an RGB frame into minifb's `0RGB` pixel layout.
pub fn pack_rgb(frame: &Frame, out: &mut Vec<u32>) {
    out.clear();
    out.extend(
        frame
            .data
            .chunks_exact(CHANNELS)
            .map(|px| (px[0] as u32) << 16 | (px[1] as u32) << 8 | px[2] as u32),
    );
}

/// A fixed-size window that presents frames and collects key presses.
pub struct DisplayWindow {
    window: Window,
    width: u32,
    height: u32,
    pixels: Vec<u32>,
    actions: ActionQueue,
}

impl std::fmt::Debug for DisplayWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplayWindow")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pending", &self.actions.len())
            .finish_non_exhaustive()
    }
}

impl DisplayWindow {
    /// Open a non-resizable window of `width`×`height` pixels.
    pub fn open(width: u32, height: u32) -> Result<Self, DisplayError> {
        let window = Window::new(
            WINDOW_TITLE,
            width as usize,
            height as usize,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )
        .map_err(DisplayError::Open)?;

        Ok(Self {
            window,
            width,
            height,
            pixels: Vec::with_capacity(width as usize * height as usize),
            actions: ActionQueue::new(),
        })
    }

    fn collect_keys(&mut self) {
        let keys = self.window.get_keys_pressed(KeyRepeat::No);
        self.actions.extend_from_keys(&keys);
    }
}

impl FramePresenter for DisplayWindow {
    fn is_open(&self) -> bool {
        self.window.is_open()
    }

    fn present(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        if frame.dimensions() != (self.width, self.height) {
            return Err(DisplayError::FrameSize {
                width: self.width,
                height: self.height,
                got_width: frame.width,
                got_height: frame.height,
            });
        }
        pack_rgb(frame, &mut self.pixels);
        self.window
            .update_with_buffer(&self.pixels, self.width as usize, self.height as usize)
            .map_err(DisplayError::Update)?;
        self.collect_keys();
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), DisplayError> {
        self.window.update();
        self.collect_keys();
        Ok(())
    }
}

impl ActionInput for DisplayWindow {
    fn poll(&mut self) -> Option<Action> {
        self.actions.pop()
    }
}
