//! Merges the committed canvas with the live frame and draws the status overlays.
//!
//! Which part of the output comes from the canvas depends on the scan axis:
//!
//! | axis       | committed region                  |
//! |------------|-----------------------------------|
//! | Vertical   | rows `[0, position_v)`            |
//! | Horizontal | columns `[0, position_h)`         |
//! | Both       | columns `[0, position_h)` ∩ rows `[0, position_v)` |
//!
//! Everything else is copied from the live frame unfiltered.

use super::buffer::PersistentBuffer;
use super::overlay::{self, Rgb};
use super::state::{ScanAxis, ScanState};
use crate::filters::FilterKind;
use crate::frame::{Frame, OutOfBounds, Region};

/// Overlay margin from the frame edge, in pixels.
const MARGIN: u32 = 20;

/// Key bindings shown along the bottom edge.
pub const HELP_TEXT: &str = "ESC: QUIT | SPACE: PAUSE | R: RESET | S: SAVE | F: FILTER";

/// Presentation-only state drawn on top of the composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusOverlay {
    pub recording: bool,
    pub filter: FilterKind,
    pub paused: bool,
}

/// Composite renderer. Holds drawing options only; all scan state is passed in.
#[derive(Debug, Clone)]
pub struct Compositor {
    /// Pointer line thickness in pixels
    pub pointer_thickness: u32,
    /// Draw the key help line at the bottom
    pub show_help: bool,
}

impl Default for Compositor {
    fn default() -> Self {
        Self {
            pointer_thickness: 2,
            show_help: true,
        }
    }
}

impl Compositor {
    /// Region of the output that shows committed pixels.
    pub fn committed_region(state: &ScanState) -> Region {
        let (width, height) = state.dimensions();
        match state.axis() {
            ScanAxis::None => Region::new(0, 0, 0, 0),
            ScanAxis::Vertical => Region::new(0, 0, width, state.position_v),
            ScanAxis::Horizontal => Region::new(0, 0, state.position_h, height),
            ScanAxis::Both => Region::new(0, 0, state.position_h, state.position_v),
        }
    }

    /// Build the composite for this tick, pointer lines included.
    pub fn render(&self, live: &Frame, buffer: &PersistentBuffer, state: &ScanState) -> Result<Frame, OutOfBounds> {
        let mut out = live.clone();
        out.copy_region_from(buffer.frame(), Self::committed_region(state))?;

        let axis = state.axis();
        if axis.scans_vertically() && !state.completed_v {
            let color = if axis == ScanAxis::Both {
                overlay::GREEN
            } else {
                overlay::BLUE
            };
            overlay::draw_hline(&mut out, state.position_v, self.pointer_thickness, color);
        }
        if axis.scans_horizontally() && !state.completed_h {
            overlay::draw_vline(&mut out, state.position_h, self.pointer_thickness, overlay::BLUE);
        }
        Ok(out)
    }

    /// Draw recording marker, filter name, pause marker and key help onto `frame`.
    pub fn draw_overlays(&self, frame: &mut Frame, status: &StatusOverlay) {
        let width = frame.width;
        if status.recording {
            overlay::draw_text(frame, MARGIN, MARGIN, "REC", overlay::RED, 2);
        }

        let label = format!("FILTER: {}", status.filter.name());
        let label_x = width.saturating_sub(overlay::text_width(&label, 2) + MARGIN);
        overlay::draw_text(frame, label_x, MARGIN, &label, overlay::CYAN, 2);

        if status.paused {
            draw_centered(frame, "||", MARGIN, overlay::ORANGE, 3);
        }

        if self.show_help {
            let y = frame.height.saturating_sub(MARGIN + overlay::text_height(1));
            overlay::draw_text(frame, MARGIN, y, HELP_TEXT, overlay::WHITE, 1);
        }
    }
}

fn draw_centered(frame: &mut Frame, text: &str, y: u32, color: Rgb, scale: u32) {
    let x = (frame.width / 2).saturating_sub(overlay::text_width(text, scale) / 2);
    overlay::draw_text(frame, x, y, text, color, scale);
}
