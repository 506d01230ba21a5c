//! Canvas holding every committed (already scanned) strip.

use crate::filters::{self, FilterKind};
use crate::frame::{Frame, OutOfBounds, Region};

/// Frame-shaped canvas, all zero until strips are committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistentBuffer {
    canvas: Frame,
}

impl PersistentBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: Frame::zeroed(width, height),
        }
    }

    pub fn frame(&self) -> &Frame {
        &self.canvas
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.canvas.dimensions()
    }

    /// Cut `region` out of `live`, run it through `filter` and store it at the same place.
    ///
    /// The region is validated against both frames before anything is written.
    pub fn commit(&mut self, live: &Frame, region: Region, filter: FilterKind) -> Result<(), OutOfBounds> {
        if live.dimensions() != self.canvas.dimensions() {
            return Err(OutOfBounds {
                region: live.bounds(),
                width: self.canvas.width,
                height: self.canvas.height,
            });
        }
        let slice = live.crop(region)?;
        if slice.is_empty() {
            return Ok(());
        }
        let filtered = filters::apply(&slice, filter);
        self.canvas.blit(&filtered, region.x, region.y)
    }

    /// Zero the canvas.
    pub fn clear(&mut self) {
        self.canvas.clear();
    }

    pub fn is_blank(&self) -> bool {
        self.canvas.data.iter().all(|&b| b == 0)
    }
}
