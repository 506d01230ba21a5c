//! RGB frame buffer shared by the camera, the scan core and the video sink.

use std::fmt;

/// Bytes per pixel for the RGB24 layout every frame uses.
pub const CHANNELS: usize = 3;

/// An 8-bit RGB image stored row-major, `CHANNELS` bytes per pixel.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    /// Raw pixel data in RGB order
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// A rectangle inside a frame, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True when the region lies completely inside a `width`×`height` frame.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x.checked_add(self.width).is_some_and(|r| r <= width)
            && self.y.checked_add(self.height).is_some_and(|b| b <= height)
    }
}

/// Returned when a region does not lie inside the frame it addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error(
    "region {}x{}+{}+{} outside {width}x{height} frame",
    .region.width,
    .region.height,
    .region.x,
    .region.y
)]
pub struct OutOfBounds {
    pub region: Region,
    pub width: u32,
    pub height: u32,
}

impl Frame {
    /// Create an all-black frame.
    pub fn zeroed(width: u32, height: u32) -> Self {
        Self {
            data: vec![0; width as usize * height as usize * CHANNELS],
            width,
            height,
        }
    }

    /// Wrap raw RGB bytes. Returns `None` when the length does not match the dimensions.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != width as usize * height as usize * CHANNELS {
            return None;
        }
        Some(Self {
            data,
            width,
            height,
        })
    }

    /// Build a frame by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self {
            data,
            width,
            height,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Pixel at (x, y). Panics when out of range, like slice indexing.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Set the pixel at (x, y); writes outside the frame are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.offset(x, y);
        self.data[i..i + CHANNELS].copy_from_slice(&rgb);
    }

    /// The full frame as a region.
    pub fn bounds(&self) -> Region {
        Region::new(0, 0, self.width, self.height)
    }

    /// Copy `region` out into a new frame.
    pub fn crop(&self, region: Region) -> Result<Frame, OutOfBounds> {
        self.check(region)?;
        let row_bytes = region.width as usize * CHANNELS;
        let mut data = Vec::with_capacity(row_bytes * region.height as usize);
        for y in region.y..region.y + region.height {
            let start = self.offset(region.x, y);
            data.extend_from_slice(&self.data[start..start + row_bytes]);
        }
        Ok(Frame {
            data,
            width: region.width,
            height: region.height,
        })
    }

    /// Paste `src` with its top-left corner at (x, y). The whole of `src` must fit.
    pub fn blit(&mut self, src: &Frame, x: u32, y: u32) -> Result<(), OutOfBounds> {
        let region = Region::new(x, y, src.width, src.height);
        self.check(region)?;
        let row_bytes = src.width as usize * CHANNELS;
        for row in 0..src.height {
            let dst = self.offset(x, y + row);
            let from = row as usize * row_bytes;
            self.data[dst..dst + row_bytes].copy_from_slice(&src.data[from..from + row_bytes]);
        }
        Ok(())
    }

    /// Copy `region` of `src` into the same region of `self`. Both frames must share dimensions.
    pub fn copy_region_from(&mut self, src: &Frame, region: Region) -> Result<(), OutOfBounds> {
        self.check(region)?;
        src.check(region)?;
        let row_bytes = region.width as usize * CHANNELS;
        for y in region.y..region.y + region.height {
            let start = self.offset(region.x, y);
            let from = src.offset(region.x, y);
            self.data[start..start + row_bytes].copy_from_slice(&src.data[from..from + row_bytes]);
        }
        Ok(())
    }

    /// Zero every byte.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    fn check(&self, region: Region) -> Result<(), OutOfBounds> {
        if region.fits_within(self.width, self.height) {
            Ok(())
        } else {
            Err(OutOfBounds {
                region,
                width: self.width,
                height: self.height,
            })
        }
    }
}
