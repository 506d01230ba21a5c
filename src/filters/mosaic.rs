//! Block pixelation.

use crate::frame::{Frame, CHANNELS};

/// Each output block covers roughly this many source pixels per side.
pub const MOSAIC_FACTOR: u32 = 10;

/// Downsample to `max(1, dim / 10)` per side by averaging, then scale back up
/// with nearest-neighbour sampling.
///
/// When the target is not strictly smaller than the source on both sides the
/// input is returned unchanged.
pub fn mosaic(frame: &Frame) -> Frame {
    let (w, h) = frame.dimensions();
    let small_w = (w / MOSAIC_FACTOR).max(1);
    let small_h = (h / MOSAIC_FACTOR).max(1);
    if small_w >= w || small_h >= h {
        return frame.clone();
    }
    let small = downsample_average(frame, small_w, small_h);
    upsample_nearest(&small, w, h)
}

/// Area-average downsample. Cell bounds use the same float mapping as the
/// nearest-neighbour upsample so blocks line up.
fn downsample_average(frame: &Frame, out_w: u32, out_h: u32) -> Frame {
    let cell_w = frame.width as f32 / out_w as f32;
    let cell_h = frame.height as f32 / out_h as f32;
    let mut out = Frame::zeroed(out_w, out_h);

    for cy in 0..out_h {
        for cx in 0..out_w {
            let start_x = (cx as f32 * cell_w) as u32;
            let end_x = (((cx + 1) as f32 * cell_w) as u32).min(frame.width).max(start_x + 1);
            let start_y = (cy as f32 * cell_h) as u32;
            let end_y = (((cy + 1) as f32 * cell_h) as u32).min(frame.height).max(start_y + 1);

            let mut sum = [0u32; CHANNELS];
            let mut count = 0u32;
            for py in start_y..end_y {
                for px in start_x..end_x {
                    let rgb = frame.pixel(px, py);
                    for c in 0..CHANNELS {
                        sum[c] += rgb[c] as u32;
                    }
                    count += 1;
                }
            }
            let avg = sum.map(|s| ((s + count / 2) / count) as u8);
            out.put_pixel(cx, cy, avg);
        }
    }
    out
}

fn upsample_nearest(small: &Frame, out_w: u32, out_h: u32) -> Frame {
    Frame::from_fn(out_w, out_h, |x, y| {
        let sx = ((x as u64 * small.width as u64) / out_w as u64) as u32;
        let sy = ((y as u64 * small.height as u64) / out_h as u64) as u32;
        small.pixel(sx.min(small.width - 1), sy.min(small.height - 1))
    })
}
