//! Point-wise colour filters.
//!
//! Frames are RGB, so [`SEPIA_MATRIX`] is applied in R, G, B order and gives the
//! usual warm brown tone. Applying the same matrix to BGR-ordered pixels, as
//! BGR-native capture stacks do, swaps the red and blue outputs and looks cold.

use crate::frame::{Frame, CHANNELS};

/// Classic sepia tone matrix; rows produce R, G, B from (R, G, B).
pub const SEPIA_MATRIX: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

pub fn identity(frame: &Frame) -> Frame {
    frame.clone()
}

/// ITU-R BT.601 luminance, integer math with coefficients scaled by 1000.
#[inline]
pub fn luma(rgb: &[u8]) -> u8 {
    let r = rgb[0] as u32;
    let g = rgb[1] as u32;
    let b = rgb[2] as u32;
    ((299 * r + 587 * g + 114 * b + 500) / 1000) as u8
}

/// Collapse to luma and replicate into all three channels.
pub fn grayscale(frame: &Frame) -> Frame {
    let mut out = frame.clone();
    for px in out.data.chunks_exact_mut(CHANNELS) {
        let y = luma(px);
        px.fill(y);
    }
    out
}

pub fn invert(frame: &Frame) -> Frame {
    let mut out = frame.clone();
    for v in out.data.iter_mut() {
        *v = 255 - *v;
    }
    out
}

/// Multiply every pixel by [`SEPIA_MATRIX`], rounding and saturating to 0..=255.
pub fn sepia(frame: &Frame) -> Frame {
    let mut out = frame.clone();
    for px in out.data.chunks_exact_mut(CHANNELS) {
        let src = [px[0] as f32, px[1] as f32, px[2] as f32];
        for (c, row) in SEPIA_MATRIX.iter().enumerate() {
            let v = row[0] * src[0] + row[1] * src[1] + row[2] * src[2];
            px[c] = v.round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luma_weights() {
        assert_eq!(luma(&[255, 255, 255]), 255);
        assert_eq!(luma(&[0, 0, 0]), 0);
        // Green dominates
        assert!(luma(&[0, 255, 0]) > luma(&[255, 0, 0]));
        assert!(luma(&[255, 0, 0]) > luma(&[0, 0, 255]));
        assert_eq!(luma(&[255, 0, 0]), 76);
    }

    #[test]
    fn test_grayscale_replicates_channels() {
        let frame = Frame::from_raw(2, 1, vec![200, 10, 10, 10, 200, 10]).unwrap();
        let out = grayscale(&frame);
        for px in out.data.chunks_exact(3) {
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
        }
        assert_ne!(out.pixel(0, 0), out.pixel(1, 0));
    }

    #[test]
    fn test_invert_values() {
        let frame = Frame::from_raw(1, 1, vec![0, 128, 255]).unwrap();
        assert_eq!(invert(&frame).data, vec![255, 127, 0]);
    }

    #[test]
    fn test_sepia_clamps_white() {
        let frame = Frame::from_raw(1, 1, vec![255, 255, 255]).unwrap();
        let out = sepia(&frame);
        // R and G rows sum above 1.0 and saturate
        assert_eq!(out.data[0], 255);
        assert_eq!(out.data[1], 255);
        assert_eq!(out.data[2], (0.937f32 * 255.0).round() as u8);
    }

    #[test]
    fn test_sepia_black_stays_black() {
        let frame = Frame::zeroed(3, 3);
        assert_eq!(sepia(&frame), frame);
    }

    #[test]
    fn test_sepia_matrix_reads_rgb_order() {
        let frame = Frame::from_raw(1, 1, vec![255, 0, 0]).unwrap();
        // Pure red picks the first column of each row
        assert_eq!(sepia(&frame).data, vec![100, 89, 69]);
    }

    #[test]
    fn test_sepia_is_warm() {
        let frame = Frame::from_raw(1, 1, vec![100, 100, 100]).unwrap();
        let px = sepia(&frame).pixel(0, 0);
        assert!(px[0] > px[1] && px[1] > px[2]);
    }
}
