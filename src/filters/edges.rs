//! Canny-style edge map.
//!
//! Pipeline: luma → Sobel gradients (replicated border) → non-maximum suppression
//! along the gradient direction → double threshold → hysteresis.
//!
//! The Sobel kernels used are:
//! ```text
//! Gx:          Gy:
//! [-1  0  1]   [-1 -2 -1]
//! [-2  0  2]   [ 0  0  0]
//! [-1  0  1]   [ 1  2  1]
//! ```
//!
//! Magnitude is the L1 norm `|gx| + |gy|`. Because the border is replicated the
//! filter also works on the thin strips a scan step produces.

use super::color::luma;
use crate::frame::{Frame, CHANNELS};

/// Gradient magnitude below which a pixel is never an edge.
pub const EDGE_LOW_THRESHOLD: i32 = 100;
/// Gradient magnitude at or above which a pixel is always an edge.
pub const EDGE_HIGH_THRESHOLD: i32 = 200;

const SOBEL_X: [[i32; 3]; 3] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];
const SOBEL_Y: [[i32; 3]; 3] = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

/// Edge pixels become white, everything else black; replicated to three channels.
pub fn edge_detect(frame: &Frame) -> Frame {
    let w = frame.width as usize;
    let h = frame.height as usize;
    if w == 0 || h == 0 {
        return frame.clone();
    }

    let gray: Vec<i32> = frame
        .data
        .chunks_exact(CHANNELS)
        .map(|px| luma(px) as i32)
        .collect();
    let at = |x: isize, y: isize| -> i32 {
        let cx = x.clamp(0, w as isize - 1) as usize;
        let cy = y.clamp(0, h as isize - 1) as usize;
        gray[cy * w + cx]
    };

    let mut magnitude = vec![0i32; w * h];
    let mut gx_map = vec![0i32; w * h];
    let mut gy_map = vec![0i32; w * h];
    for y in 0..h {
        for x in 0..w {
            let mut gx = 0;
            let mut gy = 0;
            for (ky, (row_x, row_y)) in SOBEL_X.iter().zip(SOBEL_Y.iter()).enumerate() {
                for kx in 0..3 {
                    let v = at(x as isize + kx as isize - 1, y as isize + ky as isize - 1);
                    gx += v * row_x[kx];
                    gy += v * row_y[kx];
                }
            }
            let i = y * w + x;
            gx_map[i] = gx;
            gy_map[i] = gy;
            magnitude[i] = gx.abs() + gy.abs();
        }
    }

    let mag_at = |x: isize, y: isize| -> i32 {
        if x < 0 || y < 0 || x >= w as isize || y >= h as isize {
            0
        } else {
            magnitude[y as usize * w + x as usize]
        }
    };

    // 0 = suppressed, 1 = weak, 2 = strong
    let mut class = vec![0u8; w * h];
    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            let m = magnitude[i];
            if m < EDGE_LOW_THRESHOLD {
                continue;
            }
            let (dx, dy) = gradient_step(gx_map[i], gy_map[i]);
            let (xi, yi) = (x as isize, y as isize);
            // Ties toward the positive step are kept so plateaus stay one pixel wide.
            if m <= mag_at(xi - dx, yi - dy) || m < mag_at(xi + dx, yi + dy) {
                continue;
            }
            class[i] = if m >= EDGE_HIGH_THRESHOLD { 2 } else { 1 };
        }
    }

    let mut edges = vec![false; w * h];
    let mut stack: Vec<usize> = (0..w * h).filter(|&i| class[i] == 2).collect();
    for &i in &stack {
        edges[i] = true;
    }
    while let Some(i) = stack.pop() {
        let (x, y) = ((i % w) as isize, (i / w) as isize);
        for ny in (y - 1)..=(y + 1) {
            for nx in (x - 1)..=(x + 1) {
                if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                    continue;
                }
                let j = ny as usize * w + nx as usize;
                if class[j] == 1 && !edges[j] {
                    edges[j] = true;
                    stack.push(j);
                }
            }
        }
    }

    let mut out = frame.clone();
    for (px, &edge) in out.data.chunks_exact_mut(CHANNELS).zip(edges.iter()) {
        px.fill(if edge { 255 } else { 0 });
    }
    out
}

/// Quantise the gradient direction to one of four neighbour steps.
fn gradient_step(gx: i32, gy: i32) -> (isize, isize) {
    let ax = gx.abs() as f32;
    let ay = gy.abs() as f32;
    // tan(22.5°) ≈ 0.4142
    if ay <= ax * 0.4142 {
        (1, 0)
    } else if ax <= ay * 0.4142 {
        (0, 1)
    } else if (gx > 0) == (gy > 0) {
        (1, 1)
    } else {
        (1, -1)
    }
}
