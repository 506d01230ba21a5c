//! Frame conversion and transformation utilities.

use nokhwa::pixel_format::RgbFormat;

use crate::frame::{Frame, CHANNELS};

/// Convert a nokhwa buffer to an RGB [`Frame`].
///
/// nokhwa's `decode_image` handles MJPEG, YUYV, NV12 and friends.
/// Returns `None` if the conversion fails (unsupported format or corrupt data).
pub fn convert_to_rgb(buffer: &nokhwa::Buffer) -> Option<Frame> {
    let decoded = buffer.decode_image::<RgbFormat>().ok()?;
    let (width, height) = decoded.dimensions();
    Frame::from_raw(width, height, decoded.into_raw())
}

/// Mirror a frame horizontally (flip left-right) for selfie mode.
pub fn mirror_horizontal(frame: &mut Frame) {
    let width = frame.width as usize;
    let height = frame.height as usize;

    for y in 0..height {
        let row_start = y * width * CHANNELS;
        let row = &mut frame.data[row_start..row_start + width * CHANNELS];

        for x in 0..width / 2 {
            let left = x * CHANNELS;
            let right = (width - 1 - x) * CHANNELS;
            for i in 0..CHANNELS {
                row.swap(left + i, right + i);
            }
        }
    }
}
