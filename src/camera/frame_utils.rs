//! Color conversion and frame flipping.

use nokhwa::pixel_format::RgbFormat;
use std::time::Instant;

use super::types::Frame;
use crate::error::TrackerError;

/// Decode a nokhwa buffer (MJPEG, YUYV, NV12, ...) into an RGB frame.
pub fn convert_to_rgb(buffer: &nokhwa::Buffer) -> Result<Frame, TrackerError> {
    let decoded = buffer
        .decode_image::<RgbFormat>()
        .map_err(|e| TrackerError::AcquisitionFailed(e.to_string()))?;
    let resolution = buffer.resolution();

    let frame = Frame {
        data: decoded.into_raw(),
        width: resolution.width(),
        height: resolution.height(),
        timestamp: Instant::now(),
    };
    if frame.is_empty() {
        return Err(TrackerError::AcquisitionFailed("empty frame".to_string()));
    }
    Ok(frame)
}

/// Flip a frame left-right in place.
pub fn mirror_horizontal(frame: &mut Frame) {
    let width = frame.width as usize;
    let bpp = Frame::BYTES_PER_PIXEL;
    if width == 0 {
        return;
    }

    for row in frame.data.chunks_exact_mut(width * bpp) {
        for x in 0..width / 2 {
            let left = x * bpp;
            let right = (width - 1 - x) * bpp;
            for i in 0..bpp {
                row.swap(left + i, right + i);
            }
        }
    }
}
