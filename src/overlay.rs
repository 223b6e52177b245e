//! Landmark overlay drawn onto frames before display.

use crate::camera::Frame;
use crate::gesture::HandLandmarks;

pub const MARKER_RADIUS: i32 = 5;
pub const MARKER_THICKNESS: i32 = 2;
pub const MARKER_COLOR: [u8; 3] = [0, 255, 0];

/// Draw a ring of `thickness` px whose outer edge is `radius` px from (cx, cy).
///
/// Pixels outside the frame are skipped.
pub fn draw_ring(frame: &mut Frame, cx: i32, cy: i32, radius: i32, thickness: i32, color: [u8; 3]) {
    let outer = radius * radius;
    let inner_r = (radius - thickness).max(0);
    let inner = inner_r * inner_r;
    let width = frame.width as i32;
    let height = frame.height as i32;

    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let d2 = dx * dx + dy * dy;
            if d2 > outer || d2 < inner {
                continue;
            }
            let (x, y) = (cx.saturating_add(dx), cy.saturating_add(dy));
            if x < 0 || y < 0 || x >= width || y >= height {
                continue;
            }
            let i = (y as usize * frame.width as usize + x as usize) * Frame::BYTES_PER_PIXEL;
            frame.data[i..i + 3].copy_from_slice(&color);
        }
    }
}

/// Whether a ring centred at (px, py) can touch the frame at all.
fn ring_visible(px: f64, py: f64, width: u32, height: u32) -> bool {
    let reach = f64::from(MARKER_RADIUS);
    px.is_finite()
        && py.is_finite()
        && px >= -reach
        && py >= -reach
        && px <= f64::from(width) + reach
        && py <= f64::from(height) + reach
}

/// Mark every landmark of `hand` on the frame.
///
/// Landmarks far outside the frame are skipped.
pub fn draw_landmarks(frame: &mut Frame, hand: &HandLandmarks) {
    let geometry = frame.geometry();
    for point in &hand.points {
        let (px, py) = point.to_pixels(geometry);
        if !ring_visible(px, py, geometry.width, geometry.height) {
            continue;
        }
        draw_ring(
            frame,
            px as i32,
            py as i32,
            MARKER_RADIUS,
            MARKER_THICKNESS,
            MARKER_COLOR,
        );
    }
}
