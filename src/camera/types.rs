//! Camera types and data structures.

use std::fmt;
use std::time::Instant;

use crate::gesture::FrameGeometry;

/// Information about an available camera device.
#[derive(Debug, Clone)]
pub struct CameraInfo {
    /// Device index for selection
    pub index: u32,
    /// Human-readable device name
    pub name: String,
    /// Device description
    pub description: String,
}

impl fmt::Display for CameraInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.index, self.name, self.description)
    }
}

/// Requested capture resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// 640x480, what most landmark models are happy with
    pub const VGA: Resolution = Resolution {
        width: 640,
        height: 480,
    };
}

impl Default for Resolution {
    fn default() -> Self {
        Self::VGA
    }
}

/// A captured RGB camera frame (3 bytes per pixel, row-major).
#[derive(Debug, Clone)]
pub struct Frame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// When the frame was captured
    pub timestamp: Instant,
}

impl Frame {
    pub const BYTES_PER_PIXEL: usize = 3;

    /// Build a frame filled with a single color. Mostly useful in tests.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * Self::BYTES_PER_PIXEL)
            .collect();
        Self {
            data,
            width,
            height,
            timestamp: Instant::now(),
        }
    }

    pub fn geometry(&self) -> FrameGeometry {
        FrameGeometry {
            width: self.width,
            height: self.height,
        }
    }

    /// A frame with no pixels, or whose buffer doesn't match its dimensions.
    pub fn is_empty(&self) -> bool {
        self.width == 0
            || self.height == 0
            || self.data.len() != self.width as usize * self.height as usize * Self::BYTES_PER_PIXEL
    }

    /// RGB value at (x, y), `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * Self::BYTES_PER_PIXEL;
        self.data.get(i..i + 3).map(|p| [p[0], p[1], p[2]])
    }
}

/// Settings for camera capture.
#[derive(Debug, Clone)]
pub struct CameraSettings {
    /// Camera device index
    pub device_index: u32,
    /// Capture resolution
    pub resolution: Resolution,
    /// Target FPS (actual may vary)
    pub fps: u32,
    /// Mirror horizontally (selfie mode)
    pub mirror: bool,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            device_index: 0,
            resolution: Resolution::default(),
            fps: 30,
            mirror: false,
        }
    }
}
