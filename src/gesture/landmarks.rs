//! Hand landmark and geometry types.

use serde::Deserialize;

/// Indices into the 21-point hand topology.
pub mod index {
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_TIP: usize = 8;
    /// Points per hand in the full topology
    pub const COUNT: usize = 21;
}

/// A landmark in normalized frame coordinates.
///
/// `x` and `y` are fractions of the frame width/height and are nominally in
/// `[0, 1]`; detectors occasionally overshoot and that is passed through.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct NormalizedLandmark {
    pub x: f32,
    pub y: f32,
    /// Depth relative to the wrist
    #[serde(default)]
    pub z: f32,
}

impl NormalizedLandmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Position in frame pixels.
    pub fn to_pixels(&self, frame: FrameGeometry) -> (f64, f64) {
        (
            f64::from(self.x) * f64::from(frame.width),
            f64::from(self.y) * f64::from(frame.height),
        )
    }
}

/// One detected hand.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HandLandmarks {
    pub points: Vec<NormalizedLandmark>,
    /// Detection confidence (0.0 to 1.0)
    pub score: f32,
    /// "Left" or "Right", when the detector reports it
    pub handedness: Option<String>,
}

impl HandLandmarks {
    pub fn new(points: Vec<NormalizedLandmark>, score: f32) -> Self {
        Self {
            points,
            score,
            handedness: None,
        }
    }
}

/// Pick the hand to track: highest score, earliest on ties.
pub fn primary_hand(hands: &[HandLandmarks]) -> Option<&HandLandmarks> {
    hands.iter().fold(None, |best: Option<&HandLandmarks>, hand| match best {
        Some(b) if b.score >= hand.score => Some(b),
        _ => Some(hand),
    })
}

/// Camera frame size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGeometry {
    pub width: u32,
    pub height: u32,
}

/// Target display size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenGeometry {
    pub width: u32,
    pub height: u32,
}

/// Absolute cursor position. May lie off-screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}
