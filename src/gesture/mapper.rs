//! Fingertip to cursor mapping.

use std::time::Instant;

use super::click::{evaluate_click, ClickState, DEFAULT_PINCH_THRESHOLD_PX};
use super::landmarks::{
    index, primary_hand, FrameGeometry, HandLandmarks, NormalizedLandmark, ScreenGeometry,
    ScreenPoint,
};

/// Map the index fingertip to screen coordinates.
///
/// The fingertip is scaled to frame pixels, then by `screen / frame` on each
/// axis. No clamping: out-of-range landmarks land off-screen. Returns `None`
/// when the list has no index 8.
pub fn map_pointer(
    landmarks: &[NormalizedLandmark],
    frame: FrameGeometry,
    screen: ScreenGeometry,
) -> Option<ScreenPoint> {
    let tip = landmarks.get(index::INDEX_FINGER_TIP)?;
    if frame.width == 0 || frame.height == 0 {
        return None;
    }
    let (px, py) = tip.to_pixels(frame);
    let sx = px * (f64::from(screen.width) / f64::from(frame.width));
    let sy = py * (f64::from(screen.height) / f64::from(frame.height));
    Some(ScreenPoint {
        x: sx.round() as i32,
        y: sy.round() as i32,
    })
}

/// What the injector should do for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GestureOutput {
    pub pointer: Option<ScreenPoint>,
    pub click: bool,
}

/// Screen geometry plus the pinch threshold, the fixed inputs of the mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureMapper {
    pub screen: ScreenGeometry,
    pub pinch_threshold_px: f64,
}

impl GestureMapper {
    pub fn new(screen: ScreenGeometry) -> Self {
        Self {
            screen,
            pinch_threshold_px: DEFAULT_PINCH_THRESHOLD_PX,
        }
    }

    pub fn with_pinch_threshold(mut self, threshold_px: f64) -> Self {
        self.pinch_threshold_px = threshold_px;
        self
    }

    pub fn map_pointer(
        &self,
        landmarks: &[NormalizedLandmark],
        frame: FrameGeometry,
    ) -> Option<ScreenPoint> {
        map_pointer(landmarks, frame, self.screen)
    }

    pub fn evaluate_click(
        &self,
        landmarks: &[NormalizedLandmark],
        frame: FrameGeometry,
        state: ClickState,
        now: Instant,
    ) -> (bool, ClickState) {
        evaluate_click(landmarks, frame, state, now, self.pinch_threshold_px)
    }

    /// Run both mappings on the primary hand of a detection result.
    ///
    /// Zero hands yields an empty output and the unchanged state.
    pub fn process(
        &self,
        hands: &[HandLandmarks],
        frame: FrameGeometry,
        state: ClickState,
        now: Instant,
    ) -> (GestureOutput, ClickState) {
        let Some(hand) = primary_hand(hands) else {
            return (GestureOutput::default(), state);
        };

        let pointer = self.map_pointer(&hand.points, frame);
        let (click, state) = self.evaluate_click(&hand.points, frame, state, now);
        (GestureOutput { pointer, click }, state)
    }
}
