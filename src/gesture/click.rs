//! Pinch detection and click debounce.

use serde::Deserialize;
use std::time::{Duration, Instant};

use super::landmarks::{index, FrameGeometry, NormalizedLandmark};

/// Default minimum interval between two clicks
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(500);

/// Default thumb/index distance (frame pixels) below which a pinch counts
pub const DEFAULT_PINCH_THRESHOLD_PX: f64 = 50.0;

/// What happens to the first pinch after startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FirstClick {
    /// The first pinch clicks right away
    #[default]
    Immediate,
    /// The timer starts armed at startup, so pinches within the first
    /// cooldown period are ignored
    AfterCooldown,
}

/// Click debounce state.
///
/// Passed into [`evaluate_click`] and handed back, never mutated behind the
/// caller's back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickState {
    /// `None` until the first click
    pub last_click: Option<Instant>,
    pub cooldown: Duration,
}

impl ClickState {
    /// State with no previous click.
    pub fn new(cooldown: Duration) -> Self {
        Self {
            last_click: None,
            cooldown,
        }
    }

    /// State for a session starting at `now` under `policy`.
    pub fn starting_at(now: Instant, cooldown: Duration, policy: FirstClick) -> Self {
        match policy {
            FirstClick::Immediate => Self::new(cooldown),
            FirstClick::AfterCooldown => Self {
                last_click: Some(now),
                cooldown,
            },
        }
    }

    /// Whether a click may fire at `now`.
    pub fn is_armed(&self, now: Instant) -> bool {
        match self.last_click {
            None => true,
            Some(last) => now.saturating_duration_since(last) > self.cooldown,
        }
    }
}

impl Default for ClickState {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

/// Distance between thumb tip and index tip in frame pixels.
///
/// `None` if the list doesn't reach index 8.
pub fn pinch_distance(landmarks: &[NormalizedLandmark], frame: FrameGeometry) -> Option<f64> {
    let thumb = landmarks.get(index::THUMB_TIP)?;
    let tip = landmarks.get(index::INDEX_FINGER_TIP)?;
    let (x1, y1) = thumb.to_pixels(frame);
    let (x2, y2) = tip.to_pixels(frame);
    Some(((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt())
}

/// Decide whether this frame's landmarks fire a click.
///
/// Clicks when the pinch distance is under `threshold_px` and the cooldown has
/// elapsed; the returned state then records `now`. In every other case the
/// state comes back unchanged.
pub fn evaluate_click(
    landmarks: &[NormalizedLandmark],
    frame: FrameGeometry,
    state: ClickState,
    now: Instant,
    threshold_px: f64,
) -> (bool, ClickState) {
    let Some(distance) = pinch_distance(landmarks, frame) else {
        return (false, state);
    };

    if distance < threshold_px && state.is_armed(now) {
        let updated = ClickState {
            last_click: Some(now),
            ..state
        };
        (true, updated)
    } else {
        (false, state)
    }
}
