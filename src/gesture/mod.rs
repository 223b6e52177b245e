//! Gesture to pointer mapping.
//!
//! The index fingertip (landmark 8) drives the cursor; a thumb-tip/index-tip
//! pinch fires a left click, debounced by [`ClickState`].

mod click;
mod landmarks;
mod mapper;

pub use click::{
    evaluate_click, pinch_distance, ClickState, FirstClick, DEFAULT_COOLDOWN,
    DEFAULT_PINCH_THRESHOLD_PX,
};
pub use landmarks::{
    index, primary_hand, FrameGeometry, HandLandmarks, NormalizedLandmark, ScreenGeometry,
    ScreenPoint,
};
pub use mapper::{map_pointer, GestureMapper, GestureOutput};
