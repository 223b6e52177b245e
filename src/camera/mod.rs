//! Webcam access and frame acquisition.
//!
//! - Device enumeration via [`list_devices`]
//! - Blocking capture via [`Webcam`], behind the [`FrameSource`] seam
//! - Configuration via [`CameraSettings`] and [`Resolution`]

mod capture;
mod device;
mod frame_utils;
mod types;

pub use capture::Webcam;
pub use device::list_devices;
pub use types::{CameraInfo, CameraSettings, Frame, Resolution};

use crate::error::TrackerError;

/// Anything that yields RGB frames.
pub trait FrameSource {
    /// Block until the next frame is available.
    ///
    /// `TrackerError::AcquisitionFailed` is transient: the caller skips the
    /// iteration and asks again.
    fn read_frame(&mut self) -> Result<Frame, TrackerError>;
}
