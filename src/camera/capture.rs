//! Blocking webcam capture on the calling thread.

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat as NokhwaFrameFormat, RequestedFormat,
    RequestedFormatType,
};
use nokhwa::Camera;

use super::device::list_devices;
use super::frame_utils::{convert_to_rgb, mirror_horizontal};
use super::types::{CameraSettings, Frame, Resolution};
use super::FrameSource;
use crate::error::TrackerError;

/// An open webcam stream.
///
/// `read_frame` blocks until the device delivers the next frame. nokhwa's
/// `Camera` isn't `Send`, so the webcam stays on the thread that opened it.
pub struct Webcam {
    camera: Camera,
    settings: CameraSettings,
    resolution: Resolution,
    fps: u32,
}

impl std::fmt::Debug for Webcam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Webcam")
            .field("settings", &self.settings)
            .field("resolution", &self.resolution)
            .field("fps", &self.fps)
            .finish_non_exhaustive()
    }
}

impl Webcam {
    /// Open the camera and start its stream.
    ///
    /// # Errors
    /// * `TrackerError::DeviceUnavailable` - no such device, permission denied,
    ///   or the stream refused to start
    pub fn open(settings: CameraSettings) -> Result<Self, TrackerError> {
        let devices = list_devices()?;
        if !devices.iter().any(|d| d.index == settings.device_index) {
            return Err(TrackerError::DeviceUnavailable(format!(
                "camera {} not found. Run 'list-cameras' to see available devices",
                settings.device_index
            )));
        }

        let index = CameraIndex::Index(settings.device_index);
        let mut camera = open_camera_with_fallback(&index, &settings)?;
        camera
            .open_stream()
            .map_err(|e| TrackerError::DeviceUnavailable(format!("camera stream: {}", e)))?;

        let res = camera.resolution();
        let resolution = Resolution {
            width: res.width(),
            height: res.height(),
        };
        let fps = camera.frame_rate();
        log::info!(
            "Camera {} streaming at {}x{} @ {} fps",
            settings.device_index,
            resolution.width,
            resolution.height,
            fps
        );

        Ok(Self {
            camera,
            settings,
            resolution,
            fps,
        })
    }

    /// Resolution the device actually negotiated.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

impl FrameSource for Webcam {
    fn read_frame(&mut self) -> Result<Frame, TrackerError> {
        let raw = self
            .camera
            .frame()
            .map_err(|e| TrackerError::AcquisitionFailed(e.to_string()))?;
        let mut frame = convert_to_rgb(&raw)?;
        if self.settings.mirror {
            mirror_horizontal(&mut frame);
        }
        Ok(frame)
    }
}

impl Drop for Webcam {
    fn drop(&mut self) {
        let _ = self.camera.stop_stream();
    }
}

/// Try NV12, then MJPEG, then whatever the device offers at its highest
/// resolution.
fn open_camera_with_fallback(
    index: &CameraIndex,
    settings: &CameraSettings,
) -> Result<Camera, TrackerError> {
    let requested_resolution =
        nokhwa::utils::Resolution::new(settings.resolution.width, settings.resolution.height);
    let format_attempts = [
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
            requested_resolution,
            NokhwaFrameFormat::NV12,
            settings.fps,
        ))),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
            requested_resolution,
            NokhwaFrameFormat::MJPEG,
            settings.fps,
        ))),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution),
    ];

    let mut last_error = String::from("no formats attempted");

    for requested in format_attempts {
        match Camera::new(index.clone(), requested) {
            Ok(cam) => return Ok(cam),
            Err(e) => {
                log::debug!("Camera format attempt failed: {}", e);
                last_error = e.to_string();
            }
        }
    }

    let msg = last_error.to_lowercase();
    if msg.contains("permission") || msg.contains("denied") || msg.contains("authorization") {
        Err(TrackerError::DeviceUnavailable(
            "camera permission denied. On macOS, grant access in System Settings > Privacy & Security > Camera"
                .to_string(),
        ))
    } else {
        Err(TrackerError::DeviceUnavailable(format!(
            "failed to open camera: {}",
            last_error
        )))
    }
}
