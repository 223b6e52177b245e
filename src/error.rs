//! Error kinds reported by the tracking pipeline.
//!
//! Only `DeviceUnavailable` at startup changes control flow; the other kinds
//! are logged and the loop carries on.

use thiserror::Error;

/// Errors raised around the capture/inference collaborators.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// A frame could not be read or decoded. The iteration is skipped.
    #[error("Frame acquisition failed: {0}")]
    AcquisitionFailed(String),
    /// A required device (camera, display) could not be opened.
    #[error("Device unavailable: {0}")]
    DeviceUnavailable(String),
    /// The accelerator backend could not be initialised. Detection falls back
    /// to the default detector.
    #[error("Accelerator initialisation failed: {0}")]
    AcceleratorInitFailed(String),
}
