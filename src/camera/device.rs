//! Camera device enumeration.

use nokhwa::query;
use nokhwa::utils::ApiBackend;

use super::types::CameraInfo;
use crate::error::TrackerError;

/// List all available camera devices on the system.
///
/// No cameras is an empty vector, not an error.
pub fn list_devices() -> Result<Vec<CameraInfo>, TrackerError> {
    let devices = query(ApiBackend::Auto)
        .map_err(|e| TrackerError::DeviceUnavailable(format!("camera query failed: {}", e)))?;

    Ok(devices
        .into_iter()
        .map(|d| CameraInfo {
            index: d.index().as_index().unwrap_or(0),
            name: d.human_name(),
            description: d.description().to_string(),
        })
        .collect())
}
