//! Hand-landmark detection seam.
//!
//! The detector itself lives outside this crate. [`SubprocessDetector`] talks
//! to an external landmark process; tests plug in their own [`HandDetector`].

mod subprocess;

pub use subprocess::{parse_response, write_request, SubprocessDetector};

use thiserror::Error;

use crate::camera::Frame;
use crate::gesture::HandLandmarks;

/// Errors from the detector collaborator.
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("Failed to start detector '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Detector did not signal ready, got: {0:?}")]
    NotReady(String),
    #[error("Detector I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed detector response: {0}")]
    Protocol(#[from] serde_json::Error),
    #[error("Detector process exited")]
    Exited,
    #[error("Detector command is empty")]
    EmptyCommand,
}

/// Produces hand landmarks for an RGB frame.
pub trait HandDetector {
    /// Detect hands in `frame`. Zero hands is `Ok(vec![])`.
    fn detect(&mut self, frame: &Frame) -> Result<Vec<HandLandmarks>, DetectorError>;
}
