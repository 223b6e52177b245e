//! Optional accelerated inference path.
//!
//! No accelerated backend ships with this crate. [`probe`] checks for the
//! model assets and reports what it found, then installs [`Unavailable`], so
//! detection always goes through the default [`HandDetector`].
//!
//! [`HandDetector`]: crate::detector::HandDetector

use std::path::{Path, PathBuf};

use crate::camera::Frame;
use crate::config::AcceleratorConfig;
use crate::error::TrackerError;
use crate::gesture::HandLandmarks;

/// An alternate inference strategy tried before the default detector.
pub trait Accelerator {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Landmarks for `frame`, or `None` to fall back to the detector.
    fn try_accelerate(&mut self, frame: &Frame) -> Option<Vec<HandLandmarks>>;
}

/// The strategy used when no accelerator is usable.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unavailable;

impl Accelerator for Unavailable {
    fn name(&self) -> &str {
        "none"
    }

    fn try_accelerate(&mut self, _frame: &Frame) -> Option<Vec<HandLandmarks>> {
        None
    }
}

/// Model files an accelerated backend would load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelAssets {
    pub topology: PathBuf,
    pub weights: PathBuf,
}

impl ModelAssets {
    pub fn from_config(config: &AcceleratorConfig) -> Self {
        Self {
            topology: config.model_xml.clone(),
            weights: config.model_bin.clone(),
        }
    }

    /// Check that both files exist.
    pub fn verify(&self) -> Result<(), TrackerError> {
        for path in [&self.topology, &self.weights] {
            if !Path::new(path).is_file() {
                return Err(TrackerError::AcceleratorInitFailed(format!(
                    "model file '{}' not found",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// Pick the accelerator for this run. Never fails: every problem is logged
/// and answered with [`Unavailable`].
pub fn probe(config: &AcceleratorConfig) -> Box<dyn Accelerator> {
    if !config.enabled {
        log::info!("Accelerator disabled, running on CPU");
        return Box::new(Unavailable);
    }

    let assets = ModelAssets::from_config(config);
    match assets.verify() {
        Ok(()) => {
            log::info!("Accelerator models found, but no accelerated backend is compiled in; running on CPU");
        }
        Err(e) => {
            log::warn!("{}, falling back to CPU", e);
        }
    }
    Box::new(Unavailable)
}

/// Run the accelerator, falling back to `fallback` when it yields nothing.
pub fn detect_with_fallback<F, E>(
    accelerator: &mut dyn Accelerator,
    frame: &Frame,
    fallback: F,
) -> Result<Vec<HandLandmarks>, E>
where
    F: FnOnce(&Frame) -> Result<Vec<HandLandmarks>, E>,
{
    match accelerator.try_accelerate(frame) {
        Some(hands) => Ok(hands),
        None => fallback(frame),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::NormalizedLandmark;

    struct Fixed(Vec<HandLandmarks>);

    impl Accelerator for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn try_accelerate(&mut self, _frame: &Frame) -> Option<Vec<HandLandmarks>> {
            Some(self.0.clone())
        }
    }

    fn config_in(dir: &Path) -> AcceleratorConfig {
        AcceleratorConfig {
            enabled: true,
            model_xml: dir.join("hand_detection.xml"),
            model_bin: dir.join("hand_detection.bin"),
        }
    }

    #[test]
    fn test_unavailable_always_declines() {
        let frame = Frame::solid(2, 2, [0, 0, 0]);
        assert!(Unavailable.try_accelerate(&frame).is_none());
    }

    #[test]
    fn test_fallback_runs_when_unavailable() {
        let frame = Frame::solid(2, 2, [0, 0, 0]);
        let mut accel = Unavailable;
        let hands: Result<_, ()> = detect_with_fallback(&mut accel, &frame, |_| {
            Ok(vec![HandLandmarks::new(vec![NormalizedLandmark::new(0.1, 0.2)], 0.9)])
        });
        assert_eq!(hands.unwrap().len(), 1);
    }

    #[test]
    fn test_fallback_skipped_when_accelerated() {
        let frame = Frame::solid(2, 2, [0, 0, 0]);
        let mut accel = Fixed(vec![]);
        let hands: Result<_, ()> =
            detect_with_fallback(&mut accel, &frame, |_| panic!("fallback must not run"));
        assert!(hands.unwrap().is_empty());
    }

    #[test]
    fn test_verify_missing_assets() {
        let dir = tempfile::tempdir().unwrap();
        let assets = ModelAssets::from_config(&config_in(dir.path()));
        assert!(matches!(
            assets.verify(),
            Err(TrackerError::AcceleratorInitFailed(_))
        ));
    }

    #[test]
    fn test_verify_present_assets() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        std::fs::write(&config.model_xml, b"<xml/>").unwrap();
        std::fs::write(&config.model_bin, b"\0").unwrap();
        assert!(ModelAssets::from_config(&config).verify().is_ok());
    }

    #[test]
    fn test_probe_always_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        assert_eq!(probe(&config).name(), "none");

        std::fs::write(&config.model_xml, b"<xml/>").unwrap();
        std::fs::write(&config.model_bin, b"\0").unwrap();
        assert_eq!(probe(&config).name(), "none");

        let disabled = AcceleratorConfig {
            enabled: false,
            ..config
        };
        assert_eq!(probe(&disabled).name(), "none");
    }
}
