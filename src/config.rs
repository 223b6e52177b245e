//! Configuration file handling for pinch-pointer.
//!
//! Loads configuration from `<config dir>/pinch-pointer/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::camera::{CameraSettings, Resolution};
use crate::gesture::{FirstClick, ScreenGeometry, DEFAULT_COOLDOWN, DEFAULT_PINCH_THRESHOLD_PX};

/// Top-level configuration file structure.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub camera: CameraConfig,
    pub gesture: GestureConfig,
    pub screen: ScreenConfig,
    pub detector: DetectorConfig,
    pub accelerator: AcceleratorConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub device: u32,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub mirror: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        let settings = CameraSettings::default();
        Self {
            device: settings.device_index,
            width: settings.resolution.width,
            height: settings.resolution.height,
            fps: settings.fps,
            mirror: settings.mirror,
        }
    }
}

impl CameraConfig {
    pub fn settings(&self) -> CameraSettings {
        CameraSettings {
            device_index: self.device,
            resolution: Resolution {
                width: self.width,
                height: self.height,
            },
            fps: self.fps,
            mirror: self.mirror,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GestureConfig {
    pub cooldown_ms: u64,
    pub pinch_threshold_px: f64,
    pub first_click: FirstClick,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: DEFAULT_COOLDOWN.as_millis() as u64,
            pinch_threshold_px: DEFAULT_PINCH_THRESHOLD_PX,
            first_click: FirstClick::default(),
        }
    }
}

impl GestureConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

/// Overrides for the queried display size. Both must be set to take effect.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ScreenConfig {
    pub fn geometry(&self) -> Option<ScreenGeometry> {
        match (self.width, self.height) {
            (Some(width), Some(height)) if width > 0 && height > 0 => {
                Some(ScreenGeometry { width, height })
            }
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DetectorConfig {
    /// Program and arguments of the landmark process
    pub command: Vec<String>,
    pub min_confidence: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            command: vec!["python3".to_string(), "hand_landmarks.py".to_string()],
            min_confidence: 0.5,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AcceleratorConfig {
    pub enabled: bool,
    pub model_xml: PathBuf,
    pub model_bin: PathBuf,
}

impl Default for AcceleratorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model_xml: PathBuf::from("hand_detection.xml"),
            model_bin: PathBuf::from("hand_detection.bin"),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub window: bool,
    pub draw_landmarks: bool,
    pub title: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            window: true,
            draw_landmarks: true,
            title: "Hand Tracking".to_string(),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Invalid value in config file '{}': {message}", .path.display())]
    Invalid { path: PathBuf, message: String },
}

impl Config {
    /// Load from the default location. A missing file gives the defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load from an explicit path, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate().map_err(|message| ConfigError::Invalid {
            path: path.to_path_buf(),
            message,
        })?;
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Reject values that parse but make no sense.
    pub fn validate(&self) -> Result<(), String> {
        let threshold = self.gesture.pinch_threshold_px;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(format!(
                "gesture.pinch_threshold_px must be positive, got {}",
                threshold
            ));
        }
        if !(0.0..=1.0).contains(&self.detector.min_confidence) {
            return Err(format!(
                "detector.min_confidence must be between 0 and 1, got {}",
                self.detector.min_confidence
            ));
        }
        Ok(())
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("pinch-pointer").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/pinch-pointer/config.toml")
        })
}

/// Commented config written by `config init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# pinch-pointer configuration

[camera]
# Camera device index (see `pinch-pointer list-cameras`)
device = 0
# Requested capture resolution; the device may pick the closest it supports
width = 640
height = 480
fps = 30
# Mirror horizontally (selfie mode)
mirror = false

[gesture]
# Minimum time between two clicks
cooldown_ms = 500
# Thumb/index distance in camera pixels that counts as a pinch
pinch_threshold_px = 50.0
# "immediate" or "after-cooldown" (ignore pinches right after startup)
first_click = "immediate"

[screen]
# Override the detected display size
# width = 1920
# height = 1080

[detector]
# Landmark process: prints READY, then answers each frame with one JSON line
command = ["python3", "hand_landmarks.py"]
min_confidence = 0.5

[accelerator]
enabled = true
model_xml = "hand_detection.xml"
model_bin = "hand_detection.bin"

[display]
# Show the preview window (any key in it quits)
window = true
draw_landmarks = true
title = "Hand Tracking"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_default_config_toml_matches_defaults() {
        assert_eq!(Config::parse(DEFAULT_CONFIG_TOML).unwrap(), Config::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::parse(
            r#"
[gesture]
cooldown_ms = 250
first_click = "after-cooldown"

[screen]
width = 2560
height = 1440
"#,
        )
        .unwrap();
        assert_eq!(config.gesture.cooldown(), Duration::from_millis(250));
        assert_eq!(config.gesture.pinch_threshold_px, 50.0);
        assert_eq!(config.gesture.first_click, FirstClick::AfterCooldown);
        assert_eq!(
            config.screen.geometry(),
            Some(ScreenGeometry {
                width: 2560,
                height: 1440
            })
        );
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_screen_override_needs_both_sides() {
        let screen = ScreenConfig {
            width: Some(1920),
            height: None,
        };
        assert!(screen.geometry().is_none());
    }

    #[test]
    fn test_camera_settings_from_config() {
        let camera = CameraConfig {
            device: 2,
            width: 1280,
            height: 720,
            fps: 60,
            mirror: true,
        };
        let settings = camera.settings();
        assert_eq!(settings.device_index, 2);
        assert_eq!(settings.resolution.width, 1280);
        assert_eq!(settings.fps, 60);
        assert!(settings.mirror);
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(matches!(Config::load_from(&path), Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_from_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[gesture\ncooldown_ms = ").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[detector]\ncommand = [\"./detect\", \"--fast\"]\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.detector.command, vec!["./detect", "--fast"]);
        assert_eq!(config.detector.min_confidence, 0.5);
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_pinch_threshold() {
        for value in ["-1.0", "0.0", "nan", "inf"] {
            let config = Config::parse(&format!("[gesture]\npinch_threshold_px = {}\n", value))
                .unwrap();
            assert!(config.validate().is_err(), "accepted {}", value);
        }
    }

    #[test]
    fn test_load_from_rejects_negative_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[gesture]\npinch_threshold_px = -1\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert!(err.to_string().contains("pinch_threshold_px"));
    }

    #[test]
    fn test_rejects_out_of_range_confidence() {
        let config = Config::parse("[detector]\nmin_confidence = 1.5\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_path_ends_with_config_toml() {
        let path = default_path();
        assert!(path.ends_with("pinch-pointer/config.toml"));
    }
}
