//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::enums::FirstClickArg;
use crate::config::Config;
use crate::gesture::ScreenGeometry;

/// Move the cursor with your index finger; pinch thumb and index to click
#[derive(Parser, Debug)]
#[command(name = "pinch-pointer")]
#[command(version, about = "Webcam hand-tracking mouse", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Camera device index (from list-cameras)
    #[arg(long)]
    pub camera: Option<u32>,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Minimum milliseconds between two clicks
    #[arg(long)]
    pub cooldown_ms: Option<u64>,

    /// Pinch distance in camera pixels that triggers a click
    #[arg(long, value_parser = parse_threshold)]
    pub pinch_threshold: Option<f64>,

    /// Whether the first pinch after startup may click right away
    #[arg(long)]
    pub first_click: Option<FirstClickArg>,

    /// Mirror camera horizontally
    #[arg(long)]
    pub mirror: bool,

    /// Run without a preview window (stop with Ctrl+C)
    #[arg(long)]
    pub headless: bool,

    /// Log pointer commands instead of moving the real cursor
    #[arg(long)]
    pub dry_run: bool,

    /// Screen size override (WIDTHxHEIGHT, e.g., 1920x1080)
    #[arg(long, value_parser = parse_screen)]
    pub screen: Option<ScreenGeometry>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available cameras
    ListCameras,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}

/// Parse and validate a screen size (WIDTHxHEIGHT format)
pub fn parse_screen(s: &str) -> Result<ScreenGeometry, String> {
    let (w, h) = s.split_once('x').ok_or_else(|| {
        format!(
            "Invalid screen size '{}'. Use WIDTHxHEIGHT (e.g., 1920x1080)",
            s
        )
    })?;
    let width: u32 = w
        .parse()
        .map_err(|_| format!("Invalid width '{}' in screen size", w))?;
    let height: u32 = h
        .parse()
        .map_err(|_| format!("Invalid height '{}' in screen size", h))?;
    if width == 0 || height == 0 {
        return Err("Screen width and height must be greater than 0".to_string());
    }
    Ok(ScreenGeometry { width, height })
}

/// Parse and validate a pinch threshold (positive pixels)
fn parse_threshold(s: &str) -> Result<f64, String> {
    let px: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if !px.is_finite() || px <= 0.0 {
        return Err(format!("Pinch threshold must be positive, got {}", px));
    }
    Ok(px)
}

impl Args {
    /// Apply command-line overrides on top of the loaded config.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(camera) = self.camera {
            config.camera.device = camera;
        }
        if self.mirror {
            config.camera.mirror = true;
        }
        if let Some(ms) = self.cooldown_ms {
            config.gesture.cooldown_ms = ms;
        }
        if let Some(px) = self.pinch_threshold {
            config.gesture.pinch_threshold_px = px;
        }
        if let Some(first) = self.first_click {
            config.gesture.first_click = first.into();
        }
        if let Some(screen) = self.screen {
            config.screen.width = Some(screen.width);
            config.screen.height = Some(screen.height);
        }
        if self.headless {
            config.display.window = false;
        }
    }
}
