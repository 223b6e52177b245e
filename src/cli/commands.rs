//! Subcommand handlers for list-cameras and config actions.

use std::path::Path;

use super::args::ConfigAction;
use crate::camera;
use crate::config::{default_path as get_config_path, Config, DEFAULT_CONFIG_TOML};

/// List available cameras and print them to stdout.
pub fn list_cameras() {
    match camera::list_devices() {
        Ok(devices) => {
            if devices.is_empty() {
                println!("No cameras found.");
                println!();
                println!("Make sure your camera is connected and permissions are granted.");
            } else {
                println!("Available cameras:");
                for device in devices {
                    println!("  {}", device);
                }
                println!();
                println!("Use --camera <index> to select a camera.");
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Human-readable summary of the effective configuration.
pub fn describe_config(config: &Config) -> String {
    let screen = match config.screen.geometry() {
        Some(s) => format!("{}x{}", s.width, s.height),
        None => "auto".to_string(),
    };
    let lines = [
        format!("  Camera: {}", config.camera.device),
        format!(
            "  Resolution: {}x{} @ {} fps",
            config.camera.width, config.camera.height, config.camera.fps
        ),
        format!("  Mirror: {}", yes_no(config.camera.mirror)),
        format!("  Click cooldown: {} ms", config.gesture.cooldown_ms),
        format!("  Pinch threshold: {} px", config.gesture.pinch_threshold_px),
        format!("  First click: {:?}", config.gesture.first_click),
        format!("  Screen: {}", screen),
        format!("  Detector: {}", config.detector.command.join(" ")),
        format!("  Min confidence: {}", config.detector.min_confidence),
        format!("  Accelerator: {}", yes_no(config.accelerator.enabled)),
        format!("  Window: {}", yes_no(config.display.window)),
        format!("  Landmark overlay: {}", yes_no(config.display.draw_landmarks)),
    ];
    lines.join("\n")
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction, config: &Config, explicit_path: Option<&Path>) {
    let config_path = explicit_path
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);

    match action {
        ConfigAction::Show => {
            println!("Current configuration:");
            println!("{}", describe_config(config));
            println!();

            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
        }
        ConfigAction::Init => {
            if config_path.exists() {
                eprintln!("Config file already exists: {}", config_path.display());
                eprintln!("Use 'pinch-pointer config show' to view current settings.");
                std::process::exit(1);
            }

            if let Some(parent) = config_path.parent() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    eprintln!("Error creating config directory: {}", e);
                    std::process::exit(1);
                }
            }

            if let Err(e) = std::fs::write(&config_path, DEFAULT_CONFIG_TOML) {
                eprintln!("Error writing config file: {}", e);
                std::process::exit(1);
            }

            println!("Created config file: {}", config_path.display());
        }
    }
}
