use clap::Parser;
use std::path::Path;
use std::time::Instant;

use pinch_pointer::accelerator;
use pinch_pointer::camera::Webcam;
use pinch_pointer::cli::{handle_config_action, list_cameras, Args, Command};
use pinch_pointer::config::Config;
use pinch_pointer::detector::SubprocessDetector;
use pinch_pointer::display::{DisplaySink, HeadlessSink, WindowSink};
use pinch_pointer::gesture::{ClickState, GestureMapper};
use pinch_pointer::injector::{screen_geometry, LoggingInjector, PointerInjector, RdevInjector};
use pinch_pointer::tracking_loop::{CancelToken, TrackingLoop};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Load the config file.
///
/// An explicit `--config` must exist and parse. Problems with the default
/// location only produce a warning.
fn load_config(path: Option<&Path>) -> Result<Config, BoxError> {
    match path {
        Some(path) => Ok(Config::load_from(path)?),
        None => match Config::load_default() {
            Ok(config) => Ok(config),
            Err(e) => {
                log::warn!("{}. Using default settings.", e);
                Ok(Config::default())
            }
        },
    }
}

fn run(config: &Config, dry_run: bool) -> Result<(), BoxError> {
    let screen = screen_geometry(config.screen.geometry())?;
    log::info!("Screen size {}x{}", screen.width, screen.height);

    let webcam = Webcam::open(config.camera.settings())?;
    let display: Box<dyn DisplaySink> = if config.display.window {
        let resolution = webcam.resolution();
        Box::new(WindowSink::open(
            config.display.title.clone(),
            resolution.width,
            resolution.height,
        )?)
    } else {
        log::info!("Running headless, press Ctrl+C to stop");
        Box::new(HeadlessSink::default())
    };

    let detector =
        SubprocessDetector::spawn(&config.detector.command, config.detector.min_confidence)?;
    let accelerator = accelerator::probe(&config.accelerator);

    let injector: Box<dyn PointerInjector> = if dry_run {
        Box::new(LoggingInjector::default())
    } else {
        Box::new(RdevInjector::new())
    };

    let cancel = CancelToken::new();
    if let Err(e) = cancel.cancel_on_ctrlc() {
        log::warn!("Could not install Ctrl+C handler: {}", e);
    }

    let mapper = GestureMapper::new(screen).with_pinch_threshold(config.gesture.pinch_threshold_px);
    let click_state = ClickState::starting_at(
        Instant::now(),
        config.gesture.cooldown(),
        config.gesture.first_click,
    );

    let mut tracking = TrackingLoop::new(webcam, detector, injector, display, mapper, click_state)
        .with_accelerator(accelerator)
        .with_landmark_overlay(config.display.draw_landmarks);
    tracking.run(&cancel);

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    args.apply_to(&mut config);

    match args.command {
        Some(Command::ListCameras) => list_cameras(),
        Some(Command::Config { action }) => {
            handle_config_action(action, &config, args.config.as_deref())
        }
        None => {
            if let Err(e) = run(&config, args.dry_run) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
