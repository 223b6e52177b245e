//! pinch-pointer library crate.
//!
//! Webcam hand tracking mapped onto the system cursor. Exposed as a library
//! so the tracking loop can be driven from integration tests.

pub mod accelerator;
pub mod camera;
pub mod cli;
pub mod config;
pub mod detector;
pub mod display;
pub mod error;
pub mod gesture;
pub mod injector;
pub mod overlay;
pub mod tracking_loop;

pub use error::TrackerError;
