//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing, enums, and subcommand handlers.

mod args;
mod commands;
mod enums;

pub use args::{parse_screen, Args, Command, ConfigAction};
pub use commands::{describe_config, handle_config_action, list_cameras};
pub use enums::FirstClickArg;
