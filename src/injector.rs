//! OS pointer injection.
//!
//! Uses rdev to synthesize mouse events and to query the display size.

use rdev::{simulate, EventType};
use std::thread;
use std::time::Duration;

use crate::error::TrackerError;
use crate::gesture::{ScreenGeometry, ScreenPoint};

/// Mouse buttons the injector can click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
}

impl From<MouseButton> for rdev::Button {
    fn from(b: MouseButton) -> Self {
        match b {
            MouseButton::Left => rdev::Button::Left,
        }
    }
}

/// Fire-and-forget cursor control.
pub trait PointerInjector {
    fn move_cursor(&mut self, point: ScreenPoint);
    fn click(&mut self, button: MouseButton);
}

impl<T: PointerInjector + ?Sized> PointerInjector for Box<T> {
    fn move_cursor(&mut self, point: ScreenPoint) {
        (**self).move_cursor(point)
    }

    fn click(&mut self, button: MouseButton) {
        (**self).click(button)
    }
}

/// Injects real OS events through rdev.
#[derive(Debug)]
pub struct RdevInjector {
    /// Pause between synthesized events; some platforms drop events sent
    /// back to back
    event_gap: Duration,
}

impl RdevInjector {
    pub fn new() -> Self {
        Self {
            event_gap: Duration::from_millis(10),
        }
    }

    fn send(&self, event: &EventType) {
        if let Err(e) = simulate(event) {
            log::debug!("Could not simulate {:?}: {:?}", event, e);
        }
        thread::sleep(self.event_gap);
    }
}

impl Default for RdevInjector {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerInjector for RdevInjector {
    fn move_cursor(&mut self, point: ScreenPoint) {
        self.send(&EventType::MouseMove {
            x: f64::from(point.x),
            y: f64::from(point.y),
        });
    }

    fn click(&mut self, button: MouseButton) {
        let button = rdev::Button::from(button);
        self.send(&EventType::ButtonPress(button));
        self.send(&EventType::ButtonRelease(button));
    }
}

/// Logs pointer commands instead of injecting them (`--dry-run`).
#[derive(Debug, Default)]
pub struct LoggingInjector {
    pub moves: u64,
    pub clicks: u64,
}

impl PointerInjector for LoggingInjector {
    fn move_cursor(&mut self, point: ScreenPoint) {
        self.moves += 1;
        log::debug!("[dry-run] move cursor to ({}, {})", point.x, point.y);
    }

    fn click(&mut self, button: MouseButton) {
        self.clicks += 1;
        log::info!("[dry-run] click {:?}", button);
    }
}

/// Size of the main display, or `fallback` when the OS can't tell us.
pub fn screen_geometry(fallback: Option<ScreenGeometry>) -> Result<ScreenGeometry, TrackerError> {
    if let Some(screen) = fallback {
        return Ok(screen);
    }
    let (width, height) = rdev::display_size()
        .map_err(|e| TrackerError::DeviceUnavailable(format!("display size: {:?}", e)))?;
    Ok(ScreenGeometry {
        width: width as u32,
        height: height as u32,
    })
}
