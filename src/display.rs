//! Preview window.

use minifb::{KeyRepeat, Window, WindowOptions};
use thiserror::Error;

use crate::camera::Frame;

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("Failed to open window: {0}")]
    Open(String),
    #[error("Failed to update window: {0}")]
    Update(String),
}

/// Where processed frames go.
pub trait DisplaySink {
    fn show(&mut self, frame: &Frame) -> Result<(), DisplayError>;

    /// True once the user asked to quit.
    fn exit_requested(&mut self) -> bool;
}

impl<T: DisplaySink + ?Sized> DisplaySink for Box<T> {
    fn show(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        (**self).show(frame)
    }

    fn exit_requested(&mut self) -> bool {
        (**self).exit_requested()
    }
}

/// Pack RGB bytes into minifb's 0RGB u32 pixels.
pub fn pack_rgb(frame: &Frame, out: &mut Vec<u32>) {
    out.clear();
    out.extend(
        frame
            .data
            .chunks_exact(Frame::BYTES_PER_PIXEL)
            .map(|p| (u32::from(p[0]) << 16) | (u32::from(p[1]) << 8) | u32::from(p[2])),
    );
}

/// A minifb window. Any key press, or closing the window, requests exit.
pub struct WindowSink {
    title: String,
    window: Option<Window>,
    buffer: Vec<u32>,
    size: (usize, usize),
}

impl WindowSink {
    fn unopened(title: String) -> Self {
        Self {
            title,
            window: None,
            buffer: Vec::new(),
            size: (0, 0),
        }
    }

    /// Open the window at the camera's negotiated size.
    ///
    /// Fails if no window can be created. A later frame of a different size
    /// reopens the window at that size.
    pub fn open(title: impl Into<String>, width: u32, height: u32) -> Result<Self, DisplayError> {
        let mut sink = Self::unopened(title.into());
        sink.window_for(width as usize, height as usize)?;
        Ok(sink)
    }

    fn window_for(&mut self, width: usize, height: usize) -> Result<&mut Window, DisplayError> {
        if width == 0 || height == 0 {
            return Err(DisplayError::Open(format!("invalid size {}x{}", width, height)));
        }
        if self.window.is_none() || self.size != (width, height) {
            let window = Window::new(&self.title, width, height, WindowOptions::default())
                .map_err(|e| DisplayError::Open(e.to_string()))?;
            log::debug!("Opened preview window {}x{}", width, height);
            self.window = Some(window);
            self.size = (width, height);
        }
        self.window
            .as_mut()
            .ok_or_else(|| DisplayError::Open("window missing".to_string()))
    }
}

impl DisplaySink for WindowSink {
    fn show(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        let (width, height) = (frame.width as usize, frame.height as usize);
        let mut buffer = std::mem::take(&mut self.buffer);
        pack_rgb(frame, &mut buffer);

        let result = self
            .window_for(width, height)?
            .update_with_buffer(&buffer, width, height)
            .map_err(|e| DisplayError::Update(e.to_string()));
        self.buffer = buffer;
        result
    }

    fn exit_requested(&mut self) -> bool {
        match self.window.as_ref() {
            Some(window) => {
                !window.is_open() || !window.get_keys_pressed(KeyRepeat::No).is_empty()
            }
            None => false,
        }
    }
}

/// No window at all; the loop runs until cancelled.
#[derive(Debug, Default)]
pub struct HeadlessSink {
    pub frames_shown: u64,
}

impl DisplaySink for HeadlessSink {
    fn show(&mut self, _frame: &Frame) -> Result<(), DisplayError> {
        self.frames_shown += 1;
        Ok(())
    }

    fn exit_requested(&mut self) -> bool {
        false
    }
}
