//! The frame-by-frame tracking loop.
//!
//! acquire -> detect -> map -> inject -> render, once per iteration, on the
//! calling thread. The loop ends when the [`CancelToken`] is set or the
//! display sink asks to exit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::accelerator::{detect_with_fallback, Accelerator, Unavailable};
use crate::camera::FrameSource;
use crate::detector::HandDetector;
use crate::display::{DisplayError, DisplaySink};
use crate::gesture::{primary_hand, ClickState, GestureMapper, GestureOutput};
use crate::injector::{MouseButton, PointerInjector};
use crate::overlay::draw_landmarks;

/// Shared stop flag, checked once per iteration.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Cancel this token on Ctrl+C.
    pub fn cancel_on_ctrlc(&self) -> Result<(), ctrlc::Error> {
        let token = self.clone();
        ctrlc::set_handler(move || {
            log::info!("Received Ctrl+C, shutting down...");
            token.cancel();
        })
    }
}

/// Counters reported at shutdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub frames_processed: u64,
    pub frames_skipped: u64,
    pub detector_failures: u64,
    pub pointer_updates: u64,
    pub clicks: u64,
}

/// Result of one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// No usable frame this time
    Skipped,
    Processed(GestureOutput),
}

pub struct TrackingLoop<S, D, I, V> {
    source: S,
    detector: D,
    accelerator: Box<dyn Accelerator>,
    injector: I,
    display: V,
    mapper: GestureMapper,
    click_state: ClickState,
    draw_landmarks: bool,
    stats: LoopStats,
}

impl<S, D, I, V> TrackingLoop<S, D, I, V>
where
    S: FrameSource,
    D: HandDetector,
    I: PointerInjector,
    V: DisplaySink,
{
    pub fn new(
        source: S,
        detector: D,
        injector: I,
        display: V,
        mapper: GestureMapper,
        click_state: ClickState,
    ) -> Self {
        Self {
            source,
            detector,
            accelerator: Box::new(Unavailable),
            injector,
            display,
            mapper,
            click_state,
            draw_landmarks: true,
            stats: LoopStats::default(),
        }
    }

    pub fn with_accelerator(mut self, accelerator: Box<dyn Accelerator>) -> Self {
        self.accelerator = accelerator;
        self
    }

    pub fn with_landmark_overlay(mut self, enabled: bool) -> Self {
        self.draw_landmarks = enabled;
        self
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn click_state(&self) -> ClickState {
        self.click_state
    }

    pub fn injector(&self) -> &I {
        &self.injector
    }

    pub fn display(&self) -> &V {
        &self.display
    }

    /// Run one iteration with `now` as the click timestamp.
    pub fn step(&mut self, now: Instant) -> Result<StepOutcome, DisplayError> {
        let mut frame = match self.source.read_frame() {
            Ok(frame) => frame,
            Err(e) => {
                log::debug!("Skipping frame: {}", e);
                self.stats.frames_skipped += 1;
                return Ok(StepOutcome::Skipped);
            }
        };

        let detector = &mut self.detector;
        let hands = match detect_with_fallback(self.accelerator.as_mut(), &frame, |f| {
            detector.detect(f)
        }) {
            Ok(hands) => hands,
            Err(e) => {
                log::warn!("Hand detection failed: {}", e);
                self.stats.detector_failures += 1;
                Vec::new()
            }
        };

        let (output, click_state) =
            self.mapper
                .process(&hands, frame.geometry(), self.click_state, now);
        self.click_state = click_state;

        if let Some(point) = output.pointer {
            self.injector.move_cursor(point);
            self.stats.pointer_updates += 1;
        }
        if output.click {
            log::debug!("Pinch click at {:?}", output.pointer);
            self.injector.click(MouseButton::Left);
            self.stats.clicks += 1;
        }

        if self.draw_landmarks {
            if let Some(hand) = primary_hand(&hands) {
                draw_landmarks(&mut frame, hand);
            }
        }
        self.display.show(&frame)?;
        self.stats.frames_processed += 1;

        Ok(StepOutcome::Processed(output))
    }

    /// Iterate until cancelled, the display asks to exit, or the display fails.
    pub fn run(&mut self, cancel: &CancelToken) -> LoopStats {
        log::info!(
            "Tracking started (accelerator: {}, cooldown: {:?}, pinch threshold: {} px)",
            self.accelerator.name(),
            self.click_state.cooldown,
            self.mapper.pinch_threshold_px
        );

        while !cancel.is_cancelled() {
            if let Err(e) = self.step(Instant::now()) {
                log::warn!("{}, stopping", e);
                break;
            }
            if self.display.exit_requested() {
                log::info!("Exit requested from display");
                break;
            }
        }

        log::info!(
            "Tracking stopped: {} frames, {} skipped, {} detector failures, {} pointer updates, {} clicks",
            self.stats.frames_processed,
            self.stats.frames_skipped,
            self.stats.detector_failures,
            self.stats.pointer_updates,
            self.stats.clicks
        );
        self.stats
    }
}
