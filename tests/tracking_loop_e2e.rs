//! End-to-end tests for the tracking loop with scripted collaborators.
//!
//! These cover:
//! - acquisition failures are skipped, not fatal
//! - pointer moves and debounced clicks reach the injector
//! - cancellation and display exit requests stop the loop

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use pinch_pointer::accelerator::Accelerator;
use pinch_pointer::camera::{Frame, FrameSource};
use pinch_pointer::detector::{DetectorError, HandDetector};
use pinch_pointer::display::{DisplayError, DisplaySink};
use pinch_pointer::gesture::{
    index, ClickState, FirstClick, GestureMapper, HandLandmarks, NormalizedLandmark,
    ScreenGeometry, ScreenPoint,
};
use pinch_pointer::injector::{MouseButton, PointerInjector};
use pinch_pointer::overlay::MARKER_COLOR;
use pinch_pointer::tracking_loop::{CancelToken, StepOutcome, TrackingLoop};
use pinch_pointer::TrackerError;

const SCREEN: ScreenGeometry = ScreenGeometry {
    width: 1920,
    height: 1080,
};

/// Yields scripted frames, then failures forever.
struct ScriptedSource(VecDeque<Result<Frame, TrackerError>>);

impl ScriptedSource {
    fn frames(n: usize) -> Self {
        Self((0..n).map(|_| Ok(Frame::solid(640, 480, [0, 0, 0]))).collect())
    }
}

impl FrameSource for ScriptedSource {
    fn read_frame(&mut self) -> Result<Frame, TrackerError> {
        self.0
            .pop_front()
            .unwrap_or_else(|| Err(TrackerError::AcquisitionFailed("script exhausted".into())))
    }
}

/// Returns the same detection for every frame.
struct FixedDetector(Result<Vec<HandLandmarks>, ()>);

impl HandDetector for FixedDetector {
    fn detect(&mut self, _frame: &Frame) -> Result<Vec<HandLandmarks>, DetectorError> {
        match &self.0 {
            Ok(hands) => Ok(hands.clone()),
            Err(()) => Err(DetectorError::Exited),
        }
    }
}

#[derive(Default)]
struct RecordingInjector {
    moves: Vec<ScreenPoint>,
    clicks: Vec<MouseButton>,
}

impl PointerInjector for RecordingInjector {
    fn move_cursor(&mut self, point: ScreenPoint) {
        self.moves.push(point);
    }

    fn click(&mut self, button: MouseButton) {
        self.clicks.push(button);
    }
}

/// Keeps the last shown frame and asks to exit after `exit_after` frames.
#[derive(Default)]
struct RecordingDisplay {
    shown: usize,
    last: Option<Frame>,
    exit_after: Option<usize>,
}

impl DisplaySink for RecordingDisplay {
    fn show(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        self.shown += 1;
        self.last = Some(frame.clone());
        Ok(())
    }

    fn exit_requested(&mut self) -> bool {
        self.exit_after.is_some_and(|n| self.shown >= n)
    }
}

fn pinching_hand() -> HandLandmarks {
    let mut points = vec![NormalizedLandmark::new(0.2, 0.2); index::COUNT];
    points[index::THUMB_TIP] = NormalizedLandmark::new(0.40, 0.50);
    points[index::INDEX_FINGER_TIP] = NormalizedLandmark::new(0.41, 0.50);
    HandLandmarks::new(points, 0.9)
}

fn open_hand() -> HandLandmarks {
    let mut points = vec![NormalizedLandmark::new(0.2, 0.2); index::COUNT];
    points[index::THUMB_TIP] = NormalizedLandmark::new(0.1, 0.9);
    points[index::INDEX_FINGER_TIP] = NormalizedLandmark::new(0.5, 0.5);
    HandLandmarks::new(points, 0.9)
}

fn tracker(
    source: ScriptedSource,
    hands: Vec<HandLandmarks>,
    display: RecordingDisplay,
) -> TrackingLoop<ScriptedSource, FixedDetector, RecordingInjector, RecordingDisplay> {
    TrackingLoop::new(
        source,
        FixedDetector(Ok(hands)),
        RecordingInjector::default(),
        display,
        GestureMapper::new(SCREEN),
        ClickState::new(Duration::from_millis(500)),
    )
}

#[test]
fn test_open_hand_moves_cursor_without_clicking() {
    let mut t = tracker(
        ScriptedSource::frames(1),
        vec![open_hand()],
        RecordingDisplay::default(),
    );
    let outcome = t.step(Instant::now()).unwrap();

    match outcome {
        StepOutcome::Processed(out) => {
            assert_eq!(out.pointer, Some(ScreenPoint { x: 960, y: 540 }));
            assert!(!out.click);
        }
        StepOutcome::Skipped => panic!("frame should have been processed"),
    }
    assert_eq!(t.injector().moves, vec![ScreenPoint { x: 960, y: 540 }]);
    assert!(t.injector().clicks.is_empty());
}

#[test]
fn test_pinch_clicks_once_per_cooldown() {
    let mut t = tracker(
        ScriptedSource::frames(3),
        vec![pinching_hand()],
        RecordingDisplay::default(),
    );
    let t0 = Instant::now();
    t.step(t0).unwrap();
    t.step(t0 + Duration::from_millis(400)).unwrap();
    t.step(t0 + Duration::from_millis(600)).unwrap();

    assert_eq!(t.injector().clicks, vec![MouseButton::Left, MouseButton::Left]);
    assert_eq!(t.injector().moves.len(), 3);
    assert_eq!(t.stats().clicks, 2);
    assert_eq!(
        t.click_state().last_click,
        Some(t0 + Duration::from_millis(600))
    );
}

#[test]
fn test_after_cooldown_policy_ignores_startup_pinch() {
    let t0 = Instant::now();
    let mut t = TrackingLoop::new(
        ScriptedSource::frames(2),
        FixedDetector(Ok(vec![pinching_hand()])),
        RecordingInjector::default(),
        RecordingDisplay::default(),
        GestureMapper::new(SCREEN),
        ClickState::starting_at(t0, Duration::from_millis(500), FirstClick::AfterCooldown),
    );
    t.step(t0 + Duration::from_millis(10)).unwrap();
    assert!(t.injector().clicks.is_empty());

    t.step(t0 + Duration::from_millis(510)).unwrap();
    assert_eq!(t.injector().clicks.len(), 1);
}

#[test]
fn test_acquisition_failure_is_skipped() {
    let mut source = ScriptedSource::frames(1);
    source
        .0
        .push_front(Err(TrackerError::AcquisitionFailed("usb hiccup".into())));
    let mut t = tracker(source, vec![open_hand()], RecordingDisplay::default());

    assert_eq!(t.step(Instant::now()).unwrap(), StepOutcome::Skipped);
    assert!(matches!(
        t.step(Instant::now()).unwrap(),
        StepOutcome::Processed(_)
    ));
    assert_eq!(t.stats().frames_skipped, 1);
    assert_eq!(t.stats().frames_processed, 1);
    assert_eq!(t.display().shown, 1);
}

#[test]
fn test_no_hands_still_renders() {
    let mut t = tracker(ScriptedSource::frames(1), vec![], RecordingDisplay::default());
    t.step(Instant::now()).unwrap();
    assert!(t.injector().moves.is_empty());
    assert_eq!(t.display().shown, 1);
}

#[test]
fn test_detector_failure_counts_as_no_hands() {
    let mut t = TrackingLoop::new(
        ScriptedSource::frames(1),
        FixedDetector(Err(())),
        RecordingInjector::default(),
        RecordingDisplay::default(),
        GestureMapper::new(SCREEN),
        ClickState::default(),
    );
    t.step(Instant::now()).unwrap();
    assert_eq!(t.stats().detector_failures, 1);
    assert!(t.injector().moves.is_empty());
    assert_eq!(t.display().shown, 1);
}

#[test]
fn test_short_landmark_list_is_ignored() {
    let short = HandLandmarks::new(vec![NormalizedLandmark::new(0.5, 0.5); 4], 1.0);
    let mut t = tracker(ScriptedSource::frames(1), vec![short], RecordingDisplay::default());
    t.step(Instant::now()).unwrap();
    assert!(t.injector().moves.is_empty());
    assert!(t.injector().clicks.is_empty());
}

#[test]
fn test_landmarks_drawn_on_shown_frame() {
    let mut t = tracker(
        ScriptedSource::frames(1),
        vec![open_hand()],
        RecordingDisplay::default(),
    );
    t.step(Instant::now()).unwrap();

    // Index tip at (320, 240); the ring passes 5 px to its right
    let shown = t.display().last.as_ref().unwrap();
    assert_eq!(shown.pixel(325, 240), Some(MARKER_COLOR));
}

#[test]
fn test_overlay_can_be_disabled() {
    let mut t = tracker(
        ScriptedSource::frames(1),
        vec![open_hand()],
        RecordingDisplay::default(),
    )
    .with_landmark_overlay(false);
    t.step(Instant::now()).unwrap();

    let shown = t.display().last.as_ref().unwrap();
    assert_eq!(shown.pixel(325, 240), Some([0, 0, 0]));
}

#[test]
fn test_run_stops_on_display_exit() {
    let display = RecordingDisplay {
        exit_after: Some(3),
        ..RecordingDisplay::default()
    };
    let mut t = tracker(ScriptedSource::frames(10), vec![open_hand()], display);
    let stats = t.run(&CancelToken::new());

    assert_eq!(stats.frames_processed, 3);
    assert_eq!(t.injector().moves.len(), 3);
}

/// Shows frames until the `fail_on`th, which errors like a closed window.
struct FailingDisplay {
    shown: usize,
    fail_on: usize,
}

impl DisplaySink for FailingDisplay {
    fn show(&mut self, _frame: &Frame) -> Result<(), DisplayError> {
        self.shown += 1;
        if self.shown >= self.fail_on {
            return Err(DisplayError::Update("window is gone".into()));
        }
        Ok(())
    }

    fn exit_requested(&mut self) -> bool {
        false
    }
}

#[test]
fn test_run_stops_when_display_update_fails() {
    let mut t = TrackingLoop::new(
        ScriptedSource::frames(10),
        FixedDetector(Ok(vec![open_hand()])),
        RecordingInjector::default(),
        FailingDisplay {
            shown: 0,
            fail_on: 3,
        },
        GestureMapper::new(SCREEN),
        ClickState::default(),
    );
    let stats = t.run(&CancelToken::new());

    assert_eq!(stats.frames_processed, 2);
    assert_eq!(stats.pointer_updates, 3);
    // The failing frame was injected before it was shown; nothing after it
    assert_eq!(t.injector().moves.len(), 3);
    assert_eq!(t.display().shown, 3);
}

#[test]
fn test_step_reports_display_failure() {
    let mut t = TrackingLoop::new(
        ScriptedSource::frames(1),
        FixedDetector(Ok(vec![])),
        RecordingInjector::default(),
        FailingDisplay {
            shown: 0,
            fail_on: 1,
        },
        GestureMapper::new(SCREEN),
        ClickState::default(),
    );
    assert!(matches!(
        t.step(Instant::now()),
        Err(DisplayError::Update(_))
    ));
    assert_eq!(t.stats().frames_processed, 0);
}

#[test]
fn test_run_returns_immediately_when_cancelled() {
    let mut t = tracker(
        ScriptedSource::frames(10),
        vec![open_hand()],
        RecordingDisplay::default(),
    );
    let cancel = CancelToken::new();
    cancel.cancel();
    let stats = t.run(&cancel);

    assert_eq!(stats.frames_processed, 0);
    assert_eq!(stats.frames_skipped, 0);
}

#[test]
fn test_run_keeps_going_through_failed_reads() {
    let mut source = ScriptedSource::frames(0);
    for _ in 0..5 {
        source
            .0
            .push_back(Err(TrackerError::AcquisitionFailed("empty frame".into())));
    }
    for _ in 0..2 {
        source.0.push_back(Ok(Frame::solid(640, 480, [0, 0, 0])));
    }
    let display = RecordingDisplay {
        exit_after: Some(2),
        ..RecordingDisplay::default()
    };
    let mut t = tracker(source, vec![open_hand()], display);
    let stats = t.run(&CancelToken::new());

    assert_eq!(stats.frames_skipped, 5);
    assert_eq!(stats.frames_processed, 2);
}

struct StaticAccelerator(Vec<HandLandmarks>);

impl Accelerator for StaticAccelerator {
    fn name(&self) -> &str {
        "static"
    }

    fn try_accelerate(&mut self, _frame: &Frame) -> Option<Vec<HandLandmarks>> {
        Some(self.0.clone())
    }
}

#[test]
fn test_accelerator_result_preferred_over_detector() {
    let mut t = tracker(
        ScriptedSource::frames(1),
        vec![],
        RecordingDisplay::default(),
    )
    .with_accelerator(Box::new(StaticAccelerator(vec![open_hand()])));
    t.step(Instant::now()).unwrap();
    assert_eq!(t.injector().moves, vec![ScreenPoint { x: 960, y: 540 }]);
}
