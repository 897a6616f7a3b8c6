//! Top-level application state machine.
//!
//! `AppState` owns the [`Pipeline`] and the overlay data (last frame, last
//! finger state, status line). `run()` wires a frame source to the state and
//! drives the visualizer at ~60 fps.

use std::sync::mpsc::{self, TryRecvError};

use hand_model::{FingerState, Gesture, LandmarkFrame};
use sys_actuator::{open_actuator, ActuatorPort};

use crate::pipeline::{action_label, FrameOutcome, Pipeline};
use crate::source::{
    spawn_frame_source, DetectorSource, FrameEvent, SimFrameSource, SimInput,
    MIN_DETECTION_CONFIDENCE,
};
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
pub struct AppConfig {
    /// External detector command line; `None` runs the keyboard simulator.
    pub detector_command: Option<Vec<String>>,
    /// Hands scored below this by the detector are treated as absent.
    pub min_confidence: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            detector_command: None,
            min_confidence: MIN_DETECTION_CONFIDENCE,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    pipeline: Pipeline<Box<dyn ActuatorPort>>,

    // ── overlay state ────────────────────────────────────────────────────
    hand: Option<LandmarkFrame>,
    finger_state: Option<FingerState>,

    // ── bookkeeping ──────────────────────────────────────────────────────
    dispatches: usize,
    pub status: String,
}

impl AppState {
    pub fn new() -> Self {
        AppState::with_port(open_actuator())
    }

    pub fn with_port(port: Box<dyn ActuatorPort>) -> Self {
        AppState {
            pipeline: Pipeline::new(port),
            hand: None,
            finger_state: None,
            dispatches: 0,
            status: "Ready — show a hand".to_string(),
        }
    }

    // ── process one FrameEvent ───────────────────────────────────────────

    pub fn handle_event(&mut self, event: FrameEvent) {
        match event {
            FrameEvent::Hand(frame) => {
                let outcome = self.pipeline.process(&frame);
                self.finger_state = Some(FingerState::extract(&frame));
                self.hand = Some(frame);

                match outcome {
                    FrameOutcome::Dispatched(g) => {
                        self.dispatches += 1;
                        self.status =
                            format!("{g} — {} (dispatch #{})", action_label(g), self.dispatches);
                        log::info!("gesture: {g} — {}", action_label(g));
                    }
                    FrameOutcome::Held(g) => {
                        self.status = format!("Holding {g}");
                    }
                    FrameOutcome::Unrecognized(state) => {
                        self.status = format!("Fingers: {state}");
                    }
                }
            }

            FrameEvent::Absent => {
                self.hand = None;
                self.finger_state = None;
                self.status = "No hand in view".to_string();
            }

            FrameEvent::Quit => { /* handled in run loop */ }
        }
    }

    // ── accessors for the render loop ────────────────────────────────────

    pub fn hand(&self) -> Option<&LandmarkFrame> {
        self.hand.as_ref()
    }

    pub fn finger_state(&self) -> Option<FingerState> {
        self.finger_state
    }

    pub fn last_dispatched(&self) -> Option<Gesture> {
        self.pipeline.last_dispatched()
    }

    pub fn dispatches(&self) -> usize {
        self.dispatches
    }
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Creates the frame source (keyboard simulation by default, an external
/// detector when configured), the overlay window, and the event/render loop.
/// Events already drained are fully processed before the loop exits, so an
/// in-flight frame finishes dispatch before the actuator port is dropped.
pub fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    let sim_mode = cfg.detector_command.is_none();

    let frame_rx = match cfg.detector_command {
        Some(command) => spawn_frame_source(DetectorSource::new(command, cfg.min_confidence)),
        None => spawn_frame_source(SimFrameSource { rx: sim_rx }),
    };

    let mut vis = Visualizer::new(sim_tx, sim_mode)?;
    let mut app = AppState::new();

    while vis.is_open() {
        // 1. Poll window input → translate to SimInput
        if !vis.poll_input() {
            break;
        }

        // 2. Drain frame events, strictly in arrival order
        loop {
            match frame_rx.try_recv() {
                Ok(FrameEvent::Quit) => return Ok(()),
                Ok(event) => app.handle_event(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Ok(()),
            }
        }

        // 3. Render
        vis.render(&app);
    }

    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_model::poses;
    use sys_actuator::SoftActuator;

    fn make_app() -> AppState {
        AppState::with_port(Box::new(SoftActuator::new()))
    }

    fn hand(g: Gesture) -> FrameEvent {
        FrameEvent::Hand(poses::frame_for(g.canonical_state().unwrap()))
    }

    #[test]
    fn held_gesture_dispatches_once() {
        let mut app = make_app();
        for _ in 0..5 {
            app.handle_event(hand(Gesture::OpenPalm));
        }
        assert_eq!(app.dispatches(), 1);
        assert_eq!(app.status, "Holding Open Palm");
    }

    #[test]
    fn palm_palm_fist_dispatches_twice() {
        let mut app = make_app();
        app.handle_event(hand(Gesture::OpenPalm));
        app.handle_event(hand(Gesture::OpenPalm));
        app.handle_event(hand(Gesture::Fist));
        assert_eq!(app.dispatches(), 2);
        assert_eq!(app.last_dispatched(), Some(Gesture::Fist));
    }

    #[test]
    fn absent_clears_the_overlay_but_not_debounce() {
        let mut app = make_app();
        app.handle_event(hand(Gesture::ThumbsUp));
        assert!(app.hand().is_some());

        app.handle_event(FrameEvent::Absent);
        assert!(app.hand().is_none());
        assert!(app.finger_state().is_none());
        assert_eq!(app.status, "No hand in view");

        // The same gesture after an absence is still debounced.
        app.handle_event(hand(Gesture::ThumbsUp));
        assert_eq!(app.dispatches(), 1);
    }

    #[test]
    fn unrecognized_pose_shows_the_finger_vector() {
        let mut app = make_app();
        let state = FingerState::new([false, true, false, false, false]);
        app.handle_event(FrameEvent::Hand(poses::frame_for(state)));
        assert_eq!(app.status, "Fingers: [0,1,0,0,0]");
        assert_eq!(app.dispatches(), 0);
        assert_eq!(app.last_dispatched(), None);
    }

    #[test]
    fn unknown_between_equal_gestures_does_not_refire() {
        let mut app = make_app();
        let point = FingerState::new([false, true, false, false, false]);

        app.handle_event(hand(Gesture::ThumbsUp));
        app.handle_event(FrameEvent::Hand(poses::frame_for(point)));
        app.handle_event(hand(Gesture::ThumbsUp));

        assert_eq!(app.dispatches(), 1);
    }
}
