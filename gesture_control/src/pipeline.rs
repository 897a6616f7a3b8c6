//! The per-frame pipeline: extract → classify → debounce → dispatch.
//!
//! One frame is fully processed before the next is considered; the only state
//! carried across frames is the debouncer's last-dispatched gesture.

use hand_model::{FingerState, Gesture, LandmarkFrame};
use sys_actuator::{ActuatorError, ActuatorPort};

// ════════════════════════════════════════════════════════════════════════════
// GestureDebouncer
// ════════════════════════════════════════════════════════════════════════════

/// Suppresses repeated dispatch while the same gesture persists across
/// consecutive frames, firing only on gesture transition.
///
/// Without this, a held pose would re-apply its per-call delta on every
/// frame — volume sweeping the whole range in under a second at camera rate.
///
/// An `Unknown` frame leaves the previous gesture in place: a transient
/// misclassification between two holds of one gesture must not re-arm it.
/// Whether a deliberate interruption *should* re-arm the same gesture is
/// undecided product behavior; today it does not.
#[derive(Clone, Copy, Debug, Default)]
pub struct GestureDebouncer {
    last: Option<Gesture>,
}

impl GestureDebouncer {
    pub fn new() -> Self {
        GestureDebouncer { last: None }
    }

    /// Feed one classified gesture; returns `Some(g)` when a dispatch event
    /// should fire for it.
    pub fn observe(&mut self, gesture: Gesture) -> Option<Gesture> {
        if gesture == Gesture::Unknown || self.last == Some(gesture) {
            return None;
        }
        self.last = Some(gesture);
        Some(gesture)
    }

    pub fn last_dispatched(&self) -> Option<Gesture> {
        self.last
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Dispatch — gesture → actuator operation
// ════════════════════════════════════════════════════════════════════════════

/// Route one gesture to its actuator operation.
///
/// `Unknown` is a no-op; the debouncer never emits it, but the mapping stays
/// total so the routing can be tested in isolation.
pub fn dispatch<P: ActuatorPort + ?Sized>(
    gesture: Gesture,
    port: &mut P,
) -> Result<(), ActuatorError> {
    match gesture {
        Gesture::ThumbsUp => port.volume_up(),
        Gesture::ThumbsDown => port.volume_down(),
        Gesture::Peace => port.unmute(),
        Gesture::ThreeFingers => port.mute(),
        Gesture::Fist => port.brightness_down(),
        Gesture::OpenPalm => port.brightness_up(),
        Gesture::Unknown => Ok(()),
    }
}

/// Human-readable action name for status lines and logs.
pub fn action_label(gesture: Gesture) -> &'static str {
    match gesture {
        Gesture::ThumbsUp => "volume up",
        Gesture::ThumbsDown => "volume down",
        Gesture::Peace => "unmute",
        Gesture::ThreeFingers => "mute",
        Gesture::Fist => "brightness down",
        Gesture::OpenPalm => "brightness up",
        Gesture::Unknown => "no action",
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Pipeline
// ════════════════════════════════════════════════════════════════════════════

/// What processing one frame amounted to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameOutcome {
    /// A gesture transition fired its action.
    Dispatched(Gesture),
    /// The same gesture is still held; no action.
    Held(Gesture),
    /// The finger-state vector matched no table entry.
    Unrecognized(FingerState),
}

/// Debouncer plus actuator port, processing one hand frame at a time.
///
/// Actuator failures are logged and swallowed here — a missing audio endpoint
/// must not end the recognition session.
pub struct Pipeline<P: ActuatorPort> {
    debouncer: GestureDebouncer,
    port: P,
}

impl<P: ActuatorPort> Pipeline<P> {
    pub fn new(port: P) -> Self {
        Pipeline {
            debouncer: GestureDebouncer::new(),
            port,
        }
    }

    /// Process one detected-hand frame. Absent frames never reach here; the
    /// caller skips them without touching debounce state.
    pub fn process(&mut self, frame: &LandmarkFrame) -> FrameOutcome {
        let state = FingerState::extract(frame);
        let gesture = Gesture::classify(state);

        match self.debouncer.observe(gesture) {
            Some(g) => {
                if let Err(e) = dispatch(g, &mut self.port) {
                    log::warn!("{g} → {} failed: {e}", action_label(g));
                }
                FrameOutcome::Dispatched(g)
            }
            None if gesture == Gesture::Unknown => FrameOutcome::Unrecognized(state),
            None => FrameOutcome::Held(gesture),
        }
    }

    pub fn last_dispatched(&self) -> Option<Gesture> {
        self.debouncer.last_dispatched()
    }

    pub fn port(&self) -> &P {
        &self.port
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_model::poses;
    use sys_actuator::SoftActuator;

    /// Records which port operations were invoked, in order.
    #[derive(Default)]
    struct RecordingPort {
        calls: Vec<&'static str>,
    }

    impl ActuatorPort for RecordingPort {
        fn volume_up(&mut self) -> Result<(), ActuatorError> {
            self.calls.push("volume_up");
            Ok(())
        }
        fn volume_down(&mut self) -> Result<(), ActuatorError> {
            self.calls.push("volume_down");
            Ok(())
        }
        fn mute(&mut self) -> Result<(), ActuatorError> {
            self.calls.push("mute");
            Ok(())
        }
        fn unmute(&mut self) -> Result<(), ActuatorError> {
            self.calls.push("unmute");
            Ok(())
        }
        fn brightness_up(&mut self) -> Result<(), ActuatorError> {
            self.calls.push("brightness_up");
            Ok(())
        }
        fn brightness_down(&mut self) -> Result<(), ActuatorError> {
            self.calls.push("brightness_down");
            Ok(())
        }
    }

    /// Every operation fails, as if no audio endpoint existed.
    struct FailingPort;

    impl ActuatorPort for FailingPort {
        fn volume_up(&mut self) -> Result<(), ActuatorError> {
            Err(ActuatorError::AudioUnavailable("test".into()))
        }
        fn volume_down(&mut self) -> Result<(), ActuatorError> {
            Err(ActuatorError::AudioUnavailable("test".into()))
        }
        fn mute(&mut self) -> Result<(), ActuatorError> {
            Err(ActuatorError::AudioUnavailable("test".into()))
        }
        fn unmute(&mut self) -> Result<(), ActuatorError> {
            Err(ActuatorError::AudioUnavailable("test".into()))
        }
        fn brightness_up(&mut self) -> Result<(), ActuatorError> {
            Err(ActuatorError::BacklightUnavailable("test".into()))
        }
        fn brightness_down(&mut self) -> Result<(), ActuatorError> {
            Err(ActuatorError::BacklightUnavailable("test".into()))
        }
    }

    // ── debouncer ─────────────────────────────────────────────────────────

    #[test]
    fn first_observation_fires() {
        let mut d = GestureDebouncer::new();
        assert_eq!(d.observe(Gesture::ThumbsUp), Some(Gesture::ThumbsUp));
    }

    #[test]
    fn held_gesture_fires_exactly_once() {
        let mut d = GestureDebouncer::new();
        let fired = (0..50)
            .filter_map(|_| d.observe(Gesture::Peace))
            .count();
        assert_eq!(fired, 1);
    }

    #[test]
    fn transition_fires_each_new_gesture() {
        let mut d = GestureDebouncer::new();
        let fired: Vec<_> = [Gesture::ThumbsUp, Gesture::ThumbsUp, Gesture::Fist]
            .into_iter()
            .filter_map(|g| d.observe(g))
            .collect();
        assert_eq!(fired, vec![Gesture::ThumbsUp, Gesture::Fist]);
    }

    #[test]
    fn unknown_does_not_reset_debounce() {
        let mut d = GestureDebouncer::new();
        let fired: Vec<_> = [Gesture::ThumbsUp, Gesture::Unknown, Gesture::ThumbsUp]
            .into_iter()
            .filter_map(|g| d.observe(g))
            .collect();
        assert_eq!(fired, vec![Gesture::ThumbsUp]);
        assert_eq!(d.last_dispatched(), Some(Gesture::ThumbsUp));
    }

    #[test]
    fn unknown_never_fires() {
        let mut d = GestureDebouncer::new();
        assert_eq!(d.observe(Gesture::Unknown), None);
        assert_eq!(d.last_dispatched(), None);
    }

    // ── dispatch routing ──────────────────────────────────────────────────

    #[test]
    fn each_gesture_routes_to_its_operation() {
        let cases = [
            (Gesture::ThumbsUp, "volume_up"),
            (Gesture::ThumbsDown, "volume_down"),
            (Gesture::Peace, "unmute"),
            (Gesture::ThreeFingers, "mute"),
            (Gesture::Fist, "brightness_down"),
            (Gesture::OpenPalm, "brightness_up"),
        ];
        for (gesture, call) in cases {
            let mut port = RecordingPort::default();
            dispatch(gesture, &mut port).unwrap();
            assert_eq!(port.calls, vec![call]);
        }
    }

    #[test]
    fn unknown_dispatch_is_a_no_op() {
        let mut port = RecordingPort::default();
        dispatch(Gesture::Unknown, &mut port).unwrap();
        assert!(port.calls.is_empty());
    }

    // ── pipeline over real frames ─────────────────────────────────────────

    fn frame(g: Gesture) -> hand_model::LandmarkFrame {
        poses::frame_for(g.canonical_state().unwrap())
    }

    #[test]
    fn palm_palm_fist_dispatches_brightness_once_each_way() {
        let mut p = Pipeline::new(RecordingPort::default());

        assert_eq!(
            p.process(&frame(Gesture::OpenPalm)),
            FrameOutcome::Dispatched(Gesture::OpenPalm)
        );
        assert_eq!(
            p.process(&frame(Gesture::OpenPalm)),
            FrameOutcome::Held(Gesture::OpenPalm)
        );
        assert_eq!(
            p.process(&frame(Gesture::Fist)),
            FrameOutcome::Dispatched(Gesture::Fist)
        );

        assert_eq!(p.port().calls, vec!["brightness_up", "brightness_down"]);
    }

    #[test]
    fn unrecognized_pose_reports_its_finger_state() {
        let state = FingerState::new([false, true, false, false, false]);
        let mut p = Pipeline::new(RecordingPort::default());
        assert_eq!(
            p.process(&poses::frame_for(state)),
            FrameOutcome::Unrecognized(state)
        );
        assert!(p.port().calls.is_empty());
        assert_eq!(p.last_dispatched(), None);
    }

    #[test]
    fn soft_levels_move_with_debounced_gestures() {
        let mut p = Pipeline::new(SoftActuator::with_levels(0.5, false, 50));

        // Held thumbs-up only steps the volume once.
        for _ in 0..10 {
            p.process(&frame(Gesture::ThumbsUp));
        }
        assert!((p.port().volume() - 0.6).abs() < 1e-6);

        p.process(&frame(Gesture::ThreeFingers));
        assert!(p.port().muted());
        p.process(&frame(Gesture::Peace));
        assert!(!p.port().muted());
    }

    #[test]
    fn actuator_failure_does_not_stop_the_pipeline() {
        let mut p = Pipeline::new(FailingPort);
        assert_eq!(
            p.process(&frame(Gesture::ThumbsUp)),
            FrameOutcome::Dispatched(Gesture::ThumbsUp)
        );
        // The next transition still processes and dispatches.
        assert_eq!(
            p.process(&frame(Gesture::Fist)),
            FrameOutcome::Dispatched(Gesture::Fist)
        );
    }
}
