//! Frame sources — keyboard simulation and the external landmark detector.
//!
//! The public interface is [`FrameEvent`] delivered over a `mpsc` channel.
//! Consumers don't need to know whether frames came from a real detector or
//! the keyboard simulator, and the channel preserves frame order, so the
//! debouncer always compares against the immediately preceding gesture.

use std::io::{BufRead, BufReader};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use anyhow::{bail, Context};
use serde::Deserialize;

use hand_model::{poses, FingerState, Gesture, Landmark, LandmarkFrame};

/// Hands scored below this by the detector are treated as absent.
pub const MIN_DETECTION_CONFIDENCE: f32 = 0.7;

// ════════════════════════════════════════════════════════════════════════════
// FrameEvent
// ════════════════════════════════════════════════════════════════════════════

/// One tick of the frame stream.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameEvent {
    /// A hand was detected this frame.
    Hand(LandmarkFrame),

    /// No hand this frame. Not an error — dispatch is skipped and debounce
    /// state is left untouched.
    Absent,

    /// The source is done (user quit, or the detector went away).
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// FrameSource trait — unified interface for detector and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`FrameEvent`]s over a channel.
pub trait FrameSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<FrameEvent>);
}

/// Spawn a frame source on its own thread and return the receiving end.
pub fn spawn_frame_source<S: FrameSource>(source: S) -> Receiver<FrameEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// SimFrameSource — keyboard simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the simulation window.
#[derive(Clone, Debug)]
pub enum SimInput {
    KeyDown(SimKey),
}

/// Simulated key codes (mapped from minifb Key).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimKey {
    ThumbsUp,     // U
    ThumbsDown,   // D
    Peace,        // P
    ThreeFingers, // T
    Fist,         // F
    OpenPalm,     // O
    Point,        // X — index only, lands on no table entry
    HandAway,     // N
    Quit,         // Q
}

/// Frame source driven by [`SimInput`] events from the visualizer's window.
///
/// Each pose key is translated into a *synthetic 21-landmark frame* built by
/// [`hand_model::poses`], so the full extract → classify path runs exactly as
/// it would on detector output.
pub struct SimFrameSource {
    pub rx: Receiver<SimInput>,
}

impl FrameSource for SimFrameSource {
    fn run(self: Box<Self>, tx: Sender<FrameEvent>) {
        for input in self.rx {
            let SimInput::KeyDown(key) = input;
            let event = match key {
                SimKey::ThumbsUp => pose_event(Gesture::ThumbsUp),
                SimKey::ThumbsDown => pose_event(Gesture::ThumbsDown),
                SimKey::Peace => pose_event(Gesture::Peace),
                SimKey::ThreeFingers => pose_event(Gesture::ThreeFingers),
                SimKey::Fist => pose_event(Gesture::Fist),
                SimKey::OpenPalm => pose_event(Gesture::OpenPalm),
                SimKey::Point => FrameEvent::Hand(poses::frame_for(FingerState::new([
                    false, true, false, false, false,
                ]))),
                SimKey::HandAway => FrameEvent::Absent,
                SimKey::Quit => {
                    let _ = tx.send(FrameEvent::Quit);
                    return;
                }
            };
            if tx.send(event).is_err() {
                return;
            }
        }
    }
}

fn pose_event(gesture: Gesture) -> FrameEvent {
    match gesture.canonical_state() {
        Some(state) => FrameEvent::Hand(poses::frame_for(state)),
        None => FrameEvent::Absent,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// DetectorSource — external landmark detector subprocess
// ════════════════════════════════════════════════════════════════════════════

/// Frame source backed by an external hand-landmark detector process
/// (the MediaPipe bridge under `detector/hand_detect.py`).
///
/// # Protocol
///
/// The child owns the camera. It prints `READY` once, then one JSON object
/// per captured frame on stdout:
///
/// ```text
/// {"hands":[{"handedness":"Right","score":0.93,"landmarks":[{"x":..,"y":..,"z":..} ×21]}]}
/// ```
///
/// An empty `hands` array, or one with every score below the confidence
/// threshold, becomes [`FrameEvent::Absent`]. A payload with a landmark count
/// other than 21 is a contract violation: the frame is discarded with a
/// warning and processing continues.
pub struct DetectorSource {
    pub command: Vec<String>,
    pub min_confidence: f32,
}

impl DetectorSource {
    pub fn new(command: Vec<String>, min_confidence: f32) -> Self {
        DetectorSource {
            command,
            min_confidence,
        }
    }
}

impl FrameSource for DetectorSource {
    fn run(self: Box<Self>, tx: Sender<FrameEvent>) {
        if let Err(e) = detector_loop(&self.command, self.min_confidence, &tx) {
            log::error!("detector source stopped: {e:#}");
        }
        let _ = tx.send(FrameEvent::Quit);
    }
}

fn detector_loop(
    command: &[String],
    min_confidence: f32,
    tx: &Sender<FrameEvent>,
) -> anyhow::Result<()> {
    let (program, args) = command.split_first().context("empty detector command")?;

    log::info!("starting landmark detector: {}", command.join(" "));
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .with_context(|| format!("failed to start detector '{program}'"))?;

    let stdout = child.stdout.take().context("detector stdout unavailable")?;
    let mut reader = BufReader::new(stdout);

    let mut ready = String::new();
    reader
        .read_line(&mut ready)
        .context("reading detector READY line")?;
    if ready.trim() != "READY" {
        let _ = child.kill();
        bail!("detector did not signal READY, got: {:?}", ready.trim());
    }
    log::info!("landmark detector ready");

    for line in reader.lines() {
        let line = line.context("reading detector frame")?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_detection(&line, min_confidence) {
            Ok(event) => {
                // Receiver gone means the app shut down.
                if tx.send(event).is_err() {
                    break;
                }
            }
            Err(e) => log::warn!("discarding detector frame: {e:#}"),
        }
    }

    let _ = child.kill();
    Ok(())
}

// ── wire format ────────────────────────────────────────────────────────────

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
    z: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    #[serde(default)]
    handedness: String,
    score: f32,
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct DetectionJson {
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Parse one detector stdout line into a frame event.
fn parse_detection(line: &str, min_confidence: f32) -> anyhow::Result<FrameEvent> {
    let detection: DetectionJson =
        serde_json::from_str(line).context("unparseable detector payload")?;

    if let Some(err) = detection.error {
        bail!("detector reported: {err}");
    }

    for hand in detection.hands {
        if hand.score < min_confidence {
            continue;
        }
        let points: Vec<Landmark> = hand
            .landmarks
            .iter()
            .map(|l| Landmark::new(l.x, l.y, l.z))
            .collect();
        let frame = LandmarkFrame::from_slice(&points)
            .with_context(|| format!("hand {:?}", hand.handedness))?;
        return Ok(FrameEvent::Hand(frame));
    }

    Ok(FrameEvent::Absent)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(score: f32, count: usize) -> String {
        let landmarks: Vec<String> = (0..count)
            .map(|i| format!(r#"{{"x":0.{i},"y":0.5,"z":0.0}}"#, i = i % 10))
            .collect();
        format!(
            r#"{{"hands":[{{"handedness":"Right","score":{score},"landmarks":[{}]}}]}}"#,
            landmarks.join(",")
        )
    }

    #[test]
    fn confident_hand_parses_to_a_frame() {
        let event = parse_detection(&payload(0.93, 21), MIN_DETECTION_CONFIDENCE).unwrap();
        assert!(matches!(event, FrameEvent::Hand(_)));
    }

    #[test]
    fn low_confidence_hand_is_absent() {
        let event = parse_detection(&payload(0.40, 21), MIN_DETECTION_CONFIDENCE).unwrap();
        assert_eq!(event, FrameEvent::Absent);
    }

    #[test]
    fn empty_hands_is_absent() {
        let event = parse_detection(r#"{"hands":[]}"#, MIN_DETECTION_CONFIDENCE).unwrap();
        assert_eq!(event, FrameEvent::Absent);
    }

    #[test]
    fn wrong_landmark_count_is_rejected() {
        assert!(parse_detection(&payload(0.93, 20), MIN_DETECTION_CONFIDENCE).is_err());
        assert!(parse_detection(&payload(0.93, 22), MIN_DETECTION_CONFIDENCE).is_err());
    }

    #[test]
    fn detector_error_field_is_rejected() {
        let line = r#"{"hands":[],"error":"camera disconnected"}"#;
        assert!(parse_detection(line, MIN_DETECTION_CONFIDENCE).is_err());
    }

    #[test]
    fn garbage_line_is_rejected() {
        assert!(parse_detection("not json", MIN_DETECTION_CONFIDENCE).is_err());
    }

    #[test]
    fn sim_source_translates_keys_to_posed_frames() {
        let (sim_tx, sim_rx) = mpsc::channel();
        let frame_rx = spawn_frame_source(SimFrameSource { rx: sim_rx });

        sim_tx.send(SimInput::KeyDown(SimKey::Fist)).unwrap();
        sim_tx.send(SimInput::KeyDown(SimKey::HandAway)).unwrap();
        sim_tx.send(SimInput::KeyDown(SimKey::Quit)).unwrap();

        match frame_rx.recv().unwrap() {
            FrameEvent::Hand(frame) => {
                let state = FingerState::extract(&frame);
                assert_eq!(Gesture::classify(state), Gesture::Fist);
            }
            other => panic!("expected a hand frame, got {other:?}"),
        }
        assert_eq!(frame_rx.recv().unwrap(), FrameEvent::Absent);
        assert_eq!(frame_rx.recv().unwrap(), FrameEvent::Quit);
    }

    #[test]
    fn sim_point_key_is_an_unrecognized_pose() {
        let (sim_tx, sim_rx) = mpsc::channel();
        let frame_rx = spawn_frame_source(SimFrameSource { rx: sim_rx });

        sim_tx.send(SimInput::KeyDown(SimKey::Point)).unwrap();
        match frame_rx.recv().unwrap() {
            FrameEvent::Hand(frame) => {
                let state = FingerState::extract(&frame);
                assert_eq!(Gesture::classify(state), Gesture::Unknown);
            }
            other => panic!("expected a hand frame, got {other:?}"),
        }
    }
}
