//! Drive the pipeline over a scripted pose sequence, no window needed.
//!
//! Shows debounced dispatch against the soft actuator: a held pose fires its
//! action once, an unrecognized pose changes nothing, and levels clamp.
//!
//! Run with: `cargo run -p gesture_control --example headless`

use gesture_control::pipeline::{action_label, FrameOutcome, Pipeline};
use hand_model::{poses, FingerState, Gesture};
use sys_actuator::SoftActuator;

fn main() {
    let mut pipeline = Pipeline::new(SoftActuator::new());

    let point = FingerState::new([false, true, false, false, false]);
    let script: Vec<(&str, FingerState)> = vec![
        ("open palm", Gesture::OpenPalm.canonical_state().unwrap()),
        ("open palm (held)", Gesture::OpenPalm.canonical_state().unwrap()),
        ("open palm (held)", Gesture::OpenPalm.canonical_state().unwrap()),
        ("fist", Gesture::Fist.canonical_state().unwrap()),
        ("pointing", point),
        ("thumbs up", Gesture::ThumbsUp.canonical_state().unwrap()),
        ("thumbs up (held)", Gesture::ThumbsUp.canonical_state().unwrap()),
        ("three fingers", Gesture::ThreeFingers.canonical_state().unwrap()),
        ("peace", Gesture::Peace.canonical_state().unwrap()),
    ];

    println!("frame  pose               outcome");
    println!("-----  ----               -------");
    for (i, (label, state)) in script.iter().enumerate() {
        let outcome = pipeline.process(&poses::frame_for(*state));
        let text = match outcome {
            FrameOutcome::Dispatched(g) => format!("DISPATCH {} → {}", g, action_label(g)),
            FrameOutcome::Held(g) => format!("held {g}"),
            FrameOutcome::Unrecognized(s) => format!("unrecognized {s}"),
        };
        println!("{i:>5}  {label:<18} {text}");
    }

    let port = pipeline.port();
    println!();
    println!(
        "final levels: volume {:.2}  muted {}  brightness {}",
        port.volume(),
        port.muted(),
        port.brightness()
    );
}
