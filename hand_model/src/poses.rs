//! Synthetic pose catalogue — frames built to land on a chosen finger state.
//!
//! Used by the keyboard simulator and by tests, so the whole
//! extract → classify path runs on real frames even with no camera attached.

use crate::finger::FingerState;
use crate::landmark::{landmarks, Landmark, LandmarkFrame, LANDMARK_COUNT};

// Joint columns per non-thumb finger, index → pinky (mirrored frame,
// index on the right).
const FINGER_X: [f32; 4] = [0.56, 0.48, 0.40, 0.32];

const MCP_Y: f32 = 0.55;
const PIP_Y: f32 = 0.45;
const DIP_Y: f32 = 0.38;
const TIP_EXTENDED_Y: f32 = 0.30; // above the PIP
const TIP_FLEXED_Y: f32 = 0.52; // curled back below the PIP

/// Build a frame whose extraction yields exactly `state`.
///
/// The hand is upright with the palm toward the camera, matching the
/// mirrored-frame convention the extractor assumes: a splayed thumb tip lands
/// left of its IP joint, an extended fingertip lands above its PIP joint.
pub fn frame_for(state: FingerState) -> LandmarkFrame {
    let [thumb, fingers @ ..] = state.as_array();
    let mut pts = [Landmark::default(); LANDMARK_COUNT];

    pts[landmarks::WRIST] = Landmark::new(0.50, 0.90, 0.0);

    // Thumb chain splays toward the frame's right edge; the tip crosses back
    // over the IP joint when extended.
    pts[landmarks::THUMB_CMC] = Landmark::new(0.62, 0.82, 0.0);
    pts[landmarks::THUMB_MCP] = Landmark::new(0.66, 0.76, 0.0);
    pts[landmarks::THUMB_IP] = Landmark::new(0.68, 0.70, 0.0);
    pts[landmarks::THUMB_TIP] = if thumb {
        Landmark::new(0.60, 0.66, 0.0)
    } else {
        Landmark::new(0.74, 0.68, 0.0)
    };

    for (finger, &extended) in fingers.iter().enumerate() {
        let x = FINGER_X[finger];
        let mcp = landmarks::INDEX_FINGER_MCP + finger * 4;
        pts[mcp] = Landmark::new(x, MCP_Y, 0.0);
        pts[mcp + 1] = Landmark::new(x, PIP_Y, 0.0);
        pts[mcp + 2] = Landmark::new(x, DIP_Y, 0.0);
        pts[mcp + 3] = Landmark::new(
            x,
            if extended { TIP_EXTENDED_Y } else { TIP_FLEXED_Y },
            0.0,
        );
    }

    LandmarkFrame::new(pts)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::Gesture;

    #[test]
    fn frame_for_round_trips_every_state() {
        for state in FingerState::all() {
            let frame = frame_for(state);
            assert_eq!(
                FingerState::extract(&frame),
                state,
                "pose for {} did not extract back",
                state
            );
        }
    }

    #[test]
    fn canonical_gesture_poses_classify_back() {
        for g in [
            Gesture::ThumbsUp,
            Gesture::ThumbsDown,
            Gesture::Peace,
            Gesture::ThreeFingers,
            Gesture::Fist,
            Gesture::OpenPalm,
        ] {
            let frame = frame_for(g.canonical_state().unwrap());
            assert_eq!(Gesture::classify(FingerState::extract(&frame)), g);
        }
    }
}
