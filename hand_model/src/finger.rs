//! Finger-state extraction — one frame in, five booleans out.

use std::fmt;

use crate::landmark::{landmarks, LandmarkFrame};

// ════════════════════════════════════════════════════════════════════════════
// FingerState
// ════════════════════════════════════════════════════════════════════════════

/// Which fingers are extended, in `[thumb, index, middle, ring, pinky]` order.
///
/// Derived purely from a single [`LandmarkFrame`]; carries no memory across
/// frames. There are exactly 32 possible values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FingerState([bool; 5]);

impl FingerState {
    pub fn new(extended: [bool; 5]) -> Self {
        FingerState(extended)
    }

    /// Extract the finger state from one frame.
    ///
    /// * Thumb: extended iff `tip.x < ip.x` (landmark 4 vs 3). In the mirrored
    ///   frame a tip further left than its own IP joint means the thumb is
    ///   splayed outward. This is an x-axis heuristic, not an up/down test,
    ///   and misreads a rotated hand.
    /// * Other fingers: extended iff `tip.y < pip.y` — the tip sits above its
    ///   PIP joint (y grows downward), independent of wrist position.
    pub fn extract(frame: &LandmarkFrame) -> FingerState {
        let mut extended = [false; 5];
        extended[0] = frame[landmarks::THUMB_TIP].x < frame[landmarks::THUMB_IP].x;
        for slot in 1..5 {
            let tip = landmarks::FINGER_TIPS[slot];
            extended[slot] = frame[tip].y < frame[tip - 2].y;
        }
        FingerState(extended)
    }

    pub fn as_array(self) -> [bool; 5] {
        self.0
    }

    pub fn thumb(self) -> bool {
        self.0[0]
    }

    /// Count of extended fingers.
    pub fn extended_count(self) -> usize {
        self.0.iter().filter(|&&e| e).count()
    }

    /// Iterate all 32 possible finger-state vectors.
    pub fn all() -> impl Iterator<Item = FingerState> {
        (0u8..32).map(|bits| {
            let mut extended = [false; 5];
            for (slot, e) in extended.iter_mut().enumerate() {
                *e = bits & (1 << slot) != 0;
            }
            FingerState(extended)
        })
    }
}

impl fmt::Display for FingerState {
    /// Renders like `[1,0,0,0,0]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, &e) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", e as u8)?;
        }
        write!(f, "]")
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poses;

    #[test]
    fn extraction_is_deterministic() {
        let frame = poses::frame_for(FingerState::new([true, false, true, false, true]));
        let first = FingerState::extract(&frame);
        for _ in 0..10 {
            assert_eq!(FingerState::extract(&frame), first);
        }
    }

    #[test]
    fn thumb_reads_the_x_axis() {
        // Start from a fist and move only the thumb tip across its IP joint.
        let mut pts = *poses::frame_for(FingerState::new([false; 5])).points();
        let ip_x = pts[landmarks::THUMB_IP].x;

        pts[landmarks::THUMB_TIP].x = ip_x - 0.05;
        let splayed = LandmarkFrame::new(pts);
        assert!(FingerState::extract(&splayed).thumb());

        pts[landmarks::THUMB_TIP].x = ip_x + 0.05;
        let tucked = LandmarkFrame::new(pts);
        assert!(!FingerState::extract(&tucked).thumb());
    }

    #[test]
    fn finger_reads_tip_against_its_own_pip_not_the_wrist() {
        // Shift the whole wrist far away; the index classification must not move.
        let mut pts = *poses::frame_for(FingerState::new([false, true, false, false, false]))
            .points();
        pts[landmarks::WRIST].y = 0.01;
        let frame = LandmarkFrame::new(pts);
        let state = FingerState::extract(&frame);
        assert_eq!(state.as_array(), [false, true, false, false, false]);
    }

    #[test]
    fn all_enumerates_32_distinct_states() {
        let states: Vec<_> = FingerState::all().collect();
        assert_eq!(states.len(), 32);
        for (i, a) in states.iter().enumerate() {
            for b in &states[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn display_matches_bracket_notation() {
        let s = FingerState::new([true, false, false, false, true]);
        assert_eq!(s.to_string(), "[1,0,0,0,1]");
    }
}
