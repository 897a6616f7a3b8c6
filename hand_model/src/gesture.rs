//! Gesture classification — exact-match lookup over the finger-state table.

use std::fmt;

use crate::finger::FingerState;

// ════════════════════════════════════════════════════════════════════════════
// Gesture
// ════════════════════════════════════════════════════════════════════════════

/// Named classification of a [`FingerState`].
///
/// `Unknown` is the first-class catch-all for the 26 vectors not in the
/// table — recognition never falls through to a side-effecting default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gesture {
    ThumbsUp,
    ThumbsDown,
    Peace,
    ThreeFingers,
    Fist,
    OpenPalm,
    Unknown,
}

impl Gesture {
    /// Classify a finger-state vector.
    ///
    /// Exact equality against the table entries — no distance metric. The
    /// entries are disjoint, so order carries no meaning.
    pub fn classify(state: FingerState) -> Gesture {
        match state.as_array() {
            [true, false, false, false, false] => Gesture::ThumbsUp,
            [false, false, false, false, true] => Gesture::ThumbsDown,
            [false, true, true, false, false] => Gesture::Peace,
            [false, true, true, true, false] => Gesture::ThreeFingers,
            [false, false, false, false, false] => Gesture::Fist,
            [true, true, true, true, true] => Gesture::OpenPalm,
            _ => Gesture::Unknown,
        }
    }

    /// The finger-state vector a recognized gesture corresponds to.
    /// `Unknown` has no canonical pose.
    pub fn canonical_state(self) -> Option<FingerState> {
        let arr = match self {
            Gesture::ThumbsUp => [true, false, false, false, false],
            Gesture::ThumbsDown => [false, false, false, false, true],
            Gesture::Peace => [false, true, true, false, false],
            Gesture::ThreeFingers => [false, true, true, true, false],
            Gesture::Fist => [false, false, false, false, false],
            Gesture::OpenPalm => [true, true, true, true, true],
            Gesture::Unknown => return None,
        };
        Some(FingerState::new(arr))
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Gesture::ThumbsUp => "Thumbs Up",
            Gesture::ThumbsDown => "Thumbs Down",
            Gesture::Peace => "Peace",
            Gesture::ThreeFingers => "Three Fingers",
            Gesture::Fist => "Fist",
            Gesture::OpenPalm => "Open Palm",
            Gesture::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn s(arr: [u8; 5]) -> FingerState {
        FingerState::new(arr.map(|b| b != 0))
    }

    #[test]
    fn table_entries_map_exactly() {
        assert_eq!(Gesture::classify(s([1, 0, 0, 0, 0])), Gesture::ThumbsUp);
        assert_eq!(Gesture::classify(s([0, 0, 0, 0, 1])), Gesture::ThumbsDown);
        assert_eq!(Gesture::classify(s([0, 1, 1, 0, 0])), Gesture::Peace);
        assert_eq!(Gesture::classify(s([0, 1, 1, 1, 0])), Gesture::ThreeFingers);
        assert_eq!(Gesture::classify(s([0, 0, 0, 0, 0])), Gesture::Fist);
        assert_eq!(Gesture::classify(s([1, 1, 1, 1, 1])), Gesture::OpenPalm);
    }

    #[test]
    fn every_other_vector_is_unknown() {
        let unknown = FingerState::all()
            .filter(|&st| Gesture::classify(st) == Gesture::Unknown)
            .count();
        assert_eq!(unknown, 32 - 6);
    }

    #[test]
    fn classification_is_total_and_single_valued() {
        for st in FingerState::all() {
            // classify is a function — same input, same output
            assert_eq!(Gesture::classify(st), Gesture::classify(st));
        }
    }

    #[test]
    fn canonical_state_round_trips() {
        for g in [
            Gesture::ThumbsUp,
            Gesture::ThumbsDown,
            Gesture::Peace,
            Gesture::ThreeFingers,
            Gesture::Fist,
            Gesture::OpenPalm,
        ] {
            let st = g.canonical_state().unwrap();
            assert_eq!(Gesture::classify(st), g);
        }
        assert!(Gesture::Unknown.canonical_state().is_none());
    }
}
