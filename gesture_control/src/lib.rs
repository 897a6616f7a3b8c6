//! # gesture_control
//!
//! Hand-gesture system controller: a live stream of 21-point hand landmarks
//! is reduced to a finger-state vector, classified into a named gesture, and
//! dispatched — debounced, once per gesture episode — to volume, mute, and
//! display-brightness actuators.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | FingerState [T,I,M,R,P] | Action |
//! |---|---|---|
//! | Thumbs Up | `[1,0,0,0,0]` | volume +0.10 (clamped to 1.0) |
//! | Thumbs Down | `[0,0,0,0,1]` | volume −0.10 (clamped to 0.0) |
//! | Peace | `[0,1,1,0,0]` | unmute |
//! | Three Fingers | `[0,1,1,1,0]` | mute |
//! | Fist | `[0,0,0,0,0]` | brightness −10 (clamped to 0) |
//! | Open Palm | `[1,1,1,1,1]` | brightness +10 (clamped to 100) |
//!
//! A held pose fires its action exactly once; the next action fires on the
//! next gesture *transition*. Unrecognized poses and absent hands change
//! nothing.
//!
//! ## Feature flags
//!
//! * (default) — **Soft actuators**: levels held in process memory.
//! * `system` — drive the real OS mixer (ALSA) and backlight (sysfs).
//!
//! ## Frame sources
//!
//! * **Simulation mode** (default): keyboard keys pose a synthetic hand.
//! * **Detector mode** (`--detector`): an external MediaPipe bridge process
//!   supplies real landmarks over stdout (see `detector/hand_detect.py`).
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Pose |
//! |---|---|
//! | `U` | Thumbs Up |
//! | `D` | Thumbs Down |
//! | `P` | Peace |
//! | `T` | Three Fingers |
//! | `F` | Fist |
//! | `O` | Open Palm |
//! | `X` | Pointing (unrecognized pose) |
//! | `N` | Hand away |
//! | `Q` | Quit |

pub mod app;
pub mod pipeline;
pub mod source;
pub mod visualizer;
