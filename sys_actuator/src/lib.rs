//! # sys_actuator
//!
//! Volume, mute, and display-brightness control behind a single
//! [`ActuatorPort`] trait.
//!
//! Every adjustment is read-modify-write inside the backend: the current
//! level is read fresh, the delta applied, the result clamped and written
//! back. Callers never cache actuator state, so a level changed behind the
//! process's back (a volume key, another app) cannot drift the next
//! adjustment.
//!
//! Backends:
//!
//! * [`SoftActuator`] — in-memory levels; the default, and the test double.
//! * [`NullActuator`] — accepts everything, does nothing.
//! * `SystemActuator` (feature `system`) — ALSA Master mixer + sysfs
//!   backlight.
//!
//! [`open_actuator`] picks the best available backend and falls back with a
//! warning rather than failing.

use thiserror::Error;

#[cfg(feature = "system")]
pub mod system;

// ════════════════════════════════════════════════════════════════════════════
// Step sizes and ranges
// ════════════════════════════════════════════════════════════════════════════

/// Scalar volume delta per call; volume lives in `[0.0, 1.0]`.
pub const VOLUME_STEP: f32 = 0.10;

/// Brightness delta per call; brightness lives in `[0, 100]` percent.
pub const BRIGHTNESS_STEP: i32 = 10;

// ════════════════════════════════════════════════════════════════════════════
// ActuatorError
// ════════════════════════════════════════════════════════════════════════════

/// Failure inside an actuator backend. Never fatal to the recognition loop —
/// the caller logs it and the next frame is the next opportunity.
#[derive(Debug, Error)]
pub enum ActuatorError {
    #[error("no audio endpoint available: {0}")]
    AudioUnavailable(String),

    #[error("no controllable backlight: {0}")]
    BacklightUnavailable(String),

    #[error("actuator rejected value: {0}")]
    Rejected(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ════════════════════════════════════════════════════════════════════════════
// ActuatorPort
// ════════════════════════════════════════════════════════════════════════════

/// The six control operations the gesture pipeline can invoke.
///
/// Mute and unmute are absolute sets, not toggles — a missed frame must not
/// leave the flag inverted relative to what the user signed.
pub trait ActuatorPort {
    /// Read current scalar volume, add [`VOLUME_STEP`], clamp to 1.0, write.
    fn volume_up(&mut self) -> Result<(), ActuatorError>;

    /// Read current scalar volume, subtract [`VOLUME_STEP`], clamp to 0.0, write.
    fn volume_down(&mut self) -> Result<(), ActuatorError>;

    fn mute(&mut self) -> Result<(), ActuatorError>;

    fn unmute(&mut self) -> Result<(), ActuatorError>;

    /// Read current brightness, add [`BRIGHTNESS_STEP`], clamp to 100, write.
    fn brightness_up(&mut self) -> Result<(), ActuatorError>;

    /// Read current brightness, subtract [`BRIGHTNESS_STEP`], clamp to 0, write.
    fn brightness_down(&mut self) -> Result<(), ActuatorError>;
}

impl<P: ActuatorPort + ?Sized> ActuatorPort for Box<P> {
    fn volume_up(&mut self) -> Result<(), ActuatorError> {
        (**self).volume_up()
    }
    fn volume_down(&mut self) -> Result<(), ActuatorError> {
        (**self).volume_down()
    }
    fn mute(&mut self) -> Result<(), ActuatorError> {
        (**self).mute()
    }
    fn unmute(&mut self) -> Result<(), ActuatorError> {
        (**self).unmute()
    }
    fn brightness_up(&mut self) -> Result<(), ActuatorError> {
        (**self).brightness_up()
    }
    fn brightness_down(&mut self) -> Result<(), ActuatorError> {
        (**self).brightness_down()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SoftActuator — in-memory backend (default, and the test double)
// ════════════════════════════════════════════════════════════════════════════

/// Actuator holding its levels in process memory.
///
/// Simulation mode runs against this so gesture dispatch shows real level
/// changes without touching the OS; the test suites assert against it.
#[derive(Clone, Debug, PartialEq)]
pub struct SoftActuator {
    volume: f32,
    muted: bool,
    brightness: i32,
}

impl SoftActuator {
    pub fn new() -> Self {
        SoftActuator {
            volume: 0.50,
            muted: false,
            brightness: 50,
        }
    }

    pub fn with_levels(volume: f32, muted: bool, brightness: i32) -> Self {
        SoftActuator {
            volume: volume.clamp(0.0, 1.0),
            muted,
            brightness: brightness.clamp(0, 100),
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    pub fn brightness(&self) -> i32 {
        self.brightness
    }
}

impl Default for SoftActuator {
    fn default() -> Self {
        SoftActuator::new()
    }
}

impl ActuatorPort for SoftActuator {
    fn volume_up(&mut self) -> Result<(), ActuatorError> {
        self.volume = (self.volume + VOLUME_STEP).min(1.0);
        Ok(())
    }

    fn volume_down(&mut self) -> Result<(), ActuatorError> {
        self.volume = (self.volume - VOLUME_STEP).max(0.0);
        Ok(())
    }

    fn mute(&mut self) -> Result<(), ActuatorError> {
        self.muted = true;
        Ok(())
    }

    fn unmute(&mut self) -> Result<(), ActuatorError> {
        self.muted = false;
        Ok(())
    }

    fn brightness_up(&mut self) -> Result<(), ActuatorError> {
        self.brightness = (self.brightness + BRIGHTNESS_STEP).min(100);
        Ok(())
    }

    fn brightness_down(&mut self) -> Result<(), ActuatorError> {
        self.brightness = (self.brightness - BRIGHTNESS_STEP).max(0);
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// NullActuator — inert fallback
// ════════════════════════════════════════════════════════════════════════════

/// Accepts every operation and does nothing. Used when no other backend can
/// be opened, so the recognition loop keeps running.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullActuator;

impl ActuatorPort for NullActuator {
    fn volume_up(&mut self) -> Result<(), ActuatorError> {
        Ok(())
    }
    fn volume_down(&mut self) -> Result<(), ActuatorError> {
        Ok(())
    }
    fn mute(&mut self) -> Result<(), ActuatorError> {
        Ok(())
    }
    fn unmute(&mut self) -> Result<(), ActuatorError> {
        Ok(())
    }
    fn brightness_up(&mut self) -> Result<(), ActuatorError> {
        Ok(())
    }
    fn brightness_down(&mut self) -> Result<(), ActuatorError> {
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// open_actuator — pick the best available backend
// ════════════════════════════════════════════════════════════════════════════

/// Open the best actuator backend available in this build.
///
/// With the `system` feature the OS backend is probed first; if the mixer or
/// backlight cannot be reached the soft actuator is used instead, with a
/// warning. Plain builds go straight to the soft actuator.
pub fn open_actuator() -> Box<dyn ActuatorPort> {
    #[cfg(feature = "system")]
    {
        match system::SystemActuator::probe() {
            Ok(sys) => {
                log::info!("actuator: system backend (ALSA + sysfs backlight)");
                return Box::new(sys);
            }
            Err(e) => {
                log::warn!("actuator: system backend unavailable ({e}) — using soft levels");
            }
        }
    }

    log::info!("actuator: soft in-memory backend");
    Box::new(SoftActuator::new())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn volume_up_steps_by_a_tenth() {
        let mut a = SoftActuator::with_levels(0.50, false, 50);
        a.volume_up().unwrap();
        assert!(approx(a.volume(), 0.60));
    }

    #[test]
    fn volume_never_exceeds_one() {
        let mut a = SoftActuator::with_levels(0.95, false, 50);
        for _ in 0..20 {
            a.volume_up().unwrap();
        }
        assert!(approx(a.volume(), 1.0));
    }

    #[test]
    fn volume_never_drops_below_zero() {
        let mut a = SoftActuator::with_levels(0.05, false, 50);
        for _ in 0..20 {
            a.volume_down().unwrap();
        }
        assert!(approx(a.volume(), 0.0));
    }

    #[test]
    fn brightness_clamps_at_both_ends() {
        let mut a = SoftActuator::with_levels(0.5, false, 95);
        for _ in 0..20 {
            a.brightness_up().unwrap();
        }
        assert_eq!(a.brightness(), 100);
        for _ in 0..20 {
            a.brightness_down().unwrap();
        }
        assert_eq!(a.brightness(), 0);
    }

    #[test]
    fn mute_is_an_absolute_set_not_a_toggle() {
        let mut a = SoftActuator::new();
        a.mute().unwrap();
        a.mute().unwrap();
        assert!(a.muted());
        a.unmute().unwrap();
        a.unmute().unwrap();
        assert!(!a.muted());
    }

    #[test]
    fn null_actuator_accepts_everything() {
        let mut n = NullActuator;
        n.volume_up().unwrap();
        n.volume_down().unwrap();
        n.mute().unwrap();
        n.unmute().unwrap();
        n.brightness_up().unwrap();
        n.brightness_down().unwrap();
    }

    #[test]
    fn open_actuator_returns_a_working_port() {
        let mut port = open_actuator();
        assert!(port.volume_up().is_ok());
    }
}
