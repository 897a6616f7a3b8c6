//! OS backend — ALSA `Master` mixer for volume/mute, sysfs backlight for
//! brightness.
//!
//! Levels are read fresh on every call and written back clamped; nothing is
//! cached between calls. The mixer handle is opened per operation so an
//! unplugged or re-enumerated audio device is picked up on the next gesture
//! rather than wedging the session.

use std::fs;
use std::path::{Path, PathBuf};

use alsa::mixer::{Mixer, Selem, SelemChannelId, SelemId};

use crate::{ActuatorError, ActuatorPort, BRIGHTNESS_STEP, VOLUME_STEP};

const BACKLIGHT_ROOT: &str = "/sys/class/backlight";

fn audio_err(e: alsa::Error) -> ActuatorError {
    ActuatorError::AudioUnavailable(e.to_string())
}

fn open_mixer() -> Result<Mixer, ActuatorError> {
    Mixer::new("default", false).map_err(audio_err)
}

fn master(mixer: &Mixer) -> Result<Selem<'_>, ActuatorError> {
    mixer
        .find_selem(&SelemId::new("Master", 0))
        .ok_or_else(|| ActuatorError::AudioUnavailable("no Master mixer control".into()))
}

// ════════════════════════════════════════════════════════════════════════════
// SystemActuator
// ════════════════════════════════════════════════════════════════════════════

pub struct SystemActuator {
    backlight: Option<PathBuf>,
}

impl SystemActuator {
    /// Verify the mixer is reachable and locate a backlight device.
    ///
    /// A missing backlight is not fatal — brightness operations will report
    /// [`ActuatorError::BacklightUnavailable`] while volume keeps working.
    pub fn probe() -> Result<Self, ActuatorError> {
        let mixer = open_mixer()?;
        master(&mixer)?;

        let backlight = first_backlight();
        if backlight.is_none() {
            log::warn!("no device under {BACKLIGHT_ROOT}; brightness gestures will fail");
        }
        Ok(SystemActuator { backlight })
    }

    fn adjust_volume(&self, delta: f32) -> Result<(), ActuatorError> {
        let mixer = open_mixer()?;
        let selem = master(&mixer)?;

        let (min, max) = selem.get_playback_volume_range();
        let span = (max - min) as f32;
        let raw = selem
            .get_playback_volume(SelemChannelId::FrontLeft)
            .map_err(audio_err)?;
        let scalar = if span > 0.0 {
            (raw - min) as f32 / span
        } else {
            0.0
        };
        let next = (scalar + delta).clamp(0.0, 1.0);
        let target = min + (next * span).round() as i64;
        selem.set_playback_volume_all(target).map_err(audio_err)
    }

    fn set_mute(&self, muted: bool) -> Result<(), ActuatorError> {
        let mixer = open_mixer()?;
        let selem = master(&mixer)?;

        if !selem.has_playback_switch() {
            return Err(ActuatorError::Rejected(
                "Master control has no mute switch".into(),
            ));
        }
        // ALSA switch semantics: 1 = playback on, 0 = muted.
        selem
            .set_playback_switch_all(if muted { 0 } else { 1 })
            .map_err(audio_err)
    }

    fn adjust_brightness(&self, delta: i32) -> Result<(), ActuatorError> {
        let dir = self.backlight.as_ref().ok_or_else(|| {
            ActuatorError::BacklightUnavailable(format!("no device under {BACKLIGHT_ROOT}"))
        })?;

        let max = read_sysfs_value(&dir.join("max_brightness"))?;
        if max <= 0 {
            return Err(ActuatorError::Rejected(format!(
                "{} reports max_brightness {max}",
                dir.display()
            )));
        }
        let raw = read_sysfs_value(&dir.join("brightness"))?;

        let percent = ((raw * 100 + max / 2) / max) as i32;
        let next = (percent + delta).clamp(0, 100) as i64;
        let target = next * max / 100;

        fs::write(dir.join("brightness"), target.to_string())?;
        Ok(())
    }
}

impl ActuatorPort for SystemActuator {
    fn volume_up(&mut self) -> Result<(), ActuatorError> {
        self.adjust_volume(VOLUME_STEP)
    }

    fn volume_down(&mut self) -> Result<(), ActuatorError> {
        self.adjust_volume(-VOLUME_STEP)
    }

    fn mute(&mut self) -> Result<(), ActuatorError> {
        self.set_mute(true)
    }

    fn unmute(&mut self) -> Result<(), ActuatorError> {
        self.set_mute(false)
    }

    fn brightness_up(&mut self) -> Result<(), ActuatorError> {
        self.adjust_brightness(BRIGHTNESS_STEP)
    }

    fn brightness_down(&mut self) -> Result<(), ActuatorError> {
        self.adjust_brightness(-BRIGHTNESS_STEP)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════════════

fn first_backlight() -> Option<PathBuf> {
    let mut entries: Vec<_> = fs::read_dir(BACKLIGHT_ROOT)
        .ok()?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    entries.sort();
    entries.into_iter().next()
}

fn read_sysfs_value(path: &Path) -> Result<i64, ActuatorError> {
    let text = fs::read_to_string(path)?;
    text.trim()
        .parse::<i64>()
        .map_err(|e| ActuatorError::Rejected(format!("{}: {e}", path.display())))
}
