//! Voice parameters and the pitch controller.

use core::f64::consts::PI;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::math::sin;
use crate::phonemes::Phoneme;
use crate::synth::frame_count;

/// Plain, unvalidated voice settings, e.g. as loaded from a config file.
///
/// Turn it into a [`Voice`] with [`VoiceConfig::build`] or `Voice::try_from`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    pub name: String,
    /// base pitch in Hz
    pub pitch: f64,
    /// pitch variation in Hz
    pub pitch_range: f64,
    /// speed multiplier
    pub speed: f64,
    /// volume multiplier
    pub volume: f64,
    /// 0 .. 1, adds aspiration
    pub breathiness: f64,
    /// 0 .. 1, adds jitter
    pub roughness: f64,
    /// 0 .. 1, nasal quality
    pub nasality: f64,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        VoiceConfig {
            name: "default".to_owned(),
            pitch: 120.0,
            pitch_range: 20.0,
            speed: 1.0,
            volume: 1.0,
            breathiness: 0.0,
            roughness: 0.0,
            nasality: 0.0,
        }
    }
}

fn check_range(name: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(Error::invalid_param(
            name,
            format!("{value} is outside {min} ..= {max}"),
        ))
    }
}

impl VoiceConfig {
    /// Validates every field and produces a [`Voice`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for the first field outside its range.
    pub fn build(self) -> Result<Voice> {
        check_range("pitch", self.pitch, 20.0, 2000.0)?;
        check_range("pitch_range", self.pitch_range, 0.0, 1000.0)?;
        check_range("speed", self.speed, 0.1, 10.0)?;
        check_range("volume", self.volume, 0.0, 10.0)?;
        check_range("breathiness", self.breathiness, 0.0, 1.0)?;
        check_range("roughness", self.roughness, 0.0, 1.0)?;
        check_range("nasality", self.nasality, 0.0, 1.0)?;
        Ok(Voice { config: self })
    }
}

/// Validated voice configuration. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "VoiceConfig", into = "VoiceConfig")]
pub struct Voice {
    config: VoiceConfig,
}

impl TryFrom<VoiceConfig> for Voice {
    type Error = Error;

    fn try_from(config: VoiceConfig) -> Result<Self> {
        config.build()
    }
}

impl From<Voice> for VoiceConfig {
    fn from(voice: Voice) -> Self {
        voice.config
    }
}

impl Voice {
    fn preset(name: &str, pitch: f64, pitch_range: f64) -> Self {
        Voice {
            config: VoiceConfig {
                name: name.to_owned(),
                pitch,
                pitch_range,
                ..VoiceConfig::default()
            },
        }
    }

    #[must_use]
    pub fn male() -> Self {
        Self::preset("male", 100.0, 15.0)
    }

    #[must_use]
    pub fn female() -> Self {
        Self::preset("female", 180.0, 30.0)
    }

    #[must_use]
    pub fn child() -> Self {
        Self::preset("child", 250.0, 40.0)
    }

    /// Flat pitch.
    #[must_use]
    pub fn robot() -> Self {
        Self::preset("robot", 100.0, 0.0)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }
    #[must_use]
    pub fn pitch(&self) -> f64 {
        self.config.pitch
    }
    #[must_use]
    pub fn pitch_range(&self) -> f64 {
        self.config.pitch_range
    }
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.config.speed
    }
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.config.volume
    }
    #[must_use]
    pub fn breathiness(&self) -> f64 {
        self.config.breathiness
    }
    #[must_use]
    pub fn roughness(&self) -> f64 {
        self.config.roughness
    }
    #[must_use]
    pub fn nasality(&self) -> f64 {
        self.config.nasality
    }

    /// A copy of the settings, for editing and rebuilding.
    #[must_use]
    pub fn to_config(&self) -> VoiceConfig {
        self.config.clone()
    }

    /// Applies speed, breathiness and base pitch to one phoneme.
    ///
    /// The duration is divided by the speed and truncated to whole
    /// milliseconds. Voiced phonemes get at least `breathiness * 30` of
    /// aspiration.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn apply(&self, phoneme: &Phoneme) -> Phoneme {
        let duration_ms = (f64::from(phoneme.duration_ms) / self.speed()) as u32;

        let mut ah = phoneme.ah;
        if self.breathiness() > 0.0 && phoneme.voiced {
            ah = ah.max(self.breathiness() * 30.0);
        }

        Phoneme {
            duration_ms,
            f0: self.pitch(),
            ah,
            ..phoneme.clone()
        }
    }

    /// Generates one F0 value per 10 ms frame for the whole utterance.
    ///
    /// ```text
    ///    t           = i / max(1, N - 1)
    ///    declination = 1 - 0.1 * t
    ///    jitter      = 1 + U(-0.01, 0.01) * (1 + roughness)
    ///    intonation  = 0.5 * sin(t * PI)
    ///    f0[i]       = pitch * declination * jitter + pitch_range * intonation
    /// ```
    pub fn contour<R: Rng + ?Sized>(&self, phonemes: &[Phoneme], rng: &mut R) -> Vec<f64> {
        let total_frames: usize = phonemes.iter().map(|p| frame_count(p.duration_ms)).sum();
        let last = total_frames.saturating_sub(1).max(1) as f64;

        (0..total_frames)
            .map(|i| {
                let t = i as f64 / last;
                let declination = 1.0 - 0.1 * t;
                let jitter = 1.0 + rng.random_range(-0.01..0.01) * (1.0 + self.roughness());
                let intonation = 0.5 * sin(t * PI);
                self.pitch() * declination * jitter + self.pitch_range() * intonation
            })
            .collect()
    }
}
