//! In-memory sample buffer.

use crate::error::{Error, Result};

/// Interleaved samples in `-1 .. 1` together with their format.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f64>,
    sample_rate: u32,
    channels: u16,
    bits_per_sample: u16,
}

impl AudioBuffer {
    /// Empty mono 16-bit buffer.
    #[must_use]
    pub fn new(sample_rate: u32) -> Self {
        Self::with_format(sample_rate, 1, 16)
    }

    /// Empty buffer with an explicit format. The bit depth is checked when encoding.
    #[must_use]
    pub fn with_format(sample_rate: u32, channels: u16, bits_per_sample: u16) -> Self {
        AudioBuffer {
            samples: Vec::new(),
            sample_rate,
            channels,
            bits_per_sample,
        }
    }

    /// Mono 16-bit buffer holding `samples`.
    #[must_use]
    pub fn from_samples(samples: Vec<f64>, sample_rate: u32) -> Self {
        AudioBuffer {
            samples,
            ..Self::new(sample_rate)
        }
    }

    /// Replaces the samples, keeping the format.
    #[must_use]
    pub fn with_samples(self, samples: Vec<f64>) -> Self {
        AudioBuffer { samples, ..self }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [f64] {
        &mut self.samples
    }

    #[must_use]
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }

    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    #[must_use]
    pub fn channels(&self) -> u16 {
        self.channels
    }

    #[must_use]
    pub fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }

    /// Duration in seconds, counting one frame per `channels` interleaved samples.
    #[must_use]
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / (f64::from(self.sample_rate) * f64::from(self.channels))
    }

    /// Largest absolute sample value, 0 for an empty buffer.
    #[must_use]
    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0, |peak, s| peak.max(s.abs()))
    }

    pub fn amplify(&mut self, factor: f64) {
        for s in &mut self.samples {
            *s *= factor;
        }
    }

    /// Scales the buffer to a peak of exactly 1. Silent buffers are left alone.
    pub fn normalize(&mut self) {
        let peak = self.peak();
        if peak > 0.0 {
            for s in &mut self.samples {
                *s /= peak;
            }
        }
    }

    fn ramp_len(&self, secs: f64) -> usize {
        (secs * f64::from(self.sample_rate)) as usize
    }

    /// Linear fade from silence over the first `secs` seconds.
    pub fn fade_in(&mut self, secs: f64) {
        let count = self.ramp_len(secs);
        if count == 0 {
            return;
        }
        for (i, s) in self.samples.iter_mut().take(count).enumerate() {
            *s *= i as f64 / count as f64;
        }
    }

    /// Linear fade to silence over the last `secs` seconds.
    pub fn fade_out(&mut self, secs: f64) {
        let count = self.ramp_len(secs);
        if count == 0 {
            return;
        }
        let len = self.samples.len();
        let start = len.saturating_sub(count);
        for (i, s) in self.samples.iter_mut().enumerate().skip(start) {
            *s *= (len - i) as f64 / count as f64;
        }
    }

    fn format_string(&self) -> String {
        format!(
            "{} Hz, {} ch, {} bit",
            self.sample_rate, self.channels, self.bits_per_sample
        )
    }

    /// Appends the samples of `other`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FormatMismatch`] if the two buffers differ in sample
    /// rate, channel count or bit depth.
    pub fn append(&mut self, other: &AudioBuffer) -> Result<()> {
        if self.sample_rate != other.sample_rate
            || self.channels != other.channels
            || self.bits_per_sample != other.bits_per_sample
        {
            return Err(Error::FormatMismatch {
                expected: self.format_string(),
                found: other.format_string(),
            });
        }
        self.samples.extend_from_slice(&other.samples);
        Ok(())
    }
}
