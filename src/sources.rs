use rand::Rng;

//--- Noise sources ------------------------------------------------------------

/// Returns a random number within the range -1 .. 1.
pub fn white_noise<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random_range(-1.0..=1.0)
}

//--- Glottal sources ----------------------------------------------------------

/// Generates a glottal source signal from a Rosenberg-style pulse.
///
/// Within one F0 period of `t0` samples, with `p` the position in the period
/// as a fraction of `t0`:
/// ```text
///    p < 0.7         3x^2 - 2x^3 with x = p / 0.7     (open phase, rising)
///    0.7 <= p < 0.8  1 - (p - 0.7) / 0.1              (closing, linear fall)
///    p >= 0.8        0                                 (closed phase)
/// ```
#[derive(Debug, Clone)]
pub struct GlottalSource {
    sample_rate: u32,
    /// current sample position within F0 period
    phase: f64,
    /// period length in samples, 0 when unvoiced
    period: f64,
}

impl GlottalSource {
    /// relative length of the open phase of the glottis
    pub const OPEN_QUOTIENT: f64 = 0.7;
    /// relative length of the closing slope after the open phase
    pub const CLOSING_QUOTIENT: f64 = 0.1;

    #[must_use]
    pub fn new(sample_rate: u32) -> Self {
        GlottalSource {
            sample_rate,
            phase: 0.0,
            period: 0.0,
        }
    }

    /// Sets the fundamental frequency. The position within the current period is kept.
    pub fn set_f0(&mut self, f0: f64) {
        self.period = if f0 > 0.0 {
            f64::from(self.sample_rate) / f0
        } else {
            0.0
        };
    }

    /// Period length in samples, 0 if the source is silent.
    #[must_use]
    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn next_sample(&mut self) -> f64 {
        if self.period <= 0.0 {
            return 0.0;
        }

        let p = self.phase / self.period;
        let out = if p < Self::OPEN_QUOTIENT {
            let x = p / Self::OPEN_QUOTIENT;
            3.0 * x * x - 2.0 * x * x * x
        } else if p < Self::OPEN_QUOTIENT + Self::CLOSING_QUOTIENT {
            let x = (p - Self::OPEN_QUOTIENT) / Self::CLOSING_QUOTIENT;
            1.0 - x
        } else {
            0.0
        };

        self.phase += 1.0;
        if self.phase >= self.period {
            self.phase -= self.period;
        }
        out
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}
