use core::f64::consts::PI;

use crate::math::{cos, exp};
use crate::traits::Filter;

/// A Klatt resonator.
/// This is a second order IIR filter.
///
/// # Formulas:
/// ## Variables:
/// ```text
///    x = input samples
///    y = output samples
///    a/b/c = filter coefficients
///    f = resonator frequency in Hz
///    T = 1 / sampleRate
///    theta = 2 * PI * f * T
///    bw = Bandwidth in Hz
///    r = exp(- PI * T * bw)
/// ```
/// ## Filter function:
/// ```text
///    y[n] = a * x[n] + b * y[n-1] + c * y[n-2]
/// ```
/// ## Coefficients:
/// ```text
///    c = -r^2
///    b = 2 * r * cos(theta)
///    a = 1 - b - c
/// ```
/// ## Gain at DC:
/// ```text
///    |H(0)| = a / (1 - c - b) = 1
/// ```
///
/// A non-positive frequency zeroes all three coefficients, so the resonator
/// outputs silence instead of passing its input through.
#[derive(Debug, Clone)]
pub struct Resonator {
    sample_rate: u32,
    /// filter coefficient a
    a: f64,
    /// filter coefficient b
    b: f64,
    /// filter coefficient c
    c: f64,
    /// y[n-1], last output value
    y1: f64,
    /// y[n-2], second-last output value
    y2: f64,
}

impl Resonator {
    /// ### params
    /// ```text
    /// sample_rate = Sample rate in Hz.
    /// ```
    #[must_use]
    pub fn new(sample_rate: u32) -> Self {
        Resonator {
            sample_rate,
            a: 0.0,
            b: 0.0,
            c: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Adjusts the filter parameters without resetting the inner state.
    /// ### params
    /// ```text
    /// f = Frequency of resonator in Hz.
    /// bw = Bandwidth of resonator in Hz.
    /// ```
    pub fn set(&mut self, f: f64, bw: f64) {
        if f <= 0.0 {
            self.a = 0.0;
            self.b = 0.0;
            self.c = 0.0;
            return;
        }
        let t = 1.0 / f64::from(self.sample_rate);
        let r = exp(-PI * t * bw);
        let theta = 2.0 * PI * f * t;
        self.c = -(r * r);
        self.b = 2.0 * r * cos(theta);
        self.a = 1.0 - self.b - self.c;
    }

    /// The `(a, b, c)` coefficients.
    #[must_use]
    pub fn coefficients(&self) -> (f64, f64, f64) {
        (self.a, self.b, self.c)
    }
}

impl Filter for Resonator {
    fn transfer_function_coefficients(&self) -> Vec<Vec<f64>> {
        vec![vec![self.a], vec![1.0, -self.b, -self.c]]
    }

    fn step(&mut self, x: f64) -> f64 {
        let y = self.a * x + self.b * self.y1 + self.c * self.y2;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }

    fn reset(&mut self) {
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

/// A Klatt anti-resonator.
/// This is a second order FIR filter, used for the nasal zero.
///
/// # Formulas:
/// ## Filter function:
/// ```text
///    y[n] = a * x[n] + b * x[n-1] + c * x[n-2]
/// ```
/// ## Coefficients (same r and theta as the resonator):
/// ```text
///    c' = r^2
///    b' = -2 * r * cos(theta)
///    a  = 1 / (1 + b' + c')
///    b  = a * b'
///    c  = a * c'
/// ```
/// ## Transfer function:
/// ```text
///    H(w) = a + b * e^(-jw) + c * e^(-2jw)
/// ```
///
/// A non-positive frequency turns the anti-resonator into a pass-through.
#[derive(Debug, Clone)]
pub struct AntiResonator {
    sample_rate: u32,
    /// filter coefficient a
    a: f64,
    /// filter coefficient b
    b: f64,
    /// filter coefficient c
    c: f64,
    /// x[n-1], last input value
    x1: f64,
    /// x[n-2], second-last input value
    x2: f64,
}

impl AntiResonator {
    /// ### params
    /// ```text
    ///    sample_rate = Sample rate in Hz.
    /// ```
    #[must_use]
    pub fn new(sample_rate: u32) -> Self {
        AntiResonator {
            sample_rate,
            a: 1.0,
            b: 0.0,
            c: 0.0,
            x1: 0.0,
            x2: 0.0,
        }
    }

    /// Adjusts the filter parameters without resetting the inner state.
    /// ### params
    /// ```text
    ///    f = Frequency of anti-resonator in Hz.
    ///    bw = bandwidth of anti-resonator in Hz.
    /// ```
    pub fn set(&mut self, f: f64, bw: f64) {
        if f <= 0.0 {
            self.a = 1.0;
            self.b = 0.0;
            self.c = 0.0;
            return;
        }
        let t = 1.0 / f64::from(self.sample_rate);
        let r = exp(-PI * t * bw);
        let theta = 2.0 * PI * f * t;
        let c0 = r * r;
        let b0 = -2.0 * r * cos(theta);
        self.a = 1.0 / (1.0 + b0 + c0);
        self.b = b0 * self.a;
        self.c = c0 * self.a;
    }

    /// The `(a, b, c)` coefficients.
    #[must_use]
    pub fn coefficients(&self) -> (f64, f64, f64) {
        (self.a, self.b, self.c)
    }
}

impl Filter for AntiResonator {
    fn transfer_function_coefficients(&self) -> Vec<Vec<f64>> {
        vec![vec![self.a, self.b, self.c], vec![1.0]]
    }

    fn step(&mut self, x: f64) -> f64 {
        let y = self.a * x + self.b * self.x1 + self.c * self.x2;
        self.x2 = self.x1;
        self.x1 = x;
        y
    }

    fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
    }
}

/// Lip radiation characteristic.
/// This is a leaky first-order FIR HP filter.
///
/// ## Filter function:
/// ```text
///    y[n] = x[n] - 0.99 * x[n-1]
/// ```
/// ## Transfer function:
/// ```text
///    H(w) = 1 - 0.99 * e^(-jw)
/// ```
#[derive(Debug, Clone, Default)]
pub struct RadiationFilter {
    /// x[n-1], last input value
    x1: f64,
}

impl RadiationFilter {
    pub const LEAK: f64 = 0.99;

    #[must_use]
    pub fn new() -> Self {
        RadiationFilter { x1: 0.0 }
    }
}

impl Filter for RadiationFilter {
    fn transfer_function_coefficients(&self) -> Vec<Vec<f64>> {
        vec![vec![1.0, -Self::LEAK], vec![1.0]]
    }

    fn step(&mut self, x: f64) -> f64 {
        let y = x - Self::LEAK * self.x1;
        self.x1 = x;
        y
    }

    fn reset(&mut self) {
        self.x1 = 0.0;
    }
}
