//! Arithmetic on real polynomials and rational fractions of polynomials.
//!
//! Polynomials are coefficient slices in ascending powers. A fraction is a
//! `[numerator, denominator]` pair.

use core::cmp::min;
use core::f64::consts::PI;

use crate::math::{cos, hypot, sin};

/// Multiplies two real polynomials.
/// An empty slice is treated as the zero polynomial.
pub fn multiply(a1: &[f64], a2: &[f64], eps: Option<f64>) -> Vec<f64> {
    if a1.is_empty() || a2.is_empty() {
        return vec![0.0];
    }
    let n1 = a1.len() - 1;
    let n2 = a2.len() - 1;
    let n3 = n1 + n2;
    let mut a3 = vec![0.0; n3 + 1];
    for (i, out) in a3.iter_mut().enumerate() {
        let p1 = i.saturating_sub(n2);
        let p2 = min(n1, i);
        *out = (p1..=p2).map(|j| a1[j] * a2[i - j]).sum();
    }
    trim(&a3, eps)
}

/// Trims top order zero coefficients.
/// Always keeps at least the constant term.
pub fn trim(a: &[f64], eps: Option<f64>) -> Vec<f64> {
    let eps = eps.unwrap_or(0.0);
    let len = a
        .iter()
        .rposition(|x| x.abs() > eps)
        .map_or(0, |last| last + 1);
    if len == 0 {
        return vec![0.0];
    }
    a[..len].to_vec()
}

pub fn multiply_fractions(f1: &[Vec<f64>], f2: &[Vec<f64>], eps: Option<f64>) -> Vec<Vec<f64>> {
    let top = multiply(&f1[0], &f2[0], eps);
    let bottom = multiply(&f1[1], &f2[1], eps);
    vec![top, bottom]
}

/// Evaluates a polynomial in `z^-1` on the unit circle at angular frequency
/// `w` (radians per sample). Returns `(re, im)`.
fn evaluate_on_unit_circle(a: &[f64], w: f64) -> (f64, f64) {
    a.iter()
        .enumerate()
        .fold((0.0, 0.0), |(re, im), (k, &c)| {
            let phi = w * k as f64;
            (re + c * cos(phi), im - c * sin(phi))
        })
}

/// Returns `|H(f)|` for a fraction `H` in ascending powers of `z^-1`.
pub fn fraction_magnitude(fraction: &[Vec<f64>], f: f64, sample_rate: u32) -> f64 {
    let w = 2.0 * PI * f / f64::from(sample_rate);
    let (nr, ni) = evaluate_on_unit_circle(&fraction[0], w);
    let (dr, di) = evaluate_on_unit_circle(&fraction[1], w);
    let den = hypot(dr, di);
    if den == 0.0 {
        return f64::INFINITY;
    }
    hypot(nr, ni) / den
}
