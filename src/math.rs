//! Core math functions for the synthesis.
//! If the `libm` feature is enabled, this just exports the required functions,
//! including the `round` used for PCM quantization.
//! Otherwise this converts the syntax from the std variety: `f.sqrt()` into
//! the `libm` equiv. `sqrt(f)`.

#[cfg(feature = "libm")]
pub(crate) use libm::{cos, exp, hypot, pow, round, sin};

#[cfg(not(feature = "libm"))]
pub(crate) fn pow(f1: f64, f2: f64) -> f64 {
    f1.powf(f2)
}
#[cfg(not(feature = "libm"))]
pub(crate) fn cos(f: f64) -> f64 {
    f.cos()
}
#[cfg(not(feature = "libm"))]
pub(crate) fn sin(f: f64) -> f64 {
    f.sin()
}
#[cfg(not(feature = "libm"))]
pub(crate) fn exp(f: f64) -> f64 {
    f.exp()
}
#[cfg(not(feature = "libm"))]
pub(crate) fn round(f: f64) -> f64 {
    f.round()
}
#[cfg(not(feature = "libm"))]
pub(crate) fn hypot(x: f64, y: f64) -> f64 {
    x.hypot(y)
}
