/// A single-input, single-output filter section with owned delay registers.
pub trait Filter {
    /// Returns the polynomial coefficients of the filter transfer function in the z-plane.
    /// The returned array contains the top and bottom coefficients of the rational fraction, ordered in ascending powers.
    fn transfer_function_coefficients(&self) -> Vec<Vec<f64>>;
    /// Perform one step of a filter.
    fn step(&mut self, x: f64) -> f64;
    /// Clears the delay registers. Coefficients are kept.
    fn reset(&mut self);
}
