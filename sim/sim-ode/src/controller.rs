//! Proportional-integral step-size control.

/// PI controller for adaptive time-stepping.
///
/// Works on error estimates already normalized by the tolerances, so a
/// value of `1.0` is exactly on target. After an accepted step:
///
/// ```text
/// factor = safety · err^(-α) · err_prev^(β)
/// ```
///
/// with `α = 0.7 / (q + 1)` and `β = 0.4 / (q + 1)` for an embedded pair of
/// error order `q`. Rejected steps shrink with the plain proportional term
/// and never grow.
#[derive(Debug, Clone)]
pub struct PiController {
    /// Proportional exponent.
    pub alpha: f64,
    /// Integral exponent.
    pub beta: f64,
    /// Safety factor applied to every proposal.
    pub safety: f64,
    /// Smallest allowed change per step.
    pub min_factor: f64,
    /// Largest allowed change per step.
    pub max_factor: f64,
    prev_error: f64,
}

impl PiController {
    /// Create a controller for an embedded pair of the given error order.
    #[must_use]
    pub fn new(error_order: u32) -> Self {
        let k = f64::from(error_order + 1);
        Self {
            alpha: 0.7 / k,
            beta: 0.4 / k,
            safety: 0.9,
            min_factor: 0.2,
            max_factor: 10.0,
            prev_error: 1e-4,
        }
    }

    /// Growth factor after an accepted step with normalized error `error`.
    pub fn accept(&mut self, error: f64) -> f64 {
        let error = error.max(1e-10);
        let factor = self.safety * error.powf(-self.alpha) * self.prev_error.powf(self.beta);
        self.prev_error = error;
        factor.clamp(self.min_factor, self.max_factor)
    }

    /// Shrink factor after a rejected step with normalized error `error`.
    ///
    /// A non-finite error shrinks by `min_factor`.
    #[must_use]
    pub fn reject(&self, error: f64) -> f64 {
        if !error.is_finite() {
            return self.min_factor;
        }
        let k = self.alpha / 0.7;
        (self.safety * error.powf(-k)).clamp(self.min_factor, 1.0)
    }

    /// Forget the error history.
    pub fn reset(&mut self) {
        self.prev_error = 1e-4;
    }
}
