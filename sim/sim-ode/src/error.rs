//! Error types for ODE solves.

use thiserror::Error;

/// Errors that can occur while solving an ODE problem.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OdeError {
    /// The iteration budget ran out before reaching the end of the time span.
    #[error("maximum iterations ({max_iters}) reached at t = {t}")]
    MaxIterations {
        /// Configured iteration limit.
        max_iters: usize,
        /// Time reached when the limit was hit.
        t: f64,
    },

    /// The controller shrank the step below the allowed minimum.
    #[error("step size {dt:e} fell below minimum {dt_min:e} at t = {t}")]
    StepSizeUnderflow {
        /// Rejected step size.
        dt: f64,
        /// Configured minimum step size.
        dt_min: f64,
        /// Time at which the step was attempted.
        t: f64,
    },

    /// The initial state or its derivative contains `NaN` or `Inf`.
    #[error("non-finite state or derivative at t = {t}")]
    NonFinite {
        /// Time at which the non-finite value was observed.
        t: f64,
    },

    /// The time span is reversed or not finite.
    #[error("invalid time span [{t0}, {t1}]")]
    InvalidTimeSpan {
        /// Start time.
        t0: f64,
        /// End time.
        t1: f64,
    },

    /// Tolerances or step limits are out of range.
    #[error("invalid solver options: {reason}")]
    InvalidTolerance {
        /// Description of the bad option.
        reason: String,
    },
}

impl OdeError {
    /// Create an invalid tolerance error.
    #[must_use]
    pub fn invalid_tolerance(reason: impl Into<String>) -> Self {
        Self::InvalidTolerance {
            reason: reason.into(),
        }
    }

    /// Check if the solver gave up part way through the time span.
    ///
    /// Returns `false` for errors caused by bad input.
    #[must_use]
    pub fn is_convergence_failure(&self) -> bool {
        matches!(
            self,
            Self::MaxIterations { .. } | Self::StepSizeUnderflow { .. }
        )
    }
}
