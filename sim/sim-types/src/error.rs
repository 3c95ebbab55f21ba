//! Error types for simulation operations.

use sim_ode::OdeError;
use thiserror::Error;

/// Errors that can occur during simulation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// Invalid timestep.
    #[error("invalid timestep: {0} (must be positive and finite)")]
    InvalidTimestep(f64),

    /// Fixed-step integration needs at least one sub-step.
    #[error("invalid step count: {0} (must be at least 1)")]
    InvalidStepCount(usize),

    /// Inertia descriptor with a zero or non-finite coefficient.
    #[error("invalid inertia: coefficient {index} is {value}")]
    InvalidInertia {
        /// Index of the offending coefficient (`[e01, e02, e03, e12, e31, e23]` order).
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// Simulation diverged (`NaN` or `Inf` detected).
    #[error("simulation diverged: {reason}")]
    Diverged {
        /// Description of what went wrong.
        reason: String,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error.
        reason: String,
    },

    /// The adaptive ODE solver failed.
    #[error("adaptive solver failed: {0}")]
    Solver(#[from] OdeError),
}

impl SimError {
    /// Create a diverged error.
    #[must_use]
    pub fn diverged(reason: impl Into<String>) -> Self {
        Self::Diverged {
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Check if this is a divergence error.
    #[must_use]
    pub fn is_diverged(&self) -> bool {
        matches!(self, Self::Diverged { .. })
    }

    /// Check if this is a configuration error.
    ///
    /// Covers bad timesteps, step counts, inertia and solver options.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig { .. }
                | Self::InvalidTimestep(_)
                | Self::InvalidStepCount(_)
                | Self::InvalidInertia { .. }
                | Self::Solver(OdeError::InvalidTolerance { .. })
        )
    }

    /// Check if the adaptive solver failed to reach the end of the interval.
    #[must_use]
    pub fn is_solver_failure(&self) -> bool {
        matches!(self, Self::Solver(e) if !matches!(e, OdeError::InvalidTolerance { .. }))
    }
}
