//! Configuration types for simulation.
//!
//! This module provides configuration types that control how a rigid body is
//! advanced: timestep, integration method, and adaptive solver settings.

use sim_ode::{Algorithm, SolverOptions};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// When the adaptive integrator projects the pose back to unit magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PoseNormalization {
    /// Normalize the incoming pose only; the solver output is returned as is.
    #[default]
    InputOnly,
    /// Normalize the incoming pose and the solver output.
    InputAndOutput,
}

impl PoseNormalization {
    /// Whether the output pose is renormalized.
    #[must_use]
    pub const fn normalizes_output(self) -> bool {
        matches!(self, Self::InputAndOutput)
    }
}

/// Settings for the adaptive-step integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AdaptiveConfig {
    /// Embedded Runge-Kutta pair.
    pub algorithm: Algorithm,
    /// Absolute error tolerance.
    pub abs_tol: f64,
    /// Relative error tolerance.
    pub rel_tol: f64,
    /// Maximum solver step attempts per call.
    pub max_iters: usize,
    /// Pose renormalization policy.
    pub normalization: PoseNormalization,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        let options = SolverOptions::default();
        Self {
            algorithm: options.algorithm,
            abs_tol: options.abs_tol,
            rel_tol: options.rel_tol,
            max_iters: options.max_iters,
            normalization: PoseNormalization::default(),
        }
    }
}

impl AdaptiveConfig {
    /// Tight tolerances for reference runs.
    #[must_use]
    pub fn high_accuracy() -> Self {
        Self {
            abs_tol: 1e-12,
            rel_tol: 1e-10,
            ..Default::default()
        }
    }

    /// Loose tolerances with a third-order pair.
    #[must_use]
    pub fn fast() -> Self {
        Self {
            algorithm: Algorithm::BogackiShampine32,
            abs_tol: 1e-5,
            rel_tol: 1e-3,
            ..Default::default()
        }
    }

    /// Set the algorithm.
    #[must_use]
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set absolute and relative tolerances.
    #[must_use]
    pub fn tolerances(mut self, abs_tol: f64, rel_tol: f64) -> Self {
        self.abs_tol = abs_tol;
        self.rel_tol = rel_tol;
        self
    }

    /// Set the iteration limit.
    #[must_use]
    pub fn max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Set the pose renormalization policy.
    #[must_use]
    pub fn normalization(mut self, normalization: PoseNormalization) -> Self {
        self.normalization = normalization;
        self
    }

    /// Solver options for one adaptive step.
    #[must_use]
    pub fn solver_options(&self) -> SolverOptions {
        SolverOptions::default()
            .with_algorithm(self.algorithm)
            .with_tolerances(self.abs_tol, self.rel_tol)
            .with_max_iters(self.max_iters)
    }

    /// Validate the adaptive configuration.
    pub fn validate(&self) -> crate::Result<()> {
        self.solver_options().validate()?;
        Ok(())
    }
}

/// Integration method for rigid body motion.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IntegrationMethod {
    /// `step_count` semi-implicit Euler sub-steps per step, pose renormalized
    /// once at the end.
    ExplicitEuler {
        /// Sub-steps per step (at least 1).
        step_count: usize,
    },
    /// Embedded Runge-Kutta with error control.
    Adaptive(AdaptiveConfig),
}

impl Default for IntegrationMethod {
    fn default() -> Self {
        Self::Adaptive(AdaptiveConfig::default())
    }
}

impl IntegrationMethod {
    /// Fixed-step Euler with `step_count` sub-steps.
    #[must_use]
    pub const fn euler(step_count: usize) -> Self {
        Self::ExplicitEuler { step_count }
    }

    /// Adaptive stepping with default settings.
    #[must_use]
    pub fn adaptive() -> Self {
        Self::Adaptive(AdaptiveConfig::default())
    }

    /// Order of accuracy of the propagated solution.
    #[must_use]
    pub const fn order(&self) -> usize {
        match self {
            Self::ExplicitEuler { .. } => 1,
            Self::Adaptive(config) => match config.algorithm {
                Algorithm::DormandPrince54 | Algorithm::CashKarp45 => 5,
                Algorithm::BogackiShampine32 => 3,
            },
        }
    }

    /// Whether the step size adapts to an error estimate.
    #[must_use]
    pub const fn is_adaptive(&self) -> bool {
        matches!(self, Self::Adaptive(_))
    }

    /// Validate the method settings.
    pub fn validate(&self) -> crate::Result<()> {
        match self {
            Self::ExplicitEuler { step_count } => {
                if *step_count == 0 {
                    return Err(crate::SimError::InvalidStepCount(0));
                }
                Ok(())
            }
            Self::Adaptive(config) => config.validate(),
        }
    }
}

impl std::fmt::Display for IntegrationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExplicitEuler { step_count } => write!(f, "Explicit Euler ({step_count} steps)"),
            Self::Adaptive(config) => write!(f, "Adaptive {}", config.algorithm.name()),
        }
    }
}

/// Configuration for stepping a rigid body.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// Step duration (seconds).
    pub timestep: f64,
    /// Integration method.
    pub method: IntegrationMethod,
    /// Maximum simulation time (None for unlimited).
    pub max_time: Option<f64>,
    /// Whether to compute kinetic energy after every step.
    pub compute_diagnostics: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0 / 60.0,
            method: IntegrationMethod::default(),
            max_time: None,
            compute_diagnostics: false,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with the given timestep.
    #[must_use]
    pub fn with_timestep(timestep: f64) -> Self {
        Self {
            timestep,
            ..Default::default()
        }
    }

    /// High-accuracy adaptive stepping at 240 Hz with diagnostics.
    #[must_use]
    pub fn high_fidelity() -> Self {
        Self {
            timestep: 1.0 / 240.0,
            method: IntegrationMethod::Adaptive(AdaptiveConfig::high_accuracy()),
            compute_diagnostics: true,
            ..Default::default()
        }
    }

    /// Ten Euler sub-steps at 60 Hz.
    #[must_use]
    pub fn fast() -> Self {
        Self {
            method: IntegrationMethod::euler(10),
            ..Default::default()
        }
    }

    /// Set the integration method.
    #[must_use]
    pub fn method(mut self, method: IntegrationMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the maximum simulation time.
    #[must_use]
    pub fn max_time(mut self, max_time: f64) -> Self {
        self.max_time = Some(max_time);
        self
    }

    /// Enable diagnostic computation.
    #[must_use]
    pub fn with_diagnostics(mut self) -> Self {
        self.compute_diagnostics = true;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> crate::Result<()> {
        if !self.timestep.is_finite() || self.timestep <= 0.0 {
            return Err(crate::SimError::InvalidTimestep(self.timestep));
        }

        if let Some(max_time) = self.max_time {
            if !(max_time.is_finite() && max_time >= 0.0) {
                return Err(crate::SimError::invalid_config(
                    "max_time must be finite and non-negative",
                ));
            }
        }

        self.method.validate()
    }

    /// Get the frequency in Hz.
    #[must_use]
    pub fn frequency(&self) -> f64 {
        1.0 / self.timestep
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::SimError;
    use approx::assert_relative_eq;

    #[test]
    fn test_presets_are_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
        assert!(SimulationConfig::high_fidelity().validate().is_ok());
        assert!(SimulationConfig::fast().validate().is_ok());
        assert!(AdaptiveConfig::fast().validate().is_ok());
    }

    #[test]
    fn test_frequency() {
        let config = SimulationConfig::with_timestep(0.01);
        assert_relative_eq!(config.frequency(), 100.0, epsilon = 1e-10);
    }

    #[test]
    fn test_invalid_timestep() {
        let err = SimulationConfig::with_timestep(0.0).validate().unwrap_err();
        assert_eq!(err, SimError::InvalidTimestep(0.0));
        assert!(SimulationConfig::with_timestep(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_zero_step_count_rejected() {
        let config = SimulationConfig::default().method(IntegrationMethod::euler(0));
        assert_eq!(
            config.validate().unwrap_err(),
            SimError::InvalidStepCount(0)
        );
    }

    #[test]
    fn test_bad_tolerance_is_config_error() {
        let method = IntegrationMethod::Adaptive(AdaptiveConfig::default().tolerances(-1.0, 1e-6));
        let err = method.validate().unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_method_properties() {
        assert_eq!(IntegrationMethod::euler(5).order(), 1);
        assert_eq!(IntegrationMethod::adaptive().order(), 5);
        assert!(IntegrationMethod::adaptive().is_adaptive());
        assert_eq!(
            IntegrationMethod::euler(3).to_string(),
            "Explicit Euler (3 steps)"
        );
    }

    #[test]
    fn test_solver_options_follow_config() {
        let config = AdaptiveConfig::default()
            .algorithm(Algorithm::CashKarp45)
            .tolerances(1e-9, 1e-7)
            .max_iters(42);
        let opts = config.solver_options();
        assert_eq!(opts.algorithm, Algorithm::CashKarp45);
        assert_eq!(opts.abs_tol, 1e-9);
        assert_eq!(opts.rel_tol, 1e-7);
        assert_eq!(opts.max_iters, 42);
    }

    #[test]
    fn test_default_normalization_is_input_only() {
        let config = AdaptiveConfig::default();
        assert_eq!(config.normalization, PoseNormalization::InputOnly);
        assert!(!config.normalization.normalizes_output());
        assert!(PoseNormalization::InputAndOutput.normalizes_output());
    }
}
