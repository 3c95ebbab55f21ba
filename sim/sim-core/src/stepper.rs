//! Simulation stepping and control flow.
//!
//! This module provides the [`Stepper`], the only place a
//! [`RigidBodyState`] is mutated: it integrates with the configured method,
//! writes twist and pose back, advances time, and reports diagnostics.
//!
//! # Example
//!
//! ```
//! use sim_core::Stepper;
//! use sim_types::{Inertia, IntegrationMethod, Pose, RigidBodyState, SimulationConfig, Twist};
//!
//! let inertia = Inertia::new([2.0, 1.0, 3.0, 1.0, 1.0, 1.0]).unwrap();
//! let mut state = RigidBodyState::new(
//!     Twist::new(0.0, 0.0, 0.0, 0.1, 0.001, 0.0),
//!     Pose::identity(),
//!     inertia,
//! );
//!
//! let config = SimulationConfig::with_timestep(0.1).method(IntegrationMethod::euler(10));
//! let mut stepper = Stepper::new(config).unwrap();
//! for _ in 0..10 {
//!     stepper.step(&mut state).unwrap();
//! }
//! assert!((state.time - 1.0).abs() < 1e-12);
//! ```

use sim_ode::SolverStats;
use sim_types::{RigidBodyState, SimError, SimulationConfig};
use tracing::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::inertia::kinetic_energy;
use crate::integrators::{IntegrationOutput, integrate_with_method};

/// Upper bound on the result buffer reserved up front by [`Stepper::run_for`].
const MAX_PREALLOCATED_STEPS: usize = 1024;

/// Result of a simulation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    /// Simulation time after the step.
    pub time: f64,
    /// Pose magnitude produced by the integrator before output renormalization.
    pub pose_norm: f64,
    /// Kinetic energy after the step, when diagnostics are enabled.
    pub kinetic_energy: Option<f64>,
    /// Integrator work for this step.
    pub stats: SolverStats,
    /// Whether simulation has completed (reached `max_time`).
    pub completed: bool,
}

/// Configuration for the stepper.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StepperConfig {
    /// Reject states containing `NaN` or `Inf` before and after each step.
    pub check_finite: bool,
    /// Pose-norm deviation from 1 above which drift is logged.
    pub drift_tolerance: f64,
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self {
            check_finite: true,
            drift_tolerance: 1e-6,
        }
    }
}

impl StepperConfig {
    /// Create config without finiteness checks.
    #[must_use]
    pub fn unchecked() -> Self {
        Self {
            check_finite: false,
            ..Default::default()
        }
    }

    /// Set the drift logging threshold.
    #[must_use]
    pub fn with_drift_tolerance(mut self, tolerance: f64) -> Self {
        self.drift_tolerance = tolerance;
        self
    }
}

/// The simulation stepper advances rigid body states.
#[derive(Debug, Clone)]
pub struct Stepper {
    config: SimulationConfig,
    stepper_config: StepperConfig,
    steps_taken: u64,
    total_stats: SolverStats,
}

impl Stepper {
    /// Create a stepper for the given simulation configuration.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error reported by
    /// [`SimulationConfig::validate`].
    pub fn new(config: SimulationConfig) -> sim_types::Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            stepper_config: StepperConfig::default(),
            steps_taken: 0,
            total_stats: SolverStats::default(),
        })
    }

    /// Replace the stepper configuration.
    #[must_use]
    pub fn with_stepper_config(mut self, stepper_config: StepperConfig) -> Self {
        self.stepper_config = stepper_config;
        self
    }

    /// Get the simulation configuration.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Get the stepper configuration.
    #[must_use]
    pub fn stepper_config(&self) -> &StepperConfig {
        &self.stepper_config
    }

    /// Number of successful steps taken.
    #[must_use]
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Integrator work accumulated over all successful steps.
    #[must_use]
    pub fn total_stats(&self) -> SolverStats {
        self.total_stats
    }

    /// Advance `state` by the configured timestep.
    ///
    /// # Errors
    ///
    /// See [`Stepper::step_by`].
    pub fn step(&mut self, state: &mut RigidBodyState) -> sim_types::Result<StepResult> {
        self.step_by(state, self.config.timestep)
    }

    /// Advance `state` by `dt` with the configured method.
    ///
    /// On error the state is left exactly as it was.
    ///
    /// # Errors
    ///
    /// - [`SimError::InvalidTimestep`] if `dt` is negative or not finite
    /// - [`SimError::Diverged`] if the state is, or would become, non-finite
    /// - [`SimError::Solver`] if the adaptive solver fails
    pub fn step_by(
        &mut self,
        state: &mut RigidBodyState,
        dt: f64,
    ) -> sim_types::Result<StepResult> {
        if self.stepper_config.check_finite && !state.is_finite() {
            return Err(SimError::diverged(format!(
                "non-finite state at t = {}",
                state.time
            )));
        }

        let mut next = state.clone();
        let out = integrate_with_method(&self.config.method, &mut next, dt)?;

        if self.stepper_config.check_finite && !next.is_finite() {
            warn!(t = state.time, dt, "rigid body state diverged");
            return Err(SimError::diverged(format!(
                "non-finite state after step from t = {} with dt = {dt}",
                state.time
            )));
        }

        self.log_drift(&out, next.time);

        state.twist = next.twist;
        state.pose = next.pose;
        state.time = next.time;

        self.steps_taken += 1;
        self.total_stats.accumulate(&out.stats);

        Ok(StepResult {
            time: state.time,
            pose_norm: out.pose_norm,
            kinetic_energy: self
                .config
                .compute_diagnostics
                .then(|| kinetic_energy(&state.twist, &state.inertia)),
            stats: out.stats,
            completed: self.config.max_time.is_some_and(|max| state.time >= max),
        })
    }

    /// Run for a specific duration.
    ///
    /// Takes whole steps of the configured timestep and one shorter step for
    /// any remainder. Stops early once `max_time` is reached, and takes no
    /// step at all if the state is already there.
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails; earlier steps stay applied.
    pub fn run_for(
        &mut self,
        state: &mut RigidBodyState,
        duration: f64,
    ) -> sim_types::Result<Vec<StepResult>> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(SimError::InvalidTimestep(duration));
        }
        if self.config.max_time.is_some_and(|max| state.time >= max) {
            return Ok(Vec::new());
        }

        let dt = self.config.timestep;
        // Saturates for durations beyond usize::MAX steps
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let whole_steps = (duration / dt).floor() as usize;
        #[allow(clippy::cast_precision_loss)]
        let remainder = duration - whole_steps as f64 * dt;

        let mut results =
            Vec::with_capacity(whole_steps.saturating_add(1).min(MAX_PREALLOCATED_STEPS));
        for _ in 0..whole_steps {
            let result = self.step_by(state, dt)?;
            results.push(result);
            if result.completed {
                return Ok(results);
            }
        }

        if remainder > 1e-12 * dt {
            results.push(self.step_by(state, remainder)?);
        }

        Ok(results)
    }

    fn log_drift(&self, out: &IntegrationOutput, time: f64) {
        let drift = (out.pose_norm - 1.0).abs();
        if drift > self.stepper_config.drift_tolerance {
            debug!(
                t = time,
                pose_norm = out.pose_norm,
                method = %self.config.method,
                "pose drifted from unit magnitude"
            );
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sim_types::{
        AdaptiveConfig, ConstantForque, Forque, Inertia, IntegrationMethod, Pose,
        PoseNormalization, Twist, shared,
    };

    fn spinning_state() -> RigidBodyState {
        RigidBodyState::new(
            Twist::new(0.0, 0.0, 0.0, 0.1, 0.001, 0.0),
            Pose::new(1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 3.0, -2.0).normalized(),
            Inertia::new([2.0, 1.0, 3.0, 1.0, 1.0, 1.0]).unwrap(),
        )
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(Stepper::new(SimulationConfig::with_timestep(-1.0)).is_err());
        assert!(
            Stepper::new(SimulationConfig::default().method(IntegrationMethod::euler(0))).is_err()
        );
    }

    #[test]
    fn test_step_advances_time_and_counts() {
        let mut stepper = Stepper::new(SimulationConfig::with_timestep(0.25)).unwrap();
        let mut state = spinning_state();

        let result = stepper.step(&mut state).unwrap();
        assert_relative_eq!(result.time, 0.25, epsilon = 1e-15);
        assert_eq!(state.time, result.time);
        assert_eq!(stepper.steps_taken(), 1);
        assert!(stepper.total_stats().accepted_steps > 0);
        assert!(result.kinetic_energy.is_none());
        assert!(!result.completed);
    }

    #[test]
    fn test_diagnostics_report_energy() {
        let config = SimulationConfig::with_timestep(0.1).with_diagnostics();
        let mut stepper = Stepper::new(config).unwrap();
        let mut state = spinning_state();
        let e0 = kinetic_energy(&state.twist, &state.inertia);

        let result = stepper.step(&mut state).unwrap();
        assert_relative_eq!(result.kinetic_energy.unwrap(), e0, max_relative = 1e-6);
    }

    #[test]
    fn test_max_time_completes() {
        let config = SimulationConfig::with_timestep(0.5).max_time(1.0);
        let mut stepper = Stepper::new(config).unwrap();
        let mut state = spinning_state();

        let results = stepper.run_for(&mut state, 10.0).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[1].completed);
    }

    #[test]
    fn test_run_for_huge_duration_stops_at_max_time() {
        let config = SimulationConfig::with_timestep(1.0)
            .method(IntegrationMethod::euler(1))
            .max_time(2.0);
        let mut stepper = Stepper::new(config).unwrap();
        let mut state = spinning_state();

        let results = stepper.run_for(&mut state, 1e300).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[1].completed);
        assert_eq!(state.time, 2.0);
    }

    #[test]
    fn test_run_for_past_max_time_takes_no_step() {
        let config = SimulationConfig::with_timestep(0.5).max_time(1.0);
        let mut stepper = Stepper::new(config).unwrap();
        let mut state = spinning_state().with_time(1.5);
        let before = state.clone();

        let results = stepper.run_for(&mut state, 3.0).unwrap();
        assert!(results.is_empty());
        assert_eq!(state.time, 1.5);
        assert_eq!(state.pose, before.pose);
        assert_eq!(stepper.steps_taken(), 0);
    }

    #[test]
    fn test_run_for_takes_remainder_step() {
        let config = SimulationConfig::with_timestep(0.3).method(IntegrationMethod::euler(5));
        let mut stepper = Stepper::new(config).unwrap();
        let mut state = spinning_state();

        let results = stepper.run_for(&mut state, 1.0).unwrap();
        assert_eq!(results.len(), 4);
        assert_relative_eq!(state.time, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_non_finite_state_is_rejected_untouched() {
        let mut stepper = Stepper::new(SimulationConfig::default()).unwrap();
        let mut state = spinning_state();
        state.twist = Twist::new(f64::NAN, 0.0, 0.0, 0.0, 0.0, 0.0);

        let err = stepper.step(&mut state).unwrap_err();
        assert!(err.is_diverged());
        assert_eq!(state.time, 0.0);
        assert_eq!(stepper.steps_taken(), 0);
    }

    #[test]
    fn test_divergence_leaves_state_untouched() {
        // A degenerate inertia makes the twist update non-finite.
        let mut state = RigidBodyState::new(
            Twist::new(0.0, 0.0, 0.0, 0.0, 0.0, 1.0),
            Pose::identity(),
            Inertia::new_unchecked([1.0, 1.0, 1.0, 1.0, 1.0, 0.0]),
        )
        .with_forque(shared(ConstantForque(Forque::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0))));
        let before = state.clone();

        let config = SimulationConfig::with_timestep(0.1).method(IntegrationMethod::euler(1));
        let mut stepper = Stepper::new(config).unwrap();
        let err = stepper.step(&mut state).unwrap_err();

        assert!(err.is_diverged());
        assert_eq!(state.twist, before.twist);
        assert_eq!(state.pose, before.pose);
        assert_eq!(state.time, before.time);
    }

    #[test]
    fn test_solver_failure_is_distinguishable() {
        let method = IntegrationMethod::Adaptive(AdaptiveConfig::default().max_iters(1));
        let config = SimulationConfig::with_timestep(100.0).method(method);
        let mut stepper = Stepper::new(config).unwrap();
        let mut state = spinning_state();

        let err = stepper.step(&mut state).unwrap_err();
        assert!(err.is_solver_failure());
        assert_eq!(state.time, 0.0);
    }

    #[test]
    fn test_output_normalization_keeps_unit_pose() {
        let method = IntegrationMethod::Adaptive(
            AdaptiveConfig::default().normalization(PoseNormalization::InputAndOutput),
        );
        let mut stepper =
            Stepper::new(SimulationConfig::with_timestep(0.5).method(method)).unwrap();
        let mut state = spinning_state();
        for _ in 0..20 {
            stepper.step(&mut state).unwrap();
        }
        assert_relative_eq!(state.pose.norm(), 1.0, epsilon = 1e-14);
    }
}
