//! Split-step consistency harness.
//!
//! Advancing a body once by `dt` with the adaptive integrator should land
//! close to advancing it twice by `dt / 2` from the same start. A large gap
//! means the twist and pose laws are not coupled into one consistent system.
//!
//! ```
//! use sim_core::harness::{SimulationSetup, compare_split_step};
//!
//! let setup = SimulationSetup::reference();
//! let cmp = compare_split_step(&setup).unwrap();
//! assert!(cmp.twist_error < 1e-5);
//! assert!(cmp.pose_error < 1e-5);
//! ```

use std::sync::Arc;

use sim_types::{
    AdaptiveConfig, Inertia, IntegrationMethod, Pose, RigidBodyState, SharedForque, Twist,
    ZeroForque,
};
use tracing::debug;

use crate::integrators::{AdaptiveStep, IntegrationOutput, Integrator};

/// Initial conditions and solver settings for one comparison run.
#[derive(Clone)]
pub struct SimulationSetup {
    /// Initial twist.
    pub twist: Twist,
    /// Initial pose; normalized by the integrator.
    pub pose: Pose,
    /// Inertia descriptor.
    pub inertia: Inertia,
    /// External forque source.
    pub forque: SharedForque,
    /// Total interval.
    pub dt: f64,
    /// Adaptive solver settings.
    pub config: AdaptiveConfig,
}

impl SimulationSetup {
    /// Create a setup with zero forque and default solver settings.
    #[must_use]
    pub fn new(twist: Twist, pose: Pose, inertia: Inertia, dt: f64) -> Self {
        Self {
            twist,
            pose,
            inertia,
            forque: Arc::new(ZeroForque),
            dt,
            config: AdaptiveConfig::default(),
        }
    }

    /// A slowly tumbling body with anisotropic inertia over one second.
    ///
    /// Twist `(0, 0, 0, 0.1, 0.001, 0)`, pose `(1, 0, 0, 0, 0, 1, 3, -2)`
    /// normalized, inertia `(2, 1, 3, 1, 1, 1)`.
    #[must_use]
    pub fn reference() -> Self {
        Self::new(
            Twist::new(0.0, 0.0, 0.0, 0.1, 0.001, 0.0),
            Pose::new(1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 3.0, -2.0).normalized(),
            Inertia::new_unchecked([2.0, 1.0, 3.0, 1.0, 1.0, 1.0]),
            1.0,
        )
    }

    /// Replace the forque source.
    #[must_use]
    pub fn with_forque(mut self, forque: SharedForque) -> Self {
        self.forque = forque;
        self
    }

    /// Replace the solver settings.
    #[must_use]
    pub fn with_config(mut self, config: AdaptiveConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the interval.
    #[must_use]
    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    /// Body state at time zero.
    #[must_use]
    pub fn initial_state(&self) -> RigidBodyState {
        RigidBodyState::new(self.twist, self.pose, self.inertia).with_forque(Arc::clone(&self.forque))
    }

    /// Integration method equivalent to this setup's solver settings.
    #[must_use]
    pub fn method(&self) -> IntegrationMethod {
        IntegrationMethod::Adaptive(self.config)
    }
}

impl std::fmt::Debug for SimulationSetup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationSetup")
            .field("twist", &self.twist)
            .field("pose", &self.pose)
            .field("inertia", &self.inertia)
            .field("dt", &self.dt)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Outcome of [`compare_split_step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitStepComparison {
    /// One step of `dt`.
    pub single: IntegrationOutput,
    /// Two steps of `dt / 2`; stats are summed over both.
    pub split: IntegrationOutput,
    /// Largest absolute twist coefficient difference.
    pub twist_error: f64,
    /// Largest absolute pose coefficient difference.
    pub pose_error: f64,
}

impl SplitStepComparison {
    /// Whether both errors are within `tolerance`.
    #[must_use]
    pub fn agrees_within(&self, tolerance: f64) -> bool {
        self.twist_error <= tolerance && self.pose_error <= tolerance
    }
}

/// Advance `setup` once by `dt` and twice by `dt / 2` and compare.
///
/// # Errors
///
/// Returns the first integrator error from either run.
pub fn compare_split_step(setup: &SimulationSetup) -> sim_types::Result<SplitStepComparison> {
    let integrator = AdaptiveStep {
        config: setup.config,
    };

    let single = integrator.advance(&setup.initial_state(), setup.dt)?;

    let mut state = setup.initial_state();
    let first = integrator.integrate(&mut state, 0.5 * setup.dt)?;
    let mut split = integrator.integrate(&mut state, 0.5 * setup.dt)?;
    split.stats.accumulate(&first.stats);

    let twist_error = (single.twist.coeffs - split.twist.coeffs).amax();
    let pose_error = (single.pose.coeffs - split.pose.coeffs).amax();

    debug!(twist_error, pose_error, dt = setup.dt, "split-step comparison");

    Ok(SplitStepComparison {
        single,
        split,
        twist_error,
        pose_error,
    })
}
