//! Unified API for PGA rigid body simulation.
//!
//! This crate re-exports the complete stack:
//!
//! - [`sim_pga`] - Lines, motors and their products in 3D projective geometric algebra
//! - [`sim_ode`] - Embedded Runge-Kutta solver for partitioned systems
//! - [`sim_types`] - Core data types (twist, pose, inertia, forque, configuration)
//! - [`sim_core`] - Equations of motion, integrators, stepper
//!
//! # Quick Start
//!
//! ```
//! use sim_physics::prelude::*;
//!
//! let inertia = Inertia::from_mass_and_principal(1.0, [2.0, 1.0, 3.0]).unwrap();
//! let mut state = RigidBodyState::new(
//!     Twist::new(0.0, 0.0, 0.0, 0.1, 0.001, 0.0),
//!     Motor::new(1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 3.0, -2.0).normalized(),
//!     inertia,
//! )
//! .with_forque(shared(LinearDamping::new(0.05)));
//!
//! let mut stepper = Stepper::new(SimulationConfig::default().with_diagnostics()).unwrap();
//! let results = stepper.run_for(&mut state, 1.0).unwrap();
//!
//! let last = results.last().unwrap();
//! println!("t = {:.3}, energy = {:?}", last.time, last.kinetic_energy);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      sim-physics (this crate)                   │
//! │                     Unified API / re-exports                    │
//! └─────────────────────────────────────────────────────────────────┘
//!                                  │
//!                                  ▼
//!                        ┌─────────────────┐
//!                        │    sim-core     │
//!                        │ Laws, Stepper   │
//!                        └────────┬────────┘
//!                                 │
//!                                 ▼
//!                        ┌─────────────────┐
//!                        │   sim-types     │
//!                        │  Data structs   │
//!                        └────────┬────────┘
//!                                 │
//!                  ┌──────────────┴──────────────┐
//!                  ▼                             ▼
//!         ┌─────────────────┐           ┌─────────────────┐
//!         │     sim-pga     │           │     sim-ode     │
//!         │  Line, Motor    │           │  RK solver      │
//!         └─────────────────┘           └─────────────────┘
//! ```

#![doc(html_root_url = "https://docs.rs/sim-physics/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]

// Re-export sub-crates
pub use sim_core;
pub use sim_ode;
pub use sim_pga;
pub use sim_types;

// Re-export nalgebra for convenience
pub use nalgebra;

/// Prelude module for convenient imports.
///
/// Import everything you need with a single line:
///
/// ```
/// use sim_physics::prelude::*;
/// ```
pub mod prelude {
    // ========================================================================
    // Algebra from sim-pga
    // ========================================================================

    pub use sim_pga::{Line, Motor, Vector8};

    // ========================================================================
    // Core types from sim-types
    // ========================================================================

    // Bodies and motion
    pub use sim_types::{Forque, Inertia, Momentum, Pose, RigidBodyState, Twist};

    // Forque sources
    pub use sim_types::{
        ConstantForque, ForqueFn, LinearDamping, SharedForque, ZeroForque, shared,
    };

    // Configuration
    pub use sim_types::{
        AdaptiveConfig, Algorithm, IntegrationMethod, PoseNormalization, SimulationConfig,
    };

    // Errors
    pub use sim_types::{OdeError, SimError};

    // ========================================================================
    // Dynamics from sim-core
    // ========================================================================

    pub use sim_core::{StepResult, Stepper, StepperConfig};

    // Laws
    pub use sim_core::{
        gyroscopic_term, inertia_map, inv_inertia_map, kinetic_energy, pose_derivative,
        twist_derivative,
    };

    // Integrators
    pub use sim_core::{
        AdaptiveStep, FixedStepEuler, IntegrationOutput, Integrator, euler_step,
        integrate_with_method, rbm_physics_step, rbm_physics_step_coeffs,
    };

    // Harness
    pub use sim_core::{SimulationSetup, SplitStepComparison, compare_split_step};

    // ========================================================================
    // Math types from nalgebra
    // ========================================================================

    pub use nalgebra::{Vector3, Vector6};
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_imports() {
        let _pose = Pose::identity();
        let _inertia = Inertia::isotropic(1.0).unwrap();
        let _config = SimulationConfig::default();
        let _twist = Twist::from_parts(Vector3::x(), Vector3::zeros());
    }

    #[test]
    fn test_basic_simulation() {
        let mut state = RigidBodyState::new(
            Twist::new(0.0, 0.0, 0.0, 0.0, 0.0, 1.0),
            Pose::identity(),
            Inertia::isotropic(1.0).unwrap(),
        );

        let mut stepper = Stepper::new(SimulationConfig::default()).unwrap();
        stepper
            .run_for(&mut state, 0.1)
            .expect("simulation should run");

        assert!(state.time > 0.0);
        assert!(state.pose.scalar() < 1.0);
    }

    #[test]
    fn test_damping_drains_energy() {
        let inertia = Inertia::isotropic(1.0).unwrap();
        let twist = Twist::new(0.5, 0.0, 0.0, 0.0, 0.0, 0.0);
        let mut state = RigidBodyState::new(twist, Pose::identity(), inertia)
            .with_forque(shared(LinearDamping::new(1.0)));

        let mut stepper = Stepper::new(SimulationConfig::with_timestep(0.1)).unwrap();
        stepper.run_for(&mut state, 1.0).expect("simulation should run");

        // Pure translation decays as exp(-c t).
        let expected = 0.5 * (-1.0f64).exp();
        assert!((state.twist.e01() - expected).abs() < 1e-6);
        assert!(kinetic_energy(&state.twist, &inertia) < kinetic_energy(&twist, &inertia));
    }

    #[test]
    fn test_split_step_harness_accessible() {
        let cmp = compare_split_step(&SimulationSetup::reference()).unwrap();
        assert!(cmp.agrees_within(1e-5));
    }
}
