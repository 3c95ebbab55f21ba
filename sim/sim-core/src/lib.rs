//! Rigid body dynamics in projective geometric algebra.
//!
//! This crate holds the equations of motion and the integrators that advance
//! a [`RigidBodyState`]. It builds on [`sim_types`] for the data structures,
//! [`sim_pga`] for the algebra, and [`sim_ode`] for adaptive solving.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Stepper                               │
//! │  Owns: configuration, step counters                         │
//! │  Mutates: twist, pose, time of a RigidBodyState             │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Integrators                             │
//! │  Fixed-step Euler, adaptive embedded Runge-Kutta            │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │               Derivative laws + inertia operator             │
//! │  dM/dt = -½ M B      dB/dt = I⁻¹(F + B ×₋ I(B))              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use sim_core::{Stepper, kinetic_energy};
//! use sim_types::{Inertia, Pose, RigidBodyState, SimulationConfig, Twist};
//!
//! let inertia = Inertia::new([2.0, 1.0, 3.0, 1.0, 1.0, 1.0]).unwrap();
//! let mut state = RigidBodyState::new(
//!     Twist::new(0.0, 0.0, 0.0, 0.1, 0.001, 0.0),
//!     Pose::identity(),
//!     inertia,
//! );
//! let energy = kinetic_energy(&state.twist, &inertia);
//!
//! let mut stepper = Stepper::new(SimulationConfig::with_timestep(0.1)).unwrap();
//! stepper.run_for(&mut state, 2.0).unwrap();
//!
//! assert!((kinetic_energy(&state.twist, &inertia) - energy).abs() < 1e-6 * energy);
//! assert!((state.pose.norm() - 1.0).abs() < 1e-6);
//! ```
//!
//! # Integration Methods
//!
//! | Method | Order | Error control | Pose renormalized |
//! |--------|-------|---------------|-------------------|
//! | Explicit Euler (N sub-steps) | 1 | No | Once, after the last sub-step |
//! | Adaptive Dormand-Prince 5(4) | 5 | Yes | Input; output on request |
//! | Adaptive Cash-Karp 4(5) | 5 | Yes | Input; output on request |
//! | Adaptive Bogacki-Shampine 3(2) | 3 | Yes | Input; output on request |
//!
//! The Euler scheme is not symplectic; energy drifts with the sub-step size.

#![doc(html_root_url = "https://docs.rs/sim-core/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,          // mul_add style changes aren't always clearer
)]

pub mod derivatives;
pub mod harness;
pub mod inertia;
pub mod integrators;
mod stepper;

pub use derivatives::{gyroscopic_term, pose_derivative, twist_derivative};
pub use harness::{SimulationSetup, SplitStepComparison, compare_split_step};
pub use inertia::{inertia_map, inv_inertia_map, kinetic_energy};
pub use integrators::{
    AdaptiveStep, FixedStepEuler, IntegrationOutput, Integrator, euler_step,
    integrate_with_method, rbm_physics_step, rbm_physics_step_coeffs,
};
pub use stepper::{StepResult, Stepper, StepperConfig};

// Re-export key types from sim-types for convenience
pub use sim_types::{
    AdaptiveConfig, ConstantForque, Forque, ForqueFn, Inertia, IntegrationMethod, LinearDamping,
    Momentum, Pose, PoseNormalization, RigidBodyState, SimError, SimulationConfig, Twist,
    ZeroForque,
};
