//! Core types for PGA rigid body simulation.
//!
//! This crate provides the foundational types for advancing a rigid body
//! expressed in projective geometric algebra:
//!
//! - [`Twist`], [`Momentum`], [`Forque`] - six-coefficient lines
//! - [`Pose`] - eight-coefficient unit motor
//! - [`Inertia`] - validated inertia descriptor in line layout
//! - [`ForqueFn`] - external force/torque callbacks ([`ZeroForque`], [`ConstantForque`], [`LinearDamping`])
//! - [`RigidBodyState`] - twist, pose, inertia, forque and time of one body
//! - [`SimulationConfig`], [`IntegrationMethod`], [`AdaptiveConfig`] - stepping settings
//!
//! # Design Philosophy
//!
//! These types are **pure data**. The derivative laws and integrators live in
//! `sim-core`; this crate only holds what they read and write.
//!
//! # Layout
//!
//! Lines use `[e01, e02, e03, e12, e31, e23]`, motors use
//! `[1, e01, e02, e03, e12, e31, e23, e0123]`. The `e0i` part of a twist is
//! its linear velocity and the `e12, e31, e23` part its angular velocity.
//!
//! # Example
//!
//! ```
//! use sim_types::{Inertia, Pose, RigidBodyState, Twist};
//!
//! let inertia = Inertia::from_mass_and_principal(1.0, [2.0, 1.0, 3.0]).unwrap();
//! let twist = Twist::new(0.0, 0.0, 0.0, 0.1, 0.001, 0.0);
//! let pose = Pose::new(1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 3.0, -2.0).normalized();
//!
//! let state = RigidBodyState::new(twist, pose, inertia);
//! assert!((state.pose.norm() - 1.0).abs() < 1e-12);
//! ```

#![doc(html_root_url = "https://docs.rs/sim-types/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn, // Many methods can't be const due to nalgebra
    clippy::missing_errors_doc,   // Error docs added where non-obvious
)]

mod body;
mod config;
mod dynamics;
mod error;

pub use body::{Forque, Inertia, Momentum, Pose, RigidBodyState, Twist};
pub use config::{AdaptiveConfig, IntegrationMethod, PoseNormalization, SimulationConfig};
pub use dynamics::{
    ConstantForque, ForqueFn, LinearDamping, SharedForque, ZeroForque, shared,
};
pub use error::SimError;

// Re-export algebra and solver types for convenience
pub use sim_ode::{Algorithm, OdeError};
pub use sim_pga::{Line, Motor, Vector3, Vector6, Vector8};

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;
