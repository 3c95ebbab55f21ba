//! Projective geometric algebra primitives for rigid body motion.
//!
//! This crate implements the two fixed-size elements of 3D PGA (`R(3,0,1)`)
//! needed to describe a moving rigid body:
//!
//! - [`Line`] - six bivector coefficients `[e01, e02, e03, e12, e31, e23]`,
//!   used for twists, momenta, forques and inertia descriptors
//! - [`Motor`] - eight even coefficients `[1, e01, e02, e03, e12, e31, e23, e0123]`,
//!   used for poses
//!
//! Only the operations rigid body dynamics needs are provided: the geometric
//! product (`Motor * Motor`, `Motor * Line`), the commutator product of lines,
//! the Poincaré dual, coefficient-wise scaling, reverse, norm and the
//! bivector exponential. There is no general multivector type.
//!
//! # Example
//!
//! ```
//! use sim_pga::{Line, Motor};
//!
//! // A quarter turn about the z axis (the e12 plane).
//! let rotor = Motor::rotor(&Line::new(0.0, 0.0, 0.0, 1.0, 0.0, 0.0), std::f64::consts::FRAC_PI_2);
//! assert!((rotor.norm() - 1.0).abs() < 1e-12);
//!
//! // Composition is the geometric product.
//! let half_turn = rotor * rotor;
//! assert!(half_turn.scalar().abs() < 1e-12);
//! ```

#![doc(html_root_url = "https://docs.rs/sim-pga/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn, // nalgebra constructors are not const
    clippy::suboptimal_flops,     // expanded product tables read better without mul_add
    clippy::similar_names,        // a01/a02/b01... mirror the basis names
    clippy::many_single_char_names,
)]

mod line;
mod motor;
pub mod products;

pub use line::Line;
pub use motor::{Motor, Vector8};

pub use nalgebra::{Vector3, Vector6};
