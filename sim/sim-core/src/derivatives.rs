//! Equations of motion for a free rigid body.
//!
//! Both laws are pure functions of their arguments and never renormalize
//! the pose.
//!
//! ```text
//! dM/dt = -½ M B
//! dB/dt = I⁻¹(F + B ×₋ I(B))
//! ```
//!
//! where `×₋` is the commutator product `½(ab − ba)`.

use sim_types::{Forque, Inertia, Pose, Twist};

use crate::inertia::{inertia_map, inv_inertia_map};

/// Time derivative of the pose, `-½ M B`.
///
/// Zero for a zero twist.
#[must_use]
pub fn pose_derivative(twist: &Twist, pose: &Pose) -> Pose {
    (*pose * *twist) * -0.5
}

/// Time derivative of the twist, `I⁻¹(F + B ×₋ I(B))`.
///
/// The gyroscopic term is always included.
#[must_use]
pub fn twist_derivative(twist: &Twist, inertia: &Inertia, forque: &Forque) -> Twist {
    inv_inertia_map(&(*forque + gyroscopic_term(twist, inertia)), inertia)
}

/// Gyroscopic (velocity-product) term `B ×₋ I(B)` in momentum layout.
///
/// Vanishes whenever the momentum is parallel to the twist, for example a
/// pure rotation or a pure translation under isotropic inertia.
#[must_use]
pub fn gyroscopic_term(twist: &Twist, inertia: &Inertia) -> Forque {
    twist.commutator(&inertia_map(twist, inertia))
}
