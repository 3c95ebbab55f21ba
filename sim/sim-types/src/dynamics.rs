//! External forque sources.
//!
//! A forque callback receives the raw twist and pose coefficients and the
//! current time, and returns the external force and torque as a [`Forque`].
//! Any `Fn(&Vector6<f64>, &Vector8, f64) -> Forque + Send + Sync` closure is a
//! [`ForqueFn`].

use std::sync::Arc;

use sim_pga::{Vector6, Vector8};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::body::Forque;

/// Source of external force and torque.
pub trait ForqueFn: Send + Sync {
    /// Forque acting on the body at time `t`.
    fn forque(&self, twist: &Vector6<f64>, pose: &Vector8, t: f64) -> Forque;
}

impl<F> ForqueFn for F
where
    F: Fn(&Vector6<f64>, &Vector8, f64) -> Forque + Send + Sync,
{
    fn forque(&self, twist: &Vector6<f64>, pose: &Vector8, t: f64) -> Forque {
        self(twist, pose, t)
    }
}

/// Shared, thread-safe forque callback.
pub type SharedForque = Arc<dyn ForqueFn>;

/// No external forque.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ZeroForque;

impl ForqueFn for ZeroForque {
    fn forque(&self, _twist: &Vector6<f64>, _pose: &Vector8, _t: f64) -> Forque {
        Forque::zero()
    }
}

/// The same forque at every state and time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConstantForque(pub Forque);

impl ForqueFn for ConstantForque {
    fn forque(&self, _twist: &Vector6<f64>, _pose: &Vector8, _t: f64) -> Forque {
        self.0
    }
}

/// Forque opposing the twist, `-c · dual(B)` in momentum layout.
///
/// Dissipates kinetic energy in both the linear and angular parts.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinearDamping {
    /// Damping coefficient (non-negative).
    pub coefficient: f64,
}

impl LinearDamping {
    /// Create a damping source.
    #[must_use]
    pub const fn new(coefficient: f64) -> Self {
        Self { coefficient }
    }
}

impl ForqueFn for LinearDamping {
    fn forque(&self, twist: &Vector6<f64>, _pose: &Vector8, _t: f64) -> Forque {
        Forque::from_coeffs(twist * -self.coefficient).dual()
    }
}

/// Wrap any forque source for storage in a [`crate::RigidBodyState`].
pub fn shared(source: impl ForqueFn + 'static) -> SharedForque {
    Arc::new(source)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_forque() {
        let f = ZeroForque.forque(&Vector6::repeat(1.0), &Vector8::zeros(), 3.0);
        assert_eq!(f, Forque::zero());
    }

    #[test]
    fn test_constant_forque() {
        let push = Forque::new(0.0, 0.0, 1.0, 0.0, 0.0, 0.0);
        let f = ConstantForque(push).forque(&Vector6::zeros(), &Vector8::zeros(), 0.0);
        assert_eq!(f, push);
    }

    #[test]
    fn test_closure_is_forque_fn() {
        let source = shared(|_b: &Vector6<f64>, _m: &Vector8, t: f64| {
            Forque::new(t, 0.0, 0.0, 0.0, 0.0, 0.0)
        });
        let f = source.forque(&Vector6::zeros(), &Vector8::zeros(), 0.5);
        assert_eq!(f.e01(), 0.5);
    }

    #[test]
    fn test_damping_opposes_twist_in_momentum_layout() {
        let twist = Vector6::new(1.0, 0.0, 0.0, 0.0, 0.0, 2.0);
        let f = LinearDamping::new(0.5).forque(&twist, &Vector8::zeros(), 0.0);
        // dual moves e01 into e23 and e23 into e01.
        assert_eq!(f, Forque::new(-1.0, 0.0, 0.0, 0.0, 0.0, -0.5));
    }
}
