//! Rigid body state types.
//!
//! A body's motion is described by two PGA elements: a unit [`Motor`] for
//! its pose and a [`Line`] for its body-frame twist. Momentum, external
//! forque and the inertia descriptor reuse the line layout.

use std::sync::Arc;

use sim_pga::{Line, Motor, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dynamics::{SharedForque, ZeroForque};

/// Body-frame velocity: linear part in `e01, e02, e03`, angular part in
/// `e12, e31, e23`.
pub type Twist = Line;

/// Position and orientation as a unit motor.
pub type Pose = Motor;

/// Body-frame momentum, the image of a [`Twist`] under the inertia map.
pub type Momentum = Line;

/// External force and torque expressed as a line.
pub type Forque = Line;

/// Inertia descriptor in line layout.
///
/// The inertia map scales the *dual* of a twist coefficient-wise, so the
/// first three coefficients weigh the angular velocity about x, y, z and the
/// last three weigh the linear velocity (the mass, for a body expressed at its
/// center of mass).
///
/// # Example
///
/// ```
/// use sim_types::Inertia;
///
/// let inertia = Inertia::from_mass_and_principal(1.0, [2.0, 1.0, 3.0]).unwrap();
/// assert_eq!(inertia.to_array(), [2.0, 1.0, 3.0, 1.0, 1.0, 1.0]);
///
/// assert!(Inertia::new([1.0, 1.0, 0.0, 1.0, 1.0, 1.0]).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Inertia {
    line: Line,
}

impl Inertia {
    /// Create an inertia descriptor, rejecting zero or non-finite coefficients.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SimError::InvalidInertia`] naming the first bad coefficient.
    pub fn new(coeffs: impl Into<Line>) -> crate::Result<Self> {
        let line = coeffs.into();
        if let Some((index, &value)) = line
            .coeffs
            .iter()
            .enumerate()
            .find(|(_, c)| **c == 0.0 || !c.is_finite())
        {
            return Err(crate::SimError::InvalidInertia { index, value });
        }
        Ok(Self { line })
    }

    /// Create an inertia descriptor without validation.
    ///
    /// A zero coefficient makes the inverse inertia map produce non-finite
    /// values.
    #[must_use]
    pub fn new_unchecked(coeffs: impl Into<Line>) -> Self {
        Self {
            line: coeffs.into(),
        }
    }

    /// All six coefficients equal to `k`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SimError::InvalidInertia`] if `k` is zero or not finite.
    pub fn isotropic(k: f64) -> crate::Result<Self> {
        Self::new([k; 6])
    }

    /// Mass `m` with principal moments `[ixx, iyy, izz]`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SimError::InvalidInertia`] if any value is zero or not finite.
    pub fn from_mass_and_principal(mass: f64, principal: [f64; 3]) -> crate::Result<Self> {
        Self::new([principal[0], principal[1], principal[2], mass, mass, mass])
    }

    /// Coefficients as a line.
    #[must_use]
    pub fn as_line(&self) -> &Line {
        &self.line
    }

    /// Coefficients as a plain array.
    #[must_use]
    pub fn to_array(&self) -> [f64; 6] {
        self.line.to_array()
    }

    /// Principal moments `[ixx, iyy, izz]`.
    #[must_use]
    pub fn principal_moments(&self) -> Vector3<f64> {
        self.line.ideal()
    }

    /// Whether all six coefficients are equal.
    #[must_use]
    pub fn is_isotropic(&self) -> bool {
        let first = self.line.coeffs[0];
        self.line.coeffs.iter().all(|c| *c == first)
    }
}

impl From<Inertia> for Line {
    fn from(inertia: Inertia) -> Self {
        inertia.line
    }
}

/// Complete dynamic state of a rigid body.
///
/// Owned by the caller; integrators read `inertia` and `forque` and
/// overwrite `twist` and `pose`.
///
/// # Example
///
/// ```
/// use sim_types::{Inertia, Pose, RigidBodyState, Twist};
///
/// let inertia = Inertia::isotropic(1.0).unwrap();
/// let state = RigidBodyState::new(Twist::zero(), Pose::identity(), inertia);
/// assert_eq!(state.time, 0.0);
/// assert!(state.is_finite());
/// ```
#[derive(Clone)]
pub struct RigidBodyState {
    /// Body-frame velocity.
    pub twist: Twist,
    /// Unit motor placing the body in the world.
    pub pose: Pose,
    /// Inertia descriptor, constant for the run.
    pub inertia: Inertia,
    /// External forque callback.
    pub forque: SharedForque,
    /// Accumulated simulation time.
    pub time: f64,
}

impl RigidBodyState {
    /// Create a state with zero external forque at time zero.
    #[must_use]
    pub fn new(twist: Twist, pose: Pose, inertia: Inertia) -> Self {
        Self {
            twist,
            pose,
            inertia,
            forque: Arc::new(ZeroForque),
            time: 0.0,
        }
    }

    /// Create a state at rest at the given pose.
    #[must_use]
    pub fn at_rest(pose: Pose, inertia: Inertia) -> Self {
        Self::new(Twist::zero(), pose, inertia)
    }

    /// Replace the forque callback.
    #[must_use]
    pub fn with_forque(mut self, forque: SharedForque) -> Self {
        self.forque = forque;
        self
    }

    /// Set the starting time.
    #[must_use]
    pub fn with_time(mut self, time: f64) -> Self {
        self.time = time;
        self
    }

    /// Evaluate the forque callback at the current state.
    #[must_use]
    pub fn current_forque(&self) -> Forque {
        self.forque
            .forque(&self.twist.coeffs, &self.pose.coeffs, self.time)
    }

    /// Check if the state contains `NaN` or `Inf` values.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.twist.is_finite() && self.pose.is_finite() && self.time.is_finite()
    }
}

impl std::fmt::Debug for RigidBodyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RigidBodyState")
            .field("twist", &self.twist)
            .field("pose", &self.pose)
            .field("inertia", &self.inertia)
            .field("time", &self.time)
            .finish_non_exhaustive()
    }
}
