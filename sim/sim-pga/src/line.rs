//! Lines: the bivector grade of 3D PGA.
//!
//! A [`Line`] carries six coefficients in the fixed order
//! `[e01, e02, e03, e12, e31, e23]`. The first three (the *ideal* part) carry
//! linear quantities, the last three (the *Euclidean* part) carry angular ones.
//! The same layout is used for twists, momenta, forques and inertia
//! descriptors.

use nalgebra::{Vector3, Vector6};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Motor;

/// A 3D PGA bivector (six coefficients).
///
/// # Example
///
/// ```
/// use sim_pga::Line;
///
/// let l = Line::new(0.0, 0.0, 0.0, 0.1, 0.001, 0.0);
/// assert_eq!(l.e12(), 0.1);
/// assert_eq!(l.dual().e03(), 0.1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Line {
    /// Coefficients `[e01, e02, e03, e12, e31, e23]`.
    pub coeffs: Vector6<f64>,
}

impl Line {
    /// Create a line from its six coefficients.
    #[inline]
    #[must_use]
    pub fn new(e01: f64, e02: f64, e03: f64, e12: f64, e31: f64, e23: f64) -> Self {
        Self {
            coeffs: Vector6::new(e01, e02, e03, e12, e31, e23),
        }
    }

    /// Create a line from a coefficient vector in `[e01, e02, e03, e12, e31, e23]` order.
    #[inline]
    #[must_use]
    pub const fn from_coeffs(coeffs: Vector6<f64>) -> Self {
        Self { coeffs }
    }

    /// Create a line from a coefficient array.
    #[inline]
    #[must_use]
    pub fn from_array(a: [f64; 6]) -> Self {
        Self::new(a[0], a[1], a[2], a[3], a[4], a[5])
    }

    /// The zero line.
    #[inline]
    #[must_use]
    pub fn zero() -> Self {
        Self {
            coeffs: Vector6::zeros(),
        }
    }

    /// Build a line from its ideal (`e01, e02, e03`) and Euclidean
    /// (`e12, e31, e23`) parts.
    #[inline]
    #[must_use]
    pub fn from_parts(ideal: Vector3<f64>, euclidean: Vector3<f64>) -> Self {
        Self::new(
            ideal.x,
            ideal.y,
            ideal.z,
            euclidean.x,
            euclidean.y,
            euclidean.z,
        )
    }

    /// Coefficient vector in `[e01, e02, e03, e12, e31, e23]` order.
    #[inline]
    #[must_use]
    pub const fn coeffs(&self) -> Vector6<f64> {
        self.coeffs
    }

    /// Coefficients as a plain array.
    #[inline]
    #[must_use]
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.coeffs[0],
            self.coeffs[1],
            self.coeffs[2],
            self.coeffs[3],
            self.coeffs[4],
            self.coeffs[5],
        ]
    }

    /// `e01` coefficient.
    #[inline]
    #[must_use]
    pub fn e01(&self) -> f64 {
        self.coeffs[0]
    }

    /// `e02` coefficient.
    #[inline]
    #[must_use]
    pub fn e02(&self) -> f64 {
        self.coeffs[1]
    }

    /// `e03` coefficient.
    #[inline]
    #[must_use]
    pub fn e03(&self) -> f64 {
        self.coeffs[2]
    }

    /// `e12` coefficient.
    #[inline]
    #[must_use]
    pub fn e12(&self) -> f64 {
        self.coeffs[3]
    }

    /// `e31` coefficient.
    #[inline]
    #[must_use]
    pub fn e31(&self) -> f64 {
        self.coeffs[4]
    }

    /// `e23` coefficient.
    #[inline]
    #[must_use]
    pub fn e23(&self) -> f64 {
        self.coeffs[5]
    }

    /// Ideal part `(e01, e02, e03)`.
    #[inline]
    #[must_use]
    pub fn ideal(&self) -> Vector3<f64> {
        Vector3::new(self.coeffs[0], self.coeffs[1], self.coeffs[2])
    }

    /// Euclidean part `(e12, e31, e23)`.
    #[inline]
    #[must_use]
    pub fn euclidean(&self) -> Vector3<f64> {
        Vector3::new(self.coeffs[3], self.coeffs[4], self.coeffs[5])
    }

    /// Linear part of a twist or momentum (alias of [`Line::ideal`]).
    #[inline]
    #[must_use]
    pub fn linear(&self) -> Vector3<f64> {
        self.ideal()
    }

    /// Angular part of a twist or momentum (alias of [`Line::euclidean`]).
    #[inline]
    #[must_use]
    pub fn angular(&self) -> Vector3<f64> {
        self.euclidean()
    }

    /// Poincaré dual.
    ///
    /// In this basis the dual reverses the coefficient order:
    /// `e01 ↔ e23`, `e02 ↔ e31`, `e03 ↔ e12`. It is its own inverse.
    #[inline]
    #[must_use]
    pub fn dual(&self) -> Self {
        let c = &self.coeffs;
        Self::new(c[5], c[4], c[3], c[2], c[1], c[0])
    }

    /// Commutator product `½(ab − ba)`.
    ///
    /// Antisymmetric and bilinear; the result is again a line.
    #[must_use]
    pub fn commutator(&self, other: &Self) -> Self {
        crate::products::commutator(self, other)
    }

    /// Coefficient-wise (Hadamard) product.
    #[inline]
    #[must_use]
    pub fn hadamard(&self, other: &Self) -> Self {
        Self {
            coeffs: self.coeffs.component_mul(&other.coeffs),
        }
    }

    /// Coefficient-wise division.
    ///
    /// A zero coefficient in `other` yields a non-finite result in that slot.
    #[inline]
    #[must_use]
    pub fn hadamard_div(&self, other: &Self) -> Self {
        Self {
            coeffs: self.coeffs.component_div(&other.coeffs),
        }
    }

    /// Euclidean norm of the coefficient vector.
    #[inline]
    #[must_use]
    pub fn norm(&self) -> f64 {
        self.coeffs.norm()
    }

    /// Exponential map, returning the motor `exp(self)`.
    ///
    /// Closed form for a general (screw) bivector; pure ideal lines give
    /// translators `1 + B`.
    #[must_use]
    pub fn exp(&self) -> Motor {
        let b = &self.coeffs;
        let l = b[3] * b[3] + b[4] * b[4] + b[5] * b[5];
        if l == 0.0 {
            return Motor::new(1.0, b[0], b[1], b[2], 0.0, 0.0, 0.0, 0.0);
        }
        let m = b[0] * b[5] + b[1] * b[4] + b[2] * b[3];
        let a = l.sqrt();
        let c = a.cos();
        let s = a.sin() / a;
        let t = m / l * (c - s);
        Motor::new(
            c,
            s * b[0] + t * b[5],
            s * b[1] + t * b[4],
            s * b[2] + t * b[3],
            s * b[3],
            s * b[4],
            s * b[5],
            m * s,
        )
    }

    /// Check that every coefficient is finite.
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.coeffs.iter().all(|x| x.is_finite())
    }
}

impl From<Vector6<f64>> for Line {
    fn from(coeffs: Vector6<f64>) -> Self {
        Self { coeffs }
    }
}

impl From<Line> for Vector6<f64> {
    fn from(line: Line) -> Self {
        line.coeffs
    }
}

impl From<[f64; 6]> for Line {
    fn from(a: [f64; 6]) -> Self {
        Self::from_array(a)
    }
}

impl std::ops::Add for Line {
    type Output = Line;
    #[inline]
    fn add(self, rhs: Line) -> Line {
        Line {
            coeffs: self.coeffs + rhs.coeffs,
        }
    }
}

impl std::ops::AddAssign for Line {
    #[inline]
    fn add_assign(&mut self, rhs: Line) {
        self.coeffs += rhs.coeffs;
    }
}

impl std::ops::Sub for Line {
    type Output = Line;
    #[inline]
    fn sub(self, rhs: Line) -> Line {
        Line {
            coeffs: self.coeffs - rhs.coeffs,
        }
    }
}

impl std::ops::SubAssign for Line {
    #[inline]
    fn sub_assign(&mut self, rhs: Line) {
        self.coeffs -= rhs.coeffs;
    }
}

impl std::ops::Mul<f64> for Line {
    type Output = Line;
    #[inline]
    fn mul(self, rhs: f64) -> Line {
        Line {
            coeffs: self.coeffs * rhs,
        }
    }
}

impl std::ops::Mul<Line> for f64 {
    type Output = Line;
    #[inline]
    fn mul(self, rhs: Line) -> Line {
        rhs * self
    }
}

impl std::ops::Div<f64> for Line {
    type Output = Line;
    #[inline]
    fn div(self, rhs: f64) -> Line {
        Line {
            coeffs: self.coeffs / rhs,
        }
    }
}

impl std::ops::Neg for Line {
    type Output = Line;
    #[inline]
    fn neg(self) -> Line {
        Line {
            coeffs: -self.coeffs,
        }
    }
}

impl approx::AbsDiffEq for Line {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.coeffs.abs_diff_eq(&other.coeffs, epsilon)
    }
}

impl approx::RelativeEq for Line {
    fn default_max_relative() -> f64 {
        f64::EPSILON
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.coeffs.relative_eq(&other.coeffs, epsilon, max_relative)
    }
}
