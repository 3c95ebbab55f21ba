//! Motors: the even subalgebra of 3D PGA.
//!
//! A [`Motor`] carries eight coefficients in the fixed order
//! `[1, e01, e02, e03, e12, e31, e23, e0123]`. Unit motors represent rigid
//! transformations (rotation + translation).

use nalgebra::{SVector, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Line;

/// 8D coefficient vector used for motors.
pub type Vector8 = SVector<f64, 8>;

/// A 3D PGA even element (eight coefficients).
///
/// # Example
///
/// ```
/// use sim_pga::Motor;
///
/// let m = Motor::new(1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 3.0, -2.0);
/// let unit = m.normalized();
/// assert!((unit.norm() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Motor {
    /// Coefficients `[1, e01, e02, e03, e12, e31, e23, e0123]`.
    pub coeffs: Vector8,
}

impl Default for Motor {
    fn default() -> Self {
        Self::identity()
    }
}

impl Motor {
    /// Create a motor from its eight coefficients.
    #[allow(clippy::too_many_arguments)]
    #[inline]
    #[must_use]
    pub fn new(
        s: f64,
        e01: f64,
        e02: f64,
        e03: f64,
        e12: f64,
        e31: f64,
        e23: f64,
        e0123: f64,
    ) -> Self {
        Self {
            coeffs: Vector8::from([s, e01, e02, e03, e12, e31, e23, e0123]),
        }
    }

    /// Create a motor from a coefficient vector in
    /// `[1, e01, e02, e03, e12, e31, e23, e0123]` order.
    #[inline]
    #[must_use]
    pub const fn from_coeffs(coeffs: Vector8) -> Self {
        Self { coeffs }
    }

    /// Create a motor from a coefficient array.
    #[inline]
    #[must_use]
    pub fn from_array(a: [f64; 8]) -> Self {
        Self {
            coeffs: Vector8::from(a),
        }
    }

    /// The identity motor (scalar 1).
    #[inline]
    #[must_use]
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0)
    }

    /// The zero element (not a valid transform; used for derivatives).
    #[inline]
    #[must_use]
    pub fn zero() -> Self {
        Self {
            coeffs: Vector8::zeros(),
        }
    }

    /// Embed a line as an even element with zero scalar and pseudoscalar.
    #[inline]
    #[must_use]
    pub fn from_line(line: &Line) -> Self {
        let c = &line.coeffs;
        Self::new(0.0, c[0], c[1], c[2], c[3], c[4], c[5], 0.0)
    }

    /// Translator moving points by `t`.
    #[must_use]
    pub fn translator(t: Vector3<f64>) -> Self {
        Line::from_parts(t * -0.5, Vector3::zeros()).exp()
    }

    /// Rotor turning by `angle` about the line `bivector` (normalized internally).
    ///
    /// Returns the identity for a zero bivector.
    #[must_use]
    pub fn rotor(bivector: &Line, angle: f64) -> Self {
        let n = bivector.euclidean().norm();
        if n == 0.0 {
            return Self::identity();
        }
        (*bivector * (-0.5 * angle / n)).exp()
    }

    /// Coefficient vector in `[1, e01, e02, e03, e12, e31, e23, e0123]` order.
    #[inline]
    #[must_use]
    pub const fn coeffs(&self) -> Vector8 {
        self.coeffs
    }

    /// Coefficients as a plain array.
    #[inline]
    #[must_use]
    pub fn to_array(&self) -> [f64; 8] {
        let mut a = [0.0; 8];
        a.copy_from_slice(self.coeffs.as_slice());
        a
    }

    /// Scalar coefficient.
    #[inline]
    #[must_use]
    pub fn scalar(&self) -> f64 {
        self.coeffs[0]
    }

    /// `e01` coefficient.
    #[inline]
    #[must_use]
    pub fn e01(&self) -> f64 {
        self.coeffs[1]
    }

    /// `e02` coefficient.
    #[inline]
    #[must_use]
    pub fn e02(&self) -> f64 {
        self.coeffs[2]
    }

    /// `e03` coefficient.
    #[inline]
    #[must_use]
    pub fn e03(&self) -> f64 {
        self.coeffs[3]
    }

    /// `e12` coefficient.
    #[inline]
    #[must_use]
    pub fn e12(&self) -> f64 {
        self.coeffs[4]
    }

    /// `e31` coefficient.
    #[inline]
    #[must_use]
    pub fn e31(&self) -> f64 {
        self.coeffs[5]
    }

    /// `e23` coefficient.
    #[inline]
    #[must_use]
    pub fn e23(&self) -> f64 {
        self.coeffs[6]
    }

    /// Pseudoscalar `e0123` coefficient.
    #[inline]
    #[must_use]
    pub fn e0123(&self) -> f64 {
        self.coeffs[7]
    }

    /// Bivector (grade 2) part.
    #[inline]
    #[must_use]
    pub fn grade2(&self) -> Line {
        let c = &self.coeffs;
        Line::new(c[1], c[2], c[3], c[4], c[5], c[6])
    }

    /// Reverse `M̃`: negates the bivector part.
    #[inline]
    #[must_use]
    pub fn reverse(&self) -> Self {
        let c = &self.coeffs;
        Self::new(c[0], -c[1], -c[2], -c[3], -c[4], -c[5], -c[6], c[7])
    }

    /// Euclidean (bulk) norm `sqrt(<M M̃>₀)`.
    ///
    /// Only the scalar and Euclidean bivector coefficients contribute; the
    /// ideal part carries translation and does not scale the transform.
    #[inline]
    #[must_use]
    pub fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }

    /// Squared Euclidean norm `<M M̃>₀`.
    #[inline]
    #[must_use]
    pub fn norm_squared(&self) -> f64 {
        let c = &self.coeffs;
        c[0] * c[0] + c[4] * c[4] + c[5] * c[5] + c[6] * c[6]
    }

    /// Pseudoscalar part of `M M̃`.
    ///
    /// Zero for a motor that is an exact rigid transform.
    #[inline]
    #[must_use]
    pub fn ideal_residual(&self) -> f64 {
        let c = &self.coeffs;
        2.0 * (c[0] * c[7] - c[1] * c[6] - c[2] * c[5] - c[3] * c[4])
    }

    /// Divide by [`Motor::norm`] so the result has unit magnitude.
    ///
    /// A zero-magnitude input produces non-finite coefficients.
    #[inline]
    #[must_use]
    pub fn normalized(&self) -> Self {
        *self / self.norm()
    }

    /// Normalize in place.
    #[inline]
    pub fn normalize_mut(&mut self) {
        let n = self.norm();
        self.coeffs /= n;
    }

    /// Check that every coefficient is finite.
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.coeffs.iter().all(|x| x.is_finite())
    }
}

impl From<Vector8> for Motor {
    fn from(coeffs: Vector8) -> Self {
        Self { coeffs }
    }
}

impl From<Motor> for Vector8 {
    fn from(motor: Motor) -> Self {
        motor.coeffs
    }
}

impl From<[f64; 8]> for Motor {
    fn from(a: [f64; 8]) -> Self {
        Self::from_array(a)
    }
}

impl From<Line> for Motor {
    fn from(line: Line) -> Self {
        Self::from_line(&line)
    }
}

impl std::ops::Add for Motor {
    type Output = Motor;
    #[inline]
    fn add(self, rhs: Motor) -> Motor {
        Motor {
            coeffs: self.coeffs + rhs.coeffs,
        }
    }
}

impl std::ops::AddAssign for Motor {
    #[inline]
    fn add_assign(&mut self, rhs: Motor) {
        self.coeffs += rhs.coeffs;
    }
}

impl std::ops::Sub for Motor {
    type Output = Motor;
    #[inline]
    fn sub(self, rhs: Motor) -> Motor {
        Motor {
            coeffs: self.coeffs - rhs.coeffs,
        }
    }
}

impl std::ops::Mul<f64> for Motor {
    type Output = Motor;
    #[inline]
    fn mul(self, rhs: f64) -> Motor {
        Motor {
            coeffs: self.coeffs * rhs,
        }
    }
}

impl std::ops::Mul<Motor> for f64 {
    type Output = Motor;
    #[inline]
    fn mul(self, rhs: Motor) -> Motor {
        rhs * self
    }
}

impl std::ops::Div<f64> for Motor {
    type Output = Motor;
    #[inline]
    fn div(self, rhs: f64) -> Motor {
        Motor {
            coeffs: self.coeffs / rhs,
        }
    }
}

impl std::ops::Neg for Motor {
    type Output = Motor;
    #[inline]
    fn neg(self) -> Motor {
        Motor {
            coeffs: -self.coeffs,
        }
    }
}

impl approx::AbsDiffEq for Motor {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.coeffs.abs_diff_eq(&other.coeffs, epsilon)
    }
}

impl approx::RelativeEq for Motor {
    fn default_max_relative() -> f64 {
        f64::EPSILON
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.coeffs.relative_eq(&other.coeffs, epsilon, max_relative)
    }
}
