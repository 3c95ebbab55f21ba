//! Products on the even subalgebra of 3D PGA.
//!
//! All formulas are expanded from the Cayley table of `R(3,0,1)` with
//! `e0² = 0` and `e1² = e2² = e3² = 1`, restricted to the even grades.

use crate::{Line, Motor};

/// Geometric product of two even elements.
///
/// (A * B)_k = Σ_ij sign(i, j) · A_i · B_j over the even basis
/// `[1, e01, e02, e03, e12, e31, e23, e0123]`.
#[must_use]
pub fn geometric(a: &Motor, b: &Motor) -> Motor {
    let [a1, a01, a02, a03, a12, a31, a23, a0123] = a.to_array();
    let [b1, b01, b02, b03, b12, b31, b23, b0123] = b.to_array();

    Motor::new(
        a1 * b1 - a12 * b12 - a23 * b23 - a31 * b31,
        a1 * b01 + a01 * b1 - a0123 * b23 - a02 * b12 + a03 * b31 + a12 * b02
            - a23 * b0123
            - a31 * b03,
        a1 * b02 + a01 * b12 - a0123 * b31 + a02 * b1 - a03 * b23 - a12 * b01 + a23 * b03
            - a31 * b0123,
        a1 * b03 - a01 * b31 - a0123 * b12 + a02 * b23 + a03 * b1 - a12 * b0123 - a23 * b02
            + a31 * b01,
        a1 * b12 + a12 * b1 - a23 * b31 + a31 * b23,
        a1 * b31 - a12 * b23 + a23 * b12 + a31 * b1,
        a1 * b23 + a12 * b31 + a23 * b1 - a31 * b12,
        a1 * b0123
            + a01 * b23
            + a0123 * b1
            + a02 * b31
            + a03 * b12
            + a12 * b03
            + a23 * b01
            + a31 * b02,
    )
}

/// Geometric product of a motor with a line embedded as an even element.
#[must_use]
pub fn motor_line(m: &Motor, l: &Line) -> Motor {
    geometric(m, &Motor::from_line(l))
}

/// Commutator product `½(ab − ba)` of two lines.
///
/// The scalar and pseudoscalar parts of `ab` and `ba` agree, so the result
/// is a pure line.
#[must_use]
pub fn commutator(a: &Line, b: &Line) -> Line {
    let [a01, a02, a03, a12, a31, a23] = a.to_array();
    let [b01, b02, b03, b12, b31, b23] = b.to_array();

    Line::new(
        -a02 * b12 + a03 * b31 + a12 * b02 - a31 * b03,
        a01 * b12 - a03 * b23 - a12 * b01 + a23 * b03,
        -a01 * b31 + a02 * b23 - a23 * b02 + a31 * b01,
        -a23 * b31 + a31 * b23,
        -a12 * b23 + a23 * b12,
        a12 * b31 - a31 * b12,
    )
}

impl std::ops::Mul<Motor> for Motor {
    type Output = Motor;
    #[inline]
    fn mul(self, rhs: Motor) -> Motor {
        geometric(&self, &rhs)
    }
}

impl std::ops::Mul<Line> for Motor {
    type Output = Motor;
    #[inline]
    fn mul(self, rhs: Line) -> Motor {
        motor_line(&self, &rhs)
    }
}
