//! Mapping between twist space and momentum space.
//!
//! The inertia operator is diagonal in the dual basis: the twist is dualized
//! and scaled coefficient-wise, with no matrix product.
//!
//! ```text
//! P = dual(B) ⊙ I
//! B = dual(P ⊘ I)
//! ```

use sim_types::{Inertia, Momentum, Twist};

/// Map a twist to its momentum, `dual(B) ⊙ I`.
#[must_use]
pub fn inertia_map(twist: &Twist, inertia: &Inertia) -> Momentum {
    twist.dual().hadamard(inertia.as_line())
}

/// Map a momentum back to a twist, `dual(P ⊘ I)`.
///
/// An inertia built with [`Inertia::new_unchecked`] and holding a zero
/// coefficient yields non-finite components.
#[must_use]
pub fn inv_inertia_map(momentum: &Momentum, inertia: &Inertia) -> Twist {
    momentum.hadamard_div(inertia.as_line()).dual()
}

/// Kinetic energy `½ Σ dual(B)ⱼ² Iⱼ`.
#[must_use]
pub fn kinetic_energy(twist: &Twist, inertia: &Inertia) -> f64 {
    0.5 * twist.dual().coeffs.dot(&inertia_map(twist, inertia).coeffs)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference_inertia() -> Inertia {
        Inertia::new([2.0, 1.0, 3.0, 1.0, 1.0, 1.0]).unwrap()
    }

    #[test]
    fn test_inertia_map_dualizes_then_scales() {
        let twist = Twist::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        let p = inertia_map(&twist, &reference_inertia());
        assert_eq!(p, Momentum::new(12.0, 5.0, 12.0, 3.0, 2.0, 1.0));
    }

    #[test]
    fn test_inverse_undoes_map() {
        let inertia = reference_inertia();
        let twist = Twist::new(0.3, -0.1, 0.7, 0.1, 0.001, -2.0);
        let back = inv_inertia_map(&inertia_map(&twist, &inertia), &inertia);
        assert_relative_eq!(back, twist, epsilon = 1e-15);
    }

    #[test]
    fn test_zero_inertia_gives_non_finite_twist() {
        let inertia = Inertia::new_unchecked([0.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
        let twist = inv_inertia_map(&Momentum::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0), &inertia);
        assert!(!twist.is_finite());
    }

    #[test]
    fn test_kinetic_energy_of_pure_rotation() {
        // ω about x with ixx = 2: E = ½ · 2 · ω²
        let inertia = reference_inertia();
        let twist = Twist::new(0.0, 0.0, 0.0, 0.0, 0.0, 3.0);
        assert_relative_eq!(kinetic_energy(&twist, &inertia), 9.0, epsilon = 1e-12);
    }

    #[test]
    fn test_kinetic_energy_of_pure_translation() {
        let inertia = Inertia::from_mass_and_principal(4.0, [1.0, 1.0, 1.0]).unwrap();
        let twist = Twist::new(1.0, 2.0, 0.0, 0.0, 0.0, 0.0);
        assert_relative_eq!(kinetic_energy(&twist, &inertia), 10.0, epsilon = 1e-12);
    }
}
