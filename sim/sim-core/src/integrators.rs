//! Numerical integration of rigid body motion.
//!
//! Two strategies advance a `(twist, pose)` pair over an interval:
//!
//! - **Fixed-step Euler** ([`euler_step`]): `N` equal semi-implicit Euler
//!   sub-steps (twist first, then pose with the new twist), pose
//!   renormalized once at the end. First order, not symplectic.
//! - **Adaptive** ([`rbm_physics_step`], [`rbm_physics_step_coeffs`]): both
//!   derivative laws packaged as one partitioned ODE system and handed to an
//!   embedded Runge-Kutta solver with error control.
//!
//! # Example
//!
//! ```
//! use sim_core::integrators::{euler_step, rbm_physics_step};
//! use sim_types::{AdaptiveConfig, Inertia, Pose, Twist, ZeroForque};
//!
//! let inertia = Inertia::new([2.0, 1.0, 3.0, 1.0, 1.0, 1.0]).unwrap();
//! let twist = Twist::new(0.0, 0.0, 0.0, 0.1, 0.001, 0.0);
//! let pose = Pose::new(1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 3.0, -2.0).normalized();
//!
//! let fixed = euler_step(&twist, &pose, &inertia, &ZeroForque, 100, 1.0, 0.0).unwrap();
//! assert!((fixed.pose.norm() - 1.0).abs() < 1e-12);
//!
//! let adaptive =
//!     rbm_physics_step(&twist, &pose, &inertia, 1.0, &ZeroForque, &AdaptiveConfig::default(), 0.0)
//!         .unwrap();
//! assert!((adaptive.pose.norm() - 1.0).abs() < 1e-6);
//! ```

use sim_ode::{DynamicalProblem, SolverStats, solve};
use sim_types::{
    AdaptiveConfig, ForqueFn, Inertia, IntegrationMethod, Pose, RigidBodyState, SimError, Twist,
    Vector6, Vector8,
};
use tracing::trace;

use crate::derivatives::{pose_derivative, twist_derivative};

/// Result of advancing a twist and pose over one interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrationOutput {
    /// Twist at the end of the interval.
    pub twist: Twist,
    /// Pose at the end of the interval.
    pub pose: Pose,
    /// Pose magnitude before any output renormalization.
    pub pose_norm: f64,
    /// Work done: sub-steps and derivative evaluations.
    pub stats: SolverStats,
}

/// Trait for integration methods.
pub trait Integrator {
    /// Advance the state by `dt` without modifying it.
    ///
    /// The state's own time is used as the start of the interval.
    fn advance(&self, state: &RigidBodyState, dt: f64) -> sim_types::Result<IntegrationOutput>;

    /// Advance the state in place by `dt`, including its time.
    fn integrate(
        &self,
        state: &mut RigidBodyState,
        dt: f64,
    ) -> sim_types::Result<IntegrationOutput> {
        let out = self.advance(state, dt)?;
        state.twist = out.twist;
        state.pose = out.pose;
        state.time += dt;
        Ok(out)
    }
}

/// Fixed-step semi-implicit Euler with a given number of sub-steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedStepEuler {
    /// Sub-steps per interval.
    pub step_count: usize,
}

impl Integrator for FixedStepEuler {
    fn advance(&self, state: &RigidBodyState, dt: f64) -> sim_types::Result<IntegrationOutput> {
        euler_step(
            &state.twist,
            &state.pose,
            &state.inertia,
            &*state.forque,
            self.step_count,
            dt,
            state.time,
        )
    }
}

/// Adaptive embedded Runge-Kutta stepping.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AdaptiveStep {
    /// Solver settings and pose normalization policy.
    pub config: AdaptiveConfig,
}

impl Integrator for AdaptiveStep {
    fn advance(&self, state: &RigidBodyState, dt: f64) -> sim_types::Result<IntegrationOutput> {
        rbm_physics_step(
            &state.twist,
            &state.pose,
            &state.inertia,
            dt,
            &*state.forque,
            &self.config,
            state.time,
        )
    }
}

/// Dispatch to the appropriate integrator based on method enum.
pub fn integrate_with_method(
    method: &IntegrationMethod,
    state: &mut RigidBodyState,
    dt: f64,
) -> sim_types::Result<IntegrationOutput> {
    match method {
        IntegrationMethod::ExplicitEuler { step_count } => FixedStepEuler {
            step_count: *step_count,
        }
        .integrate(state, dt),
        IntegrationMethod::Adaptive(config) => AdaptiveStep { config: *config }.integrate(state, dt),
    }
}

/// Advance with `step_count` equal semi-implicit Euler sub-steps.
///
/// Each sub-step of length `h = dt / step_count` updates the twist from the
/// current forque, then the pose from the new twist:
///
/// ```text
/// B ← B + h · dB/dt(B, I, F(B, M, t))
/// M ← M + h · dM/dt(B, M)
/// t ← t + h
/// ```
///
/// The pose is normalized once after the last sub-step.
///
/// # Errors
///
/// - [`SimError::InvalidStepCount`] if `step_count` is zero
/// - [`SimError::InvalidTimestep`] if `dt` is negative or not finite
pub fn euler_step(
    twist: &Twist,
    pose: &Pose,
    inertia: &Inertia,
    forque: &dyn ForqueFn,
    step_count: usize,
    dt: f64,
    t0: f64,
) -> sim_types::Result<IntegrationOutput> {
    if step_count == 0 {
        return Err(SimError::InvalidStepCount(step_count));
    }
    check_interval(dt)?;

    #[allow(clippy::cast_precision_loss)]
    let h = dt / step_count as f64;

    let mut b = *twist;
    let mut m = *pose;
    let mut t = t0;
    for _ in 0..step_count {
        let f = forque.forque(&b.coeffs, &m.coeffs, t);
        b += twist_derivative(&b, inertia, &f) * h;
        m += pose_derivative(&b, &m) * h;
        t += h;
    }

    let pose_norm = m.norm();
    trace!(step_count, dt, pose_norm, "euler step");

    Ok(IntegrationOutput {
        twist: b,
        pose: m.normalized(),
        pose_norm,
        stats: SolverStats {
            accepted_steps: step_count,
            rejected_steps: 0,
            rhs_evaluations: step_count,
        },
    })
}

/// Advance with adaptive error control, on [`Twist`] and [`Pose`] values.
///
/// The input pose is normalized first. The output pose is renormalized only
/// under [`sim_types::PoseNormalization::InputAndOutput`]; `pose_norm`
/// always reports the magnitude the solver produced.
///
/// # Errors
///
/// - [`SimError::InvalidTimestep`] if `dt` is negative or not finite
/// - [`SimError::Solver`] if the solver rejects its options or fails to
///   reach `t0 + dt`
#[allow(clippy::too_many_arguments)]
pub fn rbm_physics_step(
    twist: &Twist,
    pose: &Pose,
    inertia: &Inertia,
    dt: f64,
    forque: &dyn ForqueFn,
    config: &AdaptiveConfig,
    t0: f64,
) -> sim_types::Result<IntegrationOutput> {
    let (b, m, stats) = solve_adaptive(&twist.coeffs, &pose.coeffs, inertia, dt, forque, config, t0)?;

    let pose = Pose::from_coeffs(m);
    let pose_norm = pose.norm();
    let pose = if config.normalization.normalizes_output() {
        pose.normalized()
    } else {
        pose
    };

    Ok(IntegrationOutput {
        twist: Twist::from_coeffs(b),
        pose,
        pose_norm,
        stats,
    })
}

/// Advance with adaptive error control, on raw coefficient vectors.
///
/// Same semantics as [`rbm_physics_step`]; twist coefficients are in
/// `[e01, e02, e03, e12, e31, e23]` order and pose coefficients in
/// `[1, e01, e02, e03, e12, e31, e23, e0123]` order.
///
/// # Errors
///
/// See [`rbm_physics_step`].
#[allow(clippy::too_many_arguments)]
pub fn rbm_physics_step_coeffs(
    twist: &Vector6<f64>,
    pose: &Vector8,
    inertia: &Inertia,
    dt: f64,
    forque: &dyn ForqueFn,
    config: &AdaptiveConfig,
    t0: f64,
) -> sim_types::Result<(Vector6<f64>, Vector8)> {
    let (b, m, _) = solve_adaptive(twist, pose, inertia, dt, forque, config, t0)?;
    let m = if config.normalization.normalizes_output() {
        Pose::from_coeffs(m).normalized().coeffs
    } else {
        m
    };
    Ok((b, m))
}

/// Parameters shared by the two rate functions.
type LawParams<'a> = (Inertia, &'a dyn ForqueFn);

#[allow(clippy::too_many_arguments)]
fn solve_adaptive(
    twist: &Vector6<f64>,
    pose: &Vector8,
    inertia: &Inertia,
    dt: f64,
    forque: &dyn ForqueFn,
    config: &AdaptiveConfig,
    t0: f64,
) -> sim_types::Result<(Vector6<f64>, Vector8, SolverStats)> {
    check_interval(dt)?;

    let pose0 = Pose::from_coeffs(*pose).normalized();

    let problem = DynamicalProblem::new(
        twist_rate,
        pose_rate,
        *twist,
        pose0.coeffs,
        (t0, t0 + dt),
        (*inertia, forque),
    );

    let solution = solve(&problem, &config.solver_options())?;
    let (b, m) = solution.final_state();

    trace!(
        dt,
        accepted = solution.stats.accepted_steps,
        rejected = solution.stats.rejected_steps,
        "adaptive step"
    );

    Ok((b, m, solution.stats))
}

fn twist_rate(v: &Vector6<f64>, u: &Vector8, p: &LawParams<'_>, t: f64) -> Vector6<f64> {
    let f = p.1.forque(v, u, t);
    twist_derivative(&Twist::from_coeffs(*v), &p.0, &f).coeffs
}

fn pose_rate(v: &Vector6<f64>, u: &Vector8, _p: &LawParams<'_>, _t: f64) -> Vector8 {
    pose_derivative(&Twist::from_coeffs(*v), &Pose::from_coeffs(*u)).coeffs
}

fn check_interval(dt: f64) -> sim_types::Result<()> {
    if !dt.is_finite() || dt < 0.0 {
        return Err(SimError::InvalidTimestep(dt));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::inertia::kinetic_energy;
    use approx::assert_relative_eq;
    use sim_types::{ConstantForque, Forque, PoseNormalization, ZeroForque};

    fn reference_inertia() -> Inertia {
        Inertia::new([2.0, 1.0, 3.0, 1.0, 1.0, 1.0]).unwrap()
    }

    fn reference_pose() -> Pose {
        Pose::new(1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 3.0, -2.0).normalized()
    }

    fn reference_twist() -> Twist {
        Twist::new(0.0, 0.0, 0.0, 0.1, 0.001, 0.0)
    }

    #[test]
    fn test_euler_rejects_zero_steps() {
        let err = euler_step(
            &reference_twist(),
            &reference_pose(),
            &reference_inertia(),
            &ZeroForque,
            0,
            1.0,
            0.0,
        )
        .unwrap_err();
        assert_eq!(err, SimError::InvalidStepCount(0));
    }

    #[test]
    fn test_euler_rejects_bad_interval() {
        for dt in [-1.0, f64::NAN, f64::INFINITY] {
            let err = euler_step(
                &reference_twist(),
                &reference_pose(),
                &reference_inertia(),
                &ZeroForque,
                1,
                dt,
                0.0,
            )
            .unwrap_err();
            assert!(matches!(err, SimError::InvalidTimestep(_)));
        }
    }

    #[test]
    fn test_single_euler_step_matches_hand_computation() {
        let (b0, m0, inertia) = (reference_twist(), reference_pose(), reference_inertia());
        let dt = 0.01;

        let b1 = b0 + twist_derivative(&b0, &inertia, &Forque::zero()) * dt;
        let m1 = m0 + pose_derivative(&b1, &m0) * dt;

        let out = euler_step(&b0, &m0, &inertia, &ZeroForque, 1, dt, 0.0).unwrap();
        assert_relative_eq!(out.twist, b1, epsilon = 1e-15);
        assert_relative_eq!(out.pose, m1.normalized(), epsilon = 1e-15);
        assert_relative_eq!(out.pose_norm, m1.norm(), epsilon = 1e-15);
        assert_eq!(out.stats.rhs_evaluations, 1);
    }

    #[test]
    fn test_single_euler_step_numeric_rotation() {
        // B = 0.8 e12 from the identity: M = 1 - ½·0.5·0.8 e12 = 1 - 0.2 e12.
        let twist = Twist::new(0.0, 0.0, 0.0, 0.8, 0.0, 0.0);
        let out = euler_step(
            &twist,
            &Pose::identity(),
            &Inertia::isotropic(1.0).unwrap(),
            &ZeroForque,
            1,
            0.5,
            0.0,
        )
        .unwrap();

        let n = 1.04f64.sqrt();
        let expected = Pose::new(1.0 / n, 0.0, 0.0, 0.0, -0.2 / n, 0.0, 0.0, 0.0);
        assert_relative_eq!(out.pose, expected, epsilon = 1e-15);
        assert_relative_eq!(out.pose_norm, n, epsilon = 1e-15);
        assert_eq!(out.twist, twist);
    }

    #[test]
    fn test_euler_long_run_returns_unit_pose() {
        let out = euler_step(
            &reference_twist(),
            &reference_pose(),
            &reference_inertia(),
            &ZeroForque,
            1000,
            100.0,
            0.0,
        )
        .unwrap();
        assert!(out.pose.is_finite());
        assert_relative_eq!(out.pose.norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_euler_passes_time_to_forque() {
        // F = t along the first linear axis (momentum e23 slot), unit mass.
        let forque = |_b: &Vector6<f64>, _m: &Vector8, t: f64| Forque::new(0.0, 0.0, 0.0, 0.0, 0.0, t);
        let out = euler_step(
            &Twist::zero(),
            &Pose::identity(),
            &Inertia::isotropic(1.0).unwrap(),
            &forque,
            4,
            1.0,
            1.0,
        )
        .unwrap();
        // Left Riemann sum of t over [1, 2] with h = 0.25.
        assert_relative_eq!(out.twist.e01(), 0.25 * (1.0 + 1.25 + 1.5 + 1.75), epsilon = 1e-14);
    }

    #[test]
    fn test_adaptive_rejects_bad_interval() {
        let err = rbm_physics_step(
            &reference_twist(),
            &reference_pose(),
            &reference_inertia(),
            -0.5,
            &ZeroForque,
            &AdaptiveConfig::default(),
            0.0,
        )
        .unwrap_err();
        assert_eq!(err, SimError::InvalidTimestep(-0.5));
    }

    #[test]
    fn test_adaptive_zero_interval_normalizes_input_only() {
        let raw = Pose::new(1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 3.0, -2.0);
        let out = rbm_physics_step(
            &reference_twist(),
            &raw,
            &reference_inertia(),
            0.0,
            &ZeroForque,
            &AdaptiveConfig::default(),
            0.0,
        )
        .unwrap();
        assert_relative_eq!(out.pose, raw.normalized(), epsilon = 1e-15);
        assert_eq!(out.twist, reference_twist());
    }

    #[test]
    fn test_output_normalization_policy() {
        let config = AdaptiveConfig::fast().normalization(PoseNormalization::InputAndOutput);
        let out = rbm_physics_step(
            &reference_twist(),
            &reference_pose(),
            &reference_inertia(),
            5.0,
            &ZeroForque,
            &config,
            0.0,
        )
        .unwrap();
        assert_relative_eq!(out.pose.norm(), 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_coeff_entry_point_matches_value_entry_point() {
        let config = AdaptiveConfig::default();
        let (b0, m0, inertia) = (reference_twist(), reference_pose(), reference_inertia());
        let push = ConstantForque(Forque::new(0.0, 0.1, 0.0, 0.0, 0.2, 0.0));

        let values = rbm_physics_step(&b0, &m0, &inertia, 2.0, &push, &config, 0.0).unwrap();
        let (b, m) =
            rbm_physics_step_coeffs(&b0.coeffs, &m0.coeffs, &inertia, 2.0, &push, &config, 0.0)
                .unwrap();

        assert_eq!(values.twist.coeffs, b);
        assert_eq!(values.pose.coeffs, m);
    }

    #[test]
    fn test_adaptive_iteration_limit_surfaces_as_solver_failure() {
        let config = AdaptiveConfig::default().max_iters(1);
        let err = rbm_physics_step(
            &reference_twist(),
            &reference_pose(),
            &reference_inertia(),
            1000.0,
            &ZeroForque,
            &config,
            0.0,
        )
        .unwrap_err();
        assert!(err.is_solver_failure());
    }

    #[test]
    fn test_adaptive_conserves_energy_without_forque() {
        let inertia = reference_inertia();
        let twist = Twist::new(0.2, -0.1, 0.3, 0.5, -0.4, 0.9);
        let config = AdaptiveConfig::high_accuracy();

        let out =
            rbm_physics_step(&twist, &reference_pose(), &inertia, 3.0, &ZeroForque, &config, 0.0)
                .unwrap();

        assert_relative_eq!(
            kinetic_energy(&out.twist, &inertia),
            kinetic_energy(&twist, &inertia),
            max_relative = 1e-8
        );
    }

    #[test]
    fn test_dispatch_advances_time() {
        let mut state =
            RigidBodyState::new(reference_twist(), reference_pose(), reference_inertia());
        for method in [IntegrationMethod::euler(10), IntegrationMethod::adaptive()] {
            let before = state.time;
            integrate_with_method(&method, &mut state, 0.5).unwrap();
            assert_relative_eq!(state.time, before + 0.5, epsilon = 1e-15);
        }
        assert!(state.is_finite());
    }

    #[test]
    fn test_advance_leaves_state_untouched() {
        let state = RigidBodyState::new(reference_twist(), reference_pose(), reference_inertia());
        let out = FixedStepEuler { step_count: 5 }.advance(&state, 1.0).unwrap();
        assert_eq!(state.twist, reference_twist());
        assert_ne!(out.pose, state.pose);
    }
}
