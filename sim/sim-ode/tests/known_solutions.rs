//! Solves with closed-form reference solutions.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use approx::assert_relative_eq;
use nalgebra::SVector;
use proptest::prelude::*;
use sim_ode::{Algorithm, DynamicalProblem, OdeError, SolverOptions, solve};

type V2 = SVector<f64, 2>;

const ALGORITHMS: [Algorithm; 3] = [
    Algorithm::DormandPrince54,
    Algorithm::CashKarp45,
    Algorithm::BogackiShampine32,
];

/// Planar isotropic oscillator `x'' = -ω² x`, split into velocity and position.
fn oscillator(omega: f64, t1: f64) -> DynamicalProblem<'static, f64, 2, 2> {
    DynamicalProblem::new(
        |_v: &V2, x: &V2, w: &f64, _t| -x * (w * w),
        |v: &V2, _x: &V2, _w: &f64, _t| *v,
        V2::new(0.0, omega),
        V2::new(1.0, 0.0),
        (0.0, t1),
        omega,
    )
}

#[test]
fn oscillator_matches_closed_form_for_every_algorithm() {
    let omega = 1.3;
    let t1 = 4.0;
    let problem = oscillator(omega, t1);

    for alg in ALGORITHMS {
        let opts = SolverOptions::default()
            .with_algorithm(alg)
            .with_tolerances(1e-10, 1e-10);
        let sol = solve(&problem, &opts).unwrap();
        let (v, x) = sol.final_state();

        let (s, c) = (omega * t1).sin_cos();
        assert_relative_eq!(x[0], c, epsilon = 1e-6);
        assert_relative_eq!(x[1], s, epsilon = 1e-6);
        assert_relative_eq!(v[0], -omega * s, epsilon = 1e-6);
        assert_relative_eq!(v[1], omega * c, epsilon = 1e-6);
    }
}

#[test]
fn time_dependent_rates_see_stage_times() {
    // v' = t, u' = v  =>  v = t²/2, u = t³/6
    let problem = DynamicalProblem::new(
        |_v: &SVector<f64, 1>, _u: &SVector<f64, 1>, _p: &(), t| SVector::<f64, 1>::new(t),
        |v: &SVector<f64, 1>, _u: &SVector<f64, 1>, _p: &(), _t| *v,
        SVector::<f64, 1>::zeros(),
        SVector::<f64, 1>::zeros(),
        (1.0, 3.0),
        (),
    );
    let sol = solve(&problem, &SolverOptions::default()).unwrap();
    let (v, u) = sol.final_state();
    assert_relative_eq!(v[0], (9.0 - 1.0) / 2.0, epsilon = 1e-9);
    assert_relative_eq!(u[0], (27.0 - 1.0) / 6.0 - 0.5 * 2.0, epsilon = 1e-9);
}

#[test]
fn higher_order_pair_needs_fewer_steps() {
    let problem = oscillator(2.0, 10.0);
    let opts = SolverOptions::default().with_tolerances(1e-9, 1e-9);

    let dp = solve(&problem, &opts.clone().with_algorithm(Algorithm::DormandPrince54)).unwrap();
    let bs = solve(&problem, &opts.with_algorithm(Algorithm::BogackiShampine32)).unwrap();

    assert!(dp.stats.accepted_steps < bs.stats.accepted_steps);
}

#[test]
fn blow_up_is_reported_as_underflow() {
    // u' = u² with u(0) = 1 blows up at t = 1.
    let problem = DynamicalProblem::new(
        |_v: &SVector<f64, 1>, _u: &SVector<f64, 1>, _p: &(), _t| SVector::<f64, 1>::zeros(),
        |_v: &SVector<f64, 1>, u: &SVector<f64, 1>, _p: &(), _t| u.component_mul(u),
        SVector::<f64, 1>::zeros(),
        SVector::<f64, 1>::new(1.0),
        (0.0, 2.0),
        (),
    );
    let opts = SolverOptions::default().with_step_bounds(1e-10, f64::INFINITY);
    let err = solve(&problem, &opts).unwrap_err();
    assert!(err.is_convergence_failure(), "unexpected error: {err}");
    match err {
        OdeError::StepSizeUnderflow { t, .. } | OdeError::MaxIterations { t, .. } => {
            assert!(t < 1.0 + 1e-6);
        }
        other => panic!("unexpected error: {other}"),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn splitting_the_span_matches_one_solve(
        omega in 0.2..3.0_f64,
        t1 in 0.5..5.0_f64,
        split in 0.2..0.8_f64,
    ) {
        let opts = SolverOptions::high_accuracy();
        let whole = solve(&oscillator(omega, t1), &opts).unwrap();

        let mut first = oscillator(omega, t1);
        first.tspan = (0.0, split * t1);
        let (v_mid, x_mid) = solve(&first, &opts).unwrap().final_state();

        let mut second = oscillator(omega, t1);
        second.tspan = (split * t1, t1);
        second.v0 = v_mid;
        second.u0 = x_mid;
        let (v_end, x_end) = solve(&second, &opts).unwrap().final_state();

        let (v_whole, x_whole) = whole.final_state();
        prop_assert!((x_end - x_whole).norm() < 1e-7);
        prop_assert!((v_end - v_whole).norm() < 1e-7);
    }
}
