//! Adaptive embedded Runge-Kutta driver.

use nalgebra::SVector;
use tracing::{debug, trace, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::controller::PiController;
use crate::problem::DynamicalProblem;
use crate::solution::Solution;
use crate::tableau::Algorithm;
use crate::{OdeError, Result};

/// Options controlling an adaptive solve.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolverOptions {
    /// Embedded Runge-Kutta pair.
    pub algorithm: Algorithm,
    /// Absolute error tolerance (must be positive).
    pub abs_tol: f64,
    /// Relative error tolerance.
    pub rel_tol: f64,
    /// Maximum number of step attempts (accepted + rejected).
    pub max_iters: usize,
    /// Smallest step the controller may propose before giving up.
    pub dt_min: f64,
    /// Largest step the controller may propose.
    pub dt_max: f64,
    /// First step size; estimated from the problem when `None`.
    pub dt_initial: Option<f64>,
    /// Store every accepted step instead of only the endpoints.
    pub save_everystep: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            abs_tol: 1e-8,
            rel_tol: 1e-6,
            max_iters: 100_000,
            dt_min: 1e-12,
            dt_max: f64::INFINITY,
            dt_initial: None,
            save_everystep: false,
        }
    }
}

impl SolverOptions {
    /// Tight tolerances for reference solutions.
    #[must_use]
    pub fn high_accuracy() -> Self {
        Self {
            abs_tol: 1e-12,
            rel_tol: 1e-10,
            ..Default::default()
        }
    }

    /// Loose tolerances with a low-order pair.
    #[must_use]
    pub fn fast() -> Self {
        Self {
            algorithm: Algorithm::BogackiShampine32,
            abs_tol: 1e-5,
            rel_tol: 1e-3,
            ..Default::default()
        }
    }

    /// Set the algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set absolute and relative tolerances.
    #[must_use]
    pub fn with_tolerances(mut self, abs_tol: f64, rel_tol: f64) -> Self {
        self.abs_tol = abs_tol;
        self.rel_tol = rel_tol;
        self
    }

    /// Set the iteration limit.
    #[must_use]
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Set the step size bounds.
    #[must_use]
    pub fn with_step_bounds(mut self, dt_min: f64, dt_max: f64) -> Self {
        self.dt_min = dt_min;
        self.dt_max = dt_max;
        self
    }

    /// Set the first step size.
    #[must_use]
    pub fn with_dt_initial(mut self, dt: f64) -> Self {
        self.dt_initial = Some(dt);
        self
    }

    /// Keep every accepted step in the solution.
    #[must_use]
    pub fn with_save_everystep(mut self, save: bool) -> Self {
        self.save_everystep = save;
        self
    }

    /// Check that the options describe a usable solver.
    pub fn validate(&self) -> Result<()> {
        if !(self.abs_tol.is_finite() && self.abs_tol > 0.0) {
            return Err(OdeError::invalid_tolerance(format!(
                "abs_tol must be positive and finite, got {}",
                self.abs_tol
            )));
        }
        if !(self.rel_tol.is_finite() && self.rel_tol >= 0.0) {
            return Err(OdeError::invalid_tolerance(format!(
                "rel_tol must be non-negative and finite, got {}",
                self.rel_tol
            )));
        }
        if self.max_iters == 0 {
            return Err(OdeError::invalid_tolerance("max_iters must be at least 1"));
        }
        if !(self.dt_min >= 0.0 && self.dt_max > self.dt_min) {
            return Err(OdeError::invalid_tolerance(format!(
                "step bounds must satisfy 0 <= dt_min < dt_max, got [{}, {}]",
                self.dt_min, self.dt_max
            )));
        }
        if let Some(dt) = self.dt_initial {
            if !(dt.is_finite() && dt > 0.0) {
                return Err(OdeError::invalid_tolerance(format!(
                    "dt_initial must be positive and finite, got {dt}"
                )));
            }
        }
        Ok(())
    }
}

/// Integrate a dynamical problem over its time span.
///
/// Both partitions are advanced with the same embedded pair; the error
/// estimate is the RMS of the component errors scaled by
/// `abs_tol + rel_tol · max(|y_old|, |y_new|)` over both partitions.
///
/// # Errors
///
/// - [`OdeError::InvalidTolerance`] for bad options
/// - [`OdeError::InvalidTimeSpan`] if `t1 < t0` or either is not finite
/// - [`OdeError::NonFinite`] if the initial state or its rates are not finite
/// - [`OdeError::MaxIterations`] if `max_iters` attempts do not reach `t1`
/// - [`OdeError::StepSizeUnderflow`] if the controller shrinks below `dt_min`
///
/// # Example
///
/// ```
/// use nalgebra::SVector;
/// use sim_ode::{solve, DynamicalProblem, SolverOptions};
///
/// // Free fall: v' = -g, x' = v
/// let problem = DynamicalProblem::new(
///     |_v: &SVector<f64, 1>, _x: &SVector<f64, 1>, g: &f64, _t| SVector::<f64, 1>::new(-*g),
///     |v: &SVector<f64, 1>, _x: &SVector<f64, 1>, _g: &f64, _t| *v,
///     SVector::<f64, 1>::new(0.0),
///     SVector::<f64, 1>::new(10.0),
///     (0.0, 1.0),
///     9.81,
/// );
/// let solution = solve(&problem, &SolverOptions::default()).unwrap();
/// let (v, x) = solution.final_state();
/// assert!((v[0] + 9.81).abs() < 1e-9);
/// assert!((x[0] - (10.0 - 0.5 * 9.81)).abs() < 1e-9);
/// ```
#[allow(clippy::needless_range_loop)] // stage indices address parallel k arrays and tableau rows
pub fn solve<P, const NV: usize, const NU: usize>(
    problem: &DynamicalProblem<'_, P, NV, NU>,
    options: &SolverOptions,
) -> Result<Solution<NV, NU>> {
    options.validate()?;

    let (t0, t1) = problem.tspan;
    if !(t0.is_finite() && t1.is_finite() && t1 >= t0) {
        return Err(OdeError::InvalidTimeSpan { t0, t1 });
    }

    let mut solution = Solution::new(t0, problem.v0, problem.u0);
    if !(all_finite(&problem.v0) && all_finite(&problem.u0)) {
        return Err(OdeError::NonFinite { t: t0 });
    }
    if t1 == t0 {
        return Ok(solution);
    }

    let tableau = options.algorithm.tableau();
    let stages = tableau.stages();

    let mut v = problem.v0;
    let mut u = problem.u0;
    let mut t = t0;

    let (dv0, du0) = problem.rates(&v, &u, t);
    solution.stats.rhs_evaluations += 1;
    if !(all_finite(&dv0) && all_finite(&du0)) {
        return Err(OdeError::NonFinite { t: t0 });
    }

    let mut kv = vec![SVector::<f64, NV>::zeros(); stages];
    let mut ku = vec![SVector::<f64, NU>::zeros(); stages];
    kv[0] = dv0;
    ku[0] = du0;

    let span = t1 - t0;
    let mut h = match options.dt_initial {
        Some(dt) => dt,
        None => initial_step(problem, options, &v, &u, &dv0, &du0, t0, span, &mut solution),
    }
    .min(options.dt_max)
    .min(span);

    debug!(
        algorithm = options.algorithm.name(),
        t0,
        t1,
        h0 = h,
        "adaptive solve started"
    );

    let mut controller = PiController::new(tableau.error_order);
    let mut iters = 0usize;

    while t < t1 {
        if iters >= options.max_iters {
            warn!(max_iters = options.max_iters, t, "adaptive solve hit iteration limit");
            return Err(OdeError::MaxIterations {
                max_iters: options.max_iters,
                t,
            });
        }
        iters += 1;

        let remaining = t1 - t;
        let last = h >= remaining || remaining - h <= 1e-10 * remaining;
        if last {
            h = remaining;
        }

        for i in 1..stages {
            let mut vs = v;
            let mut us = u;
            for (j, &a) in tableau.a[i].iter().enumerate() {
                if a != 0.0 {
                    vs += kv[j] * (h * a);
                    us += ku[j] * (h * a);
                }
            }
            let (dv, du) = problem.rates(&vs, &us, tableau.c[i].mul_add(h, t));
            kv[i] = dv;
            ku[i] = du;
        }
        solution.stats.rhs_evaluations += stages - 1;

        let mut v_new = v;
        let mut u_new = u;
        let mut err_v = SVector::<f64, NV>::zeros();
        let mut err_u = SVector::<f64, NU>::zeros();
        for i in 0..stages {
            let b = tableau.b[i];
            let d = b - tableau.b_hat[i];
            if b != 0.0 {
                v_new += kv[i] * (h * b);
                u_new += ku[i] * (h * b);
            }
            if d != 0.0 {
                err_v += kv[i] * (h * d);
                err_u += ku[i] * (h * d);
            }
        }

        let err = scaled_rms(&err_v, &err_u, (&v, &v_new), (&u, &u_new), options);

        if err <= 1.0 && all_finite(&v_new) && all_finite(&u_new) {
            t = if last { t1 } else { t + h };
            v = v_new;
            u = u_new;
            solution.stats.accepted_steps += 1;

            if tableau.fsal {
                kv[0] = kv[stages - 1];
                ku[0] = ku[stages - 1];
            } else {
                let (dv, du) = problem.rates(&v, &u, t);
                solution.stats.rhs_evaluations += 1;
                if t < t1 && !(all_finite(&dv) && all_finite(&du)) {
                    warn!(t, "non-finite rates at accepted state");
                    return Err(OdeError::NonFinite { t });
                }
                kv[0] = dv;
                ku[0] = du;
            }

            if options.save_everystep || t >= t1 {
                solution.push(t, v, u);
            }

            h = (h * controller.accept(err)).min(options.dt_max);
        } else {
            solution.stats.rejected_steps += 1;
            let shrunk = h * controller.reject(err);
            trace!(t, h, err, "step rejected");

            let floor = options.dt_min.max(16.0 * f64::EPSILON * t.abs());
            if shrunk < floor {
                warn!(t, dt = shrunk, "adaptive solve step size underflow");
                return Err(OdeError::StepSizeUnderflow {
                    dt: shrunk,
                    dt_min: floor,
                    t,
                });
            }
            h = shrunk;
        }
    }

    debug!(
        accepted = solution.stats.accepted_steps,
        rejected = solution.stats.rejected_steps,
        rhs = solution.stats.rhs_evaluations,
        "adaptive solve finished"
    );

    Ok(solution)
}

/// Starting step estimate (Hairer, Nørsett & Wanner, II.4).
#[allow(clippy::too_many_arguments)]
fn initial_step<P, const NV: usize, const NU: usize>(
    problem: &DynamicalProblem<'_, P, NV, NU>,
    options: &SolverOptions,
    v: &SVector<f64, NV>,
    u: &SVector<f64, NU>,
    dv: &SVector<f64, NV>,
    du: &SVector<f64, NU>,
    t0: f64,
    span: f64,
    solution: &mut Solution<NV, NU>,
) -> f64 {
    let order = f64::from(options.algorithm.tableau().error_order + 1);

    let d0 = scaled_rms(v, u, (v, v), (u, u), options);
    let d1 = scaled_rms(dv, du, (v, v), (u, u), options);
    let h0 = if d0 < 1e-5 || d1 < 1e-5 {
        1e-6
    } else {
        0.01 * d0 / d1
    }
    .min(span);

    let v1 = v + dv * h0;
    let u1 = u + du * h0;
    let (dv1, du1) = problem.rates(&v1, &u1, t0 + h0);
    solution.stats.rhs_evaluations += 1;

    let d2 = scaled_rms(&(dv1 - dv), &(du1 - du), (v, v), (u, u), options) / h0;
    if !d2.is_finite() {
        return h0;
    }

    let dmax = d1.max(d2);
    let h1 = if dmax <= 1e-15 {
        (h0 * 1e-3).max(1e-6)
    } else {
        (0.01 / dmax).powf(1.0 / order)
    };

    (100.0 * h0).min(h1)
}

/// RMS of `(e_v, e_u)` scaled per component by the tolerances.
fn scaled_rms<const NV: usize, const NU: usize>(
    e_v: &SVector<f64, NV>,
    e_u: &SVector<f64, NU>,
    v: (&SVector<f64, NV>, &SVector<f64, NV>),
    u: (&SVector<f64, NU>, &SVector<f64, NU>),
    options: &SolverOptions,
) -> f64 {
    let scale = |a: f64, b: f64| options.rel_tol.mul_add(a.abs().max(b.abs()), options.abs_tol);

    let sum: f64 = e_v
        .iter()
        .zip(v.0.iter().zip(v.1.iter()))
        .chain(e_u.iter().zip(u.0.iter().zip(u.1.iter())))
        .map(|(e, (a, b))| (e / scale(*a, *b)).powi(2))
        .sum();

    let n = (NV + NU).max(1) as f64;
    (sum / n).sqrt()
}

fn all_finite<const N: usize>(x: &SVector<f64, N>) -> bool {
    x.iter().all(|c| c.is_finite())
}
