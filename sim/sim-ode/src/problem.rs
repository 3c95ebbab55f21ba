//! Partitioned ("dynamical") ODE problems.

use nalgebra::SVector;

/// Rate function for one partition of a dynamical problem.
///
/// Arguments are `(v, u, params, t)`; the return value is the time
/// derivative of that partition.
pub type RateFn<'a, P, const NV: usize, const NU: usize, const N: usize> =
    Box<dyn Fn(&SVector<f64, NV>, &SVector<f64, NU>, &P, f64) -> SVector<f64, N> + 'a>;

/// A coupled two-partition ODE system
///
/// ```text
/// dv/dt = velocity_rate(v, u, p, t)
/// du/dt = position_rate(v, u, p, t)
/// ```
///
/// integrated over `tspan` from `(v0, u0)`.
///
/// # Example
///
/// ```
/// use nalgebra::SVector;
/// use sim_ode::DynamicalProblem;
///
/// // Harmonic oscillator: v' = -k u, u' = v
/// let problem = DynamicalProblem::new(
///     |_v: &SVector<f64, 1>, u: &SVector<f64, 1>, k: &f64, _t| -u * *k,
///     |v: &SVector<f64, 1>, _u: &SVector<f64, 1>, _k: &f64, _t| *v,
///     SVector::<f64, 1>::new(0.0),
///     SVector::<f64, 1>::new(1.0),
///     (0.0, 1.0),
///     1.0,
/// );
/// assert_eq!(problem.tspan, (0.0, 1.0));
/// ```
pub struct DynamicalProblem<'a, P, const NV: usize, const NU: usize> {
    /// Derivative of the first partition.
    pub velocity_rate: RateFn<'a, P, NV, NU, NV>,
    /// Derivative of the second partition.
    pub position_rate: RateFn<'a, P, NV, NU, NU>,
    /// Initial value of the first partition.
    pub v0: SVector<f64, NV>,
    /// Initial value of the second partition.
    pub u0: SVector<f64, NU>,
    /// Integration interval `(t0, t1)`.
    pub tspan: (f64, f64),
    /// Parameters shared by both rate functions.
    pub params: P,
}

impl<'a, P, const NV: usize, const NU: usize> DynamicalProblem<'a, P, NV, NU> {
    /// Create a problem from two rate closures.
    pub fn new<F, G>(
        velocity_rate: F,
        position_rate: G,
        v0: SVector<f64, NV>,
        u0: SVector<f64, NU>,
        tspan: (f64, f64),
        params: P,
    ) -> Self
    where
        F: Fn(&SVector<f64, NV>, &SVector<f64, NU>, &P, f64) -> SVector<f64, NV> + 'a,
        G: Fn(&SVector<f64, NV>, &SVector<f64, NU>, &P, f64) -> SVector<f64, NU> + 'a,
    {
        Self {
            velocity_rate: Box::new(velocity_rate),
            position_rate: Box::new(position_rate),
            v0,
            u0,
            tspan,
            params,
        }
    }

    /// Evaluate both rates at a state.
    #[must_use]
    pub fn rates(
        &self,
        v: &SVector<f64, NV>,
        u: &SVector<f64, NU>,
        t: f64,
    ) -> (SVector<f64, NV>, SVector<f64, NU>) {
        (
            (self.velocity_rate)(v, u, &self.params, t),
            (self.position_rate)(v, u, &self.params, t),
        )
    }
}

impl<P: std::fmt::Debug, const NV: usize, const NU: usize> std::fmt::Debug
    for DynamicalProblem<'_, P, NV, NU>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicalProblem")
            .field("v0", &self.v0)
            .field("u0", &self.u0)
            .field("tspan", &self.tspan)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
