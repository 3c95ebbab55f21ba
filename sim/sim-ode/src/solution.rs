//! Solver output.

use nalgebra::SVector;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Counters collected during a solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolverStats {
    /// Steps that met the error tolerance.
    pub accepted_steps: usize,
    /// Steps that were retried with a smaller step size.
    pub rejected_steps: usize,
    /// Evaluations of the rate pair.
    pub rhs_evaluations: usize,
}

impl SolverStats {
    /// Total step attempts.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.accepted_steps + self.rejected_steps
    }

    /// Add another solve's counters to these.
    pub fn accumulate(&mut self, other: &Self) {
        self.accepted_steps += other.accepted_steps;
        self.rejected_steps += other.rejected_steps;
        self.rhs_evaluations += other.rhs_evaluations;
    }
}

/// Trajectory produced by [`crate::solve`].
///
/// Always holds at least the initial and final states. Intermediate
/// accepted steps are kept when `SolverOptions::save_everystep` is set.
#[derive(Debug, Clone)]
pub struct Solution<const NV: usize, const NU: usize> {
    /// Sample times.
    pub t: Vec<f64>,
    /// First-partition values at each sample time.
    pub v: Vec<SVector<f64, NV>>,
    /// Second-partition values at each sample time.
    pub u: Vec<SVector<f64, NU>>,
    /// Solver counters.
    pub stats: SolverStats,
}

impl<const NV: usize, const NU: usize> Solution<NV, NU> {
    pub(crate) fn new(t0: f64, v0: SVector<f64, NV>, u0: SVector<f64, NU>) -> Self {
        Self {
            t: vec![t0],
            v: vec![v0],
            u: vec![u0],
            stats: SolverStats::default(),
        }
    }

    pub(crate) fn push(&mut self, t: f64, v: SVector<f64, NV>, u: SVector<f64, NU>) {
        self.t.push(t);
        self.v.push(v);
        self.u.push(u);
    }

    /// The two partitions at the last sample time.
    #[must_use]
    pub fn final_state(&self) -> (SVector<f64, NV>, SVector<f64, NU>) {
        let last = self.t.len() - 1;
        (self.v[last], self.u[last])
    }

    /// Last sample time.
    #[must_use]
    pub fn final_time(&self) -> f64 {
        self.t[self.t.len() - 1]
    }

    /// Iterate over `(t, v, u)` samples.
    pub fn trajectory(
        &self,
    ) -> impl Iterator<Item = (f64, &SVector<f64, NV>, &SVector<f64, NU>)> + '_ {
        self.t
            .iter()
            .zip(&self.v)
            .zip(&self.u)
            .map(|((t, v), u)| (*t, v, u))
    }

    /// Number of stored samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.t.len()
    }

    /// Always `false`; a solution holds at least its initial state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }
}
