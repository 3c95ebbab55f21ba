//! Embedded explicit Runge-Kutta tableaux.
//!
//! Each tableau carries the propagated weights `b` and the weights of the
//! embedded lower-order solution `b_hat`. The local error estimate is
//! `h Σ (b_i - b_hat_i) k_i`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Explicit embedded Runge-Kutta method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Algorithm {
    /// Dormand-Prince 5(4), 7 stages, first-same-as-last.
    #[default]
    DormandPrince54,
    /// Cash-Karp 5(4), 6 stages.
    CashKarp45,
    /// Bogacki-Shampine 3(2), 4 stages, first-same-as-last.
    BogackiShampine32,
}

impl Algorithm {
    /// Butcher tableau for this method.
    #[must_use]
    pub fn tableau(self) -> &'static ButcherTableau {
        match self {
            Self::DormandPrince54 => &DORMAND_PRINCE_54,
            Self::CashKarp45 => &CASH_KARP_45,
            Self::BogackiShampine32 => &BOGACKI_SHAMPINE_32,
        }
    }

    /// Short human-readable name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::DormandPrince54 => "Dormand-Prince 5(4)",
            Self::CashKarp45 => "Cash-Karp 5(4)",
            Self::BogackiShampine32 => "Bogacki-Shampine 3(2)",
        }
    }
}

/// Coefficients of an embedded explicit Runge-Kutta pair.
#[derive(Debug)]
pub struct ButcherTableau {
    /// Strictly lower-triangular stage matrix; row `i` has `i` entries.
    pub a: &'static [&'static [f64]],
    /// Stage times as fractions of the step.
    pub c: &'static [f64],
    /// Weights of the propagated solution.
    pub b: &'static [f64],
    /// Weights of the embedded solution.
    pub b_hat: &'static [f64],
    /// Order of the embedded (lower-order) solution; sets the controller exponents.
    pub error_order: u32,
    /// Last stage equals the first stage of the next step.
    pub fsal: bool,
}

impl ButcherTableau {
    /// Number of stages.
    #[must_use]
    pub fn stages(&self) -> usize {
        self.c.len()
    }
}

/// Dormand-Prince 5(4).
pub static DORMAND_PRINCE_54: ButcherTableau = ButcherTableau {
    a: &[
        &[],
        &[1.0 / 5.0],
        &[3.0 / 40.0, 9.0 / 40.0],
        &[44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0],
        &[
            19372.0 / 6561.0,
            -25360.0 / 2187.0,
            64448.0 / 6561.0,
            -212.0 / 729.0,
        ],
        &[
            9017.0 / 3168.0,
            -355.0 / 33.0,
            46732.0 / 5247.0,
            49.0 / 176.0,
            -5103.0 / 18656.0,
        ],
        &[
            35.0 / 384.0,
            0.0,
            500.0 / 1113.0,
            125.0 / 192.0,
            -2187.0 / 6784.0,
            11.0 / 84.0,
        ],
    ],
    c: &[0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0],
    b: &[
        35.0 / 384.0,
        0.0,
        500.0 / 1113.0,
        125.0 / 192.0,
        -2187.0 / 6784.0,
        11.0 / 84.0,
        0.0,
    ],
    b_hat: &[
        5179.0 / 57600.0,
        0.0,
        7571.0 / 16695.0,
        393.0 / 640.0,
        -92097.0 / 339_200.0,
        187.0 / 2100.0,
        1.0 / 40.0,
    ],
    error_order: 4,
    fsal: true,
};

/// Cash-Karp 5(4).
pub static CASH_KARP_45: ButcherTableau = ButcherTableau {
    a: &[
        &[],
        &[1.0 / 5.0],
        &[3.0 / 40.0, 9.0 / 40.0],
        &[3.0 / 10.0, -9.0 / 10.0, 6.0 / 5.0],
        &[-11.0 / 54.0, 5.0 / 2.0, -70.0 / 27.0, 35.0 / 27.0],
        &[
            1631.0 / 55296.0,
            175.0 / 512.0,
            575.0 / 13824.0,
            44275.0 / 110_592.0,
            253.0 / 4096.0,
        ],
    ],
    c: &[0.0, 1.0 / 5.0, 3.0 / 10.0, 3.0 / 5.0, 1.0, 7.0 / 8.0],
    b: &[
        37.0 / 378.0,
        0.0,
        250.0 / 621.0,
        125.0 / 594.0,
        0.0,
        512.0 / 1771.0,
    ],
    b_hat: &[
        2825.0 / 27648.0,
        0.0,
        18575.0 / 48384.0,
        13525.0 / 55296.0,
        277.0 / 14336.0,
        1.0 / 4.0,
    ],
    error_order: 4,
    fsal: false,
};

/// Bogacki-Shampine 3(2).
pub static BOGACKI_SHAMPINE_32: ButcherTableau = ButcherTableau {
    a: &[
        &[],
        &[1.0 / 2.0],
        &[0.0, 3.0 / 4.0],
        &[2.0 / 9.0, 1.0 / 3.0, 4.0 / 9.0],
    ],
    c: &[0.0, 1.0 / 2.0, 3.0 / 4.0, 1.0],
    b: &[2.0 / 9.0, 1.0 / 3.0, 4.0 / 9.0, 0.0],
    b_hat: &[7.0 / 24.0, 1.0 / 4.0, 1.0 / 3.0, 1.0 / 8.0],
    error_order: 2,
    fsal: true,
};

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ALL: [Algorithm; 3] = [
        Algorithm::DormandPrince54,
        Algorithm::CashKarp45,
        Algorithm::BogackiShampine32,
    ];

    #[test]
    fn test_tableau_shapes() {
        for alg in ALL {
            let t = alg.tableau();
            let s = t.stages();
            assert_eq!(t.a.len(), s, "{}", alg.name());
            assert_eq!(t.b.len(), s);
            assert_eq!(t.b_hat.len(), s);
            for (i, row) in t.a.iter().enumerate() {
                assert_eq!(row.len(), i);
            }
        }
    }

    #[test]
    fn test_consistency_conditions() {
        for alg in ALL {
            let t = alg.tableau();
            assert_relative_eq!(t.b.iter().sum::<f64>(), 1.0, epsilon = 1e-14);
            assert_relative_eq!(t.b_hat.iter().sum::<f64>(), 1.0, epsilon = 1e-14);
            for (row, c) in t.a.iter().zip(t.c) {
                assert_relative_eq!(row.iter().sum::<f64>(), *c, epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn test_fsal_last_row_matches_weights() {
        for alg in ALL {
            let t = alg.tableau();
            if !t.fsal {
                continue;
            }
            let last = t.a[t.stages() - 1];
            for (a, b) in last.iter().zip(t.b) {
                assert_eq!(a, b);
            }
            assert_eq!(t.c[t.stages() - 1], 1.0);
        }
    }
}
