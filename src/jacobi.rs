// src/jacobi.rs

//! Jacobi rotation eigensolver for real symmetric matrices.
//!
//! Each step finds the off-diagonal entry `a[p][q]` of largest magnitude and
//! applies the plane rotation that zeroes it, folding the same rotation into an
//! accumulated eigenvector matrix. Iteration stops once the Frobenius norm of
//! the off-diagonal part falls to `epsilon` times the Frobenius norm of the
//! input, or when the rotation budget is spent. The caller always learns which
//! of the two happened through [`ConvergenceStatus`].

use log::{debug, trace, warn};
use ndarray::Array2;

use crate::eigen::{EigenPair, EigenSystem};
use crate::error::{LinalgError, Result};
use crate::symmetric::SymmetricMatrix;
use crate::vector::ColumnVector;

/// Number of rotations between progress lines at `trace` level.
const TRACE_INTERVAL: usize = 1_000;

/// Seam for symmetric eigensolvers.
///
/// [`crate::Pca`] is generic over this trait so a different solver can be
/// plugged in without touching the pipeline.
pub trait SymmetricEigenSolver {
    /// Decomposes `matrix`. Never fails outright; a result that did not reach
    /// the solver's tolerance is marked [`ConvergenceStatus::Exhausted`].
    fn decompose(&self, matrix: &SymmetricMatrix) -> EigenOutcome;
}

/// How a decomposition ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConvergenceStatus {
    /// The off-diagonal norm reached the tolerance.
    Converged { rotations: usize },
    /// The rotation budget ran out first. The system is a best-effort result.
    Exhausted {
        rotations: usize,
        off_diagonal_norm: f64,
    },
}

impl ConvergenceStatus {
    pub fn rotations(&self) -> usize {
        match *self {
            ConvergenceStatus::Converged { rotations }
            | ConvergenceStatus::Exhausted { rotations, .. } => rotations,
        }
    }
}

/// Eigen system plus the status it was produced with.
#[derive(Debug, Clone)]
pub struct EigenOutcome {
    pub system: EigenSystem,
    pub status: ConvergenceStatus,
}

impl EigenOutcome {
    pub fn is_converged(&self) -> bool {
        matches!(self.status, ConvergenceStatus::Converged { .. })
    }

    /// The system if it converged.
    ///
    /// # Errors
    /// `ConvergenceFailure` carrying the rotation count and the off-diagonal
    /// norm that remained.
    pub fn into_result(self) -> Result<EigenSystem> {
        match self.status {
            ConvergenceStatus::Converged { .. } => Ok(self.system),
            ConvergenceStatus::Exhausted {
                rotations,
                off_diagonal_norm,
            } => Err(LinalgError::ConvergenceFailure {
                rotations,
                off_diagonal_norm,
            }),
        }
    }
}

/// Classic (largest-pivot) Jacobi eigensolver.
///
/// `epsilon` is relative to the Frobenius norm of the input. The budget is
/// `max_sweeps * n(n-1)/2` rotations, at least one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JacobiSolver {
    pub epsilon: f64,
    pub max_sweeps: usize,
}

impl Default for JacobiSolver {
    fn default() -> Self {
        Self {
            epsilon: 1e-5,
            max_sweeps: 50,
        }
    }
}

impl JacobiSolver {
    /// Solver with the given tolerance and the default sweep count.
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon,
            ..Self::default()
        }
    }

    /// Maximum number of rotations for an `n x n` input.
    pub fn rotation_budget(&self, n: usize) -> usize {
        let pairs = n * n.saturating_sub(1) / 2;
        self.max_sweeps.saturating_mul(pairs).max(1)
    }
}

impl SymmetricEigenSolver for JacobiSolver {
    fn decompose(&self, matrix: &SymmetricMatrix) -> EigenOutcome {
        let n = matrix.dimension();
        let mut a = matrix.to_array();
        let mut v = Array2::<f64>::eye(n);

        let threshold = self.epsilon.max(0.0) * matrix.frobenius_norm();
        let budget = self.rotation_budget(n);
        let mut rotations = 0usize;

        let status = loop {
            let (off_diagonal_norm, p, q) = largest_off_diagonal(&a);
            if off_diagonal_norm <= threshold {
                break ConvergenceStatus::Converged { rotations };
            }
            if rotations >= budget || !off_diagonal_norm.is_finite() {
                warn!(
                    "Jacobi stopped after {} rotations on a {}x{} matrix: off-diagonal norm {:e} > {:e}",
                    rotations, n, n, off_diagonal_norm, threshold
                );
                break ConvergenceStatus::Exhausted {
                    rotations,
                    off_diagonal_norm,
                };
            }
            rotate(&mut a, &mut v, p, q);
            rotations += 1;
            if rotations % TRACE_INTERVAL == 0 {
                trace!(
                    "Jacobi: {} rotations, off-diagonal norm {:e}",
                    rotations,
                    off_diagonal_norm
                );
            }
        };

        debug!(
            "Jacobi on {}x{} finished: {:?} (budget {})",
            n, n, status, budget
        );

        let pairs = (0..n)
            .map(|i| EigenPair::new(a[[i, i]], ColumnVector::from(v.column(i).to_owned())))
            .collect();
        EigenOutcome {
            system: EigenSystem::from_pairs_unchecked(pairs),
            status,
        }
    }
}

/// Frobenius norm of the off-diagonal part plus the position `(p, q)`, `p < q`,
/// of the largest off-diagonal magnitude. Only the upper triangle is read.
fn largest_off_diagonal(a: &Array2<f64>) -> (f64, usize, usize) {
    let n = a.nrows();
    let mut sum_sq = 0.0;
    let mut best = (0.0, 0, 0);
    for i in 0..n {
        for j in (i + 1)..n {
            let value = a[[i, j]].abs();
            sum_sq += 2.0 * value * value;
            if value > best.0 {
                best = (value, i, j);
            }
        }
    }
    (sum_sq.sqrt(), best.1, best.2)
}

/// Applies the rotation in plane `(p, q)` that zeroes `a[p][q]`, keeping `a`
/// symmetric, and folds it into the columns of `v`.
fn rotate(a: &mut Array2<f64>, v: &mut Array2<f64>, p: usize, q: usize) {
    let apq = a[[p, q]];
    let theta = (a[[q, q]] - a[[p, p]]) / (2.0 * apq);
    // smaller root of t^2 + 2 theta t - 1 = 0
    let t = if theta.abs() > 1e150 {
        0.5 / theta
    } else {
        let sign = if theta < 0.0 { -1.0 } else { 1.0 };
        sign / (theta.abs() + (theta * theta + 1.0).sqrt())
    };
    let c = 1.0 / (t * t + 1.0).sqrt();
    let s = t * c;

    a[[p, p]] -= t * apq;
    a[[q, q]] += t * apq;
    a[[p, q]] = 0.0;
    a[[q, p]] = 0.0;

    let n = a.nrows();
    for r in (0..n).filter(|&r| r != p && r != q) {
        let arp = a[[r, p]];
        let arq = a[[r, q]];
        let new_rp = c * arp - s * arq;
        let new_rq = s * arp + c * arq;
        a[[r, p]] = new_rp;
        a[[p, r]] = new_rp;
        a[[r, q]] = new_rq;
        a[[q, r]] = new_rq;
    }

    for r in 0..n {
        let vrp = v[[r, p]];
        let vrq = v[[r, q]];
        v[[r, p]] = c * vrp - s * vrq;
        v[[r, q]] = s * vrp + c * vrq;
    }
}
