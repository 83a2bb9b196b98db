// src/symmetric.rs

use std::ops::Deref;

use ndarray::Array2;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::eigen::EigenSystem;
use crate::error::{LinalgError, Result};
use crate::jacobi::{JacobiSolver, SymmetricEigenSolver};
use crate::matrix::Matrix;
use crate::square::SquareMatrix;

/// Absolute tolerance used when a decoded matrix is checked for symmetry.
const DECODE_SYMMETRY_TOLERANCE: f64 = 1e-9;

/// A [`SquareMatrix`] with `m[i][j] == m[j][i]`.
///
/// This is the only matrix type with an eigen-decomposition. Symmetry is a
/// precondition of [`SymmetricMatrix::assume_symmetric`] and is not checked
/// there; use [`SymmetricMatrix::new`] to check it, or [`SymmetricMatrix::gram`]
/// and [`SymmetricMatrix::scatter`], which are symmetric by construction.
#[derive(Clone, Debug, PartialEq)]
pub struct SymmetricMatrix {
    inner: SquareMatrix,
}

impl SymmetricMatrix {
    /// Wraps `square` without checking symmetry. Eigen results for an
    /// asymmetric input are meaningless.
    pub fn assume_symmetric(square: SquareMatrix) -> Self {
        Self { inner: square }
    }

    /// Checks `|m[i][j] - m[j][i]| <= tolerance` for every pair.
    ///
    /// # Errors
    /// `NotSymmetric` with the first offending position (`row < col`).
    pub fn new(square: SquareMatrix, tolerance: f64) -> Result<Self> {
        let n = square.dimension();
        for row in 0..n {
            for col in (row + 1)..n {
                let diff = (square[(row, col)] - square[(col, row)]).abs();
                if !(diff <= tolerance) {
                    return Err(LinalgError::NotSymmetric { row, col });
                }
            }
        }
        Ok(Self { inner: square })
    }

    /// Gram matrix `AᵗA` (`ncols x ncols`).
    pub fn gram(a: &Matrix) -> Self {
        let view = a.view();
        Self::symmetrized(view.t().dot(&view))
    }

    /// Scatter matrix `AAᵗ` (`nrows x nrows`).
    pub fn scatter(a: &Matrix) -> Self {
        let view = a.view();
        Self::symmetrized(view.dot(&view.t()))
    }

    fn symmetrized(product: Array2<f64>) -> Self {
        let balanced = (&product + &product.t()) * 0.5;
        Self {
            inner: SquareMatrix::assume_square(Matrix::from(balanced)),
        }
    }

    /// Eigen system from a [`JacobiSolver`] with tolerance `epsilon`.
    ///
    /// Pairs come out in diagonal order, unsorted.
    ///
    /// # Errors
    /// `ConvergenceFailure` when the rotation budget runs out.
    pub fn eigen_system(&self, epsilon: f64) -> Result<EigenSystem> {
        self.eigen_system_with(&JacobiSolver::new(epsilon))
    }

    /// Eigen system from `solver`.
    ///
    /// # Errors
    /// `ConvergenceFailure` when the solver did not converge.
    pub fn eigen_system_with<S: SymmetricEigenSolver + ?Sized>(
        &self,
        solver: &S,
    ) -> Result<EigenSystem> {
        solver.decompose(self).into_result()
    }

    pub fn as_square(&self) -> &SquareMatrix {
        &self.inner
    }

    pub fn into_square(self) -> SquareMatrix {
        self.inner
    }
}

impl Deref for SymmetricMatrix {
    type Target = SquareMatrix;

    fn deref(&self) -> &SquareMatrix {
        &self.inner
    }
}

impl Serialize for SymmetricMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.inner.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SymmetricMatrix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let square = SquareMatrix::deserialize(deserializer)?;
        SymmetricMatrix::new(square, DECODE_SYMMETRY_TOLERANCE).map_err(D::Error::custom)
    }
}
