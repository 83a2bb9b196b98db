// src/diagnostics.rs

//! Numeric quality checks for eigen systems and PCA results.
//!
//! The PCA pipeline logs [`orthogonality_error`] at `debug` level; the rest
//! are for callers and tests that want to judge a result.

use crate::eigen::{EigenPair, EigenSystem};
use crate::error::Result;
use crate::matrix::Matrix;
use crate::pca::PcaData;
use crate::square::SquareMatrix;
use crate::symmetric::SymmetricMatrix;

/// `||QᵗQ - I||_F` for a matrix whose columns should be orthonormal.
///
/// Zero for an empty basis.
pub fn orthogonality_error(q: &Matrix) -> f64 {
    let view = q.view();
    let gram = view.t().dot(&view);
    let identity = SquareMatrix::identity(q.ncols());
    (&gram - &identity.view()).iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// `||S v - λ v||` for one eigenpair.
///
/// # Errors
/// `DimensionMismatch` when the eigenvector length differs from the matrix size.
pub fn eigen_residual(matrix: &SymmetricMatrix, pair: &EigenPair) -> Result<f64> {
    let image = matrix.as_matrix() * pair.eigenvector();
    let residual = (&image? - &(pair.eigenvector() * pair.eigenvalue()))?;
    Ok(residual.norm())
}

/// Largest [`eigen_residual`] over a system, `0.0` when it is empty.
pub fn max_eigen_residual(matrix: &SymmetricMatrix, system: &EigenSystem) -> Result<f64> {
    system
        .iter()
        .map(|pair| eigen_residual(matrix, pair))
        .try_fold(0.0f64, |worst, r| r.map(|r| worst.max(r)))
}

/// Absolute and relative Frobenius error of rebuilding `data` from the
/// coefficients stored in `pca`: `(||data - X̂||_F, ||data - X̂||_F / ||data||_F)`.
///
/// The relative error is the absolute one when `data` is all zeros.
///
/// # Errors
/// `DimensionMismatch` when `data` does not have the shape the PCA ran on.
pub fn reconstruction_error<T>(pca: &PcaData<T>, data: &Matrix) -> Result<(f64, f64)> {
    let rebuilt = pca.reconstruct(pca.coefficients())?;
    let absolute = (data - &rebuilt)?.frobenius_norm();
    let scale = data.frobenius_norm();
    let relative = if scale > 0.0 { absolute / scale } else { absolute };
    Ok((absolute, relative))
}
