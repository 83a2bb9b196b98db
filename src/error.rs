// src/error.rs

use std::fmt;

/// Errors from vector, matrix, eigen and PCA operations.
///
/// Every fallible operation in the crate returns this type. Nothing is
/// substituted silently: the only deliberate non-error fallback is that
/// normalizing a zero vector yields the zero vector.
///
/// ```
/// use dual_pca::{ColumnVector, LinalgError};
///
/// let a = ColumnVector::from_slice(&[1.0, 2.0]);
/// let b = ColumnVector::from_slice(&[1.0, 2.0, 3.0]);
/// assert!(matches!(
///     a.inner_product(&b),
///     Err(LinalgError::DimensionMismatch { .. })
/// ));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum LinalgError {
    /// Operands have incompatible lengths or shapes.
    ///
    /// Shapes are `(rows, cols)`; a vector of length `n` is reported as `(n, 1)`.
    DimensionMismatch {
        operation: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },
    /// A single index falls outside `[0, len)` (or `[0, len]` for insertion).
    IndexOutOfBounds { index: usize, len: usize },
    /// An inclusive or half-open range is reversed or exceeds the valid bound.
    InvalidRange { start: usize, end: usize, len: usize },
    /// A zero or non-finite pivot was met during elimination.
    Singular { pivot: usize },
    /// A square matrix was required.
    NotSquare { rows: usize, cols: usize },
    /// `M[row, col]` and `M[col, row]` differ by more than the requested tolerance.
    NotSymmetric { row: usize, col: usize },
    /// The eigensolver spent its rotation budget before reaching the tolerance.
    ConvergenceFailure {
        rotations: usize,
        off_diagonal_norm: f64,
    },
    /// The operation needs at least one row or column.
    EmptyMatrix { operation: &'static str },
    /// Byte encoding or decoding failed.
    Encoding(String),
}

impl fmt::Display for LinalgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinalgError::DimensionMismatch {
                operation,
                left,
                right,
            } => write!(
                f,
                "dimension mismatch in {}: {}x{} vs {}x{}",
                operation, left.0, left.1, right.0, right.1
            ),
            LinalgError::IndexOutOfBounds { index, len } => {
                write!(f, "index {} out of bounds for length {}", index, len)
            }
            LinalgError::InvalidRange { start, end, len } => write!(
                f,
                "invalid range {}..{} for length {}",
                start, end, len
            ),
            LinalgError::Singular { pivot } => {
                write!(f, "matrix is singular (zero or non-finite pivot at {})", pivot)
            }
            LinalgError::NotSquare { rows, cols } => {
                write!(f, "matrix is not square: {}x{}", rows, cols)
            }
            LinalgError::NotSymmetric { row, col } => {
                write!(f, "matrix is not symmetric at ({}, {})", row, col)
            }
            LinalgError::ConvergenceFailure {
                rotations,
                off_diagonal_norm,
            } => write!(
                f,
                "eigen-decomposition did not converge after {} rotations (off-diagonal norm {:e})",
                rotations, off_diagonal_norm
            ),
            LinalgError::EmptyMatrix { operation } => {
                write!(f, "{} requires a non-empty matrix", operation)
            }
            LinalgError::Encoding(msg) => write!(f, "encoding failed: {}", msg),
        }
    }
}

impl std::error::Error for LinalgError {}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LinalgError>;

/// Validates an inclusive `[start, end]` range against a length.
pub(crate) fn check_inclusive_range(start: usize, end: usize, len: usize) -> Result<()> {
    if start > end || end >= len {
        return Err(LinalgError::InvalidRange { start, end, len });
    }
    Ok(())
}
