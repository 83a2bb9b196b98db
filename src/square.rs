// src/square.rs

use std::ops::{Add, Deref, Div, Mul, Sub};

use ndarray::Array2;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{LinalgError, Result};
use crate::matrix::Matrix;
use crate::vector::{ColumnVector, RowVector};

/// A [`Matrix`] with as many rows as columns.
///
/// Squareness is checked once at construction. The whole read-only
/// [`Matrix`] API is reachable through `Deref`.
///
/// There is deliberately no eigen-decomposition here; a general square matrix
/// can have complex eigenvalues. See [`crate::SymmetricMatrix`].
#[derive(Clone, Debug, PartialEq)]
pub struct SquareMatrix {
    inner: Matrix,
}

impl SquareMatrix {
    /// # Errors
    /// `NotSquare` when `matrix.nrows() != matrix.ncols()`.
    pub fn new(matrix: Matrix) -> Result<Self> {
        if !matrix.is_square() {
            return Err(LinalgError::NotSquare {
                rows: matrix.nrows(),
                cols: matrix.ncols(),
            });
        }
        Ok(Self { inner: matrix })
    }

    pub(crate) fn assume_square(matrix: Matrix) -> Self {
        debug_assert!(matrix.is_square());
        Self { inner: matrix }
    }

    /// `n x n` identity.
    pub fn identity(n: usize) -> Self {
        Self {
            inner: Matrix::from(Array2::<f64>::eye(n)),
        }
    }

    pub fn zeros(n: usize) -> Self {
        Self {
            inner: Matrix::zeros(n, n),
        }
    }

    /// Side length `n`.
    pub fn dimension(&self) -> usize {
        self.inner.nrows()
    }

    pub fn trace(&self) -> f64 {
        self.inner.view().diag().sum()
    }

    pub fn transpose(&self) -> Self {
        Self {
            inner: self.inner.transpose(),
        }
    }

    pub fn as_matrix(&self) -> &Matrix {
        &self.inner
    }

    pub fn into_matrix(self) -> Matrix {
        self.inner
    }

    /// Determinant by forward Gaussian elimination to upper-triangular form,
    /// then the product of the diagonal.
    ///
    /// Rows are never swapped. A matrix whose leading entry is zero (for
    /// example `[[0, 1], [1, 0]]`) is reported as singular even though its
    /// determinant is `-1`, and near-zero pivots lose precision.
    ///
    /// # Errors
    /// `Singular { pivot }` when pivot `pivot` is zero or non-finite while a
    /// non-zero entry remains below it.
    pub fn det(&self) -> Result<f64> {
        let n = self.dimension();
        let mut work = self.inner.to_array();
        for i in 0..n {
            let pivot = work[[i, i]];
            let pivot_row = work.row(i).to_owned();
            for j in (i + 1)..n {
                let below = work[[j, i]];
                if below == 0.0 {
                    continue;
                }
                if pivot == 0.0 || !pivot.is_finite() {
                    return Err(LinalgError::Singular { pivot: i });
                }
                work.row_mut(j).scaled_add(-below / pivot, &pivot_row);
            }
        }
        Ok(work.diag().product())
    }

    /// Inverse by Gauss-Jordan elimination without pivoting.
    ///
    /// Each pivot row is scaled to a unit pivot, then that column is cleared
    /// from every other row; the same row operations applied to an identity
    /// matrix accumulate the inverse.
    ///
    /// ```
    /// use dual_pca::{Matrix, SquareMatrix};
    ///
    /// let m = SquareMatrix::new(Matrix::from_nested(&[vec![4.0, 7.0], vec![2.0, 6.0]]).unwrap()).unwrap();
    /// let product = (&m * &m.inverse().unwrap()).unwrap();
    /// assert_eq!(product, SquareMatrix::identity(2));
    /// ```
    ///
    /// # Errors
    /// `Singular { pivot }` on a zero or non-finite pivot, or when the result
    /// contains non-finite values (reported at the first offending row).
    pub fn inverse(&self) -> Result<SquareMatrix> {
        let n = self.dimension();
        let mut work = self.inner.to_array();
        let mut inverse = Array2::<f64>::eye(n);

        for i in 0..n {
            let pivot = work[[i, i]];
            if pivot == 0.0 || !pivot.is_finite() {
                return Err(LinalgError::Singular { pivot: i });
            }
            work.row_mut(i).mapv_inplace(|x| x / pivot);
            inverse.row_mut(i).mapv_inplace(|x| x / pivot);

            let work_pivot_row = work.row(i).to_owned();
            let inverse_pivot_row = inverse.row(i).to_owned();
            for j in (0..n).filter(|&j| j != i) {
                let factor = work[[j, i]];
                if factor == 0.0 {
                    continue;
                }
                work.row_mut(j).scaled_add(-factor, &work_pivot_row);
                inverse.row_mut(j).scaled_add(-factor, &inverse_pivot_row);
            }
        }

        if let Some(position) = inverse.iter().position(|x| !x.is_finite()) {
            return Err(LinalgError::Singular {
                pivot: position / n,
            });
        }
        Ok(Self {
            inner: Matrix::from(inverse),
        })
    }

    fn closed(result: Result<Matrix>) -> Result<SquareMatrix> {
        result.map(|inner| Self { inner })
    }
}

impl Deref for SquareMatrix {
    type Target = Matrix;

    fn deref(&self) -> &Matrix {
        &self.inner
    }
}

impl TryFrom<Matrix> for SquareMatrix {
    type Error = LinalgError;

    fn try_from(matrix: Matrix) -> Result<Self> {
        Self::new(matrix)
    }
}

impl Add<&SquareMatrix> for &SquareMatrix {
    type Output = Result<SquareMatrix>;

    fn add(self, rhs: &SquareMatrix) -> Result<SquareMatrix> {
        SquareMatrix::closed(&self.inner + &rhs.inner)
    }
}

impl Sub<&SquareMatrix> for &SquareMatrix {
    type Output = Result<SquareMatrix>;

    fn sub(self, rhs: &SquareMatrix) -> Result<SquareMatrix> {
        SquareMatrix::closed(&self.inner - &rhs.inner)
    }
}

impl Mul<&SquareMatrix> for &SquareMatrix {
    type Output = Result<SquareMatrix>;

    fn mul(self, rhs: &SquareMatrix) -> Result<SquareMatrix> {
        SquareMatrix::closed(self.inner.matmul(&rhs.inner))
    }
}

impl Mul<f64> for &SquareMatrix {
    type Output = SquareMatrix;

    fn mul(self, rhs: f64) -> SquareMatrix {
        SquareMatrix {
            inner: &self.inner * rhs,
        }
    }
}

impl Div<f64> for &SquareMatrix {
    type Output = SquareMatrix;

    fn div(self, rhs: f64) -> SquareMatrix {
        SquareMatrix {
            inner: &self.inner / rhs,
        }
    }
}

impl Mul<&ColumnVector> for &SquareMatrix {
    type Output = Result<ColumnVector>;

    fn mul(self, rhs: &ColumnVector) -> Result<ColumnVector> {
        self.inner.mul_column(rhs)
    }
}

impl Mul<&SquareMatrix> for &RowVector {
    type Output = Result<RowVector>;

    fn mul(self, rhs: &SquareMatrix) -> Result<RowVector> {
        Matrix::row_mul(self, &rhs.inner)
    }
}

impl Serialize for SquareMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.inner.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SquareMatrix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let matrix = Matrix::deserialize(deserializer)?;
        SquareMatrix::new(matrix).map_err(D::Error::custom)
    }
}
