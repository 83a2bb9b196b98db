// src/matrix.rs

use std::fmt;
use std::ops::{Add, Div, Index, Mul, Neg, Range, Sub};

use float_cmp::{ApproxEq, F64Margin};
use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{LinalgError, Result};
use crate::vector::{ColumnVector, RowVector, EQUALITY_MARGIN};

/// Dense `f64` matrix, viewed as an ordered list of equal-length columns.
///
/// `nrows()` is the length of every column and `ncols()` the number of columns.
/// Columns and rows are handed out as owned copies; replacing one goes through
/// [`Matrix::with_column`] / [`Matrix::with_row`], which return a new matrix.
///
/// # Examples
///
/// ```
/// use dual_pca::{ColumnVector, Matrix};
///
/// let m = Matrix::from_columns(&[
///     ColumnVector::from_slice(&[1.0, 3.0]),
///     ColumnVector::from_slice(&[2.0, 4.0]),
/// ])
/// .unwrap();
/// assert_eq!(m.shape(), (2, 2));
/// assert_eq!(m[(1, 0)], 3.0);
/// assert_eq!(m.row(0).unwrap().as_slice(), &[1.0, 2.0]);
/// ```
#[derive(Clone)]
pub struct Matrix {
    data: Array2<f64>,
}

impl Matrix {
    /// Zero-filled `rows x cols` matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: Array2::zeros((rows, cols)),
        }
    }

    /// Builds a matrix whose `j`-th column is `columns[j]`.
    ///
    /// An empty slice yields a `0 x 0` matrix.
    ///
    /// # Errors
    /// `DimensionMismatch` when the columns have different lengths.
    pub fn from_columns(columns: &[ColumnVector]) -> Result<Self> {
        let rows = columns.first().map_or(0, |c| c.len());
        if let Some(bad) = columns.iter().find(|c| c.len() != rows) {
            return Err(LinalgError::DimensionMismatch {
                operation: "from_columns",
                left: (rows, 1),
                right: (bad.len(), 1),
            });
        }
        Ok(Self::from(Array2::from_shape_fn(
            (rows, columns.len()),
            |(i, j)| columns[j][i],
        )))
    }

    /// Builds a matrix whose `i`-th row is `rows[i]`.
    ///
    /// # Errors
    /// `DimensionMismatch` when the rows have different lengths.
    pub fn from_rows(rows: &[RowVector]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.len());
        if let Some(bad) = rows.iter().find(|r| r.len() != cols) {
            return Err(LinalgError::DimensionMismatch {
                operation: "from_rows",
                left: (1, cols),
                right: (1, bad.len()),
            });
        }
        Ok(Self::from(Array2::from_shape_fn(
            (rows.len(), cols),
            |(i, j)| rows[i][j],
        )))
    }

    /// Builds a matrix from nested rows: `values[i][j]` lands at `(i, j)`.
    ///
    /// # Errors
    /// `DimensionMismatch` when the inner vectors have different lengths.
    pub fn from_nested(values: &[Vec<f64>]) -> Result<Self> {
        let cols = values.first().map_or(0, Vec::len);
        if let Some(bad) = values.iter().find(|r| r.len() != cols) {
            return Err(LinalgError::DimensionMismatch {
                operation: "from_nested",
                left: (1, cols),
                right: (1, bad.len()),
            });
        }
        Ok(Self::from(Array2::from_shape_fn(
            (values.len(), cols),
            |(i, j)| values[i][j],
        )))
    }

    /// Broadcasts `column` into `count` identical columns.
    pub fn repeat_column(column: &ColumnVector, count: usize) -> Self {
        let values = column.as_slice();
        Self::from(Array2::from_shape_fn((values.len(), count), |(i, _)| {
            values[i]
        }))
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }

    /// `(nrows, ncols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn is_square(&self) -> bool {
        self.nrows() == self.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element at `(row, col)`.
    ///
    /// # Errors
    /// `IndexOutOfBounds` naming whichever coordinate is out of range.
    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        self.check_position(row, col)?;
        Ok(self.data[[row, col]])
    }

    /// Overwrites the element at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        self.check_position(row, col)?;
        self.data[[row, col]] = value;
        Ok(())
    }

    /// Copy of column `index`.
    pub fn column(&self, index: usize) -> Result<ColumnVector> {
        self.check_col(index)?;
        Ok(ColumnVector::from(self.data.column(index).to_owned()))
    }

    /// Copy of row `index`.
    pub fn row(&self, index: usize) -> Result<RowVector> {
        self.check_row(index)?;
        Ok(RowVector::from(self.data.row(index).to_owned()))
    }

    /// Copies of every column, left to right.
    pub fn columns(&self) -> impl Iterator<Item = ColumnVector> + '_ {
        self.data
            .columns()
            .into_iter()
            .map(|c| ColumnVector::from(c.to_owned()))
    }

    /// Copies of every row, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = RowVector> + '_ {
        self.data
            .rows()
            .into_iter()
            .map(|r| RowVector::from(r.to_owned()))
    }

    /// New matrix with column `index` replaced by `column`.
    ///
    /// # Errors
    /// `IndexOutOfBounds` for a bad index, `DimensionMismatch` when
    /// `column.len() != nrows()`.
    pub fn with_column(&self, index: usize, column: &ColumnVector) -> Result<Self> {
        self.check_col(index)?;
        if column.len() != self.nrows() {
            return Err(LinalgError::DimensionMismatch {
                operation: "with_column",
                left: self.shape(),
                right: (column.len(), 1),
            });
        }
        let mut out = self.clone();
        out.data
            .column_mut(index)
            .assign(&ArrayView1::from(column.as_slice()));
        Ok(out)
    }

    /// New matrix with row `index` replaced by `row`.
    pub fn with_row(&self, index: usize, row: &RowVector) -> Result<Self> {
        self.check_row(index)?;
        if row.len() != self.ncols() {
            return Err(LinalgError::DimensionMismatch {
                operation: "with_row",
                left: self.shape(),
                right: (1, row.len()),
            });
        }
        let mut out = self.clone();
        out.data
            .row_mut(index)
            .assign(&ArrayView1::from(row.as_slice()));
        Ok(out)
    }

    pub fn transpose(&self) -> Self {
        Self::from(self.data.t().to_owned())
    }

    /// Mean of each row across the columns (one value per row).
    ///
    /// For a features x samples data matrix this is the per-feature mean.
    ///
    /// # Errors
    /// `EmptyMatrix` when there are no columns to average.
    pub fn average_row(&self) -> Result<ColumnVector> {
        if self.ncols() == 0 {
            return Err(LinalgError::EmptyMatrix {
                operation: "average_row",
            });
        }
        self.data
            .mean_axis(Axis(1))
            .map(ColumnVector::from)
            .ok_or(LinalgError::EmptyMatrix {
                operation: "average_row",
            })
    }

    /// Mean of each column across the rows (one value per column).
    ///
    /// # Errors
    /// `EmptyMatrix` when there are no rows to average.
    pub fn average_col(&self) -> Result<RowVector> {
        if self.nrows() == 0 {
            return Err(LinalgError::EmptyMatrix {
                operation: "average_col",
            });
        }
        self.data
            .mean_axis(Axis(0))
            .map(RowVector::from)
            .ok_or(LinalgError::EmptyMatrix {
                operation: "average_col",
            })
    }

    /// Scales every column to unit Euclidean length. Zero columns stay zero.
    pub fn normalized_columns(&self) -> Self {
        let mut out = self.data.clone();
        for mut col in out.columns_mut() {
            let norm = col.dot(&col).sqrt();
            if norm > 0.0 {
                col.mapv_inplace(|x| x / norm);
            }
        }
        Self::from(out)
    }

    /// Copies the block `rows x cols` (half-open ranges).
    ///
    /// # Errors
    /// `InvalidRange` when a range is reversed or runs past the matrix.
    pub fn submatrix(&self, rows: Range<usize>, cols: Range<usize>) -> Result<Self> {
        for (range, len) in [(&rows, self.nrows()), (&cols, self.ncols())] {
            if range.start > range.end || range.end > len {
                return Err(LinalgError::InvalidRange {
                    start: range.start,
                    end: range.end,
                    len,
                });
            }
        }
        Ok(Self::from(self.data.slice(s![rows, cols]).to_owned()))
    }

    pub fn frobenius_norm(&self) -> f64 {
        self.data.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    /// Read-only `ndarray` view of the storage.
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    /// Copies the storage out as an `ndarray` array.
    pub fn to_array(&self) -> Array2<f64> {
        self.data.clone()
    }

    pub fn into_array(self) -> Array2<f64> {
        self.data
    }

    fn check_row(&self, index: usize) -> Result<()> {
        if index >= self.nrows() {
            return Err(LinalgError::IndexOutOfBounds {
                index,
                len: self.nrows(),
            });
        }
        Ok(())
    }

    fn check_col(&self, index: usize) -> Result<()> {
        if index >= self.ncols() {
            return Err(LinalgError::IndexOutOfBounds {
                index,
                len: self.ncols(),
            });
        }
        Ok(())
    }

    fn check_position(&self, row: usize, col: usize) -> Result<()> {
        self.check_row(row)?;
        self.check_col(col)
    }

    fn check_same_shape(&self, rhs: &Matrix, operation: &'static str) -> Result<()> {
        if self.shape() != rhs.shape() {
            return Err(LinalgError::DimensionMismatch {
                operation,
                left: self.shape(),
                right: rhs.shape(),
            });
        }
        Ok(())
    }

    pub(crate) fn matmul(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.ncols() != rhs.nrows() {
            return Err(LinalgError::DimensionMismatch {
                operation: "matrix multiplication",
                left: self.shape(),
                right: rhs.shape(),
            });
        }
        Ok(Self::from(self.data.dot(&rhs.data)))
    }

    pub(crate) fn mul_column(&self, rhs: &ColumnVector) -> Result<ColumnVector> {
        if self.ncols() != rhs.len() {
            return Err(LinalgError::DimensionMismatch {
                operation: "matrix * column",
                left: self.shape(),
                right: (rhs.len(), 1),
            });
        }
        Ok(ColumnVector::from(
            self.data.dot(&ArrayView1::from(rhs.as_slice())),
        ))
    }

    pub(crate) fn row_mul(lhs: &RowVector, rhs: &Matrix) -> Result<RowVector> {
        if lhs.len() != rhs.nrows() {
            return Err(LinalgError::DimensionMismatch {
                operation: "row * matrix",
                left: (1, lhs.len()),
                right: rhs.shape(),
            });
        }
        let product: Array1<f64> = ArrayView1::from(lhs.as_slice()).dot(&rhs.data);
        Ok(RowVector::from(product))
    }
}

impl From<Array2<f64>> for Matrix {
    fn from(data: Array2<f64>) -> Self {
        Self { data }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[[row, col]]
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Matrix{:?} ", self.shape())?;
        f.debug_list().entries(self.data.rows()).finish()
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other, EQUALITY_MARGIN)
    }
}

impl<'a> ApproxEq for &'a Matrix {
    type Margin = F64Margin;

    fn approx_eq<M: Into<F64Margin>>(self, other: Self, margin: M) -> bool {
        let margin = margin.into();
        self.shape() == other.shape()
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| a.approx_eq(*b, margin))
    }
}

impl Add<&Matrix> for &Matrix {
    type Output = Result<Matrix>;

    fn add(self, rhs: &Matrix) -> Result<Matrix> {
        self.check_same_shape(rhs, "matrix addition")?;
        Ok(Matrix::from(&self.data + &rhs.data))
    }
}

impl Sub<&Matrix> for &Matrix {
    type Output = Result<Matrix>;

    fn sub(self, rhs: &Matrix) -> Result<Matrix> {
        self.check_same_shape(rhs, "matrix subtraction")?;
        Ok(Matrix::from(&self.data - &rhs.data))
    }
}

impl Mul<&Matrix> for &Matrix {
    type Output = Result<Matrix>;

    fn mul(self, rhs: &Matrix) -> Result<Matrix> {
        self.matmul(rhs)
    }
}

impl Add for Matrix {
    type Output = Result<Matrix>;

    fn add(self, rhs: Matrix) -> Result<Matrix> {
        &self + &rhs
    }
}

impl Sub for Matrix {
    type Output = Result<Matrix>;

    fn sub(self, rhs: Matrix) -> Result<Matrix> {
        &self - &rhs
    }
}

impl Mul for Matrix {
    type Output = Result<Matrix>;

    fn mul(self, rhs: Matrix) -> Result<Matrix> {
        self.matmul(&rhs)
    }
}

impl Mul<f64> for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: f64) -> Matrix {
        Matrix::from(&self.data * rhs)
    }
}

impl Mul<&Matrix> for f64 {
    type Output = Matrix;

    fn mul(self, rhs: &Matrix) -> Matrix {
        rhs * self
    }
}

impl Div<f64> for &Matrix {
    type Output = Matrix;

    fn div(self, rhs: f64) -> Matrix {
        Matrix::from(&self.data / rhs)
    }
}

impl Neg for &Matrix {
    type Output = Matrix;

    fn neg(self) -> Matrix {
        Matrix::from(-&self.data)
    }
}

impl Mul<&ColumnVector> for &Matrix {
    type Output = Result<ColumnVector>;

    fn mul(self, rhs: &ColumnVector) -> Result<ColumnVector> {
        self.mul_column(rhs)
    }
}

impl Mul<&Matrix> for &RowVector {
    type Output = Result<RowVector>;

    fn mul(self, rhs: &Matrix) -> Result<RowVector> {
        Matrix::row_mul(self, rhs)
    }
}

impl Serialize for Matrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let columns: Vec<ColumnVector> = self.columns().collect();
        serializer.collect_seq(&columns)
    }
}

impl<'de> Deserialize<'de> for Matrix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let columns = Vec::<ColumnVector>::deserialize(deserializer)?;
        Matrix::from_columns(&columns).map_err(D::Error::custom)
    }
}
