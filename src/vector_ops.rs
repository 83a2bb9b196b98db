// src/vector_ops.rs

// Operator overloads for vectors. Length-checked operators return
// `Result`; scalar scaling cannot fail and returns the vector directly.

use std::ops::{Add, Div, Mul, Neg, Sub};

use ndarray::Array2;

use crate::error::Result;
use crate::matrix::Matrix;
use crate::vector::{dot, ColumnVector, Orientation, RowVector, Vector};

macro_rules! impl_elementwise_op {
    ($trait:ident, $method:ident, $op:tt, $name:literal) => {
        impl<O: Orientation> $trait<&Vector<O>> for &Vector<O> {
            type Output = Result<Vector<O>>;

            fn $method(self, rhs: &Vector<O>) -> Result<Vector<O>> {
                self.zip_with(rhs, $name, |a, b| a $op b)
            }
        }

        impl<O: Orientation> $trait<Vector<O>> for Vector<O> {
            type Output = Result<Vector<O>>;

            fn $method(self, rhs: Vector<O>) -> Result<Vector<O>> {
                (&self).$method(&rhs)
            }
        }
    };
}

impl_elementwise_op!(Add, add, +, "vector addition");
impl_elementwise_op!(Sub, sub, -, "vector subtraction");

impl<O: Orientation> Mul<f64> for &Vector<O> {
    type Output = Vector<O>;

    fn mul(self, rhs: f64) -> Vector<O> {
        self.map(|v| v * rhs)
    }
}

impl<O: Orientation> Mul<f64> for Vector<O> {
    type Output = Vector<O>;

    fn mul(self, rhs: f64) -> Vector<O> {
        &self * rhs
    }
}

impl<O: Orientation> Mul<&Vector<O>> for f64 {
    type Output = Vector<O>;

    fn mul(self, rhs: &Vector<O>) -> Vector<O> {
        rhs * self
    }
}

impl<O: Orientation> Mul<Vector<O>> for f64 {
    type Output = Vector<O>;

    fn mul(self, rhs: Vector<O>) -> Vector<O> {
        &rhs * self
    }
}

impl<O: Orientation> Div<f64> for &Vector<O> {
    type Output = Vector<O>;

    fn div(self, rhs: f64) -> Vector<O> {
        self.map(|v| v / rhs)
    }
}

impl<O: Orientation> Div<f64> for Vector<O> {
    type Output = Vector<O>;

    fn div(self, rhs: f64) -> Vector<O> {
        &self / rhs
    }
}

impl<O: Orientation> Neg for &Vector<O> {
    type Output = Vector<O>;

    fn neg(self) -> Vector<O> {
        self.map(|v| -v)
    }
}

impl<O: Orientation> Neg for Vector<O> {
    type Output = Vector<O>;

    fn neg(self) -> Vector<O> {
        -&self
    }
}

/// Row times column is the inner product.
impl Mul<&ColumnVector> for &RowVector {
    type Output = Result<f64>;

    fn mul(self, rhs: &ColumnVector) -> Result<f64> {
        self.check_same_len(rhs.len(), "row * column")?;
        Ok(dot(self.as_slice(), rhs.as_slice()))
    }
}

impl Mul<ColumnVector> for RowVector {
    type Output = Result<f64>;

    fn mul(self, rhs: ColumnVector) -> Result<f64> {
        &self * &rhs
    }
}

/// Column times row is the outer product, `len(column) x len(row)`.
impl Mul<&RowVector> for &ColumnVector {
    type Output = Matrix;

    fn mul(self, rhs: &RowVector) -> Matrix {
        let (col, row) = (self.as_slice(), rhs.as_slice());
        Matrix::from(Array2::from_shape_fn((col.len(), row.len()), |(i, j)| {
            col[i] * row[j]
        }))
    }
}

impl Mul<RowVector> for ColumnVector {
    type Output = Matrix;

    fn mul(self, rhs: RowVector) -> Matrix {
        &self * &rhs
    }
}
