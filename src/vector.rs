// src/vector.rs

use std::fmt;
use std::marker::PhantomData;
use std::ops::Index;

use float_cmp::{ApproxEq, F64Margin};
use ndarray::Array1;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{check_inclusive_range, LinalgError, Result};

/// Margin used by `==` on vectors and matrices: absolute difference up to
/// `1e-9`, or at most 8 units in the last place.
pub const EQUALITY_MARGIN: F64Margin = F64Margin {
    epsilon: 1e-9,
    ulps: 8,
};

/// Marker for the role a vector plays in multiplication.
pub trait Orientation: Copy + fmt::Debug + Default + Send + Sync + 'static {
    /// Name used in `Debug` output.
    const NAME: &'static str;
}

/// A plain numeric sequence with no row/column role.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Unoriented;

/// Horizontal (1×n) role.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Row;

/// Vertical (n×1) role.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Column;

impl Orientation for Unoriented {
    const NAME: &'static str = "Vector";
}

impl Orientation for Row {
    const NAME: &'static str = "RowVector";
}

impl Orientation for Column {
    const NAME: &'static str = "ColumnVector";
}

/// Dense vector of `f64` values tagged with an orientation.
///
/// All arithmetic and structural operations allocate a new vector; the
/// receiver is only changed through [`Vector::set`]. The orientation marker is
/// zero-sized and only decides which products are defined:
/// `RowVector * ColumnVector` is a scalar, `ColumnVector * RowVector` is a
/// matrix, and two columns can only meet through [`ColumnVector::inner_product`].
///
/// # Examples
///
/// ```
/// use dual_pca::{ColumnVector, RowVector};
///
/// let row = RowVector::from_slice(&[1.0, 2.0, 3.0]);
/// let col = ColumnVector::from_slice(&[4.0, 5.0, 6.0]);
/// assert_eq!((&row * &col).unwrap(), 32.0);
///
/// let outer = &col * &row;
/// assert_eq!(outer.shape(), (3, 3));
/// ```
#[derive(Clone)]
pub struct Vector<O: Orientation = Unoriented> {
    values: Vec<f64>,
    orientation: PhantomData<O>,
}

/// Vector in the row role.
pub type RowVector = Vector<Row>;
/// Vector in the column role.
pub type ColumnVector = Vector<Column>;

impl<O: Orientation> Vector<O> {
    /// Creates a zero-filled vector of length `len`.
    pub fn zeros(len: usize) -> Self {
        Self::filled(0.0, len)
    }

    /// Creates a vector of length `len` with every element set to `value`.
    pub fn filled(value: f64, len: usize) -> Self {
        Self::from_vec(vec![value; len])
    }

    /// Takes ownership of `values`.
    pub fn from_vec(values: Vec<f64>) -> Self {
        Self {
            values,
            orientation: PhantomData,
        }
    }

    /// Copies `values` into a new vector.
    pub fn from_slice(values: &[f64]) -> Self {
        Self::from_vec(values.to_vec())
    }

    /// Widens single-precision input.
    pub fn from_f32_slice(values: &[f32]) -> Self {
        values.iter().map(|&v| f64::from(v)).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the element at `index`.
    ///
    /// # Errors
    /// `IndexOutOfBounds` when `index >= len`.
    pub fn get(&self, index: usize) -> Result<f64> {
        self.values
            .get(index)
            .copied()
            .ok_or(LinalgError::IndexOutOfBounds {
                index,
                len: self.len(),
            })
    }

    /// Overwrites the element at `index`.
    ///
    /// # Errors
    /// `IndexOutOfBounds` when `index >= len`.
    pub fn set(&mut self, index: usize, value: f64) -> Result<()> {
        let len = self.len();
        let slot = self
            .values
            .get_mut(index)
            .ok_or(LinalgError::IndexOutOfBounds { index, len })?;
        *slot = value;
        Ok(())
    }

    /// Read-only view of the elements.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.values.iter()
    }

    /// Copies the elements out.
    pub fn to_vec(&self) -> Vec<f64> {
        self.values.clone()
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }

    /// Copies the elements into an `ndarray` array.
    pub fn to_array(&self) -> Array1<f64> {
        Array1::from(self.values.clone())
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Arithmetic mean, `None` for an empty vector.
    pub fn average(&self) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(self.sum() / self.len() as f64)
        }
    }

    /// Copy scaled to unit Euclidean length.
    ///
    /// A zero vector has no direction and is returned unchanged.
    pub fn normalized(&self) -> Self {
        let norm = self.norm();
        if norm == 0.0 {
            return self.clone();
        }
        self.map(|v| v / norm)
    }

    /// Splits the vector into `pieces` consecutive vectors of equal length.
    ///
    /// # Errors
    /// `DimensionMismatch` when `pieces` is zero or does not divide the length.
    pub fn separated(&self, pieces: usize) -> Result<Vec<Self>> {
        if pieces == 0 || self.len() % pieces != 0 {
            return Err(LinalgError::DimensionMismatch {
                operation: "separated",
                left: (self.len(), 1),
                right: (pieces, 1),
            });
        }
        let piece_len = self.len() / pieces;
        Ok((0..pieces)
            .map(|i| Self::from_slice(&self.values[i * piece_len..(i + 1) * piece_len]))
            .collect())
    }

    /// First finite difference: `result[i] = self[i] - self[i + 1]`.
    ///
    /// The result has one element fewer than `self`; vectors shorter than two
    /// elements give an empty result.
    pub fn differential(&self) -> Self {
        self.values.windows(2).map(|w| w[0] - w[1]).collect()
    }

    /// Element-wise product. Not the inner product.
    ///
    /// # Errors
    /// `DimensionMismatch` when the lengths differ.
    pub fn elementwise_mul(&self, rhs: &Self) -> Result<Self> {
        self.zip_with(rhs, "elementwise_mul", |a, b| a * b)
    }

    /// Inserts `value` before position `index`. `index == len` appends.
    ///
    /// # Errors
    /// `IndexOutOfBounds` when `index > len`.
    pub fn insert_at(&self, index: usize, value: f64) -> Result<Self> {
        self.splice_in(index, &[value])
    }

    /// Inserts all elements of `other` before position `index`.
    ///
    /// # Errors
    /// `IndexOutOfBounds` when `index > len`.
    pub fn insert_vector_at(&self, index: usize, other: &Self) -> Result<Self> {
        self.splice_in(index, &other.values)
    }

    pub fn insert_at_end(&self, value: f64) -> Self {
        let mut values = self.values.clone();
        values.push(value);
        Self::from_vec(values)
    }

    pub fn insert_at_start(&self, value: f64) -> Self {
        let mut values = Vec::with_capacity(self.len() + 1);
        values.push(value);
        values.extend_from_slice(&self.values);
        Self::from_vec(values)
    }

    /// `self` followed by `other`.
    pub fn concat(&self, other: &Self) -> Self {
        let mut values = Vec::with_capacity(self.len() + other.len());
        values.extend_from_slice(&self.values);
        values.extend_from_slice(&other.values);
        Self::from_vec(values)
    }

    /// Drops the elements at the given positions. Repeated positions are
    /// dropped once.
    ///
    /// # Errors
    /// `IndexOutOfBounds` if any position is `>= len`.
    pub fn remove_elements_at(&self, indices: &[usize]) -> Result<Self> {
        let mut keep = vec![true; self.len()];
        for &index in indices {
            let slot = keep.get_mut(index).ok_or(LinalgError::IndexOutOfBounds {
                index,
                len: self.len(),
            })?;
            *slot = false;
        }
        Ok(self
            .values
            .iter()
            .zip(keep)
            .filter_map(|(&v, kept)| kept.then_some(v))
            .collect())
    }

    /// Drops the inclusive range `start..=end`.
    ///
    /// # Errors
    /// `InvalidRange` when `start > end` or `end >= len`.
    pub fn remove_range(&self, start: usize, end: usize) -> Result<Self> {
        check_inclusive_range(start, end, self.len())?;
        let mut values = Vec::with_capacity(self.len() - (end - start + 1));
        values.extend_from_slice(&self.values[..start]);
        values.extend_from_slice(&self.values[end + 1..]);
        Ok(Self::from_vec(values))
    }

    /// Drops everything from `start` to the last element.
    pub fn remove_to_end(&self, start: usize) -> Result<Self> {
        self.remove_range(start, self.last_index(start)?)
    }

    /// Drops everything from the first element through `end`.
    pub fn remove_from_start(&self, end: usize) -> Result<Self> {
        self.remove_range(0, end)
    }

    /// Copies the inclusive range `start..=end`.
    ///
    /// # Errors
    /// `InvalidRange` when `start > end` or `end >= len`.
    pub fn slice_between(&self, start: usize, end: usize) -> Result<Self> {
        check_inclusive_range(start, end, self.len())?;
        Ok(Self::from_slice(&self.values[start..=end]))
    }

    pub fn slice_to_end(&self, start: usize) -> Result<Self> {
        self.slice_between(start, self.last_index(start)?)
    }

    pub fn slice_from_start(&self, end: usize) -> Result<Self> {
        self.slice_between(0, end)
    }

    /// Copy in the row role.
    pub fn to_row(&self) -> RowVector {
        self.reoriented()
    }

    /// Copy in the column role.
    pub fn to_column(&self) -> ColumnVector {
        self.reoriented()
    }

    /// Copy with no role.
    pub fn to_unoriented(&self) -> Vector {
        self.reoriented()
    }

    fn reoriented<P: Orientation>(&self) -> Vector<P> {
        Vector::from_vec(self.values.clone())
    }

    pub(crate) fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        self.values.iter().map(|&v| f(v)).collect()
    }

    pub(crate) fn zip_with(
        &self,
        rhs: &Self,
        operation: &'static str,
        f: impl Fn(f64, f64) -> f64,
    ) -> Result<Self> {
        self.check_same_len(rhs.len(), operation)?;
        Ok(self
            .values
            .iter()
            .zip(&rhs.values)
            .map(|(&a, &b)| f(a, b))
            .collect())
    }

    pub(crate) fn check_same_len(&self, other_len: usize, operation: &'static str) -> Result<()> {
        if self.len() != other_len {
            return Err(LinalgError::DimensionMismatch {
                operation,
                left: (self.len(), 1),
                right: (other_len, 1),
            });
        }
        Ok(())
    }

    fn splice_in(&self, index: usize, inserted: &[f64]) -> Result<Self> {
        if index > self.len() {
            return Err(LinalgError::IndexOutOfBounds {
                index,
                len: self.len(),
            });
        }
        let mut values = Vec::with_capacity(self.len() + inserted.len());
        values.extend_from_slice(&self.values[..index]);
        values.extend_from_slice(inserted);
        values.extend_from_slice(&self.values[index..]);
        Ok(Self::from_vec(values))
    }

    fn last_index(&self, start: usize) -> Result<usize> {
        self.len().checked_sub(1).ok_or(LinalgError::InvalidRange {
            start,
            end: start,
            len: 0,
        })
    }
}

impl ColumnVector {
    /// Inner product with another column.
    ///
    /// ```
    /// use dual_pca::ColumnVector;
    /// let a = ColumnVector::from_slice(&[1.0, 2.0, 3.0]);
    /// let b = ColumnVector::from_slice(&[4.0, 5.0, 6.0]);
    /// assert_eq!(a.inner_product(&b).unwrap(), 32.0);
    /// ```
    ///
    /// # Errors
    /// `DimensionMismatch` when the lengths differ.
    pub fn inner_product(&self, other: &ColumnVector) -> Result<f64> {
        self.check_same_len(other.len(), "inner_product")?;
        Ok(dot(self.as_slice(), other.as_slice()))
    }
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

impl<O: Orientation> Default for Vector<O> {
    fn default() -> Self {
        Self::from_vec(Vec::new())
    }
}

impl<O: Orientation> From<Vec<f64>> for Vector<O> {
    fn from(values: Vec<f64>) -> Self {
        Self::from_vec(values)
    }
}

impl<O: Orientation> From<Array1<f64>> for Vector<O> {
    fn from(values: Array1<f64>) -> Self {
        Self::from_vec(values.to_vec())
    }
}

impl<O: Orientation> FromIterator<f64> for Vector<O> {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<'a, O: Orientation> IntoIterator for &'a Vector<O> {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl<O: Orientation> Index<usize> for Vector<O> {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.values[index]
    }
}

impl<O: Orientation> fmt::Debug for Vector<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:?}", O::NAME, self.values)
    }
}

impl<O: Orientation> PartialEq for Vector<O> {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other, EQUALITY_MARGIN)
    }
}

impl<'a, O: Orientation> ApproxEq for &'a Vector<O> {
    type Margin = F64Margin;

    fn approx_eq<M: Into<F64Margin>>(self, other: Self, margin: M) -> bool {
        self.values.as_slice().approx_eq(other.values.as_slice(), margin)
    }
}

impl<O: Orientation> Serialize for Vector<O> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.values)
    }
}

impl<'de, O: Orientation> Deserialize<'de> for Vector<O> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Vec::<f64>::deserialize(deserializer).map(Self::from_vec)
    }
}
