// src/eigen.rs

use std::cmp::Ordering;

use float_cmp::ApproxEq;
use ndarray::Array2;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{LinalgError, Result};
use crate::matrix::Matrix;
use crate::vector::{ColumnVector, Vector, EQUALITY_MARGIN};

/// One eigenvalue and its eigenvector. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EigenPair {
    eigenvalue: f64,
    eigenvector: ColumnVector,
}

impl EigenPair {
    pub fn new(eigenvalue: f64, eigenvector: ColumnVector) -> Self {
        Self {
            eigenvalue,
            eigenvector,
        }
    }

    pub fn eigenvalue(&self) -> f64 {
        self.eigenvalue
    }

    pub fn eigenvector(&self) -> &ColumnVector {
        &self.eigenvector
    }

    pub fn into_parts(self) -> (f64, ColumnVector) {
        (self.eigenvalue, self.eigenvector)
    }
}

impl PartialEq for EigenPair {
    fn eq(&self, other: &Self) -> bool {
        self.eigenvalue.approx_eq(other.eigenvalue, EQUALITY_MARGIN)
            && self.eigenvector == other.eigenvector
    }
}

/// Ordered list of [`EigenPair`]s.
///
/// The container never reorders on its own: bulk accessors such as
/// [`EigenSystem::eigenvectors`] follow insertion order, and sorting is an
/// explicit call. All eigenvectors in one system share a length.
///
/// ```
/// use dual_pca::{ColumnVector, EigenPair, EigenSystem};
///
/// let mut system = EigenSystem::new();
/// system.add(EigenPair::new(1.0, ColumnVector::from_slice(&[1.0, 0.0]))).unwrap();
/// system.add(EigenPair::new(3.0, ColumnVector::from_slice(&[0.0, 1.0]))).unwrap();
///
/// assert_eq!(system.eigenvalues().as_slice(), &[1.0, 3.0]);
/// assert_eq!(system.sorted_descending().eigenvalues().as_slice(), &[3.0, 1.0]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EigenSystem {
    pairs: Vec<EigenPair>,
}

impl EigenSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `pair`.
    ///
    /// # Errors
    /// `DimensionMismatch` when the eigenvector length differs from the
    /// vectors already stored.
    pub fn add(&mut self, pair: EigenPair) -> Result<()> {
        if let Some(dim) = self.dimension() {
            if pair.eigenvector.len() != dim {
                return Err(LinalgError::DimensionMismatch {
                    operation: "EigenSystem::add",
                    left: (dim, 1),
                    right: (pair.eigenvector.len(), 1),
                });
            }
        }
        self.pairs.push(pair);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&EigenPair> {
        self.pairs.get(index)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Shared eigenvector length, `None` while empty.
    pub fn dimension(&self) -> Option<usize> {
        self.pairs.first().map(|p| p.eigenvector.len())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EigenPair> {
        self.pairs.iter()
    }

    /// Matrix whose `i`-th column is the `i`-th eigenvector. `0 x 0` when empty.
    pub fn eigenvectors(&self) -> Matrix {
        let dim = self.dimension().unwrap_or(0);
        Matrix::from(Array2::from_shape_fn((dim, self.len()), |(i, j)| {
            self.pairs[j].eigenvector[i]
        }))
    }

    /// Eigenvalues in system order.
    pub fn eigenvalues(&self) -> Vector {
        self.pairs.iter().map(|p| p.eigenvalue).collect()
    }

    /// Copy sorted by eigenvalue, largest first. Ties keep their order.
    pub fn sorted_descending(&self) -> Self {
        let mut pairs = self.pairs.clone();
        pairs.sort_by(|a, b| {
            b.eigenvalue
                .partial_cmp(&a.eigenvalue)
                .unwrap_or(Ordering::Equal)
        });
        Self { pairs }
    }

    /// Copy keeping the pairs for which `predicate` holds, in order.
    pub fn filtered(&self, predicate: impl Fn(&EigenPair) -> bool) -> Self {
        Self {
            pairs: self.pairs.iter().filter(|p| predicate(p)).cloned().collect(),
        }
    }

    /// Copy of the first `count` pairs.
    pub fn truncated(&self, count: usize) -> Self {
        Self {
            pairs: self.pairs.iter().take(count).cloned().collect(),
        }
    }

    /// Copy keeping the `count` pairs with the largest eigenvalues, in their
    /// current order. Among equal eigenvalues the earlier pair wins.
    pub fn largest(&self, count: usize) -> Self {
        if count >= self.len() {
            return self.clone();
        }
        let mut ranked: Vec<usize> = (0..self.len()).collect();
        ranked.sort_by(|&a, &b| {
            self.pairs[b]
                .eigenvalue
                .partial_cmp(&self.pairs[a].eigenvalue)
                .unwrap_or(Ordering::Equal)
        });
        let mut kept = ranked[..count].to_vec();
        kept.sort_unstable();
        Self {
            pairs: kept.into_iter().map(|i| self.pairs[i].clone()).collect(),
        }
    }

    pub(crate) fn from_pairs_unchecked(pairs: Vec<EigenPair>) -> Self {
        Self { pairs }
    }
}

impl TryFrom<Vec<EigenPair>> for EigenSystem {
    type Error = LinalgError;

    fn try_from(pairs: Vec<EigenPair>) -> Result<Self> {
        let mut system = EigenSystem {
            pairs: Vec::with_capacity(pairs.len()),
        };
        for pair in pairs {
            system.add(pair)?;
        }
        Ok(system)
    }
}

impl<'a> IntoIterator for &'a EigenSystem {
    type Item = &'a EigenPair;
    type IntoIter = std::slice::Iter<'a, EigenPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

impl<'de> Deserialize<'de> for EigenSystem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let pairs = Vec::<EigenPair>::deserialize(deserializer)?;
        EigenSystem::try_from(pairs).map_err(D::Error::custom)
    }
}
