// src/pca.rs

use std::time::Instant;

use log::{debug, log_enabled, Level};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::diagnostics;
use crate::eigen::{EigenPair, EigenSystem};
use crate::error::{LinalgError, Result};
use crate::jacobi::{JacobiSolver, SymmetricEigenSolver};
use crate::matrix::Matrix;
use crate::symmetric::SymmetricMatrix;
use crate::vector::{ColumnVector, Vector};

/// Which scatter matrix the eigen-decomposition runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScatterStrategy {
    /// `diffᵗ · diff` (samples x samples), eigenvectors lifted back to feature
    /// space. Cheap when features greatly outnumber samples.
    Dual,
    /// `diff · diffᵗ` (features x features). Eigenvectors are already in
    /// feature space.
    Covariance,
    /// `Covariance` when `features <= samples`, otherwise `Dual`.
    #[default]
    Auto,
}

impl ScatterStrategy {
    fn uses_covariance(self, n_features: usize, n_samples: usize) -> bool {
        match self {
            ScatterStrategy::Dual => false,
            ScatterStrategy::Covariance => true,
            ScatterStrategy::Auto => n_features <= n_samples,
        }
    }
}

/// Tuning knobs for [`Pca`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PcaConfig {
    /// Components with an eigenvalue at or below this are dropped.
    pub min_eigenvalue: f64,
    pub strategy: ScatterStrategy,
    /// Stable sort by eigenvalue, largest first. When `false` the components
    /// keep the order the eigensolver produced them in.
    pub sort_descending: bool,
}

impl Default for PcaConfig {
    fn default() -> Self {
        Self {
            min_eigenvalue: 1e-4,
            strategy: ScatterStrategy::Auto,
            sort_descending: true,
        }
    }
}

/// Principal component analysis over a `features x samples` matrix
/// (one column per sample).
///
/// The pipeline centers the data on the per-feature mean, eigen-decomposes a
/// scatter matrix and projects every centered sample onto the retained
/// components. A component is retained when its eigenvalue exceeds
/// [`PcaConfig::min_eigenvalue`] and is among the `min(features, samples - 1)`
/// largest; centered data has no more directions than that, and anything past
/// the bound is solver residue.
///
/// Components are ordered by eigenvalue, largest first, unless
/// [`PcaConfig::sort_descending`] is off.
///
/// # Examples
///
/// ```
/// use dual_pca::{Matrix, Pca, PcaConfig};
///
/// // 2 features, 4 samples
/// let data = Matrix::from_nested(&[
///     vec![0.0, 4.0, 0.0, 4.0],
///     vec![0.0, 0.0, 2.0, 2.0],
/// ]).unwrap();
///
/// let pca = Pca::new(PcaConfig::default()).run(&data, "toy").unwrap();
/// assert_eq!(pca.component_count(), 2);
/// assert_eq!(pca.mean().as_slice(), &[2.0, 1.0]);
/// assert_eq!(*pca.tag(), "toy");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pca<S = JacobiSolver> {
    config: PcaConfig,
    solver: S,
}

impl Pca<JacobiSolver> {
    /// Pipeline using the default [`JacobiSolver`].
    pub fn new(config: PcaConfig) -> Self {
        Self {
            config,
            solver: JacobiSolver::default(),
        }
    }
}

impl<S: SymmetricEigenSolver> Pca<S> {
    /// Pipeline using `solver` for the eigen-decomposition.
    pub fn with_solver(config: PcaConfig, solver: S) -> Self {
        Self { config, solver }
    }

    pub fn config(&self) -> &PcaConfig {
        &self.config
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Runs PCA on `data` (features x samples) and attaches `tag` to the result.
    ///
    /// * `data` - one column per sample, one row per feature.
    /// * `tag` - caller data carried through untouched.
    ///
    /// # Errors
    /// * `EmptyMatrix` when `data` has no rows or no columns.
    /// * `ConvergenceFailure` when the eigensolver runs out of rotations.
    pub fn run<T>(&self, data: &Matrix, tag: T) -> Result<PcaData<T>> {
        let (n_features, n_samples) = data.shape();
        if n_features == 0 || n_samples == 0 {
            return Err(LinalgError::EmptyMatrix { operation: "PCA" });
        }
        let start = Instant::now();

        let mean = data.average_row()?;
        let diff = (data - &Matrix::repeat_column(&mean, n_samples))?;

        let (scatter_system, basis) =
            if self.config.strategy.uses_covariance(n_features, n_samples) {
                debug!(
                    "PCA: covariance scatter {}x{} ({} features, {} samples)",
                    n_features, n_features, n_features, n_samples
                );
                let system = SymmetricMatrix::scatter(&diff).eigen_system_with(&self.solver)?;
                let basis = system.eigenvectors().normalized_columns();
                (system, basis)
            } else {
                debug!(
                    "PCA: dual scatter {}x{} ({} features, {} samples)",
                    n_samples, n_samples, n_features, n_samples
                );
                let system = SymmetricMatrix::gram(&diff).eigen_system_with(&self.solver)?;
                // lift sample-space eigenvectors to feature space
                let basis = (data * &system.eigenvectors())?.normalized_columns();
                (system, basis)
            };

        let mut system = EigenSystem::try_from(
            scatter_system
                .iter()
                .zip(basis.columns())
                .map(|(pair, vector)| EigenPair::new(pair.eigenvalue(), vector))
                .collect::<Vec<_>>(),
        )?;
        if self.config.sort_descending {
            system = system.sorted_descending();
        }
        let rank_bound = n_features.min(n_samples - 1);
        let min_eigenvalue = self.config.min_eigenvalue;
        let retained = system
            .largest(rank_bound)
            .filtered(|pair| pair.eigenvalue() > min_eigenvalue);
        debug!(
            "PCA: kept {} of {} components (rank bound {}, eigenvalue > {:e})",
            retained.len(),
            system.len(),
            rank_bound,
            min_eigenvalue
        );

        let coefficients = basis_of(&retained, n_features).transpose().matmul(&diff)?;
        let result = PcaData::new(retained, coefficients, mean, tag)?;

        if log_enabled!(Level::Debug) {
            debug!(
                "PCA: orthogonality error of retained basis {:e}",
                diagnostics::orthogonality_error(&result.basis())
            );
        }
        debug!("PCA finished in {:?}", start.elapsed());
        Ok(result)
    }
}

/// Runs the default pipeline on `data` (features x samples): dual scatter for
/// wide data, covariance when `features <= samples`, Jacobi `epsilon = 1e-5`,
/// eigenvalue cut-off `1e-4`.
pub fn get_pca_data<T>(data: &Matrix, tag: T) -> Result<PcaData<T>> {
    Pca::new(PcaConfig::default()).run(data, tag)
}

/// Eigenvector matrix with the right row count even when there are no components.
fn basis_of(system: &EigenSystem, n_features: usize) -> Matrix {
    if system.is_empty() {
        Matrix::zeros(n_features, 0)
    } else {
        system.eigenvectors()
    }
}

/// Output of a PCA run: retained eigen-basis, per-sample coefficients, the mean
/// that was subtracted, and a caller tag.
///
/// Immutable once built; every accessor hands out a shared borrow or a copy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PcaData<T = ()> {
    eigen_system: EigenSystem,
    coefficients: Matrix,
    mean: ColumnVector,
    tag: T,
}

#[derive(Deserialize)]
struct RawPcaData<T> {
    eigen_system: EigenSystem,
    coefficients: Matrix,
    mean: ColumnVector,
    tag: T,
}

impl<T> PcaData<T> {
    /// Assembles PCA output from its parts after checking they fit together.
    ///
    /// # Errors
    /// `DimensionMismatch` when `coefficients` does not have one row per
    /// component, or when the eigenvector length differs from `mean.len()`.
    pub fn new(
        eigen_system: EigenSystem,
        coefficients: Matrix,
        mean: ColumnVector,
        tag: T,
    ) -> Result<Self> {
        if coefficients.nrows() != eigen_system.len() {
            return Err(LinalgError::DimensionMismatch {
                operation: "PcaData coefficients",
                left: coefficients.shape(),
                right: (eigen_system.len(), coefficients.ncols()),
            });
        }
        if let Some(dim) = eigen_system.dimension() {
            if dim != mean.len() {
                return Err(LinalgError::DimensionMismatch {
                    operation: "PcaData mean",
                    left: (mean.len(), 1),
                    right: (dim, 1),
                });
            }
        }
        Ok(Self {
            eigen_system,
            coefficients,
            mean,
            tag,
        })
    }

    pub fn eigen_system(&self) -> &EigenSystem {
        &self.eigen_system
    }

    /// `components x samples`; column `j` is sample `j` in the retained basis.
    pub fn coefficients(&self) -> &Matrix {
        &self.coefficients
    }

    pub fn mean(&self) -> &ColumnVector {
        &self.mean
    }

    pub fn tag(&self) -> &T {
        &self.tag
    }

    /// Same result with a different tag.
    pub fn with_tag<U>(self, tag: U) -> PcaData<U> {
        PcaData {
            eigen_system: self.eigen_system,
            coefficients: self.coefficients,
            mean: self.mean,
            tag,
        }
    }

    pub fn sample_count(&self) -> usize {
        self.coefficients.ncols()
    }

    pub fn component_count(&self) -> usize {
        self.eigen_system.len()
    }

    pub fn feature_count(&self) -> usize {
        self.mean.len()
    }

    pub fn eigenvalues(&self) -> Vector {
        self.eigen_system.eigenvalues()
    }

    /// Each retained eigenvalue divided by the sum of the retained eigenvalues.
    pub fn explained_variance_ratio(&self) -> Vector {
        let eigenvalues = self.eigenvalues();
        let total = eigenvalues.sum();
        if total > 0.0 {
            &eigenvalues / total
        } else {
            Vector::zeros(eigenvalues.len())
        }
    }

    /// `features x components` matrix of retained eigenvectors.
    pub fn basis(&self) -> Matrix {
        basis_of(&self.eigen_system, self.feature_count())
    }

    /// Coordinates of new samples (features x n) in the retained basis:
    /// `Eᵗ (samples - mean)`.
    ///
    /// # Errors
    /// `DimensionMismatch` when `samples.nrows() != feature_count()`.
    pub fn project(&self, samples: &Matrix) -> Result<Matrix> {
        self.check_features(samples.nrows(), "PCA project")?;
        let centered = (samples - &Matrix::repeat_column(&self.mean, samples.ncols()))?;
        self.basis().transpose().matmul(&centered)
    }

    /// Maps coefficients (components x n) back to feature space:
    /// `mean + E · coefficients`.
    ///
    /// # Errors
    /// `DimensionMismatch` when `coefficients.nrows() != component_count()`.
    pub fn reconstruct(&self, coefficients: &Matrix) -> Result<Matrix> {
        let spanned = self.basis().matmul(coefficients)?;
        &spanned + &Matrix::repeat_column(&self.mean, coefficients.ncols())
    }

    fn check_features(&self, rows: usize, operation: &'static str) -> Result<()> {
        if rows != self.feature_count() {
            return Err(LinalgError::DimensionMismatch {
                operation,
                left: (rows, 1),
                right: (self.feature_count(), 1),
            });
        }
        Ok(())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for PcaData<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawPcaData::<T>::deserialize(deserializer)?;
        PcaData::new(raw.eigen_system, raw.coefficients, raw.mean, raw.tag)
            .map_err(D::Error::custom)
    }
}
