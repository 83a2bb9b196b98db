// Role-typed dense linear algebra and dual-trick principal component analysis (PCA)

#![doc = include_str!("../README.md")]

pub mod diagnostics;
pub mod eigen;
pub mod encoding;
pub mod error;
pub mod jacobi;
pub mod matrix;
pub mod pca;
pub mod square;
pub mod symmetric;
pub mod vector;
mod vector_ops;

pub use eigen::{EigenPair, EigenSystem};
pub use error::{LinalgError, Result};
pub use jacobi::{ConvergenceStatus, EigenOutcome, JacobiSolver, SymmetricEigenSolver};
pub use matrix::Matrix;
pub use pca::{get_pca_data, Pca, PcaConfig, PcaData, ScatterStrategy};
pub use square::SquareMatrix;
pub use symmetric::SymmetricMatrix;
pub use vector::{Column, ColumnVector, Orientation, Row, RowVector, Unoriented, Vector};

#[cfg(test)]
mod vector_tests;
