// src/encoding.rs

//! Byte encoding of vectors, matrices, eigen systems and PCA results.
//!
//! Every data type implements `serde::Serialize`/`Deserialize` with a
//! layout that does not depend on this crate's internals:
//!
//! * vectors of any orientation: a sequence of `f64`
//! * matrices (plain, square, symmetric): a sequence of columns
//! * [`crate::EigenPair`]: `{ eigenvalue, eigenvector }`
//! * [`crate::EigenSystem`]: a sequence of pairs
//! * [`crate::PcaData`]: `{ eigen_system, coefficients, mean, tag }`
//!
//! The functions here pack any of them with bincode's standard configuration.
//! Decoding re-checks the structural invariants (equal column lengths,
//! squareness, shape agreement inside `PcaData`).

use std::io::{Read, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{LinalgError, Result};

/// Encodes `value` into a new byte buffer.
///
/// ```
/// use dual_pca::{encoding, ColumnVector};
///
/// let v = ColumnVector::from_slice(&[1.0, -2.5]);
/// let bytes = encoding::to_bytes(&v).unwrap();
/// let back: ColumnVector = encoding::from_bytes(&bytes).unwrap();
/// assert_eq!(back, v);
/// ```
pub fn to_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    bincode::serde::encode_to_vec(value, bincode::config::standard())
        .map_err(|e| LinalgError::Encoding(format!("failed to serialize: {}", e)))
}

/// Decodes a value from `bytes`, which must hold exactly one encoded value.
///
/// # Errors
/// `Encoding` when the bytes are malformed, violate an invariant of the
/// target type, or carry trailing data.
pub fn from_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let (value, consumed): (T, usize) =
        bincode::serde::decode_from_slice(bytes, bincode::config::standard())
            .map_err(|e| LinalgError::Encoding(format!("failed to deserialize: {}", e)))?;
    if consumed != bytes.len() {
        return Err(LinalgError::Encoding(format!(
            "{} trailing bytes after decoded value",
            bytes.len() - consumed
        )));
    }
    Ok(value)
}

/// Encodes `value` into `writer`, returning the number of bytes written.
pub fn write_to<T: Serialize + ?Sized, W: Write>(value: &T, writer: &mut W) -> Result<usize> {
    bincode::serde::encode_into_std_write(value, writer, bincode::config::standard())
        .map_err(|e| LinalgError::Encoding(format!("failed to serialize: {}", e)))
}

/// Decodes one value from `reader`.
pub fn read_from<T: DeserializeOwned, R: Read>(reader: &mut R) -> Result<T> {
    bincode::serde::decode_from_std_read(reader, bincode::config::standard())
        .map_err(|e| LinalgError::Encoding(format!("failed to deserialize: {}", e)))
}
