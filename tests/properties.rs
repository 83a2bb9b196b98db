// tests/properties.rs
//
// Algebraic identities checked over seeded random inputs.

use approx::assert_abs_diff_eq;
use dual_pca::diagnostics::{eigen_residual, orthogonality_error};
use dual_pca::{
    encoding, ColumnVector, LinalgError, Matrix, RowVector, SquareMatrix, SymmetricMatrix,
};
use float_cmp::{ApproxEq, F64Margin};
use ndarray::Array2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const CASES: u64 = 20;

fn random_column(rng: &mut ChaCha8Rng, len: usize) -> ColumnVector {
    (0..len).map(|_| rng.gen_range(-10.0..10.0)).collect()
}

fn random_matrix(rng: &mut ChaCha8Rng, rows: usize, cols: usize) -> Matrix {
    Matrix::from(Array2::from_shape_fn((rows, cols), |_| rng.gen_range(-1.0..1.0)))
}

#[test]
fn vector_identities() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    for _ in 0..CASES {
        let len = rng.gen_range(1..12);
        let a = random_column(&mut rng, len);
        let b = random_column(&mut rng, len);

        assert_eq!((&a + &a).unwrap(), &a * 2.0);
        assert_eq!(((&a + &b).unwrap() - b.clone()).unwrap(), a);
        assert_eq!(a.inner_product(&b).unwrap(), b.inner_product(&a).unwrap());
        assert_eq!((&a.to_row() * &b).unwrap(), a.inner_product(&b).unwrap());

        let n = a.normalized();
        assert_abs_diff_eq!(n.norm(), 1.0, epsilon = 1e-12);
        assert_eq!(n.normalized(), n);

        let idx = rng.gen_range(0..len);
        let removed = a.remove_range(idx, idx).unwrap();
        assert_eq!(removed.insert_at(idx, a[idx]).unwrap(), a);
        assert_eq!(a.slice_between(0, len - 1).unwrap(), a);
    }
}

#[test]
fn outer_product_has_rank_one_structure() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let col = random_column(&mut rng, 4);
    let row: RowVector = random_column(&mut rng, 3).to_row();
    let outer = &col * &row;
    for i in 0..4 {
        let scaled = &row * col[i];
        assert_eq!(outer.row(i).unwrap(), scaled);
    }
}

#[test]
fn matrix_identities() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    for _ in 0..CASES {
        let (r, k, c) = (rng.gen_range(1..6), rng.gen_range(1..6), rng.gen_range(1..6));
        let a = random_matrix(&mut rng, r, k);
        let b = random_matrix(&mut rng, k, c);

        assert_eq!(a.transpose().transpose(), a);
        let ab_t = (&a * &b).unwrap().transpose();
        let bt_at = (&b.transpose() * &a.transpose()).unwrap();
        assert_eq!(ab_t, bt_at);

        let x = random_column(&mut rng, c);
        let left = (&(&a * &b).unwrap() * &x).unwrap();
        let right = (&a * &(&b * &x).unwrap()).unwrap();
        let margin = F64Margin {
            epsilon: 1e-9,
            ulps: 0,
        };
        assert!((&left).approx_eq(&right, margin));
    }
}

#[test]
fn inverse_round_trip() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    for n in 1..8 {
        let mut raw = random_matrix(&mut rng, n, n).into_array();
        for i in 0..n {
            raw[[i, i]] += n as f64 + 1.0;
        }
        let a = SquareMatrix::new(Matrix::from(raw)).unwrap();
        let inv = a.inverse().unwrap();
        assert_eq!((&a * &inv).unwrap(), SquareMatrix::identity(n));

        let det = a.det().unwrap();
        let det_inv = inv.det().unwrap();
        assert_abs_diff_eq!(det * det_inv, 1.0, epsilon = 1e-9);
    }
}

#[test]
fn symmetric_eigen_identities() {
    let mut rng = ChaCha8Rng::seed_from_u64(31);
    for n in 1..9 {
        let base = random_matrix(&mut rng, n + 2, n);
        let s = SymmetricMatrix::gram(&base);
        let system = s.eigen_system(1e-12).unwrap();
        for pair in system.iter() {
            assert!(eigen_residual(&s, pair).unwrap() < 1e-9);
            // Gram matrices are positive semi-definite
            assert!(pair.eigenvalue() > -1e-9);
        }
        assert!(orthogonality_error(&system.eigenvectors()) < 1e-10);
    }
}

#[test]
fn encoding_round_trips() {
    let mut rng = ChaCha8Rng::seed_from_u64(12);
    let v = random_column(&mut rng, 9);
    let back: ColumnVector = encoding::from_bytes(&encoding::to_bytes(&v).unwrap()).unwrap();
    assert_eq!(back.as_slice(), v.as_slice());

    let m = random_matrix(&mut rng, 3, 5);
    let back: Matrix = encoding::from_bytes(&encoding::to_bytes(&m).unwrap()).unwrap();
    assert_eq!(back.to_array(), m.to_array());

    let s = SymmetricMatrix::gram(&m);
    let back: SymmetricMatrix = encoding::from_bytes(&encoding::to_bytes(&s).unwrap()).unwrap();
    assert_eq!(back, s);

    let empty: Matrix = encoding::from_bytes(&encoding::to_bytes(&Matrix::zeros(0, 0)).unwrap()).unwrap();
    assert_eq!(empty.shape(), (0, 0));

    // a non-square matrix cannot be decoded as square
    let bytes = encoding::to_bytes(&m).unwrap();
    assert!(matches!(
        encoding::from_bytes::<SquareMatrix>(&bytes),
        Err(LinalgError::Encoding(_))
    ));
}
