// src/vector_tests.rs

use crate::error::LinalgError;
use crate::vector::{ColumnVector, RowVector, Vector};
use float_cmp::{approx_eq, assert_approx_eq, ApproxEq, F64Margin};

fn v(values: &[f64]) -> Vector {
    Vector::from_slice(values)
}

#[cfg(test)]
mod construction_and_access {
    use super::*;

    #[test]
    fn constructors_fill_as_expected() {
        assert_eq!(Vector::<crate::Unoriented>::zeros(3).as_slice(), &[0.0, 0.0, 0.0]);
        assert_eq!(ColumnVector::filled(2.5, 2).as_slice(), &[2.5, 2.5]);
        assert_eq!(RowVector::from_f32_slice(&[1.5f32, -2.0]).as_slice(), &[1.5, -2.0]);
        assert!(Vector::<crate::Unoriented>::default().is_empty());
        let collected: RowVector = (1..=3).map(f64::from).collect();
        assert_eq!(collected.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn get_and_set_are_bounds_checked() {
        let mut x = v(&[1.0, 2.0, 3.0]);
        assert_eq!(x.get(2), Ok(3.0));
        assert_eq!(
            x.get(3),
            Err(LinalgError::IndexOutOfBounds { index: 3, len: 3 })
        );
        x.set(0, 9.0).unwrap();
        assert_eq!(x[0], 9.0);
        assert!(matches!(
            x.set(7, 1.0),
            Err(LinalgError::IndexOutOfBounds { index: 7, len: 3 })
        ));
    }

    #[test]
    fn reductions() {
        let x = v(&[3.0, 4.0]);
        assert_eq!(x.sum(), 7.0);
        assert_eq!(x.norm(), 5.0);
        assert_eq!(x.average(), Some(3.5));
        assert_eq!(v(&[]).average(), None);
        assert_eq!(v(&[]).norm(), 0.0);
    }

    #[test]
    fn role_conversions_copy_values() {
        let col = ColumnVector::from_slice(&[1.0, 2.0]);
        let row = col.to_row();
        let plain = row.to_unoriented();
        assert_eq!(row.as_slice(), col.as_slice());
        assert_eq!(plain.to_column(), col);
    }
}

#[cfg(test)]
mod arithmetic {
    use super::*;

    #[test]
    fn add_and_sub_check_lengths() {
        let a = v(&[1.0, 2.0, 3.0]);
        let b = v(&[0.5, 0.5, 0.5]);
        assert_eq!((&a + &b).unwrap().as_slice(), &[1.5, 2.5, 3.5]);
        assert_eq!((&a - &b).unwrap().as_slice(), &[0.5, 1.5, 2.5]);
        assert_eq!((a.clone() + a.clone()).unwrap(), &a * 2.0);

        let short = v(&[1.0]);
        match &a + &short {
            Err(LinalgError::DimensionMismatch { left, right, .. }) => {
                assert_eq!(left, (3, 1));
                assert_eq!(right, (1, 1));
            }
            other => panic!("expected DimensionMismatch, got {:?}", other),
        }
        assert!((&short - &a).is_err());
    }

    #[test]
    fn scalar_ops_never_fail() {
        let a = ColumnVector::from_slice(&[2.0, -4.0]);
        assert_eq!((&a * 0.5).as_slice(), &[1.0, -2.0]);
        assert_eq!((3.0 * &a).as_slice(), &[6.0, -12.0]);
        assert_eq!((&a / 2.0).as_slice(), &[1.0, -2.0]);
        assert_eq!((-&a).as_slice(), &[-2.0, 4.0]);
        assert_eq!((a.clone() * 1.0), a);
    }

    #[test]
    fn operators_leave_operands_untouched() {
        let a = v(&[1.0, 2.0]);
        let snapshot = a.to_vec();
        let _ = (&a + &a).unwrap();
        let _ = &a * 3.0;
        let _ = a.normalized();
        let _ = a.insert_at_end(5.0);
        assert_eq!(a.as_slice(), snapshot.as_slice());
    }

    #[test]
    fn row_times_column_is_inner_product() {
        let row = RowVector::from_slice(&[1.0, 2.0, 3.0]);
        let col = ColumnVector::from_slice(&[4.0, 5.0, 6.0]);
        assert_eq!((&row * &col).unwrap(), 32.0);
        assert_eq!((row.clone() * col.clone()).unwrap(), 32.0);
        let short = ColumnVector::from_slice(&[1.0]);
        assert!(matches!(
            &row * &short,
            Err(LinalgError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn column_times_row_is_outer_product() {
        let col = ColumnVector::from_slice(&[1.0, 2.0]);
        let row = RowVector::from_slice(&[3.0, 4.0, 5.0]);
        let m = &col * &row;
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.row(1).unwrap().as_slice(), &[6.0, 8.0, 10.0]);
        assert_eq!(m.column(0).unwrap().as_slice(), &[3.0, 6.0]);
    }

    #[test]
    fn inner_product_is_symmetric() {
        let a = ColumnVector::from_slice(&[1.0, -2.0, 0.5]);
        let b = ColumnVector::from_slice(&[4.0, 0.25, 8.0]);
        assert_eq!(a.inner_product(&b).unwrap(), b.inner_product(&a).unwrap());
        assert_eq!(a.inner_product(&b).unwrap(), 7.5);
        assert!(a.inner_product(&ColumnVector::zeros(2)).is_err());
    }

    #[test]
    fn elementwise_mul_is_not_inner_product() {
        let a = v(&[1.0, 2.0, 3.0]);
        let b = v(&[4.0, 5.0, 6.0]);
        assert_eq!(a.elementwise_mul(&b).unwrap().as_slice(), &[4.0, 10.0, 18.0]);
        assert!(a.elementwise_mul(&v(&[1.0])).is_err());
    }
}

#[cfg(test)]
mod structure {
    use super::*;

    #[test]
    fn insert_at_bounds() {
        let a = v(&[1.0, 2.0, 3.0]);
        assert_eq!(a.insert_at(3, 4.0).unwrap().as_slice(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(a.insert_at(0, 0.0).unwrap().as_slice(), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(a.insert_at(1, 9.0).unwrap().as_slice(), &[1.0, 9.0, 2.0, 3.0]);
        assert_eq!(
            a.insert_at(4, 0.0),
            Err(LinalgError::IndexOutOfBounds { index: 4, len: 3 })
        );
    }

    #[test]
    fn insert_vector_and_concat() {
        let a = v(&[1.0, 4.0]);
        let b = v(&[2.0, 3.0]);
        assert_eq!(a.insert_vector_at(1, &b).unwrap().as_slice(), &[1.0, 2.0, 3.0, 4.0]);
        assert!(a.insert_vector_at(3, &b).is_err());
        assert_eq!(a.concat(&b).as_slice(), &[1.0, 4.0, 2.0, 3.0]);
        assert_eq!(a.insert_at_start(0.0).as_slice(), &[0.0, 1.0, 4.0]);
        assert_eq!(a.insert_at_end(5.0).as_slice(), &[1.0, 4.0, 5.0]);
    }

    #[test]
    fn remove_elements_dedupes_and_checks() {
        let a = v(&[10.0, 11.0, 12.0, 13.0]);
        assert_eq!(a.remove_elements_at(&[3, 1, 1]).unwrap().as_slice(), &[10.0, 12.0]);
        assert_eq!(a.remove_elements_at(&[]).unwrap(), a);
        assert_eq!(
            a.remove_elements_at(&[0, 4]),
            Err(LinalgError::IndexOutOfBounds { index: 4, len: 4 })
        );
    }

    #[test]
    fn remove_range_is_inclusive() {
        let a = v(&[0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(a.remove_range(1, 3).unwrap().as_slice(), &[0.0, 4.0]);
        assert_eq!(a.remove_to_end(3).unwrap().as_slice(), &[0.0, 1.0, 2.0]);
        assert_eq!(a.remove_from_start(1).unwrap().as_slice(), &[2.0, 3.0, 4.0]);
        assert_eq!(
            a.remove_range(3, 1),
            Err(LinalgError::InvalidRange { start: 3, end: 1, len: 5 })
        );
        assert!(a.remove_range(0, 5).is_err());

        let single = v(&[7.0]);
        assert!(single.remove_range(0, 0).unwrap().is_empty());
        assert!(v(&[]).remove_to_end(0).is_err());
    }

    #[test]
    fn slices_are_inclusive() {
        let a = v(&[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(a.slice_between(1, 2).unwrap().as_slice(), &[1.0, 2.0]);
        assert_eq!(a.slice_between(2, 2).unwrap().as_slice(), &[2.0]);
        assert_eq!(a.slice_to_end(2).unwrap().as_slice(), &[2.0, 3.0]);
        assert_eq!(a.slice_from_start(1).unwrap().as_slice(), &[0.0, 1.0]);
        assert!(a.slice_between(2, 4).is_err());
        assert!(a.slice_to_end(4).is_err());
    }

    #[test]
    fn normalized_has_unit_norm() {
        let a = RowVector::from_slice(&[3.0, 4.0]);
        let n = a.normalized();
        assert_approx_eq!(f64, n.norm(), 1.0, epsilon = 1e-12);
        assert_eq!(n.as_slice(), &[0.6, 0.8]);
        assert_eq!(n.normalized(), n);

        let zero = RowVector::zeros(3);
        assert_eq!(zero.normalized(), zero);
    }

    #[test]
    fn separated_needs_exact_division() {
        let a = ColumnVector::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let parts = a.separated(3).unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].as_slice(), &[3.0, 4.0]);
        assert_eq!(a.separated(1).unwrap()[0], a);
        assert!(matches!(
            a.separated(4),
            Err(LinalgError::DimensionMismatch { .. })
        ));
        assert!(a.separated(0).is_err());
    }

    #[test]
    fn differential_is_forward_difference() {
        let a = RowVector::from_slice(&[5.0, 3.0, 4.0]);
        assert_eq!(a.differential().as_slice(), &[2.0, -1.0]);
        assert!(RowVector::from_slice(&[1.0]).differential().is_empty());
        assert!(RowVector::default().differential().is_empty());
    }
}

#[cfg(test)]
mod equality_and_serde {
    use super::*;

    #[test]
    fn equality_uses_tolerance() {
        let a = v(&[1.0, 2.0]);
        assert_eq!(a, v(&[1.0 + 1e-12, 2.0 - 1e-12]));
        assert_ne!(a, v(&[1.0, 2.0 + 1e-6]));
        assert_ne!(a, v(&[1.0, 2.0, 0.0]));
        assert!(approx_eq!(f64, 0.1 + 0.2, 0.3, ulps = 2));
        assert!((&a).approx_eq(&v(&[1.05, 2.0]), F64Margin { epsilon: 0.1, ulps: 0 }));
    }

    #[test]
    fn json_layout_is_a_plain_sequence() {
        let col = ColumnVector::from_slice(&[1.0, -0.5]);
        let json = serde_json::to_string(&col).unwrap();
        assert_eq!(json, "[1.0,-0.5]");
        let back: ColumnVector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, col);
        assert_eq!(format!("{:?}", col), "ColumnVector[1.0, -0.5]");
    }
}
