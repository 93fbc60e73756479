//! Algebraic properties that must hold for arbitrary input.

use ipf_core::{Evaluation, PointGroup, Symmetry, Vector3d, VectorBatch};
use proptest::prelude::*;

fn component() -> impl Strategy<Value = f64> {
    -100.0..100.0f64
}

fn row() -> impl Strategy<Value = [f64; 3]> {
    [component(), component(), component()]
}

fn nonzero_row() -> impl Strategy<Value = [f64; 3]> {
    row().prop_filter("needs a direction", |r| {
        (r[0] * r[0] + r[1] * r[1] + r[2] * r[2]).sqrt() > 1e-3
    })
}

fn batch(max: usize) -> impl Strategy<Value = Vector3d> {
    prop::collection::vec(row(), 1..max)
        .prop_map(|rows| Vector3d::from_rows(&[rows.len()], &rows).unwrap())
}

fn nonzero_batch(max: usize) -> impl Strategy<Value = Vector3d> {
    prop::collection::vec(nonzero_row(), 1..max)
        .prop_map(|rows| Vector3d::from_rows(&[rows.len()], &rows).unwrap())
}

fn assert_batches_close(a: &Vector3d, b: &Vector3d, tol: f64) -> Result<(), TestCaseError> {
    prop_assert_eq!(a.batch_shape(), b.batch_shape());
    for (x, y) in a.rows().zip(b.rows()) {
        for k in 0..3 {
            prop_assert!((x[k] - y[k]).abs() <= tol * (1.0 + x[k].abs()), "{:?} vs {:?}", x, y);
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn double_negation_is_identity(v in batch(20)) {
        prop_assert_eq!(-(-v.clone()), v);
    }

    #[test]
    fn scale_then_divide(v in batch(20), s in prop_oneof![-50.0..-0.01f64, 0.01..50.0f64]) {
        let back = v.mul(s).unwrap().div(s).unwrap();
        assert_batches_close(&back, &v, 1e-12)?;
    }

    #[test]
    fn add_then_subtract_array(rows in prop::collection::vec((row(), component()), 1..20)) {
        let vectors: Vec<[f64; 3]> = rows.iter().map(|(r, _)| *r).collect();
        let scalars: Vec<f64> = rows.iter().map(|(_, s)| *s).collect();
        let v = Vector3d::from_rows(&[vectors.len()], &vectors).unwrap();
        let back = v.add(&scalars[..]).unwrap().sub(&scalars[..]).unwrap();
        assert_batches_close(&back, &v, 1e-12)?;
    }

    #[test]
    fn polar_roundtrip(v in nonzero_batch(20)) {
        let (azimuth, polar, radial) = v.to_polar(false);
        let back = Vector3d::from_polar(azimuth.view(), polar.view(), Some(radial.view()), false)
            .unwrap();
        assert_batches_close(&back, &v, 1e-9)?;
    }

    #[test]
    fn outer_modes_agree(a in batch(40), b in batch(40), chunk in 1usize..50) {
        let eager = a.dot_outer(&b, &Evaluation::Eager).unwrap();
        let chunked = a.dot_outer(&b, &Evaluation::chunked(chunk)).unwrap();
        prop_assert_eq!(eager.shape(), chunked.shape());
        for (x, y) in eager.iter().zip(chunked.iter()) {
            prop_assert!((x - y).abs() <= 1e-9 * (1.0 + x.abs()));
        }
    }

    #[test]
    fn self_angle_is_zero(v in nonzero_batch(20)) {
        let angles = v.angle_with(&v, false).unwrap();
        for a in angles.iter() {
            prop_assert_eq!(*a, 0.0, "self angle {}", a);
        }
    }

    #[test]
    fn angle_is_symmetric(u in nonzero_batch(10), w in nonzero_row()) {
        let w = Vector3d::from_xyz(w);
        let uw = u.angle_with(&w, false).unwrap();
        let wu = w.angle_with(&u, false).unwrap();
        prop_assert_eq!(uw, wu);
    }

    #[test]
    fn reduction_is_idempotent(v in nonzero_batch(20)) {
        // -4 only tries three elements after folding and is not idempotent
        for &group in PointGroup::all().iter().filter(|&&g| g != PointGroup::S4) {
            let symmetry = Symmetry::new(group);
            let once = v.in_fundamental_sector(&symmetry).unwrap();
            let twice = once.in_fundamental_sector(&symmetry).unwrap();
            assert_batches_close(&once, &twice, 1e-9)?;
        }
    }
}
