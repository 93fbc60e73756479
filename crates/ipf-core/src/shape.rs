//! Broadcasting rules shared by every batched operation.
//!
//! Trailing axes are aligned, and an axis of length 1 stretches to match
//! the other operand.

use ndarray::{ArrayBase, ArrayViewD, Data, IxDyn};

use crate::error::{Result, VectorError};

/// Broadcast two shapes together, or fail with `ShapeMismatch`.
pub fn broadcast_shapes(left: &[usize], right: &[usize]) -> Result<Vec<usize>> {
    let ndim = left.len().max(right.len());
    let mut shape = vec![0; ndim];
    for (i, axis) in shape.iter_mut().enumerate() {
        let l = axis_len(left, ndim, i);
        let r = axis_len(right, ndim, i);
        *axis = match (l, r) {
            (a, b) if a == b => a,
            (1, b) => b,
            (a, 1) => a,
            _ => {
                return Err(VectorError::ShapeMismatch {
                    left: left.to_vec(),
                    right: right.to_vec(),
                });
            }
        };
    }
    Ok(shape)
}

fn axis_len(shape: &[usize], ndim: usize, i: usize) -> usize {
    let offset = ndim - shape.len();
    if i < offset { 1 } else { shape[i - offset] }
}

/// View `array` stretched to `shape`, reporting both shapes on failure.
pub fn broadcast_to<'a, S>(
    array: &'a ArrayBase<S, IxDyn>,
    shape: &[usize],
) -> Result<ArrayViewD<'a, f64>>
where
    S: Data<Elem = f64>,
{
    array
        .broadcast(IxDyn(shape))
        .ok_or_else(|| VectorError::ShapeMismatch {
            left: array.shape().to_vec(),
            right: shape.to_vec(),
        })
}

/// Round to `decimals` digits, ties to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

/// Number of elements described by a shape. The empty shape holds one.
pub fn shape_size(shape: &[usize]) -> usize {
    shape.iter().product()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_equal_shapes() {
        assert_eq!(broadcast_shapes(&[2, 3], &[2, 3]).unwrap(), vec![2, 3]);
    }

    #[test]
    fn test_broadcast_stretches_ones() {
        assert_eq!(broadcast_shapes(&[4, 1, 3], &[5, 3]).unwrap(), vec![4, 5, 3]);
        assert_eq!(broadcast_shapes(&[], &[7]).unwrap(), vec![7]);
    }

    #[test]
    fn test_broadcast_mismatch() {
        let err = broadcast_shapes(&[2, 3], &[4, 3]).unwrap_err();
        assert!(matches!(err, VectorError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.123_456_789_012_9, 12), 0.123_456_789_013);
        assert_eq!(round_to(1.000_000_000_01, 10), 1.0);
        assert_eq!(round_to(-1.000_000_000_01, 10), -1.0);
    }

    #[test]
    fn test_shape_size_of_scalar_shape() {
        assert_eq!(shape_size(&[]), 1);
        assert_eq!(shape_size(&[0, 4]), 0);
    }
}
