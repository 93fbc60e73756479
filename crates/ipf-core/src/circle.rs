use ndarray::{Array1, ArrayViewD};

use crate::error::{Result, VectorError};
use crate::rotation::Rotation;
use crate::shape::{broadcast_shapes, broadcast_to};
use crate::vector::{Vector3d, perpendicular_of};

/// Apply every rotation built from `axis` and `angles` to every vector.
///
/// `axis` defaults to +z. The rotation batch has the broadcast shape of the
/// axis batch and `angles`; the output shape is that shape followed by the
/// batch shape of `v`.
pub fn rotate(
    v: &Vector3d,
    axis: Option<&Vector3d>,
    angles: ArrayViewD<'_, f64>,
) -> Result<Vector3d> {
    let z = Vector3d::from_xyz([0.0, 0.0, 1.0]);
    let axis = axis.unwrap_or(&z);
    let axis_shape = axis.batch_shape();
    let rotation_shape = broadcast_shapes(axis_shape, angles.shape())?;

    // one angle per axis vector, both stretched to the rotation shape
    let axes = axis.data();
    let mut axes_shape = rotation_shape.clone();
    axes_shape.push(3);
    let axes = broadcast_to(axes, &axes_shape)?;
    let angles = broadcast_to(&angles, &rotation_shape)?;
    let axes = Vector3d::from_data(axes.to_owned());

    let rotations: Vec<Rotation> = axes
        .rows()
        .zip(angles.iter())
        .map(|(a, &angle)| Rotation::from_axis_angle(a, angle))
        .collect();

    let mut shape = rotation_shape;
    shape.extend_from_slice(v.batch_shape());
    let rows: Vec<[f64; 3]> = rotations
        .iter()
        .flat_map(|r| v.rows().map(move |row| r.apply(row)))
        .collect();
    Ok(Vector3d::filled(&shape, rows))
}

/// `steps` vectors on a circle of half-angle `opening_angle` around each
/// vector, shape `(size, steps)`.
///
/// Each vector is tilted off itself about its perpendicular by the opening
/// angle, then swept through `[0, 2π]` about the original direction, so
/// every point keeps the length of its source vector. `opening_angle` is
/// one angle for all vectors or one per vector.
pub fn get_circle(
    v: &Vector3d,
    opening_angle: ArrayViewD<'_, f64>,
    steps: usize,
) -> Result<Vector3d> {
    let n = v.size();
    let opening: Vec<f64> = match opening_angle.len() {
        1 => vec![opening_angle.iter().copied().next().unwrap_or(0.0); n],
        len if len == n => opening_angle.iter().copied().collect(),
        _ => {
            return Err(VectorError::ShapeMismatch {
                left: opening_angle.shape().to_vec(),
                right: v.batch_shape().to_vec(),
            });
        }
    };
    let sweep = Array1::linspace(0.0, std::f64::consts::TAU, steps);

    let mut rows = Vec::with_capacity(n * steps);
    for (pole, &angle) in v.rows().zip(&opening) {
        let perpendicular = perpendicular_of(pole).ok_or(VectorError::NoPerpendicular)?;
        let tilted = Rotation::from_axis_angle(perpendicular, angle).apply(pole);
        rows.extend(
            sweep
                .iter()
                .map(|&theta| Rotation::from_axis_angle(pole, theta).apply(tilted)),
        );
    }
    Ok(Vector3d::filled(&[n, steps], rows))
}
