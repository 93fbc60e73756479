//! Spherical coordinates after ISO 31-11: azimuth φ ∈ [0, 2π) measured from
//! +x towards +y, polar θ ∈ [0, π] measured from +z, and radial r.
//!
//! The zero vector has no direction. It maps to azimuth 0, polar 0 and
//! radial 0 instead of NaN.

use std::f64::consts::TAU;

use ndarray::{ArrayD, ArrayViewD, Axis, IxDyn, Zip};

use crate::constants::AZIMUTH_SNAP;
use crate::error::Result;
use crate::shape::{broadcast_shapes, broadcast_to};
use crate::vector::Vector3d;

pub fn radial(v: &Vector3d) -> ArrayD<f64> {
    v.map_to_scalars(|r| (r[0] * r[0] + r[1] * r[1] + r[2] * r[2]).sqrt())
}

pub fn azimuth(v: &Vector3d) -> ArrayD<f64> {
    v.map_to_scalars(|r| azimuth_of(r[0], r[1]))
}

pub fn polar(v: &Vector3d) -> ArrayD<f64> {
    v.map_to_scalars(polar_of)
}

fn azimuth_of(x: f64, y: f64) -> f64 {
    // components that are numerically zero would otherwise flip atan2 by 2π
    let x = if x.abs() <= AZIMUTH_SNAP { 0.0 } else { x };
    let y = if y.abs() <= AZIMUTH_SNAP { 0.0 } else { y };
    let phi = y.atan2(x);
    if phi < 0.0 { phi + TAU } else { phi }
}

fn polar_of(v: [f64; 3]) -> f64 {
    let r = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if r == 0.0 {
        return 0.0;
    }
    (v[2] / r).clamp(-1.0, 1.0).acos()
}

pub fn to_polar(v: &Vector3d, degrees: bool) -> (ArrayD<f64>, ArrayD<f64>, ArrayD<f64>) {
    let mut phi = azimuth(v);
    let mut theta = polar(v);
    if degrees {
        phi.mapv_inplace(f64::to_degrees);
        theta.mapv_inplace(f64::to_degrees);
    }
    (phi, theta, radial(v))
}

/// Build vectors from azimuth, polar and optional radial arrays.
///
/// The three arrays broadcast together; scalars come out with batch shape
/// `(1,)`. `radial` defaults to 1, giving unit vectors. Angles are radians
/// unless `degrees` is set.
pub fn from_polar(
    azimuth: ArrayViewD<'_, f64>,
    polar: ArrayViewD<'_, f64>,
    radial: Option<ArrayViewD<'_, f64>>,
    degrees: bool,
) -> Result<Vector3d> {
    let azimuth = at_least_1d(azimuth);
    let polar = at_least_1d(polar);
    let radial = match radial {
        Some(r) => r.to_owned(),
        None => ArrayD::from_elem(IxDyn(&[1]), 1.0),
    };

    let shape = broadcast_shapes(azimuth.shape(), polar.shape())?;
    let shape = broadcast_shapes(&shape, radial.shape())?;
    let azimuth = broadcast_to(&azimuth, &shape)?;
    let polar = broadcast_to(&polar, &shape)?;
    let radial = broadcast_to(&radial, &shape)?;

    let mut rows = Vec::with_capacity(azimuth.len());
    Zip::from(&azimuth)
        .and(&polar)
        .and(&radial)
        .for_each(|&phi, &theta, &r| {
            let (phi, theta) = if degrees {
                (phi.to_radians(), theta.to_radians())
            } else {
                (phi, theta)
            };
            let sin_theta = theta.sin();
            rows.push([
                r * phi.cos() * sin_theta,
                r * phi.sin() * sin_theta,
                r * theta.cos(),
            ]);
        });
    Ok(Vector3d::filled(&shape, rows))
}

fn at_least_1d(a: ArrayViewD<'_, f64>) -> ArrayD<f64> {
    if a.ndim() == 0 {
        a.insert_axis(Axis(0)).to_owned()
    } else {
        a.to_owned()
    }
}
