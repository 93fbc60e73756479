//! Batched 3-vectors.
//!
//! A [`Vector3d`] wraps an `ndarray` array of shape `(*batch_shape, 3)`. The
//! batch shape may be empty (a single vector) or any rank. Every geometric
//! operation lives on the [`VectorBatch`] trait so that concrete variants
//! (plain vectors, sector normals) get results of their own kind back.

use std::collections::HashSet;
use std::fmt;
use std::ops::Neg;

use ndarray::{
    Array1, Array2, ArrayBase, ArrayD, ArrayViewD, ArrayViewMutD, Axis, Data, IxDyn, Zip,
};
use rand::Rng;

use crate::constants::COSINE_DECIMALS;
use crate::error::{Result, VectorError};
use crate::outer::{self, Evaluation};
use crate::shape::{broadcast_shapes, broadcast_to, round_to, shape_size};
use crate::symmetry::PointSymmetry;
use crate::{circle, nearest, sector, spherical};

/// Batch of 3D vectors with arbitrary batch shape.
#[derive(Clone, Debug, PartialEq)]
pub struct Vector3d {
    data: ArrayD<f64>,
}

/// Exact component tuple of one vector, hashable. `-0.0` and `0.0` match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VectorKey([u64; 3]);

impl From<[f64; 3]> for VectorKey {
    fn from(v: [f64; 3]) -> Self {
        Self(v.map(|c| (c + 0.0).to_bits()))
    }
}

impl Vector3d {
    /// Wrap raw data. The last axis must have length 3.
    pub fn new(data: ArrayD<f64>) -> Result<Self> {
        match data.shape().last() {
            Some(3) => Ok(Self { data }),
            Some(n) => Err(VectorError::InvalidData(format!(
                "last axis must have length 3, got {n}"
            ))),
            None => Err(VectorError::InvalidData(
                "vector data needs at least one axis".to_string(),
            )),
        }
    }

    /// Data produced by an operation that already keeps the trailing 3.
    pub(crate) fn from_data(data: ArrayD<f64>) -> Self {
        debug_assert_eq!(data.shape().last(), Some(&3));
        Self { data }
    }

    /// A single vector with empty batch shape.
    pub fn from_xyz(xyz: [f64; 3]) -> Self {
        Self {
            data: Array1::from(xyz.to_vec()).into_dyn(),
        }
    }

    /// Build a batch of `batch_shape` from row-major rows.
    pub fn from_rows(batch_shape: &[usize], rows: &[[f64; 3]]) -> Result<Self> {
        let expected = shape_size(batch_shape);
        if rows.len() != expected {
            return Err(VectorError::InvalidData(format!(
                "batch shape {batch_shape:?} holds {expected} vectors, got {}",
                rows.len()
            )));
        }
        Ok(Self::filled(batch_shape, rows.iter().copied()))
    }

    /// Fill a new batch from an iterator that yields exactly
    /// `shape_size(batch_shape)` rows.
    pub(crate) fn filled(batch_shape: &[usize], rows: impl IntoIterator<Item = [f64; 3]>) -> Self {
        let mut shape = batch_shape.to_vec();
        shape.push(3);
        let mut data = ArrayD::zeros(IxDyn(&shape));
        for (mut lane, row) in data
            .lanes_mut(Axis(batch_shape.len()))
            .into_iter()
            .zip(rows)
        {
            lane[0] = row[0];
            lane[1] = row[1];
            lane[2] = row[2];
        }
        Self { data }
    }

    /// Batch of shape `(0,)`.
    pub fn empty() -> Self {
        Self {
            data: ArrayD::zeros(IxDyn(&[0, 3])),
        }
    }

    /// `n` unit vectors uniformly distributed on the sphere.
    pub fn random_unit(n: usize, rng: &mut impl Rng) -> Self {
        let rows: Vec<[f64; 3]> = (0..n)
            .map(|_| {
                let z = 2.0 * rng.random::<f64>() - 1.0;
                let phi = std::f64::consts::TAU * rng.random::<f64>();
                let r = (1.0 - z * z).max(0.0).sqrt();
                [r * phi.cos(), r * phi.sin(), z]
            })
            .collect();
        Self::filled(&[n], rows)
    }

    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    pub fn into_data(self) -> ArrayD<f64> {
        self.data
    }

    /// Shape without the trailing component axis.
    pub fn batch_shape(&self) -> &[usize] {
        &self.data.shape()[..self.data.ndim() - 1]
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim() - 1
    }

    /// Number of vectors.
    pub fn size(&self) -> usize {
        shape_size(self.batch_shape())
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn component_axis(&self) -> Axis {
        Axis(self.data.ndim() - 1)
    }

    pub fn x(&self) -> ArrayViewD<'_, f64> {
        self.data.index_axis(self.component_axis(), 0)
    }

    pub fn y(&self) -> ArrayViewD<'_, f64> {
        self.data.index_axis(self.component_axis(), 1)
    }

    pub fn z(&self) -> ArrayViewD<'_, f64> {
        self.data.index_axis(self.component_axis(), 2)
    }

    /// Writable view of the x components; writes land in this batch.
    pub fn x_mut(&mut self) -> ArrayViewMutD<'_, f64> {
        let axis = self.component_axis();
        self.data.index_axis_mut(axis, 0)
    }

    pub fn y_mut(&mut self) -> ArrayViewMutD<'_, f64> {
        let axis = self.component_axis();
        self.data.index_axis_mut(axis, 1)
    }

    pub fn z_mut(&mut self) -> ArrayViewMutD<'_, f64> {
        let axis = self.component_axis();
        self.data.index_axis_mut(axis, 2)
    }

    /// The three component arrays, handy for plotting.
    pub fn xyz(&self) -> (ArrayViewD<'_, f64>, ArrayViewD<'_, f64>, ArrayViewD<'_, f64>) {
        (self.x(), self.y(), self.z())
    }

    /// Vectors in row-major order of the batch shape.
    pub fn rows(&self) -> impl Iterator<Item = [f64; 3]> + '_ {
        self.data
            .lanes(self.component_axis())
            .into_iter()
            .map(|lane| [lane[0], lane[1], lane[2]])
    }

    /// Flattened `(size, 3)` copy of the data.
    pub fn to_rows(&self) -> Array2<f64> {
        let mut out = Array2::zeros((self.size(), 3));
        for (mut row, lane) in out
            .rows_mut()
            .into_iter()
            .zip(self.data.lanes(self.component_axis()))
        {
            row.assign(&lane);
        }
        out
    }

    /// Same vectors with batch shape `(size,)`.
    pub fn flatten(&self) -> Self {
        Self::filled(&[self.size()], self.rows())
    }

    /// Single vector at flat index `index`.
    pub fn get(&self, index: usize) -> Option<Self> {
        self.rows().nth(index).map(Self::from_xyz)
    }

    /// The set of distinct vectors, compared by exact components.
    pub fn tuples(&self) -> HashSet<VectorKey> {
        self.rows().map(VectorKey::from).collect()
    }

    /// Apply `f` to every vector, keeping the batch shape.
    pub(crate) fn map_rows(&self, mut f: impl FnMut([f64; 3]) -> [f64; 3]) -> Self {
        let mut data = self.data.clone();
        let axis = self.component_axis();
        for mut lane in data.lanes_mut(axis) {
            let r = f([lane[0], lane[1], lane[2]]);
            lane[0] = r[0];
            lane[1] = r[1];
            lane[2] = r[2];
        }
        Self { data }
    }

    /// Reduce every vector to a scalar, giving an array of the batch shape.
    pub(crate) fn map_to_scalars(&self, mut f: impl FnMut([f64; 3]) -> f64) -> ArrayD<f64> {
        self.data
            .map_axis(self.component_axis(), |lane| f([lane[0], lane[1], lane[2]]))
    }
}

impl fmt::Display for Vector3d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims: Vec<String> = self.batch_shape().iter().map(|d| d.to_string()).collect();
        let shape = if dims.len() == 1 {
            format!("({},)", dims[0])
        } else {
            format!("({})", dims.join(", "))
        };
        writeln!(f, "Vector3d {shape}")?;
        for (i, r) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[{:.4} {:.4} {:.4}]", r[0], r[1], r[2])?;
        }
        Ok(())
    }
}

impl Neg for Vector3d {
    type Output = Vector3d;

    fn neg(self) -> Vector3d {
        Vector3d { data: -self.data }
    }
}

impl Neg for &Vector3d {
    type Output = Vector3d;

    fn neg(self) -> Vector3d {
        Vector3d {
            data: -&self.data,
        }
    }
}

/// Right-hand side of batched arithmetic.
///
/// An `Array` is one scalar per vector: it gains a trailing axis and is
/// broadcast against the batch shape, never against the components.
#[derive(Clone, Debug)]
pub enum Operand<'a> {
    Scalar(f64),
    Array(ArrayViewD<'a, f64>),
    Vectors(&'a Vector3d),
}

impl From<f64> for Operand<'_> {
    fn from(s: f64) -> Self {
        Operand::Scalar(s)
    }
}

impl<'a> From<ArrayViewD<'a, f64>> for Operand<'a> {
    fn from(a: ArrayViewD<'a, f64>) -> Self {
        Operand::Array(a)
    }
}

impl<'a> From<&'a ArrayD<f64>> for Operand<'a> {
    fn from(a: &'a ArrayD<f64>) -> Self {
        Operand::Array(a.view())
    }
}

impl<'a> From<&'a [f64]> for Operand<'a> {
    fn from(a: &'a [f64]) -> Self {
        Operand::Array(ndarray::ArrayView1::from(a).into_dyn())
    }
}

impl<'a> From<&'a Vector3d> for Operand<'a> {
    fn from(v: &'a Vector3d) -> Self {
        Operand::Vectors(v)
    }
}

fn zip_broadcast<S1, S2>(
    a: &ArrayBase<S1, IxDyn>,
    b: &ArrayBase<S2, IxDyn>,
    op: impl Fn(f64, f64) -> f64,
) -> Result<ArrayD<f64>>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    let shape = broadcast_shapes(a.shape(), b.shape())?;
    let a = broadcast_to(a, &shape)?;
    let b = broadcast_to(b, &shape)?;
    Ok(Zip::from(&a).and(&b).map_collect(|&x, &y| op(x, y)))
}

fn combine(
    lhs: &ArrayD<f64>,
    rhs: Operand<'_>,
    op: impl Fn(f64, f64) -> f64,
) -> Result<ArrayD<f64>> {
    match rhs {
        Operand::Scalar(s) => Ok(lhs.mapv(|a| op(a, s))),
        Operand::Array(array) => {
            let axis = Axis(array.ndim());
            let per_vector = array.insert_axis(axis);
            zip_broadcast(lhs, &per_vector, op)
        }
        Operand::Vectors(v) => zip_broadcast(lhs, &v.data, op),
    }
}

/// Variant-preserving vector operations.
///
/// Implementors only say how to view themselves as plain vectors and how to
/// rebuild from plain vectors; every operation is provided.
pub trait VectorBatch: Sized {
    fn as_vector3d(&self) -> &Vector3d;

    fn from_vector3d(vectors: Vector3d) -> Self;

    fn batch_shape(&self) -> &[usize] {
        self.as_vector3d().batch_shape()
    }

    fn size(&self) -> usize {
        self.as_vector3d().size()
    }

    /// Zero vectors of the given batch shape.
    fn zero(batch_shape: &[usize]) -> Self {
        let mut shape = batch_shape.to_vec();
        shape.push(3);
        Self::from_vector3d(Vector3d::from_data(ArrayD::zeros(IxDyn(&shape))))
    }

    fn xvector() -> Self {
        Self::from_vector3d(Vector3d::from_xyz([1.0, 0.0, 0.0]))
    }

    fn yvector() -> Self {
        Self::from_vector3d(Vector3d::from_xyz([0.0, 1.0, 0.0]))
    }

    fn zvector() -> Self {
        Self::from_vector3d(Vector3d::from_xyz([0.0, 0.0, 1.0]))
    }

    fn add<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Self> {
        let data = combine(&self.as_vector3d().data, rhs.into(), |a, b| a + b)?;
        Ok(Self::from_vector3d(Vector3d::from_data(data)))
    }

    fn sub<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Self> {
        let data = combine(&self.as_vector3d().data, rhs.into(), |a, b| a - b)?;
        Ok(Self::from_vector3d(Vector3d::from_data(data)))
    }

    /// `lhs - self` for a scalar or per-vector array on the left.
    fn rsub<'a>(&self, lhs: impl Into<Operand<'a>>) -> Result<Self> {
        let data = combine(&self.as_vector3d().data, lhs.into(), |a, b| b - a)?;
        Ok(Self::from_vector3d(Vector3d::from_data(data)))
    }

    /// Scale by a scalar or per-vector array. Two vector batches are rejected.
    fn mul<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Self> {
        let rhs = rhs.into();
        if let Operand::Vectors(_) = rhs {
            return Err(VectorError::AmbiguousProduct);
        }
        let data = combine(&self.as_vector3d().data, rhs, |a, b| a * b)?;
        Ok(Self::from_vector3d(Vector3d::from_data(data)))
    }

    fn div<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Self> {
        let rhs = rhs.into();
        if let Operand::Vectors(_) = rhs {
            return Err(VectorError::UndefinedDivision);
        }
        let data = combine(&self.as_vector3d().data, rhs, |a, b| a / b)?;
        Ok(Self::from_vector3d(Vector3d::from_data(data)))
    }

    /// Anything divided by a vector batch is undefined.
    fn rdiv<'a>(&self, _lhs: impl Into<Operand<'a>>) -> Result<Self> {
        Err(VectorError::UndefinedDivision)
    }

    /// Elementwise dot product over the broadcast batch shape.
    fn dot(&self, other: &impl VectorBatch) -> Result<ArrayD<f64>> {
        let product = zip_broadcast(
            &self.as_vector3d().data,
            &other.as_vector3d().data,
            |a, b| a * b,
        )?;
        let last = Axis(product.ndim() - 1);
        Ok(product.sum_axis(last))
    }

    /// Cross product. The result takes the variant of `other`.
    fn cross<O: VectorBatch>(&self, other: &O) -> Result<O> {
        let a = &self.as_vector3d().data;
        let b = &other.as_vector3d().data;
        let shape = broadcast_shapes(a.shape(), b.shape())?;
        let a = broadcast_to(a, &shape)?;
        let b = broadcast_to(b, &shape)?;
        let last = Axis(shape.len() - 1);
        let mut out = ArrayD::zeros(IxDyn(&shape));
        Zip::from(out.lanes_mut(last))
            .and(a.lanes(last))
            .and(b.lanes(last))
            .for_each(|mut o, a, b| {
                o[0] = a[1] * b[2] - a[2] * b[1];
                o[1] = a[2] * b[0] - a[0] * b[2];
                o[2] = a[0] * b[1] - a[1] * b[0];
            });
        Ok(O::from_vector3d(Vector3d::from_data(out)))
    }

    /// Euclidean length of every vector.
    fn norm(&self) -> ArrayD<f64> {
        self.as_vector3d()
            .map_to_scalars(|v| (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt())
    }

    /// Unit vectors. The zero vector stays zero.
    fn unit(&self) -> Self {
        Self::from_vector3d(self.as_vector3d().map_rows(|v| {
            let n = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            if n == 0.0 {
                [0.0, 0.0, 0.0]
            } else {
                [v[0] / n, v[1] / n, v[2] / n]
            }
        }))
    }

    /// Angle between paired vectors in radians, or degrees if asked.
    ///
    /// Cosines are rounded to 10 decimals before `acos` so that values a hair
    /// outside [-1, 1] do not produce NaN. A zero vector gives NaN.
    fn angle_with(&self, other: &impl VectorBatch, degrees: bool) -> Result<ArrayD<f64>> {
        let dots = self.dot(other)?;
        let shape = dots.shape().to_vec();
        let norm_a = self.norm();
        let norm_b = other.norm();
        let norm_a = broadcast_to(&norm_a, &shape)?;
        let norm_b = broadcast_to(&norm_b, &shape)?;
        Ok(Zip::from(&dots)
            .and(&norm_a)
            .and(&norm_b)
            .map_collect(|&d, &a, &b| {
                let angle = round_to(d / (a * b), COSINE_DECIMALS).acos();
                if degrees { angle.to_degrees() } else { angle }
            }))
    }

    /// A vector perpendicular to each vector: `(-y, x, 0)`, or `(1, 0, 0)`
    /// for vectors along z. The zero vector has none.
    fn perpendicular(&self) -> Result<Vector3d> {
        let v = self.as_vector3d();
        if v.rows().any(|r| r == [0.0, 0.0, 0.0]) {
            return Err(VectorError::NoPerpendicular);
        }
        Ok(v.map_rows(|r| perpendicular_of(r).unwrap_or([1.0, 0.0, 0.0])))
    }

    /// Arithmetic mean over all batch axes, as a single vector.
    fn mean(&self) -> Result<Self> {
        let v = self.as_vector3d();
        let n = v.size();
        if n == 0 {
            return Err(VectorError::EmptyBatch);
        }
        let sum = v
            .rows()
            .fold([0.0; 3], |acc, r| [acc[0] + r[0], acc[1] + r[1], acc[2] + r[2]]);
        let n = n as f64;
        Ok(Self::from_vector3d(Vector3d::from_xyz([
            sum[0] / n,
            sum[1] / n,
            sum[2] / n,
        ])))
    }

    fn radial(&self) -> ArrayD<f64> {
        spherical::radial(self.as_vector3d())
    }

    fn azimuth(&self) -> ArrayD<f64> {
        spherical::azimuth(self.as_vector3d())
    }

    fn polar(&self) -> ArrayD<f64> {
        spherical::polar(self.as_vector3d())
    }

    /// `(azimuth, polar, radial)`, angles in degrees if asked.
    fn to_polar(&self, degrees: bool) -> (ArrayD<f64>, ArrayD<f64>, ArrayD<f64>) {
        spherical::to_polar(self.as_vector3d(), degrees)
    }

    /// Vectors from spherical coordinates; see [`spherical::from_polar`].
    fn from_polar(
        azimuth: ArrayViewD<'_, f64>,
        polar: ArrayViewD<'_, f64>,
        radial: Option<ArrayViewD<'_, f64>>,
        degrees: bool,
    ) -> Result<Self> {
        spherical::from_polar(azimuth, polar, radial, degrees).map(Self::from_vector3d)
    }

    /// The candidate closest to this single vector; see [`nearest::get_nearest`].
    fn get_nearest<V: VectorBatch>(
        &self,
        candidates: &V,
        inclusive: bool,
        tiebreak: Option<&Vector3d>,
    ) -> Result<V> {
        nearest::get_nearest(self.as_vector3d(), candidates.as_vector3d(), inclusive, tiebreak)
            .map(V::from_vector3d)
    }

    /// Rotate about `axis` (default +z) by each of `angles`.
    ///
    /// The rotations take the broadcast shape of the axis batch and the
    /// angles, and each rotation acts on every vector: the result has shape
    /// `rotation_shape ++ batch_shape`.
    fn rotate(&self, axis: Option<&Vector3d>, angles: ArrayViewD<'_, f64>) -> Result<Self> {
        circle::rotate(self.as_vector3d(), axis, angles).map(Self::from_vector3d)
    }

    /// `steps` vectors tracing a circle of half-angle `opening_angle` around
    /// each vector; the result has shape `(size, steps)`.
    fn get_circle(&self, opening_angle: ArrayViewD<'_, f64>, steps: usize) -> Result<Self> {
        circle::get_circle(self.as_vector3d(), opening_angle, steps).map(Self::from_vector3d)
    }

    /// Pairwise dot products of every vector here with every vector in
    /// `other`, shape `batch_shape ++ other.batch_shape`.
    fn dot_outer(&self, other: &impl VectorBatch, evaluation: &Evaluation) -> Result<ArrayD<f64>> {
        outer::dot_outer(self.as_vector3d(), other.as_vector3d(), evaluation)
    }

    /// Symmetry-equivalent representatives inside the fundamental sector.
    fn in_fundamental_sector(&self, symmetry: &(impl PointSymmetry + ?Sized)) -> Result<Self> {
        sector::reduce(self.as_vector3d(), symmetry).map(Self::from_vector3d)
    }
}

impl VectorBatch for Vector3d {
    fn as_vector3d(&self) -> &Vector3d {
        self
    }

    fn from_vector3d(vectors: Vector3d) -> Self {
        vectors
    }
}

pub(crate) fn perpendicular_of(v: [f64; 3]) -> Option<[f64; 3]> {
    if v[0] == 0.0 && v[1] == 0.0 {
        if v[2] == 0.0 {
            return None;
        }
        return Some([1.0, 0.0, 0.0]);
    }
    Some([-v[1], v[0], 0.0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{arr1, arr2};

    fn v(xyz: [f64; 3]) -> Vector3d {
        Vector3d::from_xyz(xyz)
    }

    fn batch(rows: &[[f64; 3]]) -> Vector3d {
        Vector3d::from_rows(&[rows.len()], rows).unwrap()
    }

    fn rows(v: &Vector3d) -> Vec<[f64; 3]> {
        v.rows().collect()
    }

    #[test]
    fn test_new_rejects_wrong_last_axis() {
        let data = ArrayD::zeros(IxDyn(&[2, 4]));
        assert!(matches!(
            Vector3d::new(data),
            Err(VectorError::InvalidData(_))
        ));
        let scalar = ArrayD::zeros(IxDyn(&[]));
        assert!(Vector3d::new(scalar).is_err());
    }

    #[test]
    fn test_single_vector_has_empty_batch_shape() {
        let a = v([1.0, 2.0, 3.0]);
        assert_eq!(a.batch_shape(), &[] as &[usize]);
        assert_eq!(a.size(), 1);
        assert_eq!(a.ndim(), 0);
    }

    #[test]
    fn test_from_rows_checks_count() {
        assert!(Vector3d::from_rows(&[2, 2], &[[0.0; 3]; 3]).is_err());
        let grid = Vector3d::from_rows(&[2, 2], &[[1.0, 0.0, 0.0]; 4]).unwrap();
        assert_eq!(grid.batch_shape(), &[2, 2]);
    }

    #[test]
    fn test_empty() {
        let e = Vector3d::empty();
        assert!(e.is_empty());
        assert_eq!(e.batch_shape(), &[0]);
    }

    #[test]
    fn test_component_setters_write_through() {
        let mut a = batch(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        a.z_mut().fill(-1.0);
        a.x_mut()[[1]] = 9.0;
        assert_eq!(rows(&a), vec![[1.0, 2.0, -1.0], [9.0, 5.0, -1.0]]);
        assert_eq!(a.y().iter().copied().collect::<Vec<_>>(), vec![2.0, 5.0]);
    }

    #[test]
    fn test_neg() {
        let a = batch(&[[1.0, -2.0, 3.0]]);
        assert_eq!(rows(&-&a), vec![[-1.0, 2.0, -3.0]]);
        assert_eq!(-(-a.clone()), a);
    }

    #[test]
    fn test_add_vectors_broadcasts() {
        let a = v([1.0, 2.0, 3.0]);
        let b = batch(&[[1.0, 0.0, 0.0], [0.0, 1.0, 1.0]]);
        let sum = a.add(&b).unwrap();
        assert_eq!(rows(&sum), vec![[2.0, 2.0, 3.0], [1.0, 3.0, 4.0]]);
    }

    #[test]
    fn test_add_scalar() {
        let a = v([1.0, 2.0, 3.0]);
        assert_eq!(rows(&a.add(1.0).unwrap()), vec![[2.0, 3.0, 4.0]]);
        assert_eq!(rows(&a.rsub(1.0).unwrap()), vec![[0.0, -1.0, -2.0]]);
    }

    #[test]
    fn test_array_operand_is_per_vector() {
        let a = v([1.0, 2.0, 3.0]);
        let out = a.div(&[2.0, -2.0][..]).unwrap();
        assert_eq!(out.batch_shape(), &[2]);
        assert_eq!(rows(&out), vec![[0.5, 1.0, 1.5], [-0.5, -1.0, -1.5]]);
    }

    #[test]
    fn test_array_operand_shape_mismatch() {
        let a = batch(&[[1.0; 3], [2.0; 3]]);
        let err = a.mul(&[1.0, 2.0, 3.0][..]).unwrap_err();
        assert!(matches!(err, VectorError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_vector_times_vector_is_ambiguous() {
        let a = v([1.0, 2.0, 3.0]);
        assert!(matches!(a.mul(&a), Err(VectorError::AmbiguousProduct)));
    }

    #[test]
    fn test_division_by_vector_is_undefined() {
        let a = v([1.0, 2.0, 3.0]);
        assert!(matches!(a.div(&a), Err(VectorError::UndefinedDivision)));
        assert!(matches!(a.rdiv(2.0), Err(VectorError::UndefinedDivision)));
    }

    #[test]
    fn test_dot() {
        let a = v([0.0, 0.0, 1.0]);
        let b = batch(&[[0.0, 0.0, 0.5], [0.4, 0.6, 0.0]]);
        assert_eq!(a.dot(&b).unwrap(), arr1(&[0.5, 0.0]).into_dyn());
        assert_eq!(b.dot(&a).unwrap(), arr1(&[0.5, 0.0]).into_dyn());
    }

    #[test]
    fn test_cross() {
        let a = batch(&[[1.0, 0.0, 0.0], [-1.0, 0.0, 0.0]]);
        let b = v([0.0, 1.0, 0.0]);
        assert_eq!(rows(&a.cross(&b).unwrap()), vec![[0.0, 0.0, 1.0], [0.0, 0.0, -1.0]]);
    }

    #[test]
    fn test_norm_and_unit() {
        let a = batch(&[[3.0, 4.0, 0.0], [0.0, 0.0, 0.0]]);
        assert_eq!(a.norm(), arr1(&[5.0, 0.0]).into_dyn());
        assert_eq!(rows(&a.unit()), vec![[0.6, 0.8, 0.0], [0.0, 0.0, 0.0]]);
    }

    #[test]
    fn test_angle_with() {
        let a = v([1.0, 0.0, 0.0]);
        let b = batch(&[[0.0, 2.0, 0.0], [1.0, 0.0, 0.0], [-3.0, 0.0, 0.0]]);
        let angles = a.angle_with(&b, true).unwrap();
        assert_abs_diff_eq!(angles[[0]], 90.0, epsilon = 1e-12);
        assert_abs_diff_eq!(angles[[1]], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(angles[[2]], 180.0, epsilon = 1e-12);
    }

    #[test]
    fn test_angle_with_near_parallel_is_not_nan() {
        let a = v([0.1, 0.2, 0.3]);
        let angle = a.angle_with(&a.mul(3.0).unwrap(), false).unwrap();
        assert_eq!(angle.first(), Some(&0.0));
    }

    #[test]
    fn test_perpendicular() {
        let a = batch(&[[1.0, 2.0, 3.0], [0.0, 0.0, 2.0]]);
        let p = a.perpendicular().unwrap();
        assert_eq!(rows(&p), vec![[-2.0, 1.0, 0.0], [1.0, 0.0, 0.0]]);
        assert_eq!(a.dot(&p).unwrap(), arr1(&[0.0, 0.0]).into_dyn());
    }

    #[test]
    fn test_perpendicular_of_zero_vector_fails() {
        let a = batch(&[[1.0, 0.0, 0.0], [0.0, 0.0, 0.0]]);
        assert!(matches!(a.perpendicular(), Err(VectorError::NoPerpendicular)));
    }

    #[test]
    fn test_mean() {
        let grid = Vector3d::from_rows(
            &[2, 2],
            &[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [3.0, 3.0, 3.0]],
        )
        .unwrap();
        let m = grid.mean().unwrap();
        assert_eq!(m.batch_shape(), &[] as &[usize]);
        assert_eq!(rows(&m), vec![[1.0, 1.0, 1.0]]);
        assert!(matches!(Vector3d::empty().mean(), Err(VectorError::EmptyBatch)));
    }

    #[test]
    fn test_zero_and_axis_vectors() {
        let z = Vector3d::zero(&[2, 3]);
        assert_eq!(z.batch_shape(), &[2, 3]);
        assert!(z.rows().all(|r| r == [0.0; 3]));
        assert_eq!(rows(&Vector3d::yvector()), vec![[0.0, 1.0, 0.0]]);
    }

    #[test]
    fn test_flatten_and_get() {
        let grid = Vector3d::new(
            arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]])
                .into_shape_with_order((1, 2, 3))
                .unwrap()
                .into_dyn(),
        )
        .unwrap();
        assert_eq!(grid.flatten().batch_shape(), &[2]);
        assert_eq!(grid.get(1), Some(v([4.0, 5.0, 6.0])));
        assert_eq!(grid.get(2), None);
    }

    #[test]
    fn test_tuples_are_exact() {
        let a = batch(&[[0.0, 1.0, 0.0], [-0.0, 1.0, 0.0], [0.0, 1.0 + 1e-15, 0.0]]);
        assert_eq!(a.tuples().len(), 2);
        assert!(a.tuples().contains(&VectorKey::from([0.0, 1.0, 0.0])));
    }

    #[test]
    fn test_display() {
        let text = batch(&[[1.0, 0.0, 0.0]]).to_string();
        assert!(text.starts_with("Vector3d (1,)"));
        assert!(text.contains("[1.0000 0.0000 0.0000]"));
    }
}
