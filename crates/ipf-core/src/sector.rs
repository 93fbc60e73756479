//! Fundamental sectors and the reduction of vectors into them.

use std::ops::Neg;

use ndarray::ArrayD;
use tracing::debug;

use crate::constants::{CLOSENESS_DECIMALS, SECTOR_TOLERANCE};
use crate::error::Result;
use crate::outer::Evaluation;
use crate::rotation::Rotation;
use crate::shape::round_to;
use crate::symmetry::{CandidateRule, FoldElement, PointSymmetry};
use crate::vector::{Vector3d, VectorBatch};

/// Region of the sphere bounded by great circles, given by their inward
/// normals. A vector is inside when it lies on the positive side of every
/// normal, within [`SECTOR_TOLERANCE`].
///
/// The sector is itself a vector batch (of its normals), so vector
/// operations on it return sectors.
#[derive(Clone, Debug, PartialEq)]
pub struct FundamentalSector {
    normals: Vector3d,
}

impl FundamentalSector {
    pub fn new(normals: Vector3d) -> Self {
        Self {
            normals: normals.flatten(),
        }
    }

    pub fn normals(&self) -> &Vector3d {
        &self.normals
    }

    /// Membership mask over the batch shape of `v`.
    pub fn contains(&self, v: &Vector3d) -> ArrayD<bool> {
        let normals: Vec<[f64; 3]> = self.normals.rows().collect();
        v.data()
            .map_axis(ndarray::Axis(v.data().ndim() - 1), |lane| {
                contains_row(&normals, [lane[0], lane[1], lane[2]])
            })
    }

    /// Corners of the sector: pairwise intersections of the bounding great
    /// circles that lie inside every half-space, as unit vectors.
    pub fn vertices(&self) -> Vector3d {
        let normals: Vec<[f64; 3]> = self.normals.rows().collect();
        let mut vertices: Vec<[f64; 3]> = Vec::new();
        for (i, a) in normals.iter().enumerate() {
            for b in &normals[i + 1..] {
                let Some(c) = unit(cross(*a, *b)) else {
                    continue;
                };
                for candidate in [c, [-c[0], -c[1], -c[2]]] {
                    let duplicate = vertices.iter().any(|v| {
                        (v[0] - candidate[0]).abs() < SECTOR_TOLERANCE
                            && (v[1] - candidate[1]).abs() < SECTOR_TOLERANCE
                            && (v[2] - candidate[2]).abs() < SECTOR_TOLERANCE
                    });
                    if !duplicate && contains_row(&normals, candidate) {
                        vertices.push(candidate);
                    }
                }
            }
        }
        let n = vertices.len();
        Vector3d::filled(&[n], vertices)
    }

    /// A direction well inside the sector: the normalised mean of the
    /// vertices when there are at least three, otherwise of the normals.
    /// Empty when the sector is the whole sphere.
    pub fn center(&self) -> Vector3d {
        if self.normals.is_empty() {
            return Vector3d::empty();
        }
        let vertices = self.vertices();
        let points = if vertices.size() >= 3 {
            vertices
        } else {
            self.normals.clone()
        };
        match points.mean() {
            Ok(mean) => Vector3d::filled(&[1], mean.unit().rows()),
            Err(_) => Vector3d::empty(),
        }
    }
}

impl VectorBatch for FundamentalSector {
    fn as_vector3d(&self) -> &Vector3d {
        &self.normals
    }

    fn from_vector3d(vectors: Vector3d) -> Self {
        Self { normals: vectors }
    }
}

impl Neg for &FundamentalSector {
    type Output = FundamentalSector;

    fn neg(self) -> FundamentalSector {
        FundamentalSector {
            normals: -&self.normals,
        }
    }
}

pub(crate) fn contains_row(normals: &[[f64; 3]], v: [f64; 3]) -> bool {
    normals
        .iter()
        .all(|n| n[0] * v[0] + n[1] * v[1] + n[2] * v[2] > -SECTOR_TOLERANCE)
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    crate::quaternion::cross(a, b)
}

fn unit(v: [f64; 3]) -> Option<[f64; 3]> {
    let n = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    (n > SECTOR_TOLERANCE).then(|| [v[0] / n, v[1] / n, v[2] / n])
}

/// Map every vector to its symmetry-equivalent inside the fundamental
/// sector of `symmetry`.
///
/// Each vector gets the inverse of the element whose image of the sector
/// center lies closest to it. Vectors already inside the sector are kept
/// bit for bit. `symmetry.rotations()` must start with the identity.
pub fn reduce(v: &Vector3d, symmetry: &(impl PointSymmetry + ?Sized)) -> Result<Vector3d> {
    let sector = symmetry.fundamental_sector();
    let center = sector.center();
    if center.is_empty() {
        return Ok(v.clone());
    }

    let elements = symmetry.rotations();
    let rule = symmetry.point_group().candidate_rule();
    let (folded, candidates): (Vector3d, &[Rotation]) = match rule {
        CandidateRule::All => (v.clone(), elements),
        CandidateRule::FoldLower { fold } => {
            let fold = match fold {
                FoldElement::Fourth => elements.get(3),
                FoldElement::Last => elements.last(),
            }
            .copied()
            .unwrap_or_else(Rotation::identity);
            let folded = v.map_rows(|r| if r[2] < 0.0 { fold.apply(r) } else { r });
            (folded, &elements[..elements.len().min(3)])
        }
    };

    let center = center.rows().next().unwrap_or([0.0, 0.0, 1.0]);
    let rotated_centers = Vector3d::filled(
        &[candidates.len()],
        candidates.iter().map(|r| r.apply(center)),
    );
    let mut closeness = folded.flatten().dot_outer(&rotated_centers, &Evaluation::Eager)?;
    closeness.mapv_inplace(|c| round_to(c, CLOSENESS_DECIMALS));

    let normals: Vec<[f64; 3]> = sector.normals().rows().collect();
    let mut inside = 0usize;
    let mut rows = folded.rows();
    let reduced: Vec<[f64; 3]> = closeness
        .outer_iter()
        .map(|scores| {
            let row = rows.next().unwrap_or([0.0; 3]);
            if contains_row(&normals, row) {
                inside += 1;
                return row;
            }
            // first maximum wins
            let mut best = 0;
            for (i, &score) in scores.iter().enumerate() {
                if score > scores[best] {
                    best = i;
                }
            }
            candidates[best].inverse().apply(row)
        })
        .collect();

    debug!(
        group = %symmetry.point_group(),
        candidates = candidates.len(),
        vectors = v.size(),
        inside,
        "reduced to fundamental sector"
    );
    Ok(Vector3d::filled(v.batch_shape(), reduced))
}
