//! Crystallographic point groups and their fundamental sectors.
//!
//! The reducer only needs the [`PointSymmetry`] interface: an ordered list
//! of group elements with the identity first, the sector those elements
//! tile the sphere with, and the group tag that picks the candidate rule.
//! [`Symmetry`] implements it for the Laue groups and their proper
//! subgroups.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, PI};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VectorError;
use crate::rotation::Rotation;
use crate::sector::FundamentalSector;
use crate::vector::{Vector3d, VectorBatch};

const X: [f64; 3] = [1.0, 0.0, 0.0];
const Y: [f64; 3] = [0.0, 1.0, 0.0];
const Z: [f64; 3] = [0.0, 0.0, 1.0];

/// What a reducer needs from a symmetry.
///
/// `rotations()` must start with the identity so that every vector has at
/// least one candidate.
pub trait PointSymmetry {
    fn point_group(&self) -> PointGroup;

    fn rotations(&self) -> &[Rotation];

    fn fundamental_sector(&self) -> &FundamentalSector;
}

/// Point groups by Schoenflies symbol; the Hermann-Mauguin name is the
/// string form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PointGroup {
    C1,
    Ci,
    C2,
    C2h,
    D2,
    D2h,
    C4,
    S4,
    C4h,
    D4,
    D4h,
    C3,
    S6,
    D3,
    D3x,
    D3y,
    D3d,
    C6,
    C6h,
    D6,
    D6h,
    O,
    Oh,
}

/// Element of the group that folds lower-hemisphere vectors up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FoldElement {
    Fourth,
    Last,
}

/// Which group elements the reducer tries for each vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CandidateRule {
    /// Every element of the group.
    All,
    /// Vectors with z < 0 are first mapped by `fold`; the candidates are then
    /// the first three elements.
    FoldLower { fold: FoldElement },
}

impl PointGroup {
    pub fn all() -> &'static [PointGroup] {
        use PointGroup::*;
        &[
            C1, Ci, C2, C2h, D2, D2h, C4, S4, C4h, D4, D4h, C3, S6, D3, D3x, D3y, D3d, C6, C6h, D6,
            D6h, O, Oh,
        ]
    }

    /// Hermann-Mauguin name.
    pub fn name(self) -> &'static str {
        use PointGroup::*;
        match self {
            C1 => "1",
            Ci => "-1",
            C2 => "2",
            C2h => "2/m",
            D2 => "222",
            D2h => "mmm",
            C4 => "4",
            S4 => "-4",
            C4h => "4/m",
            D4 => "422",
            D4h => "4/mmm",
            C3 => "3",
            S6 => "-3",
            D3 => "32",
            D3x => "321",
            D3y => "312",
            D3d => "-3m",
            C6 => "6",
            C6h => "6/m",
            D6 => "622",
            D6h => "6/mmm",
            O => "432",
            Oh => "m-3m",
        }
    }

    pub fn schoenflies(self) -> &'static str {
        use PointGroup::*;
        match self {
            C1 => "C1",
            Ci => "Ci",
            C2 => "C2",
            C2h => "C2h",
            D2 => "D2",
            D2h => "D2h",
            C4 => "C4",
            S4 => "S4",
            C4h => "C4h",
            D4 => "D4",
            D4h => "D4h",
            C3 => "C3",
            S6 => "S6",
            D3 => "D3",
            D3x => "D3x",
            D3y => "D3y",
            D3d => "D3d",
            C6 => "C6",
            C6h => "C6h",
            D6 => "D6",
            D6h => "D6h",
            O => "O",
            Oh => "Oh",
        }
    }

    pub fn candidate_rule(self) -> CandidateRule {
        use PointGroup::*;
        match self {
            D3 | D3x | D3y | S4 => CandidateRule::FoldLower {
                fold: FoldElement::Last,
            },
            S6 => CandidateRule::FoldLower {
                fold: FoldElement::Fourth,
            },
            _ => CandidateRule::All,
        }
    }

    /// Group elements, identity first.
    pub fn elements(self) -> Vec<Rotation> {
        use PointGroup::*;
        let inversion = Rotation::inversion();
        let c2 = |axis| Rotation::from_axis_angle(axis, PI);
        let c2z = c2(Z);
        let c2x = c2(X);
        let c3z = Rotation::from_axis_angle(Z, 2.0 * FRAC_PI_3);
        let c4z = Rotation::from_axis_angle(Z, FRAC_PI_2);
        let c6z = Rotation::from_axis_angle(Z, FRAC_PI_3);
        let c3_body = Rotation::from_axis_angle([1.0, 1.0, 1.0], 2.0 * FRAC_PI_3);

        match self {
            C1 => closure(&[]),
            Ci => closure(&[inversion]),
            C2 => closure(&[c2z]),
            C2h => closure(&[c2z, inversion]),
            D2 => closure(&[c2z, c2x]),
            D2h => closure(&[c2z, c2x, inversion]),
            C4 => closure(&[c4z]),
            // identity, 2-fold, then the two rotoinversions
            S4 => vec![
                Rotation::identity(),
                c2z,
                c4z.with_inversion(),
                (c4z * c4z * c4z).with_inversion(),
            ],
            C4h => closure(&[c4z, inversion]),
            D4 => closure(&[c4z, c2x]),
            D4h => closure(&[c4z, c2x, inversion]),
            C3 => closure(&[c3z]),
            S6 => {
                let proper = [Rotation::identity(), c3z, c3z * c3z];
                proper
                    .iter()
                    .copied()
                    .chain(proper.iter().map(|r| r.with_inversion()))
                    .collect()
            }
            D3 | D3x => trigonal_dihedral(c3z, 0.0),
            D3y => trigonal_dihedral(c3z, FRAC_PI_2),
            D3d => closure(&[c3z, c2x, inversion]),
            C6 => closure(&[c6z]),
            C6h => closure(&[c6z, inversion]),
            D6 => closure(&[c6z, c2x]),
            D6h => closure(&[c6z, c2x, inversion]),
            O => closure(&[c4z, c3_body]),
            Oh => closure(&[c4z, c3_body, inversion]),
        }
    }

    /// Inward normals of the fundamental sector, not yet normalised.
    pub fn sector_normals(self) -> Vec<[f64; 3]> {
        use PointGroup::*;
        let (s60, c60) = FRAC_PI_3.sin_cos();
        match self {
            C1 => vec![],
            Ci => vec![Z],
            C2 => vec![Y],
            C2h | D2 | S4 => vec![Z, Y],
            D2h | C4h => vec![Z, X, Y],
            C4 => vec![Y, X],
            D4 => vec![Z, Y, X],
            D4h => vec![Z, Y, [1.0, -1.0, 0.0]],
            C3 => vec![Y, [s60, c60, 0.0]],
            S6 | D3 | D3x | D3y => vec![Z, Y, [s60, c60, 0.0]],
            // between the mirrors at ±30°
            D3d => vec![Z, [c60, s60, 0.0], [c60, -s60, 0.0]],
            C6 => vec![Y, [s60, -c60, 0.0]],
            C6h | D6 => vec![Z, Y, [s60, -c60, 0.0]],
            D6h => vec![Z, Y, [c60, -s60, 0.0]],
            O => vec![[-1.0, 0.0, 1.0], [0.0, -1.0, 1.0], X, Y],
            Oh => vec![[-1.0, 0.0, 1.0], [1.0, -1.0, 0.0], Y],
        }
    }
}

/// Three rotations about z, then three 2-folds in the plane starting at
/// azimuth `first_axis` in steps of 120°.
fn trigonal_dihedral(c3z: Rotation, first_axis: f64) -> Vec<Rotation> {
    let mut elements = vec![Rotation::identity(), c3z, c3z * c3z];
    for k in 0..3 {
        let (sin, cos) = (first_axis + k as f64 * 2.0 * FRAC_PI_3).sin_cos();
        elements.push(Rotation::from_axis_angle([cos, sin, 0.0], PI));
    }
    elements
}

/// Smallest set containing the identity and closed under right
/// multiplication by the generators, in breadth-first order.
fn closure(generators: &[Rotation]) -> Vec<Rotation> {
    let mut elements = vec![Rotation::identity()];
    let mut next = 0;
    while next < elements.len() {
        let current = elements[next];
        for &g in generators {
            let product = current * g;
            if !elements.iter().any(|e| e.is_equivalent(&product)) {
                elements.push(product);
            }
        }
        next += 1;
    }
    elements
}

impl fmt::Display for PointGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PointGroup {
    type Err = VectorError;

    /// Accepts Hermann-Mauguin or Schoenflies names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        PointGroup::all()
            .iter()
            .copied()
            .find(|g| g.name() == s || g.schoenflies().eq_ignore_ascii_case(s))
            .ok_or_else(|| VectorError::UnknownPointGroup(s.to_string()))
    }
}

impl TryFrom<String> for PointGroup {
    type Error = VectorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PointGroup> for String {
    fn from(g: PointGroup) -> Self {
        g.name().to_string()
    }
}

/// A point group with its elements and fundamental sector precomputed.
#[derive(Clone, Debug)]
pub struct Symmetry {
    group: PointGroup,
    rotations: Vec<Rotation>,
    sector: FundamentalSector,
}

impl Symmetry {
    pub fn new(group: PointGroup) -> Self {
        let normals = group.sector_normals();
        let normals = Vector3d::filled(&[normals.len()], normals).unit();
        Self {
            group,
            rotations: group.elements(),
            sector: FundamentalSector::new(normals),
        }
    }

    /// Symmetry from explicit elements and sector normals.
    ///
    /// The elements must form a group with the identity first.
    pub fn from_parts(
        group: PointGroup,
        rotations: Vec<Rotation>,
        sector: FundamentalSector,
    ) -> Result<Self, VectorError> {
        match rotations.first() {
            Some(first) if first.is_equivalent(&Rotation::identity()) => Ok(Self {
                group,
                rotations,
                sector,
            }),
            Some(_) => Err(VectorError::InvalidSymmetry(
                "the first element must be the identity".to_string(),
            )),
            None => Err(VectorError::InvalidSymmetry("no elements".to_string())),
        }
    }

    pub fn order(&self) -> usize {
        self.rotations.len()
    }

    /// Whether every element is a proper rotation.
    pub fn is_proper(&self) -> bool {
        self.rotations.iter().all(|r| !r.improper)
    }

    /// Every symmetry-equivalent of every vector, shape
    /// `(order, *batch_shape)`.
    pub fn equivalents(&self, v: &Vector3d) -> Vector3d {
        let mut shape = vec![self.order()];
        shape.extend_from_slice(v.batch_shape());
        let rows: Vec<[f64; 3]> = self
            .rotations
            .iter()
            .flat_map(|r| v.rows().map(move |row| r.apply(row)))
            .collect();
        Vector3d::filled(&shape, rows)
    }
}

impl From<PointGroup> for Symmetry {
    fn from(group: PointGroup) -> Self {
        Symmetry::new(group)
    }
}

impl PointSymmetry for Symmetry {
    fn point_group(&self) -> PointGroup {
        self.group
    }

    fn rotations(&self) -> &[Rotation] {
        &self.rotations
    }

    fn fundamental_sector(&self) -> &FundamentalSector {
        &self.sector
    }
}
