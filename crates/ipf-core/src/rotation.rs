use std::ops::Mul;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::ROTATION_MATCH_TOLERANCE;
use crate::quaternion::Quaternion;

/// A point-group element: a rotation, optionally followed by inversion.
///
/// Improper elements (mirrors, rotoinversions) act on a vector as the
/// rotation followed by `v -> -v`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub quaternion: Quaternion,
    #[serde(default)]
    pub improper: bool,
}

impl Rotation {
    pub fn new(quaternion: Quaternion, improper: bool) -> Self {
        Self {
            quaternion,
            improper,
        }
    }

    pub fn identity() -> Self {
        Self::new(Quaternion::identity(), false)
    }

    /// Inversion through the origin.
    pub fn inversion() -> Self {
        Self::new(Quaternion::identity(), true)
    }

    /// Proper rotation by `angle` radians about `axis`.
    pub fn from_axis_angle(axis: [f64; 3], angle: f64) -> Self {
        Self::new(Quaternion::from_axis_angle(axis, angle), false)
    }

    /// Uniformly distributed proper rotation.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::new(Quaternion::random(rng), false)
    }

    /// The same rotation followed by inversion.
    pub fn with_inversion(self) -> Self {
        Self::new(self.quaternion, !self.improper)
    }

    /// Inverse element. Inversion commutes with rotations, so the flag stays.
    pub fn inverse(self) -> Self {
        Self::new(self.quaternion.conjugate(), self.improper)
    }

    pub fn apply(&self, v: [f64; 3]) -> [f64; 3] {
        let r = self.quaternion.rotate(v);
        if self.improper {
            [-r[0], -r[1], -r[2]]
        } else {
            r
        }
    }

    /// Same group element, up to the sign ambiguity of the quaternion.
    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.improper == other.improper
            && self
                .quaternion
                .same_rotation(other.quaternion, ROTATION_MATCH_TOLERANCE)
    }
}

/// Composition: `(a * b).apply(v) == a.apply(b.apply(v))`.
impl Mul for Rotation {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(self.quaternion * rhs.quaternion, self.improper ^ rhs.improper)
    }
}
