//! Hemisphere and projection selectors for plotting front ends.

use std::fmt;
use std::str::FromStr;

use ndarray::ArrayD;
use serde::{Deserialize, Serialize};

use crate::error::VectorError;
use crate::vector::Vector3d;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    #[default]
    Upper,
    Lower,
    Both,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Projection {
    #[default]
    Stereographic,
    /// Stereographic projection restricted to a fundamental sector.
    Ipf,
}

impl FromStr for Hemisphere {
    type Err = VectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "upper" => Ok(Hemisphere::Upper),
            "lower" => Ok(Hemisphere::Lower),
            "both" => Ok(Hemisphere::Both),
            _ => Err(VectorError::InvalidHemisphere(s.to_string())),
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Hemisphere::Upper => "upper",
            Hemisphere::Lower => "lower",
            Hemisphere::Both => "both",
        })
    }
}

impl FromStr for Projection {
    type Err = VectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stereographic" => Ok(Projection::Stereographic),
            "ipf" => Ok(Projection::Ipf),
            _ => Err(VectorError::InvalidProjection(s.to_string())),
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Projection::Stereographic => "stereographic",
            Projection::Ipf => "ipf",
        })
    }
}

impl Vector3d {
    /// Which vectors are drawn on `hemisphere`. Vectors on the equator
    /// belong to both halves.
    pub fn visible(&self, hemisphere: Hemisphere) -> ArrayD<bool> {
        let z = self.z();
        match hemisphere {
            Hemisphere::Upper => z.mapv(|z| z >= 0.0),
            Hemisphere::Lower => z.mapv(|z| z <= 0.0),
            Hemisphere::Both => z.mapv(|_| true),
        }
    }

    /// Copy with z mirrored, bringing lower-hemisphere vectors up for
    /// drawing.
    pub fn reprojected(&self) -> Vector3d {
        let mut out = self.clone();
        out.z_mut().mapv_inplace(|z| -z);
        out
    }

    /// Stereographic coordinates `(X, Y)` of the unit directions.
    ///
    /// Upper-hemisphere vectors are projected from the south pole, lower ones
    /// from the north pole, so both land inside the unit disk. `Both` picks
    /// the pole per vector by the sign of z. Zero vectors map to the origin.
    pub fn stereographic(&self, hemisphere: Hemisphere) -> (ArrayD<f64>, ArrayD<f64>) {
        let project = |r: [f64; 3]| {
            let n = (r[0] * r[0] + r[1] * r[1] + r[2] * r[2]).sqrt();
            if n == 0.0 {
                return [0.0, 0.0];
            }
            let z = r[2] / n;
            let lower = match hemisphere {
                Hemisphere::Upper => false,
                Hemisphere::Lower => true,
                Hemisphere::Both => z < 0.0,
            };
            let denominator = if lower { 1.0 - z } else { 1.0 + z };
            if denominator <= 0.0 {
                // the projection pole itself
                return [f64::INFINITY, f64::INFINITY];
            }
            [r[0] / n / denominator, r[1] / n / denominator]
        };
        (
            self.map_to_scalars(|r| project(r)[0]),
            self.map_to_scalars(|r| project(r)[1]),
        )
    }
}
