use crate::constants::NEAREST_INCLUSIVE_EPS;
use crate::error::{Result, VectorError};
use crate::vector::Vector3d;

/// The candidate best aligned with the single vector `target`.
///
/// Candidates are ranked by raw dot products, so longer vectors rank higher.
/// Without `inclusive`, candidates whose dot with the target is exactly ±1
/// or beyond are skipped; `inclusive` widens that window by
/// [`NEAREST_INCLUSIVE_EPS`]. The primary key is "verticality", the dot with
/// `tiebreak` (default +z), and the dot with the target only breaks ties in
/// verticality. Exact ties on both keys go to the later candidate.
///
/// Returns a single vector, or an empty batch when nothing qualifies.
pub fn get_nearest(
    target: &Vector3d,
    candidates: &Vector3d,
    inclusive: bool,
    tiebreak: Option<&Vector3d>,
) -> Result<Vector3d> {
    if target.size() != 1 {
        return Err(VectorError::NotSingleVector {
            size: target.size(),
        });
    }
    let tiebreak = match tiebreak {
        Some(t) if t.size() != 1 => {
            return Err(VectorError::NotSingleVector { size: t.size() });
        }
        Some(t) => t.rows().next().unwrap_or([0.0, 0.0, 1.0]),
        None => [0.0, 0.0, 1.0],
    };
    let Some(target) = target.rows().next() else {
        return Ok(Vector3d::empty());
    };

    let eps = if inclusive { NEAREST_INCLUSIVE_EPS } else { 0.0 };
    let mut best: Option<(f64, f64, [f64; 3])> = None;
    for candidate in candidates.rows() {
        let cosine = dot(candidate, target);
        if !(-1.0 - eps < cosine && cosine < 1.0 + eps) {
            continue;
        }
        let verticality = dot(candidate, tiebreak);
        let better = match best {
            None => true,
            Some((v, c, _)) => verticality > v || (verticality == v && cosine >= c),
        };
        if better {
            best = Some((verticality, cosine, candidate));
        }
    }

    Ok(best.map_or_else(Vector3d::empty, |(_, _, v)| Vector3d::from_xyz(v)))
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}
