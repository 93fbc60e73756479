//! Batched 3D vector algebra for crystallographic direction data.
//!
//! Vectors live in a [`Vector3d`] backed by an `ndarray` array whose last
//! axis holds x, y and z. Every operation is provided by the
//! [`VectorBatch`] trait, so types that are themselves vector batches (like
//! a [`FundamentalSector`]) get results of their own kind back.
//!
//! On top of the algebra: spherical coordinates, angular nearest-match,
//! pairwise dot products with an eager or chunked engine, small and great
//! circles, and reduction into the fundamental sector of a point group.
//!
//! Zero I/O. The chunked engine may draw a progress bar on stderr when
//! asked to.

pub mod circle;
pub mod constants;
pub mod error;
pub mod hemisphere;
pub mod nearest;
pub mod outer;
pub mod quaternion;
pub mod rotation;
pub mod sector;
pub mod shape;
pub mod spherical;
pub mod symmetry;
pub mod vector;

pub use constants::{DEFAULT_CHUNK_SIZE, DEFAULT_CIRCLE_STEPS, GREAT_CIRCLE};
pub use error::{Result, VectorError};
pub use hemisphere::{Hemisphere, Projection};
pub use outer::{ChunkConfig, Evaluation};
pub use quaternion::Quaternion;
pub use rotation::Rotation;
pub use sector::FundamentalSector;
pub use symmetry::{CandidateRule, FoldElement, PointGroup, PointSymmetry, Symmetry};
pub use vector::{Operand, Vector3d, VectorBatch, VectorKey};
