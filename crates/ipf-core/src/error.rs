use std::fmt;

#[derive(Debug)]
pub enum VectorError {
    /// Two vector batches were multiplied together.
    AmbiguousProduct,
    /// A vector batch appeared as a divisor.
    UndefinedDivision,
    ShapeMismatch {
        left: Vec<usize>,
        right: Vec<usize>,
    },
    InvalidData(String),
    NotSingleVector {
        size: usize,
    },
    NoPerpendicular,
    EmptyBatch,
    InvalidChunkSize,
    InvalidHemisphere(String),
    InvalidProjection(String),
    UnknownPointGroup(String),
    InvalidSymmetry(String),
    Shape(ndarray::ShapeError),
}

impl fmt::Display for VectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VectorError::AmbiguousProduct => write!(
                f,
                "multiplying one vector with another is ambiguous, try `dot` or `cross` instead"
            ),
            VectorError::UndefinedDivision => write!(f, "division by a vector is undefined"),
            VectorError::ShapeMismatch { left, right } => {
                write!(f, "shapes {left:?} and {right:?} cannot be broadcast together")
            }
            VectorError::InvalidData(msg) => write!(f, "invalid vector data: {msg}"),
            VectorError::NotSingleVector { size } => {
                write!(f, "`get_nearest` only works for single vectors, got {size}")
            }
            VectorError::NoPerpendicular => {
                write!(f, "no vectors are perpendicular to the zero vector")
            }
            VectorError::EmptyBatch => write!(f, "operation needs at least one vector"),
            VectorError::InvalidChunkSize => write!(f, "chunk size must be at least 1"),
            VectorError::InvalidHemisphere(h) => write!(
                f,
                "hemisphere \"{h}\" is unsupported, use \"upper\", \"lower\" or \"both\""
            ),
            VectorError::InvalidProjection(p) => write!(
                f,
                "projection \"{p}\" is unsupported, use \"ipf\" or \"stereographic\""
            ),
            VectorError::UnknownPointGroup(name) => write!(f, "unknown point group: {name}"),
            VectorError::InvalidSymmetry(msg) => write!(f, "invalid symmetry: {msg}"),
            VectorError::Shape(e) => write!(f, "shape error: {e}"),
        }
    }
}

impl std::error::Error for VectorError {}

impl From<ndarray::ShapeError> for VectorError {
    fn from(e: ndarray::ShapeError) -> Self {
        VectorError::Shape(e)
    }
}

pub type Result<T> = std::result::Result<T, VectorError>;
