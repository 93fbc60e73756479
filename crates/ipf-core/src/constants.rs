/// Numerical epsilon for near-zero comparisons
pub const EPSILON: f64 = 1e-10;

/// Absolute tolerance below which x and y are snapped to zero before `atan2`
pub const AZIMUTH_SNAP: f64 = 1e-8;

/// Decimals kept on cosines before `acos` in `angle_with`
pub const COSINE_DECIMALS: i32 = 10;

/// Decimals kept on center closeness before the arg-max in sector reduction
pub const CLOSENESS_DECIMALS: i32 = 12;

/// Window around ±1 that `get_nearest` accepts when `inclusive` is set
pub const NEAREST_INCLUSIVE_EPS: f64 = 1e-9;

/// Tolerance of the half-space test `n·v > -SECTOR_TOLERANCE`
pub const SECTOR_TOLERANCE: f64 = 1e-9;

/// Two group elements are the same if |q1·q2| exceeds 1 minus this
pub const ROTATION_MATCH_TOLERANCE: f64 = 1e-6;

/// Default rows per block in the chunked outer product
pub const DEFAULT_CHUNK_SIZE: usize = 20;

/// Default number of vectors tracing each circle
pub const DEFAULT_CIRCLE_STEPS: usize = 100;

/// Opening angle of a great circle
pub const GREAT_CIRCLE: f64 = std::f64::consts::FRAC_PI_2;
