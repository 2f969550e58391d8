//! Error types for radar variable simulation.
//!
//! Only input validation produces errors. Numerical singularities such as a
//! dielectric constant of exactly one, or a vanishing reflectivity, flow
//! through the calculation as IEEE infinities and NaNs.

/// Result type for radar simulation operations
pub type RadarResult<T> = Result<T, RadarError>;

/// Errors raised while validating radar simulation inputs
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RadarError {
    /// Aspect ratio that fits no spheroid class
    #[error("Invalid aspect ratio {value} at index {index}: must be finite and positive")]
    InvalidAspectRatio {
        /// Position of the particle in its array
        index: usize,
        /// Offending aspect ratio
        value: f64,
    },

    /// Array lengths disagree
    #[error("Length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Name of the array with the wrong length
        what: &'static str,
        /// Required length
        expected: usize,
        /// Length received
        actual: usize,
    },

    /// Size distribution edges are too few or not increasing
    #[error("Invalid bin edges: {0}")]
    InvalidBinEdges(String),

    /// Wrong number of angular moment coefficients
    #[error("Angular moments require {expected} coefficients, got {actual}")]
    InvalidMoments {
        /// Required count
        expected: usize,
        /// Count received
        actual: usize,
    },

    /// Distribution or model parameter out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl RadarError {
    /// Shorthand for a length mismatch between two arrays.
    pub(crate) fn length(what: &'static str, expected: usize, actual: usize) -> Self {
        RadarError::LengthMismatch {
            what,
            expected,
            actual,
        }
    }

    /// Check if this error comes from array shapes rather than values
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            RadarError::LengthMismatch { .. } | RadarError::InvalidMoments { .. }
        )
    }
}
