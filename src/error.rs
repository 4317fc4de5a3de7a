//! Error types for sterad.
//!
//! All fallible operations return `McResult<T>` instead of panicking.
//! Statistical failure modes (an empty propagation sample) are distinct
//! from caller mistakes (invalid arguments) so the driver can decide
//! per-distance whether to continue.

use thiserror::Error;

/// Result type alias for sterad operations.
pub type McResult<T> = Result<T, McError>;

/// Unified error type for estimation, propagation, and configuration.
#[derive(Debug, Error)]
pub enum McError {
    /// Caller supplied a parameter outside its valid domain.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the rejected parameter.
        message: String,
    },

    /// Every radius perturbation in a propagation run was rejected,
    /// leaving nothing to aggregate.
    #[error("empty sample: all {attempts} radius draws rejected ({rejected} non-positive)")]
    EmptySample {
        /// Number of perturbation attempts made.
        attempts: usize,
        /// Number of draws rejected as non-positive.
        rejected: usize,
    },

    /// A non-finite value surfaced where a finite one is required.
    #[error("non-finite value detected at {location}")]
    NonFiniteValue {
        /// Location where the non-finite value was detected.
        location: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Configuration validation error.
    #[error("validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl McError {
    /// Create an invalid-argument error with a message.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a non-finite-value error naming the detection site.
    #[must_use]
    pub fn non_finite(location: impl Into<String>) -> Self {
        Self::NonFiniteValue {
            location: location.into(),
        }
    }

    /// Check whether this is the empty-sample condition.
    ///
    /// The driver treats this as a per-distance statistical failure and
    /// keeps processing the remaining distances.
    #[must_use]
    pub const fn is_empty_sample(&self) -> bool {
        matches!(self, Self::EmptySample { .. })
    }
}
