//! Error types for generation, configuration and property execution.
//!
//! Only failures that abort a run are errors. A falsified trial is recorded
//! as a [`Failure`](crate::sample::Failure), an invalid trial is simply
//! skipped, and an exhaustive enumeration that would be too large is
//! reported as `None` by the exhaustive combinators.

use thiserror::Error;

use crate::config::ConfigError;

/// An arbitrary could not produce a value.
///
/// Generation errors are fatal to the trial in which they occur and are
/// propagated to the caller unchanged; they are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Lower bound of a numeric range is above its upper bound
    #[error("invalid range: min {min} is greater than max {max}")]
    InvalidRange { min: String, max: String },

    /// Size bounds of a container cannot be satisfied
    #[error("invalid size range: min size {min} is greater than max size {max}")]
    InvalidSize { min: usize, max: usize },

    /// A filter rejected too many consecutive values
    #[error("filter rejected {misses} consecutive values")]
    TooManyFilterMisses { misses: usize },

    /// A set could not collect enough distinct elements
    #[error("only {generated} unique elements could be generated, {required} required")]
    NotEnoughUniqueElements { generated: usize, required: usize },

    /// `of` was given nothing to choose from
    #[error("cannot choose from an empty list of values")]
    EmptyChoice,
}

impl GenerationError {
    /// Create an invalid range error from any displayable bounds
    pub fn invalid_range(min: impl ToString, max: impl ToString) -> Self {
        Self::InvalidRange {
            min: min.to_string(),
            max: max.to_string(),
        }
    }
}

/// Crate-level error returned by property execution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WhittleError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Too many trials violated their assumptions to draw a conclusion
    #[error("too many invalid trials: {invalid} invalid for {tries} tries")]
    TooManyInvalidTrials { invalid: usize, tries: usize },

    /// A job running on a worker thread panicked
    #[error("worker {worker} panicked: {message}")]
    WorkerPanicked { worker: usize, message: String },
}

/// Result alias used throughout the crate
pub type Result<T, E = WhittleError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_error_display() {
        let error = GenerationError::invalid_range(10, 1);
        assert_eq!(
            error.to_string(),
            "invalid range: min 10 is greater than max 1"
        );

        let error = GenerationError::NotEnoughUniqueElements {
            generated: 2,
            required: 5,
        };
        assert_eq!(
            error.to_string(),
            "only 2 unique elements could be generated, 5 required"
        );
    }

    #[test]
    fn test_whittle_error_is_transparent() {
        let error: WhittleError = GenerationError::EmptyChoice.into();
        assert_eq!(error.to_string(), "cannot choose from an empty list of values");

        let error: WhittleError = ConfigError::InvalidTries(0).into();
        assert!(matches!(error, WhittleError::Config(_)));
    }
}
