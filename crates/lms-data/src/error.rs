//! Error types for the lms-data crate.
//!
//! Generation is pure and deterministic, so the only failures are exhausted
//! uniqueness retries and planners asked to pick from an empty reference set.

use thiserror::Error;

/// Errors that can occur while planning synthetic warehouse rows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Failed to produce a unique student e-mail after maximum retries.
    #[error("failed to generate unique student e-mail after {max_attempts} attempts")]
    EmailGenerationFailed {
        /// Number of attempts made before giving up.
        max_attempts: usize,
    },

    /// Lessons need at least one topic to reference.
    #[error("no topics available for lesson assignment")]
    NoTopics,

    /// Learning elements need at least one element type to reference.
    #[error("no element types available for learning element assignment")]
    NoElementTypes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_generation_failed_formats_correctly() {
        let err = GenerationError::EmailGenerationFailed { max_attempts: 100 };
        assert_eq!(
            err.to_string(),
            "failed to generate unique student e-mail after 100 attempts"
        );
    }

    #[test]
    fn no_topics_formats_correctly() {
        assert_eq!(
            GenerationError::NoTopics.to_string(),
            "no topics available for lesson assignment"
        );
    }

    #[test]
    fn no_element_types_formats_correctly() {
        assert_eq!(
            GenerationError::NoElementTypes.to_string(),
            "no element types available for learning element assignment"
        );
    }
}
