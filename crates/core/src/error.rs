//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Deterministic failures only: malformed values, broken invariants, bad
/// identifiers. Precondition failures of a specific workflow live in that
/// workflow's own error type and wrap this one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. an unknown step tag).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    ///
    /// Raised when data handed to a constructor (e.g. a restored snapshot)
    /// cannot describe a legal state.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// True for errors that indicate corrupted state rather than bad input.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::InvariantViolation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category_and_message() {
        let err = DomainError::invariant("history log is empty");
        assert_eq!(err.to_string(), "invariant violated: history log is empty");
        assert!(err.is_invariant_violation());

        let err = DomainError::validation("unknown wizard step: foo");
        assert_eq!(err.to_string(), "validation failed: unknown wizard step: foo");
        assert!(!err.is_invariant_violation());
    }
}
