//! Domain error model.

use thiserror::Error;

use crate::violation::Violations;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// conflicts, missing items). Only `InvariantViolation` signals a defect; the
/// rest are recoverable by fixing input and retrying.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A candidate broke one or more validation rules.
    #[error("validation failed: {0}")]
    Validation(Violations),

    /// An item with the same identifier already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The referenced item does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Committed state no longer satisfies the rules it was admitted under.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(violations: impl Into<Violations>) -> Self {
        Self::Validation(violations.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// False only for internal-consistency faults.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvariantViolation(_))
    }

    /// Violations carried by a `Validation` error, if any.
    pub fn violations(&self) -> Option<&Violations> {
        match self {
            Self::Validation(v) => Some(v),
            _ => None,
        }
    }
}
