//! Unified error types for TraceVault.
//!
//! This is the canonical error type for all TraceVault operations. Message
//! text is contractual: external layers and tests match on the exact
//! `"<Type> <id> not found"` / `"<Type> <id> already exists"` strings, so
//! the Display implementations here must not drift.

use thiserror::Error;

/// All TraceVault errors.
///
/// Every fallible operation in the engine returns one of these variants.
/// No retries happen inside the core; errors propagate synchronously to the
/// immediate caller.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    /// Malformed ref URI or digest string
    #[error("invalid ref: {0}")]
    Format(String),

    /// Unsupported sort field or malformed filter
    #[error("{0}")]
    Validation(String),

    /// Entity absent or tombstoned
    #[error("{kind} {id} not found")]
    NotFound {
        /// Entity type name (e.g. "ModelClass")
        kind: &'static str,
        /// The id that failed to resolve
        id: String,
    },

    /// Id reuse, including reuse of a tombstoned id
    #[error("{kind} {id} already exists")]
    AlreadyExists {
        /// Entity type name
        kind: &'static str,
        /// The id that was already consumed
        id: String,
    },

    /// A required foreign reference did not resolve at creation time.
    ///
    /// Specialization of [`Error::NotFound`]: the Display text is identical
    /// (callers match on `"<Type> <id> not found"`), but the variant also
    /// records which entity type held the dangling reference.
    #[error("{kind} {id} not found")]
    ReferenceIntegrity {
        /// The entity type whose create carried the bad reference
        referring: &'static str,
        /// Entity type of the missing referent
        kind: &'static str,
        /// The id that failed to resolve
        id: String,
    },
}

/// Result type for TraceVault operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this is a not-found error.
    ///
    /// True for both plain `NotFound` and its `ReferenceIntegrity`
    /// specialization.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::NotFound { .. } | Error::ReferenceIntegrity { .. }
        )
    }

    /// Check if this is an already-exists conflict.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Error::AlreadyExists { .. })
    }

    /// Check if this is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// Check if this is a format error.
    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format(_))
    }
}
