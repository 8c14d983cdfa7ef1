//! Public error types for the `twin-registry` module.
//!
//! These errors are safe to expose to other modules and consumers. Storage
//! details never cross this boundary: anything unrelated to input correctness
//! is reported as [`TwinRegistryError::Internal`].

use thiserror::Error;

/// The closed set of failure kinds a registry operation can produce.
///
/// Callers translating errors into transport signals should match on this
/// enum exhaustively rather than on error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The target entity does not exist.
    NotFound,
    /// Unique-key violation, or a delete blocked by existing references.
    Conflict,
    /// A caller-supplied foreign-entity ID does not resolve.
    InvalidReference,
    /// Malformed input.
    InvalidArgument,
    /// The call was cancelled or its deadline elapsed before a result was computed.
    Cancelled,
    /// Storage or transport failure unrelated to the input.
    Internal,
}

/// Errors that can be returned by the `TwinRegistryClientV1`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TwinRegistryError {
    /// The requested entity was not found.
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// The write collides with existing state.
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// A referenced entity does not exist.
    #[error("Referenced {resource} '{id}' does not exist")]
    InvalidReference { resource: &'static str, id: String },

    /// The input is malformed.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The call was cancelled or timed out; nothing was computed.
    #[error("Cancelled: {message}")]
    Cancelled { message: String },

    /// An internal error occurred.
    #[error("Internal error")]
    Internal,
}

impl TwinRegistryError {
    /// Create a `NotFound` error.
    #[must_use]
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Create a `Conflict` error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create an `InvalidReference` error.
    #[must_use]
    pub fn invalid_reference(resource: &'static str, id: impl Into<String>) -> Self {
        Self::InvalidReference {
            resource,
            id: id.into(),
        }
    }

    /// Create an `InvalidArgument` error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a `Cancelled` error.
    #[must_use]
    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::Cancelled {
            message: message.into(),
        }
    }

    /// Create an `Internal` error.
    #[must_use]
    pub const fn internal() -> Self {
        Self::Internal
    }

    /// The kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::InvalidReference { .. } => ErrorKind::InvalidReference,
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::Cancelled { .. } => ErrorKind::Cancelled,
            Self::Internal => ErrorKind::Internal,
        }
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is a conflict error.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Returns `true` if this is an invalid reference error.
    #[must_use]
    pub const fn is_invalid_reference(&self) -> bool {
        matches!(self, Self::InvalidReference { .. })
    }

    /// Returns `true` if this is an invalid argument error.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// Returns `true` if the call was cancelled or timed out.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
