// Copyright 2025 Cowboy AI, LLC.

//! Error types for profile, community and trust operations

use thiserror::Error;

/// Errors that can occur in profile manager operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// A field of a document is not valid
    ///
    /// The `code` is the path of the offending field, for example
    /// `profile.norms[2].attribute`.
    #[error("Validation error at {code}: {message}")]
    ValidationError {
        /// Path of the field that is not valid
        code: String,
        /// Human readable reason
        message: String,
    },

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    EntityNotFound {
        /// Type of entity that wasn't found
        entity_type: String,
        /// ID that was searched for
        id: String,
    },

    /// The trust query did not select any event
    #[error("no events match the query")]
    NoMatchingEvents,

    /// A collaborator (store) call failed
    #[error("External service error: {service} - {message}")]
    ExternalServiceError {
        /// Name of the collaborator
        service: String,
        /// Error message from the collaborator
        message: String,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

impl DomainError {
    /// Create a validation error for the field at `code`
    pub fn validation(code: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::ValidationError {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        DomainError::EntityNotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Create a collaborator failure
    pub fn external(service: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::ExternalServiceError {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Field path of a validation error
    pub fn code(&self) -> Option<&str> {
        match self {
            DomainError::ValidationError { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DomainError::EntityNotFound { .. } | DomainError::NoMatchingEvents
        )
    }

    /// Check if this is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(self, DomainError::ValidationError { .. })
    }

    /// Check if a collaborator failed
    pub fn is_collaborator_error(&self) -> bool {
        matches!(
            self,
            DomainError::ExternalServiceError { .. } | DomainError::SerializationError(_)
        )
    }
}
