use std::time::Duration;

use thiserror::Error;
use twin_registry_sdk::TwinRegistryError;

/// Domain-specific errors using thiserror
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Twin model not found: {id}")]
    ModelNotFound { id: String },

    #[error("Twin instance not found: {id}")]
    TwinNotFound { id: String },

    #[error("Twin model '{id}' already exists")]
    ModelAlreadyExists { id: String },

    #[error("Twin instance '{id}' already exists")]
    TwinAlreadyExists { id: String },

    #[error("Twin model '{id}' is still referenced by twin instances")]
    ModelInUse { id: String },

    #[error("Referenced twin model '{model_id}' does not exist")]
    InvalidModelReference { model_id: String },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("{operation} was cancelled")]
    Cancelled { operation: String },

    #[error("{operation} exceeded its deadline of {timeout:?}")]
    DeadlineExceeded { operation: String, timeout: Duration },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn model_not_found(id: impl Into<String>) -> Self {
        Self::ModelNotFound { id: id.into() }
    }

    pub fn twin_not_found(id: impl Into<String>) -> Self {
        Self::TwinNotFound { id: id.into() }
    }

    pub fn model_already_exists(id: impl Into<String>) -> Self {
        Self::ModelAlreadyExists { id: id.into() }
    }

    pub fn twin_already_exists(id: impl Into<String>) -> Self {
        Self::TwinAlreadyExists { id: id.into() }
    }

    pub fn model_in_use(id: impl Into<String>) -> Self {
        Self::ModelInUse { id: id.into() }
    }

    pub fn invalid_model_reference(model_id: impl Into<String>) -> Self {
        Self::InvalidModelReference {
            model_id: model_id.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn cancelled(operation: impl Into<String>) -> Self {
        Self::Cancelled {
            operation: operation.into(),
        }
    }

    pub fn deadline_exceeded(operation: impl Into<String>, timeout: Duration) -> Self {
        Self::DeadlineExceeded {
            operation: operation.into(),
            timeout,
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}

/// Convert domain errors to SDK errors for public API consumption.
impl From<DomainError> for TwinRegistryError {
    fn from(domain_error: DomainError) -> Self {
        match domain_error {
            DomainError::ModelNotFound { id } => TwinRegistryError::not_found("Twin model", id),
            DomainError::TwinNotFound { id } => TwinRegistryError::not_found("Twin instance", id),
            DomainError::ModelAlreadyExists { id } => {
                TwinRegistryError::conflict(format!("twin model '{id}' already exists"))
            }
            DomainError::TwinAlreadyExists { id } => {
                TwinRegistryError::conflict(format!("twin instance '{id}' already exists"))
            }
            DomainError::ModelInUse { id } => TwinRegistryError::conflict(format!(
                "twin model '{id}' is still referenced by twin instances"
            )),
            DomainError::InvalidModelReference { model_id } => {
                TwinRegistryError::invalid_reference("twin model", model_id)
            }
            DomainError::Validation { field, message } => {
                TwinRegistryError::invalid_argument(format!("{field}: {message}"))
            }
            DomainError::Cancelled { operation } => {
                TwinRegistryError::cancelled(format!("{operation} was cancelled"))
            }
            DomainError::DeadlineExceeded { operation, timeout } => TwinRegistryError::cancelled(
                format!("{operation} exceeded its deadline of {timeout:?}"),
            ),
            DomainError::Database { message } => {
                tracing::error!(error = %message, "storage failure reported as internal error");
                TwinRegistryError::internal()
            }
        }
    }
}
