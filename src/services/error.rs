use thiserror::Error;
use tracing::error;

use crate::database::manager::DatabaseError;

/// Outcome of a failed service operation: a status class plus a client-facing message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("{0}")]
    Failed(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn message(&self) -> &str {
        match self {
            ServiceError::BadRequest(msg)
            | ServiceError::Unauthorized(msg)
            | ServiceError::NotFound(msg)
            | ServiceError::AlreadyExists(msg)
            | ServiceError::Failed(msg) => msg,
        }
    }

    /// Logs the underlying error and returns a generic failure for `action`
    pub fn failed(action: &str, err: impl std::fmt::Display) -> Self {
        error!("Failed to {}: {}", action, err);
        ServiceError::Failed(format!("An error occurred while trying to {}.", action))
    }

    /// Classifies an insert/update error; a dangling reference is the caller's fault
    pub fn from_write(action: &str, err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => ServiceError::NotFound(msg),
            DatabaseError::UniqueViolation(constraint) => {
                ServiceError::AlreadyExists(unique_message(&constraint).to_string())
            }
            DatabaseError::ForeignKeyViolation(_) => {
                ServiceError::BadRequest("Referenced client, user or status does not exist.".to_string())
            }
            other => Self::failed(action, other),
        }
    }

    /// Classifies a delete error; a foreign-key violation means the row is still referenced
    pub fn from_delete(action: &str, err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => ServiceError::NotFound(msg),
            DatabaseError::ForeignKeyViolation(_) => ServiceError::AlreadyExists(
                "The record is still referenced by one or more projects.".to_string(),
            ),
            other => Self::failed(action, other),
        }
    }
}

fn unique_message(constraint: &str) -> &'static str {
    match constraint {
        "users_email_key" => "User with this email already exists.",
        "clients_client_name_key" => "Client name already exists.",
        "statuses_status_name_key" => "Status already exists.",
        _ => "Record already exists.",
    }
}
