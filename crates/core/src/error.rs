// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Notification error: {0}")]
    Notification(String),
}

impl AppError {
    pub fn queue_not_found(queue_id: &str) -> Self {
        AppError::NotFound(format!("Queue with id {} not found", queue_id))
    }

    pub fn entry_not_found(queue_id: &str, entry_id: &str) -> Self {
        AppError::NotFound(format!(
            "Entry with id {} not found in queue {}",
            entry_id, queue_id
        ))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_) | AppError::Domain(_))
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
