// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid entry status transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Invalid queue settings: {0}")]
    InvalidSettings(String),

    #[error("Invalid business hours: {0}")]
    InvalidBusinessHours(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
