//! Error types for the clinic services

use thiserror::Error;

/// Credential and session failures
///
/// Token problems (bad signature, malformed, expired, missing subject) all
/// surface as [`AuthError::InvalidToken`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("The username is already in use.")]
    DuplicateUsername,

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Invalid or expired token.")]
    InvalidToken,
}

/// Patient record failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatientError {
    #[error("Patient with ID {0} not found.")]
    NotFound(i64),

    #[error("{message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    #[error("There is already a patient with that name and date of birth.")]
    DuplicateRecord,
}

impl PatientError {
    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        PatientError::InvalidField {
            field,
            message: message.into(),
        }
    }

    /// Name of the offending field, if this is a validation failure
    pub fn field(&self) -> Option<&'static str> {
        match self {
            PatientError::InvalidField { field, .. } => Some(field),
            _ => None,
        }
    }
}
