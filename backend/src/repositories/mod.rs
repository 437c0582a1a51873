//! Data access layer
//!
//! Each store is a trait with a PostgreSQL implementation and an in-memory
//! one. Services receive the store as an explicit argument.

pub mod account;
pub mod memory;
pub mod patient;

pub use account::{AccountRecord, AccountStore, NewAccount, PgAccountStore};
pub use memory::{MemoryAccountStore, MemoryPatientStore};
pub use patient::{PatientFilter, PatientRecord, PatientStore, PgPatientStore};

use thiserror::Error;

/// PostgreSQL SQLSTATE for unique constraint violations
const UNIQUE_VIOLATION: &str = "23505";

/// Storage failures
#[derive(Error, Debug)]
pub enum StoreError {
    /// The datastore could not be reached; retrying later may succeed
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if matches!(
            err,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
        ) {
            return StoreError::Unavailable(err.to_string());
        }

        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                return StoreError::UniqueViolation(
                    db_err.constraint().unwrap_or("unknown").to_string(),
                );
            }
        }

        StoreError::Database(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
