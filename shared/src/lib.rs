//! Clinic Shared Library
//!
//! Types, domain errors and validation rules shared by the clinic
//! auth and patient-records services.

pub mod errors;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::Gender;
pub use types::*;
