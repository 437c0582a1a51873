//! Business logic services
//!
//! Services take their store as an explicit argument and return
//! `ApiError` on failure.

pub mod account;
pub mod patient;

pub use account::AccountService;
pub use patient::PatientService;
