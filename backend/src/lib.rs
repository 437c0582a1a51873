//! Clinic backend library
//!
//! Account registration, token login and patient record management over
//! axum. Exposed as a library so integration tests can build the router.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
