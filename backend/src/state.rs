//! Application state management
//!
//! Shared resources passed to every handler via Axum's state extraction.
//! All fields are cheap to clone and read-only during request handling.

use crate::auth::{JwtService, PasswordService};
use crate::config::AppConfig;
use crate::repositories::{
    AccountStore, MemoryAccountStore, MemoryPatientStore, PatientStore, PgAccountStore,
    PgPatientStore,
};
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Account persistence
    pub accounts: Arc<dyn AccountStore>,
    /// Patient persistence
    pub patients: Arc<dyn PatientStore>,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Pre-initialized JWT service with cached keys
    pub jwt: JwtService,
    pub passwords: PasswordService,
}

impl AppState {
    /// State backed by PostgreSQL
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        Self::with_stores(
            Arc::new(PgAccountStore::new(db.clone())),
            Arc::new(PgPatientStore::new(db)),
            config,
        )
    }

    /// State backed by in-process stores
    pub fn in_memory(config: AppConfig) -> Self {
        Self::with_stores(
            Arc::new(MemoryAccountStore::new()),
            Arc::new(MemoryPatientStore::new()),
            config,
        )
    }

    /// State over arbitrary stores
    ///
    /// Derives the JWT keys from the config secret, so call once at startup.
    pub fn with_stores(
        accounts: Arc<dyn AccountStore>,
        patients: Arc<dyn PatientStore>,
        config: AppConfig,
    ) -> Self {
        let jwt = JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry_secs);
        let passwords = PasswordService::from_config(&config.password);

        Self {
            accounts,
            patients,
            config: Arc::new(config),
            jwt,
            passwords,
        }
    }

    #[inline]
    pub fn accounts(&self) -> &dyn AccountStore {
        self.accounts.as_ref()
    }

    #[inline]
    pub fn patients(&self) -> &dyn PatientStore {
        self.patients.as_ref()
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    #[inline]
    pub fn passwords(&self) -> &PasswordService {
        &self.passwords
    }
}
