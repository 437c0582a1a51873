//! Account service: registration and login
//!
//! Password hashing and verification run on the blocking thread pool.
//! Tokens carry the account username as their subject.

use crate::auth::{JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::{AccountRecord, AccountStore, NewAccount, StoreError};
use clinic_shared::types::{AccessToken, RegisterRequest};
use clinic_shared::validation::{validate_email, validate_password, validate_username};
use clinic_shared::AuthError;
use tracing::{debug, info};

/// Account service for authentication operations
pub struct AccountService;

impl AccountService {
    /// Register a new account
    pub async fn register(
        store: &dyn AccountStore,
        passwords: &PasswordService,
        request: &RegisterRequest,
    ) -> Result<AccountRecord, ApiError> {
        let username = request.username.trim();
        validate_username(username).map_err(ApiError::Validation)?;
        validate_password(&request.password).map_err(ApiError::Validation)?;

        let email = request
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty());
        if let Some(email) = email {
            validate_email(email).map_err(ApiError::Validation)?;
        }

        // Login accepts either column, so each value must be free in both.
        if store.username_exists(username).await? || store.email_exists(username).await? {
            return Err(AuthError::DuplicateUsername.into());
        }
        if let Some(email) = email {
            if store.email_exists(email).await? || store.username_exists(email).await? {
                return Err(AuthError::DuplicateEmail.into());
            }
        }

        let password_hash = passwords.hash_async(request.password.clone()).await?;

        let account = store
            .create(NewAccount {
                username: username.to_string(),
                email: email.map(str::to_string),
                password_hash,
            })
            .await
            .map_err(|err| match err {
                // Lost a race with a concurrent registration
                StoreError::UniqueViolation(constraint) if constraint.contains("email") => {
                    ApiError::from(AuthError::DuplicateEmail)
                }
                StoreError::UniqueViolation(_) => ApiError::from(AuthError::DuplicateUsername),
                other => ApiError::from(other),
            })?;

        info!(account_id = %account.id, username = %account.username, "Account registered");
        Ok(account)
    }

    /// Check credentials and issue a session token
    ///
    /// `identifier` is a username or an email. Unknown accounts and wrong
    /// passwords are indistinguishable to the caller.
    pub async fn login(
        store: &dyn AccountStore,
        jwt: &JwtService,
        identifier: &str,
        password: &str,
    ) -> Result<AccessToken, ApiError> {
        let account = match store.find_by_login(identifier.trim()).await? {
            Some(account) => account,
            None => {
                debug!("Login attempt for unknown account");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        let valid =
            PasswordService::verify_async(password.to_string(), account.password_hash.clone())
                .await?;
        if !valid {
            debug!(username = %account.username, "Login attempt with wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = jwt.issue(&account.username)?;
        info!(username = %account.username, "Session token issued");

        Ok(AccessToken::bearer(token))
    }
}
