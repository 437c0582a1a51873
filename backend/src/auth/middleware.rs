//! Bearer-token authentication
//!
//! Protected handlers take an [`AuthUser`] argument; extraction fails with
//! 401 before the handler body runs.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::FromRef,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

/// Authenticated caller extracted from the session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// Account username carried in the token's `sub` claim
    pub subject: String,
}

/// Pull the token out of an `Authorization: Bearer <token>` header
///
/// The scheme is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

    match header.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() => {
            Ok(token.trim())
        }
        _ => Err(ApiError::Unauthorized("Not authenticated".to_string())),
    }
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let token = bearer_token(&parts.headers)?;
        let subject = app_state.jwt().validate(token)?;

        Ok(AuthUser { subject })
    }
}
