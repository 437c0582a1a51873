//! API request and response types

use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Default page size for patient listings
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Upper bound on patient listing page size
pub const MAX_PAGE_LIMIT: i64 = 100;

// ============================================================================
// Authentication Types
// ============================================================================

/// Registration request
///
/// Older clients send `name` instead of `username`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(alias = "name")]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub password: String,
}

/// Login request
///
/// The identifier may be the account's username or its email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "email")]
    pub username: String,
    pub password: String,
}

/// Access token response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
}

impl AccessToken {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Plain acknowledgement body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Patient Types
// ============================================================================

/// Patient create/update request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRequest {
    pub name: String,
    pub birth_date: NaiveDate,
    pub health_conditions: String,
    pub gender: String,
    pub address: String,
}

/// Patient record response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientResponse {
    pub id: i64,
    pub name: String,
    pub birth_date: NaiveDate,
    pub health_conditions: String,
    pub gender: String,
    pub address: String,
}

/// Query-string value where an empty or blank string means absent
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map(Some).map_err(de::Error::custom)
        }
        _ => Ok(None),
    }
}

/// Patient listing query parameters
///
/// Blank values (`?birth_date=`) are treated as not supplied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientListQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub skip: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub limit: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub health_conditions: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub patient_id: Option<i64>,
}

impl PatientListQuery {
    /// Offset with negatives treated as zero
    pub fn skip(&self) -> i64 {
        self.skip.unwrap_or(0).max(0)
    }

    /// Page size clamped to `1..=MAX_PAGE_LIMIT`
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT)
    }
}
