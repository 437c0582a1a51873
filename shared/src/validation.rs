//! Input validation functions
//!
//! Patient rules are applied identically on create and update, in the order
//! birth date, name, gender. The first failing rule wins.

use crate::errors::PatientError;
use crate::models::Gender;
use crate::types::PatientRequest;
use chrono::NaiveDate;
use validator::ValidateEmail;

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if email.len() > 255 {
        return Err("Email too long".to_string());
    }
    if !email.validate_email() {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), String> {
    let length = password.chars().count();
    if length < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    if length > 128 {
        return Err("Password too long".to_string());
    }
    Ok(())
}

/// Validate an account username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.trim().is_empty() {
        return Err("Username cannot be empty".to_string());
    }
    if username.chars().count() > 64 {
        return Err("Username too long".to_string());
    }
    Ok(())
}

// ============================================================================
// Patient Validation
// ============================================================================

/// Patient fields that passed validation, with gender normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPatient {
    pub name: String,
    pub birth_date: NaiveDate,
    pub health_conditions: String,
    pub gender: Gender,
    pub address: String,
}

/// Birth date must not be after `today`
pub fn validate_birth_date(birth_date: NaiveDate, today: NaiveDate) -> Result<(), PatientError> {
    if birth_date > today {
        return Err(PatientError::invalid_field(
            "birth_date",
            "The date of birth cannot be a future date.",
        ));
    }
    Ok(())
}

/// Name must contain at least two whitespace-separated words
pub fn validate_full_name(name: &str) -> Result<(), PatientError> {
    if name.split_whitespace().count() < 2 {
        return Err(PatientError::invalid_field(
            "name",
            "The name must contain at least two words.",
        ));
    }
    Ok(())
}

/// Parse gender, ignoring case
pub fn parse_gender(gender: &str) -> Result<Gender, PatientError> {
    gender.parse::<Gender>().map_err(|_| {
        let accepted: Vec<&str> = Gender::ALL.iter().map(Gender::as_str).collect();
        PatientError::invalid_field(
            "gender",
            format!(
                "The gender must be one of the following: {}.",
                accepted.join(", ")
            ),
        )
    })
}

/// Validate a patient request against `today`
pub fn validate_patient(
    request: &PatientRequest,
    today: NaiveDate,
) -> Result<ValidatedPatient, PatientError> {
    validate_birth_date(request.birth_date, today)?;
    validate_full_name(&request.name)?;
    let gender = parse_gender(&request.gender)?;

    Ok(ValidatedPatient {
        name: request.name.clone(),
        birth_date: request.birth_date,
        health_conditions: request.health_conditions.clone(),
        gender,
        address: request.address.clone(),
    })
}
