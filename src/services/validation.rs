use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use super::error::{ServiceError, ServiceResult};
use super::forms::SignUpForm;
use crate::auth::password_meets_policy;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles"));

pub fn validate_required<S: AsRef<str>>(fields: &[S]) -> ServiceResult<()> {
    if fields.iter().any(|f| f.as_ref().trim().is_empty()) {
        return Err(ServiceError::BadRequest("Required fields are missing in form".to_string()));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> ServiceResult<()> {
    if email.chars().count() < 5 || !EMAIL_RE.is_match(email) {
        return Err(ServiceError::BadRequest("Invalid email address".to_string()));
    }
    Ok(())
}

/// Emails are stored and compared trimmed and lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_min_length<S: AsRef<str>>(fields: &[S], min: usize) -> ServiceResult<()> {
    if fields.iter().any(|f| f.as_ref().trim().chars().count() < min) {
        return Err(ServiceError::BadRequest(format!(
            "Length must be at least {} characters.",
            min
        )));
    }
    Ok(())
}

pub fn validate_password_match_and_terms(form: &SignUpForm) -> ServiceResult<()> {
    if form.password != form.confirm_password {
        return Err(ServiceError::BadRequest("Passwords do not match".to_string()));
    }
    if !form.terms_and_conditions {
        return Err(ServiceError::BadRequest("Must accept Terms and Conditions".to_string()));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> ServiceResult<()> {
    if !password_meets_policy(password) {
        return Err(ServiceError::BadRequest("Invalid password".to_string()));
    }
    Ok(())
}

/// Parses every date or fails with one message for the whole set
pub fn validate_dates<const N: usize>(dates: [&str; N]) -> ServiceResult<[NaiveDate; N]> {
    let mut parsed = [NaiveDate::MIN; N];
    for (slot, raw) in parsed.iter_mut().zip(dates) {
        *slot = parse_date(raw)
            .ok_or_else(|| ServiceError::BadRequest("Required dates are missing or invalid".to_string()))?;
    }
    Ok(parsed)
}

pub fn validate_number_fields(fields: &[i32]) -> ServiceResult<()> {
    if fields.iter().any(|&v| v == 0) {
        return Err(ServiceError::BadRequest("Required fields are missing in form".to_string()));
    }
    Ok(())
}

/// Accepts `2025-03-01`, `2025-03-01T10:00:00` and RFC 3339 timestamps
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|d| d.date_naive()))
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok().map(|d| d.date()))
        .filter(|d| *d != NaiveDate::MIN)
}
