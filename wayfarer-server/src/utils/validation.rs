//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Limits are chosen as reasonable UX limits for titles, descriptions and
//! contact fields; the document store has no built-in length enforcement.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity titles/names: package title, hotel name, visa country, airline, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Long-form text: descriptions, enquiry messages
pub const MAX_TEXT_LEN: usize = 5000;

/// Short identifiers: phone, locations, subjects, flight numbers
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}
