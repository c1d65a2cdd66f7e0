//! Validation helpers for DTOs.

use validator::ValidationError;

/// Maximum accepted length for viewer and broadcaster identifiers.
pub const MAX_USER_ID_LENGTH: usize = 64;

/// Validates that a user or broadcaster identifier is usable as an opaque key.
///
/// Identity resolution happens outside this service, so the only contract is
/// a non-empty printable token of bounded length.
///
/// # Examples
///
/// ```ignore
/// validate_user_id("night_owl42")   // Ok
/// validate_user_id("")              // Err - empty
/// validate_user_id("two words")     // Err - whitespace
/// ```
pub fn validate_user_id(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() || id.len() > MAX_USER_ID_LENGTH {
        let mut err = ValidationError::new("user_id_length");
        err.message = Some(
            format!(
                "identifier must be between 1 and {} characters (got {})",
                MAX_USER_ID_LENGTH,
                id.len()
            )
            .into(),
        );
        return Err(err);
    }

    if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
        let mut err = ValidationError::new("user_id_format");
        err.message = Some("identifier must not contain whitespace or control characters".into());
        return Err(err);
    }

    Ok(())
}
