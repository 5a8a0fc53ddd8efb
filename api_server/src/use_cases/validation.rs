use crate::domain::ApiError;

pub const MIN_PASSWORD_LEN: usize = 8;
const MIN_USERNAME_LEN: usize = 3;
const MAX_USERNAME_LEN: usize = 32;

pub fn validate_email(value: &str) -> Result<String, ApiError> {
    let email = value.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
            Ok(email.to_string())
        }
        _ => Err(ApiError::Validation("invalid email")),
    }
}

pub fn validate_password(value: &str) -> Result<(), ApiError> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(
            "password must be at least 8 characters",
        ));
    }
    Ok(())
}

pub fn validate_username(value: &str) -> Result<String, ApiError> {
    let len = value.chars().count();

    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) || value.trim() != value {
        return Err(ApiError::Validation("invalid username"));
    }

    // Usernames end up in URLs and storage keys.
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(ApiError::Validation("invalid username"));
    }

    Ok(value.to_string())
}

// User ids become single platform path segments and storage key prefixes.
pub fn validate_user_id(value: &str) -> Result<&str, ApiError> {
    let id = value.trim();
    if id.is_empty() {
        return Err(ApiError::Validation("user id is required"));
    }
    if id.contains("..")
        || id
            .chars()
            .any(|c| c.is_control() || matches!(c, '/' | '\\' | '?' | '#' | '%'))
    {
        return Err(ApiError::Validation("invalid user id"));
    }
    Ok(id)
}

// Bearer tokens are required for calls made on the user's behalf.
pub fn require_token(token: Option<&str>) -> Result<&str, ApiError> {
    token
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(ApiError::MissingToken)
}
