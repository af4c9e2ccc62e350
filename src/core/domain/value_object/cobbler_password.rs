use crate::core::domain::error::ValidationError;

/// The Cobbler login password (plaintext, held only for the `login` call).
///
/// This is an existing server-side credential that the client merely
/// forwards, so no strength scoring is applied; only emptiness and length
/// are rejected.
#[derive(Clone)]
pub struct CobblerPassword(String);

impl CobblerPassword {
    /// Creates a new password without validation.
    pub(crate) fn new_unchecked(password: String) -> Self {
        Self(password)
    }

    /// Returns the password as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keep credentials out of debug output.
impl std::fmt::Debug for CobblerPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CobblerPassword(***)")
    }
}

/// Validates a login password.
pub(crate) fn validate_login_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::Field {
            field: "password".to_string(),
            message: "Password cannot be empty".to_string(),
        });
    }
    if password.len() > 128 {
        return Err(ValidationError::Format(
            "Password cannot exceed 128 characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_login_password_valid() {
        assert!(validate_login_password("s3cret").is_ok());
    }

    #[test]
    fn test_validate_login_password_invalid() {
        assert!(validate_login_password("").is_err());
        assert!(validate_login_password(&"a".repeat(129)).is_err());
    }

    #[test]
    fn test_password_debug_is_redacted() {
        let password = CobblerPassword::new_unchecked("s3cret".to_string());
        assert_eq!(format!("{password:?}"), "CobblerPassword(***)");
    }
}
