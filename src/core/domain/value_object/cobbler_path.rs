use crate::core::domain::error::ValidationError;

/// A validated Cobbler API mount path (e.g. `/cobbler_api`).
#[derive(Debug, Clone)]
pub struct CobblerPath(String);

impl CobblerPath {
    /// Creates a new path without validation.
    pub(crate) fn new_unchecked(path: String) -> Self {
        Self(path)
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validates an API path.
pub(crate) fn validate_path(path: &str) -> Result<(), ValidationError> {
    if path.is_empty() {
        return Err(ValidationError::Field {
            field: "path".to_string(),
            message: "Path cannot be empty".to_string(),
        });
    }
    if !path.starts_with('/') {
        return Err(ValidationError::Format(
            "Path must start with '/'".to_string(),
        ));
    }
    if path.chars().any(|c| c.is_whitespace()) {
        return Err(ValidationError::Format(
            "Path cannot contain whitespace".to_string(),
        ));
    }
    Ok(())
}
