use crate::core::domain::error::ValidationError;

/// A validated MAC address, normalized to lowercase colon-separated form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacAddress(String);

impl MacAddress {
    /// Validates and normalizes a MAC address string.
    pub fn parse(mac: &str) -> Result<Self, ValidationError> {
        validate_mac(mac)?;
        Ok(Self(mac.to_ascii_lowercase()))
    }

    /// Returns the MAC address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MacAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validates a MAC address (six colon-separated hex octets).
pub(crate) fn validate_mac(mac: &str) -> Result<(), ValidationError> {
    if mac.is_empty() {
        return Err(ValidationError::Field {
            field: "mac_address".to_string(),
            message: "MAC address cannot be empty".to_string(),
        });
    }
    let octets: Vec<&str> = mac.split(':').collect();
    if octets.len() != 6
        || !octets
            .iter()
            .all(|o| o.len() == 2 && o.chars().all(|c| c.is_ascii_hexdigit()))
    {
        return Err(ValidationError::Format(format!(
            "'{mac}' is not a valid MAC address (expected six colon-separated hex octets)"
        )));
    }
    Ok(())
}
