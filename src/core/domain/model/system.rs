//! Domain models for system records and the creation options bag.

use crate::core::domain::{error::ValidationError, model::ks_meta::KsMeta, value_object};
use serde::Deserialize;

/// Default network interface name applied when a [`SystemSpec`] does not
/// name one.
pub const DEFAULT_INTERFACE: &str = "eth0";

/// A system as reported by `get_system`/`get_systems`.
///
/// Only the fields this client acts on are decoded; the server sends many
/// more, which are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemRecord {
    /// Unique system name (the primary identifier).
    pub name: String,
    /// Unique hostname.
    #[serde(default)]
    pub hostname: String,
    /// Profile (OS + kickstart template) the system provisions from.
    #[serde(default)]
    pub profile: String,
    /// Unique MAC address of the primary interface.
    #[serde(default)]
    pub mac_address: String,
    /// Whether the system netboots on next power-on.
    #[serde(default)]
    pub netboot_enabled: bool,
    /// Kickstart metadata (carries `ssh_key` and `custom_password`).
    #[serde(default)]
    pub ks_meta: KsMeta,
}

/// A distro as reported by `get_distros`.
#[derive(Debug, Clone, Deserialize)]
pub struct Distro {
    /// Unique distro name.
    pub name: String,
    /// Target architecture (e.g. `x86_64`).
    #[serde(default)]
    pub arch: String,
    /// OS family (e.g. `redhat`).
    #[serde(default)]
    pub breed: String,
    /// OS version within the family.
    #[serde(default)]
    pub os_version: String,
}

/// A profile as reported by `get_profiles`.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    /// Unique profile name.
    pub name: String,
    /// The distro this profile installs.
    #[serde(default)]
    pub distro: String,
    /// Path of the kickstart template.
    #[serde(default)]
    pub kickstart: String,
}

/// An image as reported by `get_images`.
#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    /// Unique image name.
    pub name: String,
    /// Path or URL of the image file.
    #[serde(default)]
    pub file: String,
    /// Image kind (e.g. `iso`, `direct`).
    #[serde(default)]
    pub image_type: String,
}

/// Structured options for creating a system.
///
/// `name`, `hostname`, and `mac_address` must each be unique across the
/// server's inventory; creation fails with a conflict if any of them is
/// already taken.
///
/// # Examples
///
/// ```
/// use cobbler_client::SystemSpec;
///
/// let spec = SystemSpec::new(
///     "web01",
///     "web01.example.com",
///     "32:00:17:70:bd:a0",
///     "centos-6.6-x86_64",
/// )
/// .interface_name("eno1");
/// ```
#[derive(Debug, Clone)]
pub struct SystemSpec {
    /// Unique system name; acts as the identifier for later operations.
    pub name: String,
    /// Unique hostname.
    pub hostname: String,
    /// Unique MAC address of the primary interface.
    pub mac_address: String,
    /// Profile the system provisions from.
    pub profile: String,
    /// Name of the primary network interface; defaults to
    /// [`DEFAULT_INTERFACE`] when `None`.
    pub interface_name: Option<String>,
}

impl SystemSpec {
    /// Creates a spec with the four required fields.
    pub fn new(
        name: impl Into<String>,
        hostname: impl Into<String>,
        mac_address: impl Into<String>,
        profile: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            hostname: hostname.into(),
            mac_address: mac_address.into(),
            profile: profile.into(),
            interface_name: None,
        }
    }

    /// Overrides the primary interface name.
    #[must_use]
    pub fn interface_name(mut self, name: impl Into<String>) -> Self {
        self.interface_name = Some(name.into());
        self
    }

    /// The effective interface name.
    #[must_use]
    pub fn interface(&self) -> &str {
        self.interface_name.as_deref().unwrap_or(DEFAULT_INTERFACE)
    }

    /// Checks that all required fields are present and well-formed. The
    /// first missing field is reported, in declaration order.
    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("name", &self.name),
            ("hostname", &self.hostname),
            ("mac_address", &self.mac_address),
            ("profile", &self.profile),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::Field {
                    field: field.to_string(),
                    message: format!("{field} is required to create a system"),
                });
            }
        }
        value_object::validate_mac(&self.mac_address)?;
        Ok(())
    }
}
