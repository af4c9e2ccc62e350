mod cobbler_host;
mod cobbler_password;
mod cobbler_path;
mod cobbler_port;
mod cobbler_username;
mod mac_address;

pub use cobbler_host::CobblerHost;
pub use cobbler_password::CobblerPassword;
pub use cobbler_path::CobblerPath;
pub use cobbler_port::CobblerPort;
pub use cobbler_username::CobblerUsername;
pub use mac_address::MacAddress;

// Re-export validation functions for internal use
pub(crate) use cobbler_host::validate_host;
pub(crate) use cobbler_password::validate_login_password;
pub(crate) use cobbler_path::validate_path;
pub(crate) use cobbler_port::validate_port;
pub(crate) use cobbler_username::validate_username;
pub(crate) use mac_address::validate_mac;
