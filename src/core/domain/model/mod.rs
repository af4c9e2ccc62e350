mod auth;
mod connection;
mod ks_meta;
mod system;

pub use auth::{AuthToken, SystemHandle};
pub use connection::CobblerConnection;
pub use ks_meta::KsMeta;
pub use system::{DEFAULT_INTERFACE, Distro, Image, Profile, SystemRecord, SystemSpec};
