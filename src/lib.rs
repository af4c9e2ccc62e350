//! An async SDK for the Cobbler bare-metal provisioning server's XML-RPC
//! API: system creation with uniqueness checks, netboot toggling, kickstart
//! metadata updates (SSH keys, passwords), and inventory listings.
//!
//! The XML-RPC wire format itself is not part of this crate. Callers inject
//! any [`RpcTransport`] implementation; the client composes the server's
//! methods (`login`, `new_system`, `modify_system`, `save_system`, ...)
//! into the higher-level operations below.

mod auth;
mod core;
mod inventory;
mod systems;

pub use crate::core::domain::error::{
    CobblerError, CobblerResult, TransportError, ValidationError,
};
pub use crate::core::domain::model::{
    AuthToken, CobblerConnection, DEFAULT_INTERFACE, Distro, Image, KsMeta, Profile, SystemHandle,
    SystemRecord, SystemSpec,
};
pub use crate::core::domain::value_object::MacAddress;
pub use crate::core::infrastructure::transport::{RpcTransport, RpcValue};
pub use crate::inventory::inventory_service::UNKNOWN_STATUS;

use crate::core::domain::value_object::{
    CobblerHost, CobblerPassword, CobblerPath, CobblerPort, CobblerUsername, validate_host,
    validate_login_password, validate_path, validate_port, validate_username,
};
use crate::core::infrastructure::transport::LoggingTransport;
use crate::inventory::inventory_service::InventoryService;
use crate::systems::system_service::SystemService;
use std::sync::Arc;

/// Port the builder assumes when none is given (XML-RPC over HTTPS).
pub const DEFAULT_PORT: u16 = 443;

/// API mount path the builder assumes when none is given.
pub const DEFAULT_API_PATH: &str = "/cobbler_api";

/// A client for a Cobbler provisioning server.
///
/// Every operation authenticates, runs its RPC sequence, and returns a
/// typed result; no token, handle, or record is cached between calls. The
/// client holds no mutable state beyond an internal lock registry, so it is
/// safe to share (`Arc`) and invoke concurrently — though read-modify-write
/// races against the *same remote system* from other clients are not
/// prevented (see [`CobblerClient::update_metadata`]).
///
/// # Examples
///
/// ```no_run
/// use async_trait::async_trait;
/// use cobbler_client::{
///     CobblerClient, CobblerResult, RpcTransport, RpcValue, SystemSpec, TransportError,
/// };
/// use std::sync::Arc;
///
/// struct XmlRpcTransport; // e.g. XML-RPC over HTTPS
///
/// #[async_trait]
/// impl RpcTransport for XmlRpcTransport {
///     async fn call(
///         &self,
///         method: &str,
///         params: Vec<RpcValue>,
///     ) -> Result<RpcValue, TransportError> {
///         // encode method/params as XML-RPC, POST, decode the response
///         # let _ = (method, params);
///         # unimplemented!()
///     }
/// }
///
/// #[tokio::main]
/// async fn main() -> CobblerResult<()> {
///     let client = CobblerClient::builder()
///         .host("cobbler.example.com")?
///         .credentials("api", "s3cret")?
///         .transport(Arc::new(XmlRpcTransport))
///         .build()?;
///
///     let id = client
///         .create_system(&SystemSpec::new(
///             "web01",
///             "web01.example.com",
///             "32:00:17:70:bd:a0",
///             "centos-6.6-x86_64",
///         ))
///         .await?;
///     println!("created {id}");
///
///     client.set_ssh_key("web01", "AAAAB3NzaC1yc2EAAAADAQAB...").await?;
///     client.enable_netboot("web01").await?;
///     Ok(())
/// }
/// ```
pub struct CobblerClient {
    connection: Arc<CobblerConnection>,
    systems: SystemService,
    inventory: InventoryService,
}

/// Builder for [`CobblerClient`] configuration.
#[derive(Default)]
pub struct CobblerClientBuilder {
    host: Option<String>,
    port: Option<u16>,
    path: Option<String>,
    username: Option<String>,
    password: Option<String>,
    debug: bool,
    transport: Option<Arc<dyn RpcTransport>>,
}

impl CobblerClientBuilder {
    /// Sets the server host (DNS name or IP).
    pub fn host(mut self, host: impl Into<String>) -> CobblerResult<Self> {
        self.host = Some(host.into());
        Ok(self)
    }

    /// Sets the server port. Defaults to [`DEFAULT_PORT`].
    pub fn port(mut self, port: u16) -> CobblerResult<Self> {
        self.port = Some(port);
        Ok(self)
    }

    /// Sets the API mount path. Defaults to [`DEFAULT_API_PATH`].
    pub fn path(mut self, path: impl Into<String>) -> CobblerResult<Self> {
        self.path = Some(path.into());
        Ok(self)
    }

    /// Sets the credentials used for the per-operation `login` call.
    pub fn credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> CobblerResult<Self> {
        self.username = Some(username.into());
        self.password = Some(password.into());
        Ok(self)
    }

    /// Enables per-call RPC debug logging (a `tracing` decorator around the
    /// transport).
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Injects the RPC transport the client will speak through. Required.
    pub fn transport(mut self, transport: Arc<dyn RpcTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Validates the configuration and constructs the client.
    ///
    /// # Errors
    ///
    /// Returns `CobblerError::Validation` naming the first missing or
    /// malformed field.
    pub fn build(self) -> CobblerResult<CobblerClient> {
        let host = self.host.ok_or_else(|| missing("host", "Host is required"))?;
        validate_host(&host)?;

        let port = self.port.unwrap_or(DEFAULT_PORT);
        validate_port(port)?;

        let path = self.path.unwrap_or_else(|| DEFAULT_API_PATH.to_string());
        validate_path(&path)?;

        let username = self
            .username
            .ok_or_else(|| missing("username", "Username is required"))?;
        validate_username(&username)?;

        let password = self
            .password
            .ok_or_else(|| missing("password", "Password is required"))?;
        validate_login_password(&password)?;

        let transport = self.transport.ok_or_else(|| {
            missing("transport", "An RpcTransport implementation is required")
        })?;
        let transport: Arc<dyn RpcTransport> = if self.debug {
            Arc::new(LoggingTransport::new(transport))
        } else {
            transport
        };

        let connection = Arc::new(CobblerConnection::new(
            CobblerHost::new_unchecked(host),
            CobblerPort::new_unchecked(port),
            CobblerPath::new_unchecked(path),
            CobblerUsername::new_unchecked(username),
            CobblerPassword::new_unchecked(password),
            self.debug,
        )?);

        Ok(CobblerClient {
            systems: SystemService::new(Arc::clone(&transport), Arc::clone(&connection)),
            inventory: InventoryService::new(transport, Arc::clone(&connection)),
            connection,
        })
    }
}

fn missing(field: &str, message: &str) -> CobblerError {
    ValidationError::Field {
        field: field.to_string(),
        message: message.to_string(),
    }
    .into()
}

impl CobblerClient {
    /// Creates a new builder for client configuration.
    pub fn builder() -> CobblerClientBuilder {
        CobblerClientBuilder::default()
    }

    /// The connection parameters this client was built with.
    pub fn connection(&self) -> &CobblerConnection {
        &self.connection
    }

    /// Lists every system in the inventory.
    pub async fn list_systems(&self) -> CobblerResult<Vec<SystemRecord>> {
        self.inventory.systems().await
    }

    /// Lists every registered distro.
    pub async fn list_distros(&self) -> CobblerResult<Vec<Distro>> {
        self.inventory.distros().await
    }

    /// Lists every registered profile.
    pub async fn list_profiles(&self) -> CobblerResult<Vec<Profile>> {
        self.inventory.profiles().await
    }

    /// Lists every registered image.
    pub async fn list_images(&self) -> CobblerResult<Vec<Image>> {
        self.inventory.images().await
    }

    /// Fetches one system's full record by name.
    ///
    /// # Errors
    ///
    /// `CobblerError::NotFound` when no such system exists.
    pub async fn get_system(&self, name: &str) -> CobblerResult<SystemRecord> {
        self.systems.login().await?;
        self.systems.fetch(name).await
    }

    /// Creates a system and returns its identifier.
    ///
    /// Fails with `CobblerError::Validation` on a missing/malformed spec
    /// field and with `CobblerError::Conflict` when the requested name,
    /// hostname, or MAC address is already taken (checked in that order,
    /// before anything is allocated). On a failure after allocation, a
    /// compensating removal is attempted; the original error is returned.
    pub async fn create_system(&self, spec: &SystemSpec) -> CobblerResult<String> {
        self.systems.create(spec).await
    }

    /// Removes a system by name.
    ///
    /// No existence check is made first; removing an unknown name is
    /// treated as non-fatal.
    pub async fn delete_system(&self, name: &str) -> CobblerResult<()> {
        self.systems.delete(name).await
    }

    /// Enables netboot for the named system.
    pub async fn enable_netboot(&self, name: &str) -> CobblerResult<()> {
        self.systems.set_netboot(name, true).await
    }

    /// Disables netboot for the named system.
    pub async fn disable_netboot(&self, name: &str) -> CobblerResult<()> {
        self.systems.set_netboot(name, false).await
    }

    /// Sets one kickstart metadata entry on the named system, preserving
    /// all other entries.
    ///
    /// This is a read-modify-write against remote state. Calls through this
    /// client are serialized per system name, so concurrent callers sharing
    /// the client cannot silently drop each other's updates; updates racing
    /// from other clients or API consumers are last-write-wins.
    ///
    /// Entries are framed as space-joined `key=value` pairs, so keys and
    /// values containing whitespace (or keys containing `=`) are rejected
    /// with `CobblerError::Validation` before any RPC is made.
    pub async fn update_metadata(&self, name: &str, key: &str, value: &str) -> CobblerResult<()> {
        self.systems.update_metadata_entry(name, key, value).await
    }

    /// Stores an SSH public key in the system's kickstart metadata
    /// (`ssh_key`), replacing any previous key on the next reprovision.
    ///
    /// `key` must be the key body alone (`AAAAB3Nza...`) — the space-joined
    /// `ks_meta` string cannot frame a full `authorized_keys` line, so keys
    /// containing spaces are rejected rather than silently truncated.
    pub async fn set_ssh_key(&self, name: &str, key: &str) -> CobblerResult<()> {
        self.systems.set_ssh_key(name, key).await
    }

    /// Stores a root password for the system's next provision, hashed with
    /// Argon2id and a per-call random salt (`custom_password` metadata).
    /// The plaintext is never persisted or logged.
    pub async fn set_password(&self, name: &str, plaintext: &str) -> CobblerResult<()> {
        self.systems.set_password(name, plaintext).await
    }

    /// Returns the most recent installation status entry for `ip`, or
    /// [`UNKNOWN_STATUS`] when the server has no history for that address.
    pub async fn get_status(&self, ip: &str) -> CobblerResult<String> {
        self.inventory.status(ip).await
    }
}

#[cfg(test)]
mod tests;
