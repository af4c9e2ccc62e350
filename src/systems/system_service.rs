//! The system-provisioning workflow: creation with uniqueness checks,
//! deletion, netboot toggling, and the kickstart-metadata
//! read-modify-write.

use crate::auth::login_service::LoginService;
use crate::core::{
    domain::{
        error::{CobblerError, CobblerResult, TransportError, ValidationError},
        model::{AuthToken, CobblerConnection, SystemHandle, SystemRecord, SystemSpec},
        value_object::MacAddress,
    },
    infrastructure::transport::{RpcTransport, RpcValue, expect_string},
};
use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Metadata key carrying the provisioned SSH public key.
const META_SSH_KEY: &str = "ssh_key";
/// Metadata key carrying the provisioned root password hash.
const META_CUSTOM_PASSWORD: &str = "custom_password";

pub(crate) struct SystemService {
    transport: Arc<dyn RpcTransport>,
    connection: Arc<CobblerConnection>,
    login: LoginService,
    // One async mutex per system name, so metadata read-modify-write
    // sequences through this client cannot interleave. Updates from other
    // client instances or API consumers still race (last write wins).
    metadata_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SystemService {
    pub(crate) fn new(transport: Arc<dyn RpcTransport>, connection: Arc<CobblerConnection>) -> Self {
        Self {
            transport,
            connection,
            login: LoginService::new(),
            metadata_locks: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) async fn login(&self) -> CobblerResult<AuthToken> {
        self.login
            .execute(self.transport.as_ref(), &self.connection)
            .await
    }

    /// Names of systems whose `key` attribute equals `value`. Possibly
    /// empty; building block for the uniqueness checks, not part of the
    /// public surface.
    pub(crate) async fn find_by_attribute(
        &self,
        key: &str,
        value: &str,
    ) -> CobblerResult<Vec<String>> {
        let response = self
            .transport
            .call("find_system", vec![json!({ key: value })])
            .await?;
        match response {
            RpcValue::Array(items) => Ok(items
                .into_iter()
                .filter_map(|item| match item {
                    RpcValue::String(name) => Some(name),
                    // Some server versions return full records.
                    RpcValue::Object(mut fields) => match fields.remove("name") {
                        Some(RpcValue::String(name)) => Some(name),
                        _ => None,
                    },
                    _ => None,
                })
                .collect()),
            other => Err(TransportError::UnexpectedResponse(format!(
                "expected find_system to return a list, got {other}"
            ))
            .into()),
        }
    }

    /// True iff at least one system matches `key = value`.
    pub(crate) async fn exists(&self, key: &str, value: &str) -> CobblerResult<bool> {
        Ok(!self.find_by_attribute(key, value).await?.is_empty())
    }

    /// Resolves the opaque mutation handle for `name`.
    pub(crate) async fn resolve_handle(
        &self,
        token: &AuthToken,
        name: &str,
    ) -> CobblerResult<SystemHandle> {
        match self
            .transport
            .call(
                "get_system_handle",
                vec![json!(name), json!(token.as_str())],
            )
            .await
        {
            Ok(RpcValue::String(handle)) if !handle.is_empty() => Ok(SystemHandle::new(handle)),
            Ok(_) => Err(CobblerError::NotFound(format!("no system named '{name}'"))),
            // The server reports an unknown name as a fault.
            Err(TransportError::Fault { message, .. }) => Err(CobblerError::NotFound(format!(
                "no system named '{name}': {message}"
            ))),
            Err(other) => Err(other.into()),
        }
    }

    /// Fetches the full record for `name`.
    pub(crate) async fn fetch(&self, name: &str) -> CobblerResult<SystemRecord> {
        let response = self.transport.call("get_system", vec![json!(name)]).await?;
        match response {
            RpcValue::Object(_) => serde_json::from_value(response).map_err(|e| {
                TransportError::UnexpectedResponse(format!("cannot decode system record: {e}"))
                    .into()
            }),
            // Missing records come back as "~" (or false, depending on
            // server version), not as a fault.
            _ => Err(CobblerError::NotFound(format!("no system named '{name}'"))),
        }
    }

    /// Creates a system from `spec`.
    ///
    /// Validates the spec locally, then checks that no existing system
    /// already uses the requested name, hostname, or MAC address (in that
    /// order; the first conflict wins and nothing is allocated). Only then
    /// does it allocate via `new_system`, apply the attributes, attach the
    /// primary interface, and commit with `save_system`.
    ///
    /// If any step after allocation fails, a compensating `remove_system`
    /// is attempted so the server is not left with a half-configured entry;
    /// the original error is surfaced either way.
    pub(crate) async fn create(&self, spec: &SystemSpec) -> CobblerResult<String> {
        spec.validate()?;
        let mac = MacAddress::parse(&spec.mac_address)?;
        let token = self.login().await?;

        for (attribute, value) in [
            ("name", spec.name.as_str()),
            ("hostname", spec.hostname.as_str()),
            ("mac_address", mac.as_str()),
        ] {
            if self.exists(attribute, value).await? {
                return Err(CobblerError::Conflict(format!(
                    "a system with {attribute} '{value}' already exists"
                )));
            }
        }

        let allocated = self
            .transport
            .call("new_system", vec![json!(token.as_str())])
            .await?;
        let system_id = expect_string(allocated, "new_system id")?;

        match self.configure(&token, &system_id, spec, &mac).await {
            Ok(()) => {
                info!(name = %spec.name, id = %system_id, "system created");
                Ok(system_id)
            }
            Err(error) => {
                self.compensate_failed_create(&token, &spec.name).await;
                Err(error)
            }
        }
    }

    /// Applies attributes and the interface descriptor to a freshly
    /// allocated system, then commits.
    async fn configure(
        &self,
        token: &AuthToken,
        system_id: &str,
        spec: &SystemSpec,
        mac: &MacAddress,
    ) -> CobblerResult<()> {
        for (attribute, value) in [
            ("name", spec.name.as_str()),
            ("hostname", spec.hostname.as_str()),
            ("profile", spec.profile.as_str()),
        ] {
            self.modify(token, system_id, attribute, json!(value)).await?;
        }

        // One descriptor for the primary interface. The other per-interface
        // attributes (ipaddress, gateway, virtbridge, dnsname, static,
        // dhcptag, staticroutes) are accepted by the server through the
        // same call but intentionally left unset here.
        let interface = json!({ format!("macaddress-{}", spec.interface()): mac.as_str() });
        self.modify(token, system_id, "modify_interface", interface)
            .await?;

        self.save(token, system_id).await
    }

    /// Best-effort rollback of a failed creation. The system may not have
    /// its name applied yet, so removal can miss; that leaves the same
    /// uncommitted orphan the operation would otherwise always leave, and
    /// is only logged.
    async fn compensate_failed_create(&self, token: &AuthToken, name: &str) {
        if let Err(error) = self
            .transport
            .call("remove_system", vec![json!(name), json!(token.as_str())])
            .await
        {
            warn!(name, %error, "could not roll back partially created system");
        }
    }

    /// Removes `name` from the inventory.
    ///
    /// No existence pre-check is made: removing an unknown name is treated
    /// as non-fatal (a benign `false`/empty result, or a fault that says
    /// the name does not exist, completes successfully). Every other fault
    /// — permission denied, internal errors — propagates, as do connection
    /// failures.
    pub(crate) async fn delete(&self, name: &str) -> CobblerResult<()> {
        let token = self.login().await?;
        match self
            .transport
            .call("remove_system", vec![json!(name), json!(token.as_str())])
            .await
        {
            Ok(_) => {
                info!(name, "system removed");
                Ok(())
            }
            Err(TransportError::Fault { message, .. }) if is_unknown_item_fault(&message) => {
                warn!(name, message, "remove_system does not know the name; treating as non-fatal");
                Ok(())
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Sets `netboot_enabled` on an existing system: one handle resolution,
    /// one attribute change, one commit.
    pub(crate) async fn set_netboot(&self, name: &str, enabled: bool) -> CobblerResult<()> {
        let token = self.login().await?;
        let handle = self.resolve_handle(&token, name).await?;
        self.modify(&token, handle.as_str(), "netboot_enabled", json!(enabled))
            .await?;
        self.save(&token, handle.as_str()).await?;
        info!(name, enabled, "netboot updated");
        Ok(())
    }

    /// Public-operation form of [`Self::update_metadata`]: validates the
    /// entry locally, then authenticates and applies it.
    pub(crate) async fn update_metadata_entry(
        &self,
        name: &str,
        key: &str,
        value: &str,
    ) -> CobblerResult<()> {
        validate_metadata_entry(key, value)?;
        let token = self.login().await?;
        self.update_metadata(&token, name, key, value).await
    }

    /// Read-modify-write of one `ks_meta` entry.
    ///
    /// Fetches the current record, merges `key = value` into its metadata
    /// (all other keys preserved), re-serializes the mapping sorted by key,
    /// and commits through a freshly resolved handle.
    ///
    /// Updates are serialized per system name within this client, so
    /// concurrent callers sharing the client cannot lose each other's
    /// writes. Updates racing from *other* clients or API consumers are not
    /// detected: the last writer wins.
    pub(crate) async fn update_metadata(
        &self,
        token: &AuthToken,
        name: &str,
        key: &str,
        value: &str,
    ) -> CobblerResult<()> {
        validate_metadata_entry(key, value)?;

        let guard = self.metadata_lock(name).await.lock_owned().await;
        let result = self.apply_metadata(token, name, key, value).await;
        drop(guard);
        self.evict_metadata_lock(name).await;
        result
    }

    async fn apply_metadata(
        &self,
        token: &AuthToken,
        name: &str,
        key: &str,
        value: &str,
    ) -> CobblerResult<()> {
        let record = self.fetch(name).await?;
        let mut meta = record.ks_meta;
        meta.set(key, value);
        let serialized = meta.to_metadata_string();

        let handle = self.resolve_handle(token, name).await?;
        self.modify(token, handle.as_str(), "ks_meta", json!(serialized))
            .await?;
        self.save(token, handle.as_str()).await
    }

    /// Stores an SSH public key under the `ssh_key` metadata entry.
    ///
    /// `key` must be a single token — the key body only (as in
    /// `AAAAB3Nza...`), without the `ssh-rsa` prefix or a trailing comment.
    /// The `ks_meta` string cannot frame values containing spaces, so a
    /// full `authorized_keys` line is rejected instead of being silently
    /// truncated at its first space.
    pub(crate) async fn set_ssh_key(&self, name: &str, key: &str) -> CobblerResult<()> {
        if key.trim().is_empty() {
            return Err(ValidationError::Field {
                field: "key".to_string(),
                message: "SSH key cannot be empty".to_string(),
            }
            .into());
        }
        self.update_metadata_entry(name, META_SSH_KEY, key).await
    }

    /// Hashes `plaintext` with Argon2id and a fresh random salt, and stores
    /// the PHC string under the `custom_password` metadata entry. The
    /// plaintext itself is never stored or logged.
    pub(crate) async fn set_password(&self, name: &str, plaintext: &str) -> CobblerResult<()> {
        if plaintext.is_empty() {
            return Err(ValidationError::Field {
                field: "password".to_string(),
                message: "Password cannot be empty".to_string(),
            }
            .into());
        }
        let hashed = hash_password(plaintext)?;
        let token = self.login().await?;
        self.update_metadata(&token, name, META_CUSTOM_PASSWORD, &hashed)
            .await
    }

    async fn modify(
        &self,
        token: &AuthToken,
        handle: &str,
        attribute: &str,
        value: RpcValue,
    ) -> CobblerResult<()> {
        self.transport
            .call(
                "modify_system",
                vec![json!(handle), json!(attribute), value, json!(token.as_str())],
            )
            .await?;
        Ok(())
    }

    async fn save(&self, token: &AuthToken, handle: &str) -> CobblerResult<()> {
        self.transport
            .call("save_system", vec![json!(handle), json!(token.as_str())])
            .await?;
        Ok(())
    }

    async fn metadata_lock(&self, name: &str) -> Arc<Mutex<()>> {
        let mut locks = self.metadata_locks.lock().await;
        locks
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drops a name's lock entry once no waiter holds a clone, so the
    /// registry does not grow with every system name a long-lived client
    /// ever touched.
    async fn evict_metadata_lock(&self, name: &str) {
        let mut locks = self.metadata_locks.lock().await;
        if let Some(entry) = locks.get(name) {
            // The registry's own Arc is the only one left.
            if Arc::strong_count(entry) == 1 {
                locks.remove(name);
            }
        }
    }

    #[cfg(test)]
    pub(crate) async fn metadata_lock_count(&self) -> usize {
        self.metadata_locks.lock().await.len()
    }
}

/// `ks_meta` is committed as a space-joined `key=value` string, so keys
/// may not contain whitespace or `=`, and values may not contain
/// whitespace; such entries would be split or truncated on the next
/// read-modify-write round trip. Rejected locally instead.
fn validate_metadata_entry(key: &str, value: &str) -> Result<(), ValidationError> {
    if key.is_empty() {
        return Err(ValidationError::Field {
            field: "key".to_string(),
            message: "Metadata key cannot be empty".to_string(),
        });
    }
    if key.contains('=') || key.chars().any(char::is_whitespace) {
        return Err(ValidationError::Format(format!(
            "Metadata key '{key}' cannot contain whitespace or '='"
        )));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ValidationError::Format(format!(
            "Metadata value for '{key}' cannot contain whitespace (ks_meta entries are space-joined)"
        )));
    }
    Ok(())
}

/// Server phrasings of "that name does not exist" vary by version; only
/// these faults are treated as benign by [`SystemService::delete`].
fn is_unknown_item_fault(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    ["unknown system", "unknown item", "not found", "does not exist"]
        .iter()
        .any(|phrase| message.contains(phrase))
}

/// One-way Argon2id hash with a per-call random salt, as a PHC string.
fn hash_password(plaintext: &str) -> CobblerResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            ValidationError::ConstraintViolation(format!("password hashing failed: {e}")).into()
        })
}
