//! Read-only inventory listings and the installation status lookup.

use crate::auth::login_service::LoginService;
use crate::core::{
    domain::{
        error::CobblerResult,
        model::{CobblerConnection, Distro, Image, Profile, SystemRecord},
    },
    infrastructure::transport::{RpcTransport, RpcValue, decode_list, expect_object},
};
use serde_json::json;
use std::sync::Arc;

/// Status reported when the server has no history for the requested IP.
pub const UNKNOWN_STATUS: &str = "unknown";

/// Read-only views over the server inventory. Each listing is one
/// authenticated RPC; whatever the server returns is decoded and handed
/// back without pagination or filtering.
pub(crate) struct InventoryService {
    transport: Arc<dyn RpcTransport>,
    connection: Arc<CobblerConnection>,
    login: LoginService,
}

impl InventoryService {
    pub(crate) fn new(transport: Arc<dyn RpcTransport>, connection: Arc<CobblerConnection>) -> Self {
        Self {
            transport,
            connection,
            login: LoginService::new(),
        }
    }

    async fn authenticated_call(&self, method: &str, params: Vec<RpcValue>) -> CobblerResult<RpcValue> {
        // Listings are readable without a token on stock servers, but every
        // operation authenticates so misconfigured credentials surface
        // consistently, not only on the first mutation.
        self.login
            .execute(self.transport.as_ref(), &self.connection)
            .await?;
        Ok(self.transport.call(method, params).await?)
    }

    /// All systems in the inventory.
    pub(crate) async fn systems(&self) -> CobblerResult<Vec<SystemRecord>> {
        let response = self.authenticated_call("get_systems", vec![]).await?;
        Ok(decode_list(response, "systems")?)
    }

    /// All registered distros.
    pub(crate) async fn distros(&self) -> CobblerResult<Vec<Distro>> {
        let response = self.authenticated_call("get_distros", vec![]).await?;
        Ok(decode_list(response, "distros")?)
    }

    /// All registered profiles.
    pub(crate) async fn profiles(&self) -> CobblerResult<Vec<Profile>> {
        let response = self.authenticated_call("get_profiles", vec![]).await?;
        Ok(decode_list(response, "profiles")?)
    }

    /// All registered images.
    pub(crate) async fn images(&self) -> CobblerResult<Vec<Image>> {
        let response = self.authenticated_call("get_images", vec![]).await?;
        Ok(decode_list(response, "images")?)
    }

    /// The most recent installation status entry for `ip`, or
    /// [`UNKNOWN_STATUS`] when the server has no (or an empty) history for
    /// that address.
    pub(crate) async fn status(&self, ip: &str) -> CobblerResult<String> {
        let token = self
            .login
            .execute(self.transport.as_ref(), &self.connection)
            .await?;
        let response = self
            .transport
            .call("get_status", vec![json!(token.as_str())])
            .await?;
        let by_ip = expect_object(response, "status report")?;

        let status = match by_ip.get(ip) {
            Some(RpcValue::Array(history)) => history.last().map(render_status),
            _ => None,
        };
        Ok(status.unwrap_or_else(|| UNKNOWN_STATUS.to_string()))
    }
}

fn render_status(entry: &RpcValue) -> String {
    match entry {
        RpcValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
