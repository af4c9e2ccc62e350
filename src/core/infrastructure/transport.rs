//! The RPC transport seam.
//!
//! The XML-RPC wire format is deliberately out of scope for this crate: the
//! client is written against the [`RpcTransport`] trait and callers inject an
//! implementation (typically an XML-RPC-over-HTTPS client) at construction.
//! XML-RPC's value space (scalars, ordered lists, string-keyed structs) maps
//! 1:1 onto JSON's, so responses are carried as [`serde_json::Value`].

use crate::core::domain::error::TransportError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

/// The structured value type exchanged with the transport.
pub type RpcValue = serde_json::Value;

/// A call-and-response remote procedure mechanism: named methods with
/// positional arguments, returning structured values.
///
/// Implementations must be safe to share across tasks; the client invokes
/// the transport concurrently when callers do.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Invokes `method` with the given positional arguments and returns the
    /// decoded response value.
    ///
    /// # Errors
    ///
    /// - [`TransportError::Connection`] when the server cannot be reached or
    ///   the exchange breaks mid-call.
    /// - [`TransportError::Fault`] when the server answers with an XML-RPC
    ///   fault.
    async fn call(&self, method: &str, params: Vec<RpcValue>) -> Result<RpcValue, TransportError>;
}

/// Decorator that logs every RPC exchange at `debug` level.
///
/// Installed by the client builder when the `debug` flag is set. Arguments
/// are logged only by count: they routinely contain auth tokens and
/// credentials.
pub(crate) struct LoggingTransport {
    inner: Arc<dyn RpcTransport>,
}

impl LoggingTransport {
    pub(crate) fn new(inner: Arc<dyn RpcTransport>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl RpcTransport for LoggingTransport {
    async fn call(&self, method: &str, params: Vec<RpcValue>) -> Result<RpcValue, TransportError> {
        debug!(method, args = params.len(), "rpc call");
        let result = self.inner.call(method, params).await;
        match &result {
            Ok(value) => debug!(method, response = %value, "rpc response"),
            Err(error) => debug!(method, %error, "rpc failed"),
        }
        result
    }
}

/// Requires `value` to be a non-empty string; `what` names the value for
/// the error message.
pub(crate) fn expect_string(value: RpcValue, what: &str) -> Result<String, TransportError> {
    match value {
        RpcValue::String(s) if !s.is_empty() => Ok(s),
        other => Err(TransportError::UnexpectedResponse(format!(
            "expected {what} to be a non-empty string, got {other}"
        ))),
    }
}

/// Requires `value` to be a list.
pub(crate) fn expect_array(value: RpcValue, what: &str) -> Result<Vec<RpcValue>, TransportError> {
    match value {
        RpcValue::Array(items) => Ok(items),
        other => Err(TransportError::UnexpectedResponse(format!(
            "expected {what} to be a list, got {other}"
        ))),
    }
}

/// Requires `value` to be a string-keyed mapping.
pub(crate) fn expect_object(
    value: RpcValue,
    what: &str,
) -> Result<serde_json::Map<String, RpcValue>, TransportError> {
    match value {
        RpcValue::Object(entries) => Ok(entries),
        other => Err(TransportError::UnexpectedResponse(format!(
            "expected {what} to be a mapping, got {other}"
        ))),
    }
}

/// Decodes a list response into domain models, skipping nothing: a single
/// undecodable element fails the whole call.
pub(crate) fn decode_list<T: DeserializeOwned>(
    value: RpcValue,
    what: &str,
) -> Result<Vec<T>, TransportError> {
    expect_array(value, what)?
        .into_iter()
        .map(|item| {
            serde_json::from_value(item).map_err(|e| {
                TransportError::UnexpectedResponse(format!("cannot decode {what} entry: {e}"))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_expect_string() {
        assert_eq!(expect_string(json!("token"), "token").unwrap(), "token");
        assert!(expect_string(json!(""), "token").is_err());
        assert!(expect_string(json!(false), "token").is_err());
    }

    #[test]
    fn test_expect_array() {
        assert_eq!(expect_array(json!([1, 2]), "list").unwrap().len(), 2);
        assert!(expect_array(json!("nope"), "list").is_err());
    }

    #[test]
    fn test_expect_object() {
        assert!(expect_object(json!({"a": 1}), "map").unwrap().contains_key("a"));
        assert!(expect_object(json!([]), "map").is_err());
    }

    #[test]
    fn test_decode_list_fails_on_bad_entry() {
        #[derive(serde::Deserialize)]
        struct Named {
            #[allow(dead_code)]
            name: String,
        }
        let ok: Vec<Named> = decode_list(json!([{"name": "a"}]), "systems").unwrap();
        assert_eq!(ok.len(), 1);
        let bad: Result<Vec<Named>, _> = decode_list(json!([{"other": 1}]), "systems");
        assert!(bad.is_err());
    }
}
