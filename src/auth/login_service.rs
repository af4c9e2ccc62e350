use crate::core::{
    domain::{
        error::{CobblerError, CobblerResult, TransportError},
        model::{AuthToken, CobblerConnection},
    },
    infrastructure::transport::RpcTransport,
};
use serde_json::json;
use tracing::debug;

/// Authenticates against the server's `login` method.
///
/// Every public client operation runs this once and carries the returned
/// token through its RPC sequence. Tokens are never cached or refreshed,
/// so each operation pays one extra round trip; that trade-off keeps the
/// client entirely stateless.
pub(crate) struct LoginService;

impl LoginService {
    pub(crate) fn new() -> Self {
        Self
    }

    /// Exchanges the connection's credentials for a fresh [`AuthToken`].
    ///
    /// # Errors
    ///
    /// - [`CobblerError::Auth`] when the server rejects the credentials
    ///   (fault response or a `false` return).
    /// - [`CobblerError::Transport`] for connection failures or a response
    ///   that is not a token string.
    pub(crate) async fn execute(
        &self,
        transport: &dyn RpcTransport,
        connection: &CobblerConnection,
    ) -> CobblerResult<AuthToken> {
        let response = transport
            .call(
                "login",
                vec![json!(connection.username()), json!(connection.password())],
            )
            .await
            .map_err(|error| match error {
                TransportError::Fault { code, message } => {
                    CobblerError::Auth(format!("server rejected credentials ({code}): {message}"))
                }
                other => CobblerError::Transport { source: other },
            })?;

        match response {
            serde_json::Value::String(token) if !token.is_empty() => {
                debug!(username = connection.username(), "login succeeded");
                Ok(AuthToken::new(token))
            }
            serde_json::Value::Bool(false) => Err(CobblerError::Auth(
                "server refused the supplied credentials".to_string(),
            )),
            other => Err(CobblerError::Transport {
                source: TransportError::UnexpectedResponse(format!(
                    "login returned {other} instead of a token"
                )),
            }),
        }
    }
}

impl Default for LoginService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::infrastructure::transport::MockRpcTransport;
    use crate::tests::support::test_connection;
    use serde_json::json;

    #[tokio::test]
    async fn test_login_returns_token() {
        let mut transport = MockRpcTransport::new();
        transport
            .expect_call()
            .withf(|method, params| {
                method == "login" && params == &[json!("api"), json!("s3cret")]
            })
            .times(1)
            .returning(|_, _| Ok(json!("token-123")));

        let token = LoginService::new()
            .execute(&transport, &test_connection())
            .await
            .unwrap();
        assert_eq!(token.as_str(), "token-123");
    }

    #[tokio::test]
    async fn test_login_fault_maps_to_auth_error() {
        let mut transport = MockRpcTransport::new();
        transport.expect_call().times(1).returning(|_, _| {
            Err(TransportError::Fault {
                code: 1,
                message: "login failed".to_string(),
            })
        });

        let result = LoginService::new()
            .execute(&transport, &test_connection())
            .await;
        assert!(matches!(result, Err(CobblerError::Auth(_))));
    }

    #[tokio::test]
    async fn test_login_false_maps_to_auth_error() {
        let mut transport = MockRpcTransport::new();
        transport
            .expect_call()
            .times(1)
            .returning(|_, _| Ok(json!(false)));

        let result = LoginService::new()
            .execute(&transport, &test_connection())
            .await;
        assert!(matches!(result, Err(CobblerError::Auth(_))));
    }

    #[tokio::test]
    async fn test_login_connection_error_propagates() {
        let mut transport = MockRpcTransport::new();
        transport.expect_call().times(1).returning(|_, _| {
            Err(TransportError::Connection("connection refused".to_string()))
        });

        let result = LoginService::new()
            .execute(&transport, &test_connection())
            .await;
        assert!(matches!(result, Err(CobblerError::Transport { .. })));
    }
}
