use crate::core::domain::{
    error::{CobblerResult, ValidationError},
    value_object::{CobblerHost, CobblerPassword, CobblerPath, CobblerPort, CobblerUsername},
};
use url::Url;

/// Connection parameters for a Cobbler server.
///
/// Immutable after construction. The wire protocol itself lives behind the
/// injected [`RpcTransport`]; this type only carries what every operation
/// needs (credentials for `login`) plus the rendered endpoint URL for
/// display and logging.
///
/// [`RpcTransport`]: crate::RpcTransport
#[derive(Debug, Clone)]
pub struct CobblerConnection {
    host: CobblerHost,
    port: CobblerPort,
    path: CobblerPath,
    username: CobblerUsername,
    password: CobblerPassword,
    debug: bool,
    url: Url,
}

impl CobblerConnection {
    pub(crate) fn new(
        host: CobblerHost,
        port: CobblerPort,
        path: CobblerPath,
        username: CobblerUsername,
        password: CobblerPassword,
        debug: bool,
    ) -> CobblerResult<Self> {
        let rendered = format!("https://{}:{}{}", host.as_str(), port.get(), path.as_str());
        let url = Url::parse(&rendered).map_err(|e| ValidationError::Format(format!(
            "Cannot build API URL from connection parameters: {e}"
        )))?;

        Ok(Self {
            host,
            port,
            path,
            username,
            password,
            debug,
            url,
        })
    }

    /// The configured server host.
    pub fn host(&self) -> &str {
        self.host.as_str()
    }

    /// The configured server port.
    pub fn port(&self) -> u16 {
        self.port.get()
    }

    /// The configured API mount path.
    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    /// The configured username.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    pub(crate) fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Whether per-call RPC debug logging is enabled.
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// The rendered API endpoint URL.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection() -> CobblerConnection {
        CobblerConnection::new(
            CobblerHost::new_unchecked("cobbler.example.com".to_string()),
            CobblerPort::new_unchecked(443),
            CobblerPath::new_unchecked("/cobbler_api".to_string()),
            CobblerUsername::new_unchecked("api".to_string()),
            CobblerPassword::new_unchecked("s3cret".to_string()),
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_url_rendering() {
        let connection = connection();
        assert_eq!(
            connection.url().as_str(),
            "https://cobbler.example.com/cobbler_api"
        );
        assert_eq!(connection.port(), 443);
    }

    #[test]
    fn test_debug_output_hides_password() {
        let connection = connection();
        let debug = format!("{connection:?}");
        assert!(!debug.contains("s3cret"));
    }
}
