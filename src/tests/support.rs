//! Shared helpers for the mock-transport test suites.

use crate::core::domain::model::CobblerConnection;
use crate::core::domain::value_object::{
    CobblerHost, CobblerPassword, CobblerPath, CobblerPort, CobblerUsername,
};
use crate::core::infrastructure::transport::MockRpcTransport;
use crate::{CobblerClient, SystemSpec};
use serde_json::json;
use std::sync::Arc;

pub(crate) const TEST_TOKEN: &str = "token-1";

pub(crate) fn test_connection() -> CobblerConnection {
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

/// Builds a client around a fully scripted mock transport. Any RPC without
/// a matching expectation panics the test.
pub(crate) fn client_with(transport: MockRpcTransport) -> CobblerClient {
    CobblerClient::builder()
        .host("cobbler.example.com")
        .unwrap()
        .port(443)
        .unwrap()
        .path("/cobbler_api")
        .unwrap()
        .credentials("api", "s3cret")
        .unwrap()
        .transport(Arc::new(transport))
        .build()
        .unwrap()
}

/// Expects `times` login calls, each returning [`TEST_TOKEN`].
pub(crate) fn expect_login(transport: &mut MockRpcTransport, times: usize) {
    transport
        .expect_call()
        .withf(|method, params| method == "login" && params.len() == 2)
        .times(times)
        .returning(|_, _| Ok(json!(TEST_TOKEN)));
}

/// Expects `times` `find_system` calls, each finding nothing.
pub(crate) fn expect_find_nothing(transport: &mut MockRpcTransport, times: usize) {
    transport
        .expect_call()
        .withf(|method, _| method == "find_system")
        .times(times)
        .returning(|_, _| Ok(json!([])));
}

pub(crate) fn valid_spec() -> SystemSpec {
    SystemSpec::new(
        "web01",
        "web01.example.com",
        "32:00:17:70:bd:a0",
        "centos-6.6-x86_64",
    )
}
