//! Behavioral tests for the read-only inventory operations.

use crate::core::domain::error::{CobblerError, TransportError};
use crate::core::infrastructure::transport::MockRpcTransport;
use crate::tests::support::{client_with, expect_login};
use crate::UNKNOWN_STATUS;
use serde_json::json;

#[tokio::test]
async fn test_list_systems_decodes_records() {
    let mut transport = MockRpcTransport::new();
    expect_login(&mut transport, 1);
    transport
        .expect_call()
        .withf(|method, params| method == "get_systems" && params.is_empty())
        .times(1)
        .returning(|_, _| {
            Ok(json!([
                {
                    "name": "web01",
                    "hostname": "web01.example.com",
                    "profile": "centos-6.6-x86_64",
                    "netboot_enabled": true,
                    "ks_meta": {"ssh_key": "k1"}
                },
                {"name": "web02"}
            ]))
        });

    let systems = client_with(transport).list_systems().await.unwrap();
    assert_eq!(systems.len(), 2);
    assert_eq!(systems[0].hostname, "web01.example.com");
    assert!(systems[0].netboot_enabled);
    assert_eq!(systems[0].ks_meta.get("ssh_key"), Some("k1"));
    assert_eq!(systems[1].name, "web02");
    assert!(!systems[1].netboot_enabled);
}

#[tokio::test]
async fn test_list_distros_and_profiles_and_images() {
    let mut transport = MockRpcTransport::new();
    expect_login(&mut transport, 3);
    transport
        .expect_call()
        .withf(|method, _| method == "get_distros")
        .times(1)
        .returning(|_, _| {
            Ok(json!([{"name": "centos-6.6", "arch": "x86_64", "breed": "redhat"}]))
        });
    transport
        .expect_call()
        .withf(|method, _| method == "get_profiles")
        .times(1)
        .returning(|_, _| Ok(json!([{"name": "centos-6.6-x86_64", "distro": "centos-6.6"}])));
    transport
        .expect_call()
        .withf(|method, _| method == "get_images")
        .times(1)
        .returning(|_, _| Ok(json!([{"name": "rescue", "image_type": "iso"}])));

    let client = client_with(transport);
    let distros = client.list_distros().await.unwrap();
    assert_eq!(distros[0].arch, "x86_64");
    let profiles = client.list_profiles().await.unwrap();
    assert_eq!(profiles[0].distro, "centos-6.6");
    let images = client.list_images().await.unwrap();
    assert_eq!(images[0].image_type, "iso");
}

#[tokio::test]
async fn test_list_systems_auth_failure_surfaces() {
    let mut transport = MockRpcTransport::new();
    transport
        .expect_call()
        .withf(|method, _| method == "login")
        .times(1)
        .returning(|_, _| {
            Err(TransportError::Fault {
                code: 1,
                message: "login failed".to_string(),
            })
        });

    let result = client_with(transport).list_systems().await;
    assert!(matches!(result, Err(CobblerError::Auth(_))));
}

#[tokio::test]
async fn test_get_system_decodes_record() {
    let mut transport = MockRpcTransport::new();
    expect_login(&mut transport, 1);
    transport
        .expect_call()
        .withf(|method, params| method == "get_system" && params[0] == json!("web01"))
        .times(1)
        .returning(|_, _| {
            Ok(json!({"name": "web01", "ks_meta": "a=1 b=2", "netboot_enabled": false}))
        });

    let record = client_with(transport).get_system("web01").await.unwrap();
    // Legacy string-shaped ks_meta decodes too.
    assert_eq!(record.ks_meta.get("b"), Some("2"));
}

#[tokio::test]
async fn test_get_status_returns_last_history_entry() {
    let mut transport = MockRpcTransport::new();
    expect_login(&mut transport, 1);
    transport
        .expect_call()
        .withf(|method, _| method == "get_status")
        .times(1)
        .returning(|_, _| Ok(json!({"10.0.0.5": ["installing", "active"]})));

    let status = client_with(transport).get_status("10.0.0.5").await.unwrap();
    assert_eq!(status, "active");
}

#[tokio::test]
async fn test_get_status_unknown_ip() {
    let mut transport = MockRpcTransport::new();
    expect_login(&mut transport, 1);
    transport
        .expect_call()
        .withf(|method, _| method == "get_status")
        .times(1)
        .returning(|_, _| Ok(json!({"10.0.0.5": ["installing", "active"]})));

    let status = client_with(transport).get_status("10.0.0.9").await.unwrap();
    assert_eq!(status, UNKNOWN_STATUS);
}

#[tokio::test]
async fn test_get_status_empty_history() {
    let mut transport = MockRpcTransport::new();
    expect_login(&mut transport, 1);
    transport
        .expect_call()
        .withf(|method, _| method == "get_status")
        .times(1)
        .returning(|_, _| Ok(json!({"10.0.0.5": []})));

    let status = client_with(transport).get_status("10.0.0.5").await.unwrap();
    assert_eq!(status, UNKNOWN_STATUS);
}
