//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files and
//! building the management client from it.

use std::io::Write;

use idlink_domain::{IdentityError, ManagementScope};
use idlink_infra::{config, ManagementApiClient};
use tempfile::NamedTempFile;

fn write_config(contents: &str, extension: &str) -> std::path::PathBuf {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    path
}

#[test]
fn test_load_config_from_json_file() {
    let path = write_config(
        r#"{
            "provider": {
                "domain": "dev-abc123.us.auth0.com",
                "client_id": "spa-client",
                "audience": "https://dev-abc123.us.auth0.com/api/v2/",
                "scopes": {
                    "read": "read:current_user",
                    "update_metadata": "update:current_user_metadata",
                    "update_identities": "update:current_user_identities",
                    "manage_users": "update:users"
                }
            },
            "http": { "timeout_seconds": 15, "max_attempts": 3, "backoff_ms": 50 },
            "session": { "metadata_form_key": "formMetadata" }
        }"#,
        "json",
    );

    let config = config::load_from_file(Some(path.clone())).expect("config should load");

    assert_eq!(config.provider.domain, "dev-abc123.us.auth0.com");
    assert_eq!(config.provider.management_base_url(), "https://dev-abc123.us.auth0.com/api/v2");
    assert_eq!(config.provider.scopes.get(ManagementScope::ManageUsers), "update:users");
    assert_eq!(config.http.max_attempts, 3);

    let client = ManagementApiClient::from_config(&config).expect("client should build");
    assert_eq!(client.base_url(), "https://dev-abc123.us.auth0.com/api/v2");

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_from_toml_file() {
    let path = write_config(
        r#"
[provider]
domain = "tenant.eu.auth0.com"
client_id = "spa-client"

[provider.scopes]
manage_users = "update:current_user_identities"

[http]
max_attempts = 1
"#,
        "toml",
    );

    let config = config::load_from_file(Some(path.clone())).expect("config should load");

    assert_eq!(config.provider.scopes.manage_users, "update:current_user_identities");
    assert_eq!(config.provider.scopes.read, "read:current_user");
    assert_eq!(config.http.max_attempts, 1);
    assert_eq!(config.session.metadata_form_key, "formMetadata");

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_with_blank_scope_is_rejected() {
    let path = write_config(
        r#"{
            "provider": {
                "domain": "tenant.eu.auth0.com",
                "client_id": "spa-client",
                "scopes": { "update_identities": " " }
            }
        }"#,
        "json",
    );

    let err = config::load_from_file(Some(path.clone())).unwrap_err();
    assert!(matches!(err, IdentityError::Config(msg) if msg.contains("update_identities")));

    std::fs::remove_file(path).ok();
}
