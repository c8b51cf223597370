//! Capability checks run before any network I/O: a denied operation
//! must leave the mock transport untouched.

mod support;

use stowage_sdk::config::Hosts;
use stowage_sdk::error::ApiError;
use stowage_sdk::{Stowage, StowageConfig};
use uuid::Uuid;

const READ_UPLOAD_KEY: &str = "app.3.user.secret"; // READ_FILE | UPLOAD_FILE
const CREATE_DIR_KEY: &str = "app.32.user.secret"; // CREATE_DIRECTORY only
const FULL_KEY: &str = "app.119.user.secret"; // every assigned bit
const ADMIN_KEY: &str = "app.0.user.secret";

async fn sdk_against_mock(key: &str) -> (Stowage, support::MockState) {
    let (origin, state) = support::spawn(key).await;
    let sdk = Stowage::init(StowageConfig::new(key).with_hosts(Hosts::single(origin))).unwrap();
    (sdk, state)
}

#[tokio::test]
async fn denied_delete_never_reaches_the_transport() {
    let (sdk, state) = sdk_against_mock(READ_UPLOAD_KEY).await;

    let err = sdk.file.delete(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, ApiError::NotAllowed(_)));
    assert_eq!(err.to_string(), "DELETE_FILE is not allowed.");
    assert_eq!(state.transport_hits(), 0);
}

#[tokio::test]
async fn rename_needs_both_upload_and_delete_bits() {
    let (sdk, state) = sdk_against_mock(READ_UPLOAD_KEY).await;

    // UPLOAD_FILE alone is not enough for rename
    let err = sdk.file.rename(Uuid::new_v4(), "renamed.txt").await.unwrap_err();
    assert!(matches!(err, ApiError::NotAllowed(_)));
    assert_eq!(state.transport_hits(), 0);
}

#[tokio::test]
async fn directory_update_needs_both_directory_bits() {
    let (sdk, state) = sdk_against_mock(CREATE_DIR_KEY).await;

    let err = sdk.directory.rename(Uuid::new_v4(), "renamed").await.unwrap_err();
    assert!(matches!(err, ApiError::NotAllowed(_)));
    assert_eq!(state.transport_hits(), 0);

    // the single bit still permits plain creation
    let created = sdk
        .directory
        .create(stowage_sdk::api::directory::CreateDirectoryRequest {
            name: "Sub-directory".into(),
            parent_directory_id: None,
            storage_class: None,
        })
        .await
        .unwrap();
    assert_eq!(created.name, "Sub-directory");
    assert_eq!(state.transport_hits(), 1);
}

#[tokio::test]
async fn admin_scope_passes_every_guard() {
    let (sdk, _state) = sdk_against_mock(ADMIN_KEY).await;

    sdk.file.delete(Uuid::new_v4()).await.unwrap();
    sdk.directory.delete(Uuid::new_v4()).await.unwrap();
    sdk.drive.list().await.unwrap();
}

#[tokio::test]
async fn export_rejects_every_nonzero_scope() {
    // even a scope holding every assigned bit is not the admin scope
    let (sdk, state) = sdk_against_mock(FULL_KEY).await;

    let err = sdk
        .export
        .export(stowage_sdk::api::export::ExportParams {
            id: "bundle".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotAllowed(_)));
    assert_eq!(err.to_string(), "EXPORT is not allowed.");
    assert_eq!(state.transport_hits(), 0);
}

#[tokio::test]
async fn malformed_keys_are_rejected_at_init() {
    let err = Stowage::init(StowageConfig::new("app.3.user")).unwrap_err();
    assert!(matches!(err, ApiError::Credential(_)));

    let err = Stowage::init(StowageConfig::new("app.NaN.user.secret")).unwrap_err();
    assert!(matches!(err, ApiError::Credential(_)));
}
