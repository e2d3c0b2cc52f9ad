//! Wire-shape tests for the JSON bridge.
//!
//! These pin the caller-facing contract: field names, optional-field
//! omission, default values, and the error strings callers match on.

use std::sync::Arc;

use serde_json::Value;

use biosign_core::platform::ERROR_USER_CANCELED;
use biosign_core::testing::{FixedPlatform, InMemoryKeyStore, ScriptedBiometricService};
use biosign_core::{BiometricError, BiometricModule, CanAuthenticate, ModuleConfig};
use biosign_ffi::{BiometricBridge, BiosignHandle};

const MODERN_API: u32 = 33;

fn bridge_with(api_level: u32, biometrics: ScriptedBiometricService) -> BiometricBridge {
    let module = BiometricModule::new(
        ModuleConfig::default(),
        Arc::new(FixedPlatform::new(api_level)),
        Arc::new(InMemoryKeyStore::new()),
        Arc::new(biometrics),
    );
    BiometricBridge::new(module)
}

async fn dispatch(bridge: &BiometricBridge, method: &str, body: &str) -> Value {
    let response = bridge.dispatch(method, body).await.expect("dispatch");
    serde_json::from_str(&response).expect("valid response JSON")
}

#[tokio::test]
async fn sensor_unavailable_when_none_enrolled() {
    let bridge = bridge_with(
        MODERN_API,
        ScriptedBiometricService::with_status(CanAuthenticate::NoneEnrolled),
    );

    let response = dispatch(
        &bridge,
        "isSensorAvailable",
        r#"{"allowDeviceCredentials": false}"#,
    )
    .await;

    assert_eq!(response["available"], Value::Bool(false));
    assert_eq!(response["error"], "BIOMETRIC_ERROR_NONE_ENROLLED");
    assert!(
        response.get("biometryType").is_none(),
        "absent fields are omitted, not null"
    );
}

#[tokio::test]
async fn sensor_available_reports_biometry_type() {
    let bridge = bridge_with(MODERN_API, ScriptedBiometricService::succeeding());

    let response = dispatch(&bridge, "isSensorAvailable", "").await;

    assert_eq!(response["available"], Value::Bool(true));
    assert_eq!(response["biometryType"], "Biometrics");
    assert!(response.get("error").is_none());
}

#[tokio::test]
async fn key_lifecycle_shapes() {
    let bridge = bridge_with(MODERN_API, ScriptedBiometricService::succeeding());

    let exists = dispatch(&bridge, "biometricKeysExist", "").await;
    assert_eq!(exists["keysExist"], Value::Bool(false));

    let first = dispatch(&bridge, "createKeys", "{}").await;
    let first_key = first["publicKey"].as_str().expect("publicKey string");
    assert!(!first_key.is_empty());

    let exists = dispatch(&bridge, "biometricKeysExist", "").await;
    assert_eq!(exists["keysExist"], Value::Bool(true));

    // Immediate regeneration succeeds and replaces the key.
    let second = dispatch(&bridge, "createKeys", "{}").await;
    assert_ne!(second["publicKey"].as_str().unwrap(), first_key);

    let deleted = dispatch(&bridge, "deleteKeys", "").await;
    assert_eq!(deleted["keysDeleted"], Value::Bool(true));

    let deleted_again = dispatch(&bridge, "deleteKeys", "").await;
    assert_eq!(deleted_again["keysDeleted"], Value::Bool(false));
}

#[tokio::test]
async fn create_signature_success_shape() {
    let bridge = bridge_with(MODERN_API, ScriptedBiometricService::succeeding());
    dispatch(&bridge, "createKeys", "").await;

    // cancelButtonText and allowDeviceCredentials take their defaults.
    let response = dispatch(
        &bridge,
        "createSignature",
        r#"{"promptMessage": "Confirm", "payload": "order-4711"}"#,
    )
    .await;

    assert_eq!(response["success"], Value::Bool(true));
    assert!(!response["signature"].as_str().unwrap().is_empty());
    assert!(response.get("error").is_none());
}

#[tokio::test]
async fn create_signature_cancel_shape() {
    let bridge = bridge_with(
        MODERN_API,
        ScriptedBiometricService::erroring(ERROR_USER_CANCELED, "cancelled"),
    );
    dispatch(&bridge, "createKeys", "").await;

    let response = dispatch(
        &bridge,
        "createSignature",
        r#"{"promptMessage": "Confirm", "payload": "order-4711"}"#,
    )
    .await;

    assert_eq!(response["success"], Value::Bool(false));
    assert_eq!(response["error"], "User cancellation");
    assert!(response.get("signature").is_none());
}

#[tokio::test]
async fn create_signature_platform_failure_shape() {
    let bridge = bridge_with(
        MODERN_API,
        ScriptedBiometricService::erroring(7, "Too many attempts. Try again later."),
    );
    dispatch(&bridge, "createKeys", "").await;

    let response = dispatch(
        &bridge,
        "createSignature",
        r#"{"promptMessage": "Confirm", "payload": "order-4711"}"#,
    )
    .await;

    assert_eq!(response["success"], Value::Bool(false));
    assert_eq!(response["error"], "Too many attempts. Try again later.");
}

#[tokio::test]
async fn simple_prompt_shapes() {
    let bridge = bridge_with(MODERN_API, ScriptedBiometricService::succeeding());

    let response = dispatch(
        &bridge,
        "simplePrompt",
        r#"{"promptMessage": "Unlock", "allowDeviceCredentials": true}"#,
    )
    .await;

    assert_eq!(response, serde_json::json!({"success": true}));
}

#[tokio::test]
async fn unsupported_platform_rejects_key_creation() {
    let bridge = bridge_with(22, ScriptedBiometricService::succeeding());

    let err = bridge.dispatch("createKeys", "").await.unwrap_err();
    assert!(matches!(err, BiometricError::UnsupportedPlatform { .. }));
}

#[tokio::test]
async fn unknown_method_and_malformed_json_are_invalid_requests() {
    let bridge = bridge_with(MODERN_API, ScriptedBiometricService::succeeding());

    assert!(matches!(
        bridge.dispatch("fingerprintScan", "{}").await.unwrap_err(),
        BiometricError::InvalidRequest { .. }
    ));
    assert!(matches!(
        bridge
            .dispatch("createSignature", "{not json")
            .await
            .unwrap_err(),
        BiometricError::InvalidRequest { .. }
    ));
}

#[test]
fn handle_runs_operations_on_its_own_runtime() {
    let bridge = bridge_with(MODERN_API, ScriptedBiometricService::succeeding());
    let handle = BiosignHandle::new(bridge).expect("runtime");

    let response = handle
        .invoke("biometricKeysExist", "")
        .expect("invocation");
    assert_eq!(response, r#"{"keysExist":false}"#);
}
