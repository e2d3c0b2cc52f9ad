//! Typed request/response marshaling for the caller-facing operations.
//!
//! The shapes here are the module's wire contract: camelCase JSON objects
//! with optional `error` strings carrying collaborator diagnostics
//! verbatim. Request fields the caller omits take the documented defaults
//! (`cancelButtonText` = "Cancel", `allowDeviceCredentials` = false).

use serde::{Deserialize, Serialize};

use biosign_core::{
    AvailabilityResult, BiometricError, BiometricModule, CeremonyOutcome, PromptRequest,
    SignatureRequest,
};

/// Error string reported for a user-cancelled ceremony.
const USER_CANCELLATION: &str = "User cancellation";

fn default_cancel_button_text() -> String {
    "Cancel".into()
}

/// Request for `isSensorAvailable`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorAvailabilityRequest {
    /// Whether device-credential fallback counts as available.
    #[serde(default)]
    pub allow_device_credentials: bool,
}

/// Response for `isSensorAvailable`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorAvailabilityResponse {
    /// Whether an authenticator of the requested tier is usable.
    pub available: bool,
    /// Modality, present when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biometry_type: Option<String>,
    /// Platform reason code, present when unavailable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response for `createKeys`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateKeysResponse {
    /// Standard-base64 public key, no line wrapping.
    pub public_key: String,
}

/// Response for `deleteKeys`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteKeysResponse {
    /// `true` if a key was deleted, `false` if none existed.
    pub keys_deleted: bool,
}

/// Response for `biometricKeysExist`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeysExistResponse {
    /// Whether the key record exists.
    pub keys_exist: bool,
}

/// Request for `createSignature`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSignatureRequest {
    /// Title for the authentication dialog.
    pub prompt_message: String,
    /// Payload to sign; its UTF-8 bytes are signed.
    pub payload: String,
    /// Cancel button label.
    #[serde(default = "default_cancel_button_text")]
    pub cancel_button_text: String,
    /// Whether device-credential fallback may be offered.
    #[serde(default)]
    pub allow_device_credentials: bool,
}

/// Response for `createSignature`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSignatureResponse {
    /// Whether the ceremony produced a signature.
    pub success: bool,
    /// Standard-base64 detached signature on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Cancellation or platform diagnostic on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Request for `simplePrompt`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplePromptRequest {
    /// Title for the authentication dialog.
    pub prompt_message: String,
    /// Cancel button label.
    #[serde(default = "default_cancel_button_text")]
    pub cancel_button_text: String,
    /// Whether device-credential fallback may be offered.
    #[serde(default)]
    pub allow_device_credentials: bool,
}

/// Response for `simplePrompt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplePromptResponse {
    /// Whether the user authenticated.
    pub success: bool,
    /// Cancellation or platform diagnostic on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Thin marshaling layer over a [`BiometricModule`].
///
/// Each method is one caller-facing operation. Precondition failures
/// (unsupported platform, key-store rejections) are `Err`; negative but
/// expected ceremony outcomes travel inside the response's `error` field.
pub struct BiometricBridge {
    module: BiometricModule,
}

impl BiometricBridge {
    /// Wrap a module.
    #[must_use]
    pub fn new(module: BiometricModule) -> Self {
        Self { module }
    }

    /// `isSensorAvailable`.
    #[must_use]
    pub fn is_sensor_available(
        &self,
        request: &SensorAvailabilityRequest,
    ) -> SensorAvailabilityResponse {
        match self
            .module
            .check_availability(request.allow_device_credentials)
        {
            AvailabilityResult::Available { biometry_type } => SensorAvailabilityResponse {
                available: true,
                biometry_type: Some(biometry_type.to_string()),
                error: None,
            },
            AvailabilityResult::Unavailable { reason } => SensorAvailabilityResponse {
                available: false,
                biometry_type: None,
                error: Some(reason.platform_code().into()),
            },
        }
    }

    /// `createKeys`.
    pub fn create_keys(&self) -> Result<CreateKeysResponse, BiometricError> {
        let public_key = self.module.create_key_pair()?;
        Ok(CreateKeysResponse { public_key })
    }

    /// `deleteKeys`.
    pub fn delete_keys(&self) -> Result<DeleteKeysResponse, BiometricError> {
        let keys_deleted = self.module.delete_key_pair()?;
        Ok(DeleteKeysResponse { keys_deleted })
    }

    /// `biometricKeysExist`.
    #[must_use]
    pub fn biometric_keys_exist(&self) -> KeysExistResponse {
        KeysExistResponse {
            keys_exist: self.module.key_exists(),
        }
    }

    /// `createSignature`.
    pub async fn create_signature(
        &self,
        request: CreateSignatureRequest,
    ) -> Result<CreateSignatureResponse, BiometricError> {
        let outcome = self
            .module
            .sign(SignatureRequest {
                prompt_message: request.prompt_message,
                payload: request.payload.into_bytes(),
                cancel_button_text: request.cancel_button_text,
                allow_device_credentials: request.allow_device_credentials,
            })
            .await?;

        Ok(match outcome {
            CeremonyOutcome::Succeeded { signature } => CreateSignatureResponse {
                success: true,
                signature,
                error: None,
            },
            CeremonyOutcome::Cancelled => CreateSignatureResponse {
                success: false,
                signature: None,
                error: Some(USER_CANCELLATION.into()),
            },
            CeremonyOutcome::Failed { message, .. } => CreateSignatureResponse {
                success: false,
                signature: None,
                error: Some(message),
            },
        })
    }

    /// `simplePrompt`.
    pub async fn simple_prompt(
        &self,
        request: SimplePromptRequest,
    ) -> Result<SimplePromptResponse, BiometricError> {
        let outcome = self
            .module
            .prompt(PromptRequest {
                prompt_message: request.prompt_message,
                cancel_button_text: request.cancel_button_text,
                allow_device_credentials: request.allow_device_credentials,
            })
            .await?;

        Ok(match outcome {
            CeremonyOutcome::Succeeded { .. } => SimplePromptResponse {
                success: true,
                error: None,
            },
            CeremonyOutcome::Cancelled => SimplePromptResponse {
                success: false,
                error: Some(USER_CANCELLATION.into()),
            },
            CeremonyOutcome::Failed { message, .. } => SimplePromptResponse {
                success: false,
                error: Some(message),
            },
        })
    }

    /// Dispatch a named operation with a JSON request payload.
    ///
    /// An empty `request_json` is treated as `{}`. Returns the JSON
    /// response body.
    ///
    /// # Errors
    ///
    /// [`BiometricError::InvalidRequest`] for unknown methods or
    /// malformed JSON, plus whatever the operation itself returns.
    pub async fn dispatch(
        &self,
        method: &str,
        request_json: &str,
    ) -> Result<String, BiometricError> {
        let body = if request_json.trim().is_empty() {
            "{}"
        } else {
            request_json
        };

        let response = match method {
            "isSensorAvailable" => {
                let request = parse::<SensorAvailabilityRequest>(body)?;
                to_json(&self.is_sensor_available(&request))?
            }
            "createKeys" => to_json(&self.create_keys()?)?,
            "deleteKeys" => to_json(&self.delete_keys()?)?,
            "biometricKeysExist" => to_json(&self.biometric_keys_exist())?,
            "createSignature" => {
                let request = parse::<CreateSignatureRequest>(body)?;
                to_json(&self.create_signature(request).await?)?
            }
            "simplePrompt" => {
                let request = parse::<SimplePromptRequest>(body)?;
                to_json(&self.simple_prompt(request).await?)?
            }
            other => {
                return Err(BiometricError::invalid_request(format!(
                    "unknown method: {other}"
                )))
            }
        };

        Ok(response)
    }
}

fn parse<'a, T: Deserialize<'a>>(body: &'a str) -> Result<T, BiometricError> {
    serde_json::from_str(body)
        .map_err(|err| BiometricError::invalid_request(format!("malformed request: {err}")))
}

fn to_json<T: Serialize>(response: &T) -> Result<String, BiometricError> {
    serde_json::to_string(response)
        .map_err(|err| BiometricError::invalid_request(format!("response encoding: {err}")))
}
