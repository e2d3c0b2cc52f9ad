//! # biosign-ffi
//!
//! C-compatible bridge for the biosign biometric signing module.
//!
//! The embedder (JNI layer, Objective-C shim, host runtime) constructs the
//! platform collaborators, assembles a [`BiosignHandle`], and then drives
//! the module through a single JSON dispatch entry point:
//!
//! ```c
//! char* response = NULL;
//! int rc = biosign_invoke(handle, "createKeys", "{}", &response);
//! if (rc == 0) {
//!     // {"publicKey":"MIIBIjANBg..."}
//!     biosign_free_string(response);
//! }
//! biosign_destroy(handle);
//! ```
//!
//! Method names and payload shapes match the application-layer contract
//! (`isSensorAvailable`, `createKeys`, `deleteKeys`, `biometricKeysExist`,
//! `createSignature`, `simplePrompt`); see [`bridge`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::pedantic)] // Too strict for production code
#![allow(clippy::missing_safety_doc)] // Safety contracts documented per-function

pub mod bridge;

use std::ffi::CStr;

use libc::c_char;
use tokio::runtime::Runtime;

use biosign_core::BiometricError;
pub use bridge::BiometricBridge;

/// Opaque handle owning the bridge and its runtime.
pub struct BiosignHandle {
    runtime: Runtime,
    bridge: BiometricBridge,
}

impl BiosignHandle {
    /// Create a handle over an assembled bridge.
    ///
    /// # Errors
    ///
    /// Returns an error if the tokio runtime cannot be created.
    pub fn new(bridge: BiometricBridge) -> std::io::Result<Self> {
        let runtime = Runtime::new()?;
        Ok(Self { runtime, bridge })
    }

    /// Convert the handle into a raw pointer for the C side.
    ///
    /// The pointer must be released with [`biosign_destroy`].
    #[must_use]
    pub fn into_raw(self) -> *mut Self {
        Box::into_raw(Box::new(self))
    }

    /// Run one operation synchronously on the handle's runtime.
    pub fn invoke(&self, method: &str, request_json: &str) -> Result<String, BiometricError> {
        self.runtime
            .block_on(self.bridge.dispatch(method, request_json))
    }
}

/// Status codes returned by the C entry points.
#[repr(C)]
pub enum BiosignStatus {
    /// Success.
    Success = 0,
    /// A pointer argument was null or not valid UTF-8.
    InvalidArgument = -1,
    /// The operation failed; the response carries `{"error": ...}`.
    RequestFailed = -3,
}

/// Initialize platform logging.
///
/// On Android this routes `tracing`/`log` output to logcat; elsewhere it
/// is a no-op. Safe to call more than once.
#[no_mangle]
pub extern "C" fn biosign_init_logging() {
    #[cfg(target_os = "android")]
    {
        android_logger::init_once(
            android_logger::Config::default()
                .with_max_level(log::LevelFilter::Info)
                .with_tag("biosign"),
        );
    }
}

/// Invoke a named operation with a JSON request.
///
/// On success writes a malloc'd, NUL-terminated JSON response to
/// `response` and returns 0. On operation failure writes
/// `{"error": "..."}` instead and returns a negative status. The caller
/// frees the response with [`biosign_free_string`].
///
/// # Safety
///
/// - `handle` must come from [`BiosignHandle::into_raw`] and not yet be
///   destroyed.
/// - `method` and `request_json` must be valid NUL-terminated strings
///   (`request_json` may be NULL, meaning `{}`).
/// - `response` must be a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn biosign_invoke(
    handle: *const BiosignHandle,
    method: *const c_char,
    request_json: *const c_char,
    response: *mut *mut c_char,
) -> i32 {
    if handle.is_null() || method.is_null() || response.is_null() {
        return BiosignStatus::InvalidArgument as i32;
    }

    let handle = &*handle;

    let Ok(method) = CStr::from_ptr(method).to_str() else {
        return BiosignStatus::InvalidArgument as i32;
    };

    let request = if request_json.is_null() {
        ""
    } else {
        match CStr::from_ptr(request_json).to_str() {
            Ok(s) => s,
            Err(_) => return BiosignStatus::InvalidArgument as i32,
        }
    };

    match handle.invoke(method, request) {
        Ok(body) => {
            *response = into_malloc_string(&body);
            BiosignStatus::Success as i32
        }
        Err(err) => {
            tracing::error!(method, error = %err, "bridge invocation failed");
            let body = serde_json::json!({ "error": err.to_string() }).to_string();
            *response = into_malloc_string(&body);
            BiosignStatus::RequestFailed as i32
        }
    }
}

/// Copy a Rust string into a malloc'd, NUL-terminated C buffer.
fn into_malloc_string(s: &str) -> *mut c_char {
    let len = s.len();
    // SAFETY: buffer is len + 1 bytes; the copy stays within it.
    unsafe {
        let buf = libc::malloc(len + 1) as *mut c_char;
        if buf.is_null() {
            return buf;
        }
        std::ptr::copy_nonoverlapping(s.as_ptr() as *const c_char, buf, len);
        *buf.add(len) = 0;
        buf
    }
}

/// Free a string returned by [`biosign_invoke`].
///
/// # Safety
///
/// `s` must be a pointer returned by a biosign function, or NULL.
#[no_mangle]
pub unsafe extern "C" fn biosign_free_string(s: *mut c_char) {
    if !s.is_null() {
        libc::free(s as *mut libc::c_void);
    }
}

/// Destroy a handle and release its resources.
///
/// # Safety
///
/// `handle` must come from [`BiosignHandle::into_raw`]; it is invalid
/// after this call.
#[no_mangle]
pub unsafe extern "C" fn biosign_destroy(handle: *mut BiosignHandle) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

/// Library version as a static NUL-terminated string.
#[no_mangle]
pub extern "C" fn biosign_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}
