//! WebAssembly bindings for portal push notifications.
//!
//! Two entry points, one per side of the browser:
//!
//! ```text
//! Page (window)                          Background worker
//! ─────────────────────────────────────────────────────────────────
//! subscribeUser(userId, ...)             installWorkerHandlers()
//!   ↓                                      ↓
//! SubscriptionManager                    BackgroundNotificationHandler
//!   ├─ WebPushPlatform                     └─ ServiceWorkerScope
//!   └─ HttpDeviceRegistry (fetch)
//! ```
//!
//! The page registers the worker script, which must import this module and
//! call `installWorkerHandlers()` during its first evaluation.

use portal_push::{
    Config, FailureReason, HttpDeviceRegistry, KeyCodecError, PlatformError, SubscribeError,
    SubscriptionManager, UserIdentity,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::prelude::*;

mod console;
mod platform;
mod worker;

pub use platform::WebPushPlatform;
pub use worker::{install_worker_handlers, ServiceWorkerScope};

/// Errors surfaced to JavaScript.
#[derive(Error, Debug)]
pub enum WebError {
    #[error("{0}")]
    Subscribe(#[from] SubscribeError),
    #[error(transparent)]
    Key(#[from] KeyCodecError),
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error("No window object: subscribeUser must run on a page")]
    NoWindow,
    #[error("Not running inside a service worker")]
    NotAWorker,
    #[error("Failed to set up device registry: {0}")]
    Setup(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl WebError {
    /// Enrollment failure reason, when this error came out of the subscribe flow.
    pub fn reason(&self) -> Option<FailureReason> {
        match self {
            Self::Subscribe(e) => Some(e.reason()),
            _ => None,
        }
    }
}

impl From<WebError> for JsValue {
    fn from(err: WebError) -> Self {
        let error = js_sys::Error::new(&err.to_string());
        if let Some(reason) = err.reason() {
            // Lets the page branch on `err.reason` without parsing messages
            let _ = js_sys::Reflect::set(&error, &"reason".into(), &reason.as_str().into());
        }
        error.into()
    }
}

/// Value `subscribeUser` resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeResult {
    pub endpoint: String,
    pub reused_subscription: bool,
}

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    console::init(log::LevelFilter::Info);
}

/// Enroll this browser for push notifications.
///
/// Call after a successful sign-in or sign-up. `apiRoot` and `vapidKey`
/// default to the built-in configuration. Resolves to
/// `{ endpoint, reusedSubscription }`; rejects with an `Error` whose
/// `reason` property names the failed step.
///
/// Calling `subscribeUser` again is the retry path. Each call starts from
/// the browser's own state: an existing push subscription is reused, the
/// permission prompt is not shown again once answered, and the device
/// registration is sent again.
#[wasm_bindgen(js_name = "subscribeUser")]
pub async fn subscribe_user(
    user_id: String,
    username: String,
    email: String,
    api_root: Option<String>,
    vapid_key: Option<String>,
) -> Result<JsValue, JsValue> {
    let defaults = Config::default();
    let config = Config {
        api_root: api_root.unwrap_or(defaults.api_root),
        vapid_public_key: vapid_key.unwrap_or(defaults.vapid_public_key),
        worker_script: defaults.worker_script,
    };

    let result = enroll(&config, UserIdentity::new(user_id, username, email)).await?;
    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| WebError::Serialization(e.to_string()).into())
}

async fn enroll(config: &Config, identity: UserIdentity) -> Result<SubscribeResult, WebError> {
    let server_key = config.server_key()?;
    let platform = WebPushPlatform::new()?;
    let registry = HttpDeviceRegistry::new(config.api_root.clone())
        .map_err(|e| WebError::Setup(format!("{e:#}")))?;

    let mut manager = SubscriptionManager::new(platform, registry, server_key)
        .with_worker_script(config.worker_script.clone());

    match manager.subscribe(&identity).await {
        Ok(outcome) => Ok(SubscribeResult {
            endpoint: outcome.endpoint,
            reused_subscription: outcome.reused_subscription,
        }),
        Err(e) => {
            log::error!("[Push] Error subscribing user: {}", e);
            Err(e.into())
        }
    }
}

/// Test function to verify WASM loads correctly.
#[wasm_bindgen]
pub fn ping() -> String {
    format!("portal-push-web {} loaded", env!("CARGO_PKG_VERSION"))
}
