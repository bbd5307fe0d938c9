//! Notification permission gate.
//!
//! The browser only lets a site prompt while the permission is `default`, and
//! a user who just declined must not be asked again in the same attempt. The
//! gate therefore prompts at most once and treats anything other than
//! `granted` as a denial.

// Rust guideline compliant 2026-02

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SubscribeError;
use crate::platform::PushPlatform;

/// Notification permission as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    /// The user has not decided yet.
    #[default]
    Default,
    /// Notifications allowed.
    Granted,
    /// Notifications blocked.
    Denied,
}

impl PermissionState {
    /// Platform string form (`"default"`, `"granted"`, `"denied"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }
}

impl std::fmt::Display for PermissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "granted" => Ok(Self::Granted),
            "denied" => Ok(Self::Denied),
            other => Err(format!("unknown permission state '{other}'")),
        }
    }
}

/// Checks platform support and obtains notification permission.
#[derive(Debug)]
pub struct PermissionGate<'a, P> {
    platform: &'a P,
}

impl<'a, P: PushPlatform> PermissionGate<'a, P> {
    /// Gate backed by `platform`.
    pub fn new(platform: &'a P) -> Self {
        Self { platform }
    }

    /// Ensure notifications are allowed, prompting at most once.
    ///
    /// Returns `Ok(PermissionState::Granted)` or an error:
    /// - `UnsupportedPlatform` when worker or push APIs are missing
    /// - `PermissionDenied` for `denied`, a dismissed prompt, or a prompt that failed
    pub async fn request_permission(&self) -> Result<PermissionState, SubscribeError> {
        if !self.platform.supports_service_worker() {
            return Err(SubscribeError::UnsupportedPlatform(
                "Service Worker not supported in this browser".into(),
            ));
        }
        if !self.platform.supports_push() {
            return Err(SubscribeError::UnsupportedPlatform(
                "PushManager not supported in this browser".into(),
            ));
        }

        match self.platform.permission_state() {
            PermissionState::Granted => return Ok(PermissionState::Granted),
            PermissionState::Denied => {
                log::debug!("[Push] Permission already denied, not prompting");
                return Err(SubscribeError::PermissionDenied);
            }
            PermissionState::Default => {}
        }

        let answer = match self.platform.request_permission().await {
            Ok(state) => state,
            Err(e) => {
                log::warn!("[Push] Permission prompt failed: {}", e);
                return Err(SubscribeError::PermissionDenied);
            }
        };

        if answer == PermissionState::Granted {
            log::info!("[Push] Notification permission granted");
            Ok(answer)
        } else {
            log::info!("[Push] Notification permission not granted ({})", answer);
            Err(SubscribeError::PermissionDenied)
        }
    }
}
