//! Error taxonomy for push enrollment.
//!
//! Every failure of the subscribe flow maps to exactly one
//! [`FailureReason`]. Callers decide what to do from the reason alone:
//!
//! | Reason | Retry |
//! |--------|-------|
//! | `UnsupportedPlatform` | never |
//! | `PermissionDenied` | only after the user changes platform settings |
//! | `WorkerRegistrationFailed` | whole flow |
//! | `SubscriptionCreateFailed` | whole flow |
//! | `DeviceRegistrationFailed` | device-registration step alone |

// Rust guideline compliant 2026-02

use thiserror::Error;

/// Failure raised by a platform seam (browser API or test double).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct PlatformError(pub String);

impl PlatformError {
    /// Build from anything printable.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Why a subscribe attempt ended in `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// Background worker or push APIs are absent.
    UnsupportedPlatform,
    /// The user denied (or dismissed) the permission prompt.
    PermissionDenied,
    /// Installing the background worker failed.
    WorkerRegistrationFailed,
    /// The platform refused to create a push subscription.
    SubscriptionCreateFailed,
    /// The backend did not accept the device registration.
    DeviceRegistrationFailed,
}

impl FailureReason {
    /// Returns the identifier used in logs and in the browser binding.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnsupportedPlatform => "unsupported_platform",
            Self::PermissionDenied => "permission_denied",
            Self::WorkerRegistrationFailed => "worker_registration_failed",
            Self::SubscriptionCreateFailed => "subscription_create_failed",
            Self::DeviceRegistrationFailed => "device_registration_failed",
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by the subscribe flow.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscribeError {
    /// Background worker or push APIs are absent.
    #[error("push notifications are not supported: {0}")]
    UnsupportedPlatform(String),
    /// Notification permission was not granted.
    #[error("permission to receive notifications was denied")]
    PermissionDenied,
    /// Installing the background worker failed.
    #[error("background worker registration failed: {0}")]
    WorkerRegistrationFailed(String),
    /// Creating (or looking up) the platform subscription failed.
    #[error("push subscription could not be created: {0}")]
    SubscriptionCreateFailed(String),
    /// The device registry call failed.
    #[error("device registration failed: {0}")]
    DeviceRegistrationFailed(String),
}

impl SubscribeError {
    /// Reason recorded in the `Failed` state.
    pub fn reason(&self) -> FailureReason {
        match self {
            Self::UnsupportedPlatform(_) => FailureReason::UnsupportedPlatform,
            Self::PermissionDenied => FailureReason::PermissionDenied,
            Self::WorkerRegistrationFailed(_) => FailureReason::WorkerRegistrationFailed,
            Self::SubscriptionCreateFailed(_) => FailureReason::SubscriptionCreateFailed,
            Self::DeviceRegistrationFailed(_) => FailureReason::DeviceRegistrationFailed,
        }
    }

    /// Whether calling `subscribe` again can succeed without user action.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.reason(),
            FailureReason::WorkerRegistrationFailed
                | FailureReason::SubscriptionCreateFailed
                | FailureReason::DeviceRegistrationFailed
        )
    }
}
