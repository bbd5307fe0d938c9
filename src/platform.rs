//! Page-side platform seam.
//!
//! [`PushPlatform`] is everything the subscribe flow needs from the browser:
//! worker registration, notification permission and the push manager. The
//! browser binding in `worker-wasm/` implements it on top of `web-sys`; tests
//! implement it with in-memory fakes.
//!
//! Futures are `?Send`: the flow runs on the page's main thread and browser
//! promises cannot cross threads.

// Rust guideline compliant 2026-02

use async_trait::async_trait;

use crate::error::PlatformError;
use crate::permission::PermissionState;
use crate::subscription::{PushSubscriptionDescriptor, SubscribeOptions};

/// Lifecycle phase of a freshly registered background worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerLifecycle {
    /// Install event still running.
    Installing,
    /// Installed, waiting for older workers to release clients.
    Waiting,
    /// Active and able to receive push events.
    Active,
}

impl std::fmt::Display for WorkerLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Installing => "installing",
            Self::Waiting => "waiting",
            Self::Active => "active",
        };
        f.write_str(name)
    }
}

/// Browser APIs used by [`crate::manager::SubscriptionManager`].
#[async_trait(?Send)]
pub trait PushPlatform {
    /// Handle to a worker registration.
    type Registration;

    /// Whether background workers can be registered at all.
    fn supports_service_worker(&self) -> bool;

    /// Whether the push manager API is present.
    fn supports_push(&self) -> bool;

    /// Register (or update) the background worker at `script_url`.
    async fn register_worker(
        &self,
        script_url: &str,
        scope: &str,
    ) -> Result<Self::Registration, PlatformError>;

    /// Lifecycle phase of `registration` at the time of the call.
    fn worker_lifecycle(&self, registration: &Self::Registration) -> WorkerLifecycle;

    /// Current notification permission, without prompting.
    fn permission_state(&self) -> PermissionState;

    /// Show the permission prompt and return the user's answer.
    async fn request_permission(&self) -> Result<PermissionState, PlatformError>;

    /// Existing subscription for `registration`, if any.
    async fn get_subscription(
        &self,
        registration: &Self::Registration,
    ) -> Result<Option<PushSubscriptionDescriptor>, PlatformError>;

    /// Create a subscription for `registration`.
    async fn subscribe(
        &self,
        registration: &Self::Registration,
        options: &SubscribeOptions,
    ) -> Result<PushSubscriptionDescriptor, PlatformError>;

    /// Revoke the current subscription of `registration`.
    ///
    /// Returns `false` when there was nothing to revoke.
    async fn unsubscribe(&self, registration: &Self::Registration) -> Result<bool, PlatformError>;
}
