//! Push enrollment state machine.
//!
//! # Flow
//!
//! ```text
//! Idle
//!   ↓ register worker            ── WorkerRegistrationFailed
//! WorkerRegistering
//!   ↓ registration handle        (activation is not awaited)
//! PermissionPending
//!   ↓ granted                    ── UnsupportedPlatform / PermissionDenied
//! KeySubscribing
//!   ↓ reuse or create            ── SubscriptionCreateFailed
//! DeviceRegistering
//!   ↓ POST /user/add             ── DeviceRegistrationFailed
//! Subscribed
//! ```
//!
//! A failed device registration does not roll back the platform
//! subscription. The manager keeps the subscription so
//! [`SubscriptionManager::retry_device_registration`] can redo the last step
//! alone.

// Rust guideline compliant 2026-02

use crate::codec::ServerKey;
use crate::constants;
use crate::error::{FailureReason, SubscribeError};
use crate::permission::PermissionGate;
use crate::platform::{PushPlatform, WorkerLifecycle};
use crate::registry::DeviceRegistry;
use crate::subscription::{
    DeviceRegistration, PushSubscriptionDescriptor, SubscribeOptions, UserIdentity,
};

/// Current position in the enrollment flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    /// Nothing attempted yet.
    Idle,
    /// Installing the background worker.
    WorkerRegistering,
    /// Waiting for notification permission.
    PermissionPending,
    /// Looking up or creating the platform subscription.
    KeySubscribing,
    /// Submitting the device to the backend.
    DeviceRegistering,
    /// Device known to the backend.
    Subscribed,
    /// Last attempt failed.
    Failed(FailureReason),
}

impl std::fmt::Display for SubscriptionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::WorkerRegistering => f.write_str("worker_registering"),
            Self::PermissionPending => f.write_str("permission_pending"),
            Self::KeySubscribing => f.write_str("key_subscribing"),
            Self::DeviceRegistering => f.write_str("device_registering"),
            Self::Subscribed => f.write_str("subscribed"),
            Self::Failed(reason) => write!(f, "failed({reason})"),
        }
    }
}

/// Successful result of a subscribe attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeOutcome {
    /// Push endpoint registered with the backend.
    pub endpoint: String,
    /// `true` when an existing platform subscription was reused.
    pub reused_subscription: bool,
}

/// Drives push enrollment for one page.
pub struct SubscriptionManager<P: PushPlatform, R> {
    platform: P,
    registry: R,
    server_key: ServerKey,
    worker_script: String,
    state: SubscriptionState,
    registration: Option<P::Registration>,
    subscription: Option<PushSubscriptionDescriptor>,
}

impl<P: PushPlatform, R> std::fmt::Debug for SubscriptionManager<P, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionManager")
            .field("state", &self.state)
            .field("worker_script", &self.worker_script)
            .field("subscription", &self.subscription)
            .finish_non_exhaustive()
    }
}

impl<P, R> SubscriptionManager<P, R>
where
    P: PushPlatform,
    R: DeviceRegistry,
{
    /// Manager that installs the worker from the default script path.
    pub fn new(platform: P, registry: R, server_key: ServerKey) -> Self {
        Self {
            platform,
            registry,
            server_key,
            worker_script: constants::WORKER_SCRIPT_PATH.to_string(),
            state: SubscriptionState::Idle,
            registration: None,
            subscription: None,
        }
    }

    /// Override the worker script location.
    pub fn with_worker_script(mut self, script: impl Into<String>) -> Self {
        self.worker_script = script.into();
        self
    }

    /// Current state.
    pub fn state(&self) -> SubscriptionState {
        self.state
    }

    /// Worker registration from the last attempt that got past `KeySubscribing`.
    pub fn registration(&self) -> Option<&P::Registration> {
        self.registration.as_ref()
    }

    /// Subscription obtained by the last attempt that got past `KeySubscribing`.
    ///
    /// Cleared when a later attempt fails while looking up or creating one.
    pub fn subscription(&self) -> Option<&PushSubscriptionDescriptor> {
        self.subscription.as_ref()
    }

    /// Platform seam, mainly for inspection in tests.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Registry seam, mainly for inspection in tests.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Enroll this device for `identity`.
    ///
    /// Safe to call repeatedly: an existing platform subscription is reused
    /// and the device registration is always re-sent, since the backend may
    /// have lost it.
    pub async fn subscribe(
        &mut self,
        identity: &UserIdentity,
    ) -> Result<SubscribeOutcome, SubscribeError> {
        if self.state == SubscriptionState::Failed(FailureReason::UnsupportedPlatform) {
            return Err(SubscribeError::UnsupportedPlatform(
                "push notifications were already found to be unsupported".into(),
            ));
        }

        let result = self.run_flow(identity).await;
        self.finish(result)
    }

    /// Redo only the device-registration step with the subscription kept from
    /// the previous attempt.
    ///
    /// The kept subscription is looked up again first, since the platform may
    /// have revoked it in the meantime. Falls back to a full
    /// [`subscribe`](Self::subscribe) when there is nothing live to register.
    pub async fn retry_device_registration(
        &mut self,
        identity: &UserIdentity,
    ) -> Result<SubscribeOutcome, SubscribeError> {
        let live = match &self.registration {
            Some(registration) => self
                .platform
                .get_subscription(registration)
                .await
                .map_err(|e| SubscribeError::SubscriptionCreateFailed(e.to_string())),
            None => Ok(None),
        };
        let subscription = match live {
            Ok(Some(subscription)) => subscription,
            Ok(None) => {
                log::debug!("[Push] No live subscription kept, running the full flow");
                self.subscription = None;
                return self.subscribe(identity).await;
            }
            Err(e) => return self.finish(Err(e)),
        };
        self.subscription = Some(subscription.clone());

        self.transition(SubscriptionState::DeviceRegistering);
        let result = self
            .register_device(identity, &subscription)
            .await
            .map(|()| SubscribeOutcome {
                endpoint: subscription.endpoint.clone(),
                reused_subscription: true,
            });
        self.finish(result)
    }

    async fn run_flow(
        &mut self,
        identity: &UserIdentity,
    ) -> Result<SubscribeOutcome, SubscribeError> {
        if !self.platform.supports_service_worker() {
            return Err(SubscribeError::UnsupportedPlatform(
                "Service Worker not supported in this browser".into(),
            ));
        }

        self.transition(SubscriptionState::WorkerRegistering);
        let registration = self
            .platform
            .register_worker(&self.worker_script, constants::WORKER_SCOPE)
            .await
            .map_err(|e| SubscribeError::WorkerRegistrationFailed(e.to_string()))?;

        let lifecycle = self.platform.worker_lifecycle(&registration);
        if lifecycle == WorkerLifecycle::Active {
            log::info!("[Push] Service worker registered");
        } else {
            log::info!(
                "[Push] Service worker registered ({}), not waiting for activation",
                lifecycle
            );
        }

        self.transition(SubscriptionState::PermissionPending);
        PermissionGate::new(&self.platform).request_permission().await?;

        self.transition(SubscriptionState::KeySubscribing);
        // Replaced below, or stays empty if this step fails
        self.subscription = None;
        let (subscription, reused) = self.obtain_subscription(&registration).await?;
        self.registration = Some(registration);
        self.subscription = Some(subscription.clone());

        self.transition(SubscriptionState::DeviceRegistering);
        self.register_device(identity, &subscription).await?;

        Ok(SubscribeOutcome {
            endpoint: subscription.endpoint,
            reused_subscription: reused,
        })
    }

    async fn obtain_subscription(
        &self,
        registration: &P::Registration,
    ) -> Result<(PushSubscriptionDescriptor, bool), SubscribeError> {
        let existing = self
            .platform
            .get_subscription(registration)
            .await
            .map_err(|e| SubscribeError::SubscriptionCreateFailed(e.to_string()))?;

        if let Some(subscription) = existing {
            if subscription.matches_server_key(&self.server_key) {
                log::debug!("[Push] Reusing existing subscription {}", subscription.endpoint);
                return Ok((subscription, true));
            }

            log::info!("[Push] Existing subscription uses a different server key, replacing it");
            self.platform
                .unsubscribe(registration)
                .await
                .map_err(|e| SubscribeError::SubscriptionCreateFailed(e.to_string()))?;
        }

        let options = SubscribeOptions::new(self.server_key.clone());
        let subscription = self
            .platform
            .subscribe(registration, &options)
            .await
            .map_err(|e| SubscribeError::SubscriptionCreateFailed(e.to_string()))?;

        log::info!("[Push] Created push subscription {}", subscription.endpoint);
        Ok((subscription, false))
    }

    async fn register_device(
        &self,
        identity: &UserIdentity,
        subscription: &PushSubscriptionDescriptor,
    ) -> Result<(), SubscribeError> {
        let registration = DeviceRegistration::new(identity, subscription)?;
        self.registry
            .register_device(&registration)
            .await
            .map_err(|e| SubscribeError::DeviceRegistrationFailed(format!("{e:#}")))
    }

    fn finish(
        &mut self,
        result: Result<SubscribeOutcome, SubscribeError>,
    ) -> Result<SubscribeOutcome, SubscribeError> {
        match &result {
            Ok(outcome) => {
                self.transition(SubscriptionState::Subscribed);
                log::info!("[Push] User subscribed successfully: {}", outcome.endpoint);
            }
            Err(e) => {
                self.transition(SubscriptionState::Failed(e.reason()));
            }
        }
        result
    }

    fn transition(&mut self, next: SubscriptionState) {
        log::debug!("[Push] {} -> {}", self.state, next);
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(SubscriptionState::Idle.to_string(), "idle");
        assert_eq!(
            SubscriptionState::Failed(FailureReason::PermissionDenied).to_string(),
            "failed(permission_denied)"
        );
    }
}
