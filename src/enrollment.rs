//! Sign-in hook for push enrollment.
//!
//! Push enrollment is an enhancement: it runs only after a successful
//! sign-in or sign-up, and its failures are logged here instead of being
//! handed back to the authentication flow.

// Rust guideline compliant 2026-02

use crate::error::{FailureReason, SubscribeError};
use crate::manager::{SubscribeOutcome, SubscriptionManager};
use crate::platform::PushPlatform;
use crate::registry::DeviceRegistry;
use crate::subscription::UserIdentity;

/// Result of a sign-in or sign-up attempt, as seen by the enrollment hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The user is authenticated.
    Authenticated(UserIdentity),
    /// Authentication failed.
    Rejected {
        /// Message from the auth provider.
        reason: String,
    },
}

/// Enroll the device after `outcome`, if it was a successful authentication.
///
/// Never returns an error; `None` means no enrollment happened.
pub async fn enroll_after_auth<P, R>(
    manager: &mut SubscriptionManager<P, R>,
    outcome: &AuthOutcome,
) -> Option<SubscribeOutcome>
where
    P: PushPlatform,
    R: DeviceRegistry,
{
    let identity = match outcome {
        AuthOutcome::Authenticated(identity) => identity,
        AuthOutcome::Rejected { reason } => {
            log::debug!("[Push] Skipping enrollment after failed sign-in: {}", reason);
            return None;
        }
    };

    match manager.subscribe(identity).await {
        Ok(subscribed) => Some(subscribed),
        Err(e) => {
            log_failure(&e);
            None
        }
    }
}

fn log_failure(error: &SubscribeError) {
    match error.reason() {
        FailureReason::UnsupportedPlatform | FailureReason::PermissionDenied => {
            log::info!("[Push] Notifications unavailable: {}", error);
        }
        FailureReason::DeviceRegistrationFailed => {
            log::warn!(
                "[Push] Error subscribing user (device registration can be retried): {}",
                error
            );
        }
        FailureReason::WorkerRegistrationFailed | FailureReason::SubscriptionCreateFailed => {
            log::error!("[Push] Error subscribing user: {}", error);
        }
    }
}
