//! Manual device registration.
//!
//! Re-sends an existing browser subscription to the device registry, the
//! same call the enrollment flow makes in its last step. Useful when the
//! backend lost a registration and the user's browser still holds a live
//! subscription.
//!
//! ```bash
//! portal-push register --user-id 42 --name Ada --email ada@example.com \
//!     --endpoint https://fcm.googleapis.com/fcm/send/... \
//!     --p256dh BNcR... --auth tBHI...
//! ```

// Rust guideline compliant 2026-02

use anyhow::{Context, Result};

use crate::codec::decode_server_key;
use crate::registry::{DeviceRegistry, HttpDeviceRegistry};
use crate::subscription::{DeviceRegistration, PushSubscriptionDescriptor, UserIdentity};

/// Subscription fields as copied out of the browser (keys in base64url).
#[derive(Debug, Clone)]
pub struct RawSubscription {
    /// Push endpoint URL.
    pub endpoint: String,
    /// base64url P-256 ECDH public key.
    pub p256dh: String,
    /// base64url auth secret.
    pub auth: String,
}

impl RawSubscription {
    fn decode(&self) -> Result<PushSubscriptionDescriptor> {
        Ok(PushSubscriptionDescriptor {
            endpoint: self.endpoint.clone(),
            p256dh: decode_server_key(&self.p256dh).context("Invalid --p256dh")?,
            auth: decode_server_key(&self.auth).context("Invalid --auth")?,
            application_server_key: None,
        })
    }
}

/// Registers `subscription` for `identity` at `api_root`.
///
/// # Errors
///
/// Returns an error if the key material cannot be decoded, is empty, or the
/// backend rejects the registration.
pub async fn run(
    api_root: &str,
    identity: &UserIdentity,
    subscription: &RawSubscription,
) -> Result<DeviceRegistration> {
    let descriptor = subscription.decode()?;
    let registration = DeviceRegistration::new(identity, &descriptor)?;

    let registry = HttpDeviceRegistry::new(api_root)?;
    registry.register_device(&registration).await?;

    println!(
        "Registered {} for user {} at {}",
        registration.endpoint,
        registration.user_id,
        registry.endpoint_url()
    );
    Ok(registration)
}
