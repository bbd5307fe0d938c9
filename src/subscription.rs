//! Push subscription data model.
//!
//! - [`PushSubscriptionDescriptor`]: what the platform hands back (binary keys)
//! - [`DeviceRegistration`]: the text form submitted to the backend
//! - [`RegisterDeviceRequest`]: the exact JSON body of `POST /user/add`

// Rust guideline compliant 2026-02

use serde::{Deserialize, Serialize};

use crate::codec::{encode_key, ServerKey};
use crate::error::SubscribeError;

/// Identity the device is registered against.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Backend user id.
    pub user_id: String,
    /// Name shown to the user (first name in the portal).
    pub display_name: String,
    /// Account email.
    pub email: String,
}

impl UserIdentity {
    /// Convenience constructor.
    pub fn new(
        user_id: impl Into<String>,
        display_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            email: email.into(),
        }
    }
}

/// A live platform push subscription.
///
/// Issued by the push service and immutable afterwards. It can be revoked by
/// the platform at any time without notice.
#[derive(Clone, PartialEq, Eq)]
pub struct PushSubscriptionDescriptor {
    /// Push service endpoint URL.
    pub endpoint: String,
    /// Browser's P-256 ECDH public key (raw bytes).
    pub p256dh: Vec<u8>,
    /// Shared auth secret (raw bytes).
    pub auth: Vec<u8>,
    /// Server key the subscription was created with, when the platform reports it.
    pub application_server_key: Option<Vec<u8>>,
}

impl std::fmt::Debug for PushSubscriptionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushSubscriptionDescriptor")
            .field("endpoint", &self.endpoint)
            .field("p256dh_len", &self.p256dh.len())
            .field("auth_len", &self.auth.len())
            .finish_non_exhaustive()
    }
}

impl PushSubscriptionDescriptor {
    /// Whether this subscription was created for `key`.
    ///
    /// Subscriptions whose creation key is unknown are assumed to match.
    pub fn matches_server_key(&self, key: &ServerKey) -> bool {
        self.application_server_key
            .as_deref()
            .map_or(true, |bytes| bytes == key.as_bytes())
    }
}

/// Options passed to the platform when creating a subscription.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubscribeOptions {
    user_visible_only: bool,
    application_server_key: ServerKey,
}

impl SubscribeOptions {
    /// Options for `key`. Every push must produce a visible notification, so
    /// `user_visible_only` is always set.
    pub fn new(application_server_key: ServerKey) -> Self {
        Self {
            user_visible_only: true,
            application_server_key,
        }
    }

    /// Always `true`.
    pub fn user_visible_only(&self) -> bool {
        self.user_visible_only
    }

    /// VAPID public key.
    pub fn application_server_key(&self) -> &ServerKey {
        &self.application_server_key
    }
}

/// Text-encoded device registration for the backend.
///
/// Only constructible from a [`PushSubscriptionDescriptor`], so every
/// registration refers to a subscription that existed on this device.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeviceRegistration {
    /// Backend user id.
    pub user_id: String,
    /// Display name.
    pub display_name: String,
    /// Account email.
    pub email: String,
    /// Push endpoint URL.
    pub endpoint: String,
    /// base64url P-256 ECDH public key.
    pub public_key: String,
    /// base64url auth secret.
    pub auth_secret: String,
}

impl DeviceRegistration {
    /// Encode `subscription` for `identity`.
    ///
    /// Empty endpoint or key buffers mean the platform handed back a broken
    /// subscription; that is reported as a creation failure.
    pub fn new(
        identity: &UserIdentity,
        subscription: &PushSubscriptionDescriptor,
    ) -> Result<Self, SubscribeError> {
        if subscription.endpoint.trim().is_empty() {
            return Err(SubscribeError::SubscriptionCreateFailed(
                "platform returned a subscription without an endpoint".into(),
            ));
        }
        if subscription.p256dh.is_empty() {
            return Err(SubscribeError::SubscriptionCreateFailed(
                "platform returned an empty p256dh key".into(),
            ));
        }
        if subscription.auth.is_empty() {
            return Err(SubscribeError::SubscriptionCreateFailed(
                "platform returned an empty auth secret".into(),
            ));
        }

        Ok(Self {
            user_id: identity.user_id.clone(),
            display_name: identity.display_name.clone(),
            email: identity.email.clone(),
            endpoint: subscription.endpoint.clone(),
            public_key: encode_key(&subscription.p256dh),
            auth_secret: encode_key(&subscription.auth),
        })
    }

    /// Wire body for the registry endpoint.
    pub fn to_request(&self) -> RegisterDeviceRequest {
        RegisterDeviceRequest {
            user_data: UserData {
                user_id: self.user_id.clone(),
                username: self.display_name.clone(),
                email: self.email.clone(),
            },
            device_data: DeviceData {
                push_endpoint: self.endpoint.clone(),
                public_key: self.public_key.clone(),
                auth_token: self.auth_secret.clone(),
            },
        }
    }
}

/// Body of `POST <api-root>/user/add`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDeviceRequest {
    /// Who the device belongs to.
    pub user_data: UserData,
    /// The push subscription.
    pub device_data: DeviceData,
}

/// `userData` object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    /// Backend user id.
    #[serde(rename = "userID")]
    pub user_id: String,
    /// Display name.
    pub username: String,
    /// Account email.
    pub email: String,
}

/// `deviceData` object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceData {
    /// Push endpoint URL.
    pub push_endpoint: String,
    /// base64url P-256 ECDH public key.
    pub public_key: String,
    /// base64url auth secret.
    pub auth_token: String,
}
