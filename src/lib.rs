//! Portal Push - web push enrollment and background notification handling.
//!
//! This crate provides the push-notification subsystem of the job portal
//! client: enrolling a device for push after sign-in, and reacting to pushes
//! inside the background worker when no page is open.
//!
//! # Architecture
//!
//! ```text
//! sign-in succeeds
//!     ↓
//! enrollment::enroll_after_auth
//!     ↓
//! SubscriptionManager ── PushPlatform (worker, permission, push manager)
//!     ↓                └─ DeviceRegistry (POST /user/add)
//! platform subscription + backend registration
//!
//!            ... later, independently ...
//!
//! push service delivers message
//!     ↓
//! BackgroundNotificationHandler ── WorkerScope (show, focus, open)
//! ```
//!
//! The two halves never call each other; they only share the durable state
//! held by the platform and the backend.
//!
//! # Modules
//!
//! - [`codec`] - base64url key encoding and VAPID key validation
//! - [`permission`] - notification permission gate
//! - [`manager`] - enrollment state machine
//! - [`registry`] - backend device registry client
//! - [`worker`] - push and notification-click handling
//! - [`config`] - configuration loading/saving

pub mod codec;
pub mod config;
pub mod constants;
pub mod enrollment;
pub mod error;
pub mod manager;
pub mod notification;
pub mod permission;
pub mod platform;
pub mod registry;
pub mod subscription;
pub mod worker;

#[cfg(feature = "native")]
pub mod commands;

// Re-export commonly used types
pub use codec::{decode_server_key, encode_key, KeyCodecError, ServerKey};
pub use config::Config;
pub use enrollment::{enroll_after_auth, AuthOutcome};
pub use error::{FailureReason, PlatformError, SubscribeError};
pub use manager::{SubscribeOutcome, SubscriptionManager, SubscriptionState};
pub use notification::{NotificationDefaults, NotificationPayload, NotificationSpec, PayloadError};
pub use permission::{PermissionGate, PermissionState};
pub use platform::{PushPlatform, WorkerLifecycle};
pub use registry::{DeviceRegistry, HttpDeviceRegistry};
pub use subscription::{DeviceRegistration, PushSubscriptionDescriptor, UserIdentity};
pub use worker::{BackgroundNotificationHandler, NotificationClick, WorkerScope};
