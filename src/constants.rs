//! Application-wide constants for portal-push.
//!
//! Centralizes fixed paths, fallback notification content and network
//! settings. Constants are grouped by the side of the system that uses them.
//!
//! # Categories
//!
//! - **Enrollment**: worker script location, backend endpoint, defaults
//! - **Notification**: fallback content and assets shown by the worker
//! - **Network**: HTTP client settings

use std::time::Duration;

// ============================================================================
// Enrollment
// ============================================================================

/// Location of the background worker script.
///
/// Served from the site root so the registration scope covers every page.
pub const WORKER_SCRIPT_PATH: &str = "/service-worker.js";

/// Registration scope requested for the background worker.
pub const WORKER_SCOPE: &str = "/";

/// Default API root for the device registry.
pub const DEFAULT_API_ROOT: &str = "http://localhost:3000/api";

/// Path (relative to the API root) of the device-registration endpoint.
pub const DEVICE_REGISTRATION_PATH: &str = "/user/add";

/// VAPID public key used when no other key is configured.
///
/// Uncompressed P-256 point, base64url without padding.
pub const DEFAULT_VAPID_PUBLIC_KEY: &str =
    "BGWNHwBlYOAdOHlSx7HjEmRUAFcF7Wp4Vj2sl9z2ge9XElwPdiz9XTg81yF-s2Q2iO6fimv3TU4HS88J_oJNsbY";

// ============================================================================
// Notification
// ============================================================================

/// Title shown when a push carries no usable title.
pub const FALLBACK_TITLE: &str = "New Notification";

/// Body shown when a push carries no usable body.
pub const FALLBACK_BODY: &str = "Click the button below to visit the site.";

/// Click target used when a push carries no URL.
pub const FALLBACK_TARGET_URL: &str = "https://www.aws.com";

/// Notification icon.
pub const NOTIFICATION_ICON: &str = "/images/icon.png";

/// Monochrome badge shown in the status bar on platforms that support it.
pub const NOTIFICATION_BADGE: &str = "/images/badge.png";

/// Identifier of the single notification action.
pub const OPEN_URL_ACTION: &str = "open-url";

/// Label of the single notification action.
pub const OPEN_URL_ACTION_TITLE: &str = "Apply";

/// Icon of the single notification action.
pub const OPEN_URL_ACTION_ICON: &str = "/images/visit-icon.png";

// ============================================================================
// Network
// ============================================================================

/// HTTP request timeout for device-registry calls.
///
/// Only applied on native targets; the browser's fetch has its own limits.
pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
