//! Background notification handler.
//!
//! Runs inside the browser-managed worker, possibly with no page open. Both
//! reactions are self-contained: all input arrives as event data and nothing
//! is shared between invocations.
//!
//! The host adapter is responsible for keeping the worker alive while the
//! returned futures run (the browser binding passes them to
//! `event.waitUntil`); otherwise the platform may tear the worker down before
//! the notification is shown.

// Rust guideline compliant 2026-02

use async_trait::async_trait;

use crate::error::PlatformError;
use crate::notification::{
    NotificationData, NotificationDefaults, NotificationPayload, NotificationSpec,
};

/// Worker-side platform APIs.
#[async_trait(?Send)]
pub trait WorkerScope {
    /// Display `spec` and resolve once the platform has shown it.
    async fn show_notification(&self, spec: &NotificationSpec) -> Result<(), PlatformError>;

    /// Focus an already open window at `url`. Returns `false` if none exists.
    async fn focus_window(&self, url: &str) -> Result<bool, PlatformError>;

    /// Open a new window at `url`.
    async fn open_window(&self, url: &str) -> Result<(), PlatformError>;
}

/// A `notificationclick` event.
pub trait NotificationClick {
    /// Suppress the platform's default click behavior.
    fn prevent_default(&self);

    /// Action button that was clicked, `None` for the notification body.
    fn action(&self) -> Option<String>;

    /// Data attached when the notification was created.
    fn data(&self) -> serde_json::Value;

    /// Dismiss the notification.
    fn close(&self);
}

/// Reacts to push and notification-click events.
#[derive(Debug, Clone, Default)]
pub struct BackgroundNotificationHandler {
    defaults: NotificationDefaults,
}

impl BackgroundNotificationHandler {
    /// Handler with custom fallback content.
    pub fn new(defaults: NotificationDefaults) -> Self {
        Self { defaults }
    }

    /// Fallback content in use.
    pub fn defaults(&self) -> &NotificationDefaults {
        &self.defaults
    }

    /// Build the notification for raw push `data`.
    ///
    /// Never fails: unreadable payloads fall back to the default content.
    pub fn notification_for(&self, data: Option<&[u8]>) -> NotificationSpec {
        let payload = match NotificationPayload::parse(data) {
            Ok(payload) => payload,
            Err(e) => {
                log::warn!("[Worker] {}, using default notification content", e);
                NotificationPayload::default()
            }
        };
        NotificationSpec::from_payload(&payload, &self.defaults)
    }

    /// Handle a `push` event carrying `data`.
    ///
    /// Shows the notification built from the payload. If the platform refuses
    /// it, one more attempt is made with a plain notification (no icons or
    /// actions) so the user still sees something.
    pub async fn on_push<S: WorkerScope + ?Sized>(
        &self,
        scope: &S,
        data: Option<&[u8]>,
    ) -> Result<NotificationSpec, PlatformError> {
        let spec = self.notification_for(data);

        match scope.show_notification(&spec).await {
            Ok(()) => {
                log::debug!("[Worker] Notification shown: {}", spec.title);
                Ok(spec)
            }
            Err(e) => {
                log::warn!("[Worker] Failed to show notification ({}), retrying plain", e);
                let plain = spec.plain();
                scope.show_notification(&plain).await?;
                Ok(plain)
            }
        }
    }

    /// Handle a `notificationclick` event.
    ///
    /// Focuses or opens a window at the notification's target URL. The
    /// notification is closed exactly once, whether or not that worked.
    pub async fn on_notification_click<S, C>(
        &self,
        scope: &S,
        event: &C,
    ) -> Result<String, PlatformError>
    where
        S: WorkerScope + ?Sized,
        C: NotificationClick + ?Sized,
    {
        event.prevent_default();

        let url = NotificationData::target_url(&event.data())
            .unwrap_or_else(|| self.defaults.target_url.clone());
        if let Some(action) = event.action() {
            log::debug!("[Worker] Notification action '{}' clicked", action);
        }

        let result = open_or_focus(scope, &url).await;
        event.close();

        if let Err(e) = &result {
            log::warn!("[Worker] Could not open {}: {}", url, e);
        }
        result.map(|()| url)
    }
}

async fn open_or_focus<S: WorkerScope + ?Sized>(scope: &S, url: &str) -> Result<(), PlatformError> {
    match scope.focus_window(url).await {
        Ok(true) => return Ok(()),
        Ok(false) => {}
        Err(e) => log::debug!("[Worker] Window lookup failed ({}), opening a new one", e),
    }
    scope.open_window(url).await
}
