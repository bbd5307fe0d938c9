//! Push payload preview.
//!
//! Runs the background notification handler against a console scope and
//! prints the notification the browser would show, so payloads can be
//! checked before a backend job sends them.
//!
//! ```bash
//! portal-push preview-push '{"title":"Apply","url":"https://jobs.example.com/1"}'
//! portal-push preview-push 'not json'   # shows the fallback notification
//! ```

// Rust guideline compliant 2026-02

use anyhow::Result;
use async_trait::async_trait;
use std::cell::RefCell;

use crate::error::PlatformError;
use crate::notification::NotificationSpec;
use crate::worker::{BackgroundNotificationHandler, WorkerScope};

/// Worker scope that records notifications instead of displaying them.
#[derive(Debug, Default)]
pub struct ConsoleScope {
    shown: RefCell<Vec<NotificationSpec>>,
}

impl ConsoleScope {
    /// Notifications "shown" so far.
    pub fn shown(&self) -> Vec<NotificationSpec> {
        self.shown.borrow().clone()
    }
}

#[async_trait(?Send)]
impl WorkerScope for ConsoleScope {
    async fn show_notification(&self, spec: &NotificationSpec) -> Result<(), PlatformError> {
        self.shown.borrow_mut().push(spec.clone());
        Ok(())
    }

    async fn focus_window(&self, _url: &str) -> Result<bool, PlatformError> {
        Ok(false)
    }

    async fn open_window(&self, url: &str) -> Result<(), PlatformError> {
        println!("Would open {url}");
        Ok(())
    }
}

/// Builds and prints the notification for `payload`.
///
/// # Errors
///
/// Returns an error only if the notification cannot be serialized.
pub async fn run(payload: Option<&str>) -> Result<NotificationSpec> {
    let scope = ConsoleScope::default();
    let handler = BackgroundNotificationHandler::default();

    let spec = handler
        .on_push(&scope, payload.map(str::as_bytes))
        .await
        .map_err(|e| anyhow::anyhow!("Preview failed: {e}"))?;

    println!("{}", serde_json::to_string_pretty(&spec)?);
    Ok(spec)
}
