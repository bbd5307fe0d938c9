//! In-memory doubles for the platform, registry and worker seams.
//!
//! Every double counts the calls made into it so tests can assert on side
//! effects (prompts, subscription creations, registrations, closes).

#![allow(dead_code, reason = "each test binary uses a subset of the fakes")]

use std::cell::{Cell, RefCell};

use async_trait::async_trait;
use portal_push::codec::ServerKey;
use portal_push::constants::DEFAULT_VAPID_PUBLIC_KEY;
use portal_push::error::PlatformError;
use portal_push::notification::NotificationSpec;
use portal_push::platform::{PushPlatform, WorkerLifecycle};
use portal_push::registry::DeviceRegistry;
use portal_push::subscription::{
    DeviceRegistration, PushSubscriptionDescriptor, SubscribeOptions, UserIdentity,
};
use portal_push::worker::{NotificationClick, WorkerScope};

pub fn server_key() -> ServerKey {
    ServerKey::from_base64url(DEFAULT_VAPID_PUBLIC_KEY).expect("default key is valid")
}

pub fn identity() -> UserIdentity {
    UserIdentity::new("user-42", "Ada", "ada@example.com")
}

// ============================================================================
// Page-side platform
// ============================================================================

/// Counts of calls into [`FakePlatform`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PlatformCalls {
    pub register_worker: usize,
    pub prompts: usize,
    pub get_subscription: usize,
    pub subscribe: usize,
    pub unsubscribe: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeRegistration {
    pub script: String,
    pub scope: String,
}

#[derive(Debug)]
pub struct FakePlatform {
    pub service_worker: bool,
    pub push: bool,
    pub lifecycle: WorkerLifecycle,
    pub permission: Cell<portal_push::PermissionState>,
    pub prompt_answer: portal_push::PermissionState,
    pub fail_worker: bool,
    pub fail_subscribe: Cell<bool>,
    pub empty_keys: bool,
    pub subscription: RefCell<Option<PushSubscriptionDescriptor>>,
    pub last_options: RefCell<Option<SubscribeOptions>>,
    pub last_registration: RefCell<Option<FakeRegistration>>,
    pub calls: RefCell<PlatformCalls>,
}

impl FakePlatform {
    /// Supported platform where permission was already granted.
    pub fn granted() -> Self {
        Self::with_permission(
            portal_push::PermissionState::Granted,
            portal_push::PermissionState::Granted,
        )
    }

    /// Supported platform with `current` permission; a prompt answers `answer`.
    pub fn with_permission(
        current: portal_push::PermissionState,
        answer: portal_push::PermissionState,
    ) -> Self {
        Self {
            service_worker: true,
            push: true,
            lifecycle: WorkerLifecycle::Active,
            permission: Cell::new(current),
            prompt_answer: answer,
            fail_worker: false,
            fail_subscribe: Cell::new(false),
            empty_keys: false,
            subscription: RefCell::new(None),
            last_options: RefCell::new(None),
            last_registration: RefCell::new(None),
            calls: RefCell::new(PlatformCalls::default()),
        }
    }

    pub fn calls(&self) -> PlatformCalls {
        self.calls.borrow().clone()
    }

    /// Simulates the user clearing site data.
    pub fn revoke_subscription(&self) {
        self.subscription.borrow_mut().take();
    }
}

#[async_trait(?Send)]
impl PushPlatform for FakePlatform {
    type Registration = FakeRegistration;

    fn supports_service_worker(&self) -> bool {
        self.service_worker
    }

    fn supports_push(&self) -> bool {
        self.push
    }

    async fn register_worker(
        &self,
        script_url: &str,
        scope: &str,
    ) -> Result<FakeRegistration, PlatformError> {
        self.calls.borrow_mut().register_worker += 1;
        if self.fail_worker {
            return Err(PlatformError::new("script responded with 404"));
        }
        let registration = FakeRegistration {
            script: script_url.to_string(),
            scope: scope.to_string(),
        };
        *self.last_registration.borrow_mut() = Some(registration.clone());
        Ok(registration)
    }

    fn worker_lifecycle(&self, _registration: &FakeRegistration) -> WorkerLifecycle {
        self.lifecycle
    }

    fn permission_state(&self) -> portal_push::PermissionState {
        self.permission.get()
    }

    async fn request_permission(&self) -> Result<portal_push::PermissionState, PlatformError> {
        self.calls.borrow_mut().prompts += 1;
        self.permission.set(self.prompt_answer);
        Ok(self.prompt_answer)
    }

    async fn get_subscription(
        &self,
        _registration: &FakeRegistration,
    ) -> Result<Option<PushSubscriptionDescriptor>, PlatformError> {
        self.calls.borrow_mut().get_subscription += 1;
        Ok(self.subscription.borrow().clone())
    }

    async fn subscribe(
        &self,
        _registration: &FakeRegistration,
        options: &SubscribeOptions,
    ) -> Result<PushSubscriptionDescriptor, PlatformError> {
        let created = {
            let mut calls = self.calls.borrow_mut();
            calls.subscribe += 1;
            calls.subscribe
        };
        if self.fail_subscribe.get() {
            return Err(PlatformError::new("push service refused the subscription"));
        }
        *self.last_options.borrow_mut() = Some(options.clone());

        let (p256dh, auth) = if self.empty_keys {
            (Vec::new(), Vec::new())
        } else {
            (vec![4u8; 65], vec![7u8; 16])
        };
        let subscription = PushSubscriptionDescriptor {
            endpoint: format!("https://push.example.com/sub/{created}"),
            p256dh,
            auth,
            application_server_key: Some(options.application_server_key().as_bytes().to_vec()),
        };
        *self.subscription.borrow_mut() = Some(subscription.clone());
        Ok(subscription)
    }

    async fn unsubscribe(&self, _registration: &FakeRegistration) -> Result<bool, PlatformError> {
        self.calls.borrow_mut().unsubscribe += 1;
        Ok(self.subscription.borrow_mut().take().is_some())
    }
}

// ============================================================================
// Device registry
// ============================================================================

#[derive(Debug, Default)]
pub struct RecordingRegistry {
    pub registrations: RefCell<Vec<DeviceRegistration>>,
    pub attempts: Cell<usize>,
    fail_remaining: Cell<usize>,
}

impl RecordingRegistry {
    /// Registry whose first `n` calls fail.
    pub fn failing(n: usize) -> Self {
        Self {
            fail_remaining: Cell::new(n),
            ..Self::default()
        }
    }

    pub fn registrations(&self) -> Vec<DeviceRegistration> {
        self.registrations.borrow().clone()
    }
}

#[async_trait(?Send)]
impl DeviceRegistry for RecordingRegistry {
    async fn register_device(&self, registration: &DeviceRegistration) -> anyhow::Result<()> {
        self.attempts.set(self.attempts.get() + 1);
        if self.fail_remaining.get() > 0 {
            self.fail_remaining.set(self.fail_remaining.get() - 1);
            anyhow::bail!("Device registration rejected (HTTP 503): unavailable");
        }
        self.registrations.borrow_mut().push(registration.clone());
        Ok(())
    }
}

// ============================================================================
// Worker scope
// ============================================================================

#[derive(Debug, Default)]
pub struct FakeScope {
    pub shown: RefCell<Vec<NotificationSpec>>,
    pub show_attempts: Cell<usize>,
    pub fail_show: Cell<usize>,
    pub open_windows: RefCell<Vec<String>>,
    pub focused: RefCell<Vec<String>>,
    pub window_open_at: RefCell<Option<String>>,
    pub fail_focus: bool,
    pub fail_open: bool,
}

impl FakeScope {
    /// Scope whose first `n` show attempts fail.
    pub fn failing_show(n: usize) -> Self {
        let scope = Self::default();
        scope.fail_show.set(n);
        scope
    }
}

#[async_trait(?Send)]
impl WorkerScope for FakeScope {
    async fn show_notification(&self, spec: &NotificationSpec) -> Result<(), PlatformError> {
        self.show_attempts.set(self.show_attempts.get() + 1);
        if self.fail_show.get() > 0 {
            self.fail_show.set(self.fail_show.get() - 1);
            return Err(PlatformError::new("notification icon could not be loaded"));
        }
        self.shown.borrow_mut().push(spec.clone());
        Ok(())
    }

    async fn focus_window(&self, url: &str) -> Result<bool, PlatformError> {
        if self.fail_focus {
            return Err(PlatformError::new("clients.matchAll failed"));
        }
        if self.window_open_at.borrow().as_deref() == Some(url) {
            self.focused.borrow_mut().push(url.to_string());
            return Ok(true);
        }
        Ok(false)
    }

    async fn open_window(&self, url: &str) -> Result<(), PlatformError> {
        if self.fail_open {
            return Err(PlatformError::new("openWindow rejected"));
        }
        self.open_windows.borrow_mut().push(url.to_string());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct FakeClick {
    pub data: serde_json::Value,
    pub action: Option<String>,
    pub prevented: Cell<usize>,
    pub closed: Cell<usize>,
}

impl FakeClick {
    /// Click on a notification created from `spec`.
    pub fn on(spec: &NotificationSpec) -> Self {
        Self {
            data: serde_json::to_value(&spec.data).expect("notification data serializes"),
            ..Self::default()
        }
    }
}

impl NotificationClick for FakeClick {
    fn prevent_default(&self) {
        self.prevented.set(self.prevented.get() + 1);
    }

    fn action(&self) -> Option<String> {
        self.action.clone()
    }

    fn data(&self) -> serde_json::Value {
        self.data.clone()
    }

    fn close(&self) {
        self.closed.set(self.closed.get() + 1);
    }
}
