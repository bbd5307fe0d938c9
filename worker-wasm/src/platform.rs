//! `PushPlatform` on top of the page's `navigator.serviceWorker`,
//! `Notification` and `PushManager` APIs.

use async_trait::async_trait;
use js_sys::{Object, Promise, Reflect, Uint8Array};
use portal_push::platform::{PushPlatform, WorkerLifecycle};
use portal_push::subscription::{PushSubscriptionDescriptor, SubscribeOptions};
use portal_push::{PermissionState, PlatformError};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Notification, NotificationPermission, PushEncryptionKeyName, PushManager, PushSubscription,
    PushSubscriptionOptionsInit, RegistrationOptions, ServiceWorkerRegistration, Window,
};

use crate::WebError;

/// Browser implementation of the page-side platform seam.
#[derive(Debug, Clone)]
pub struct WebPushPlatform {
    window: Window,
}

impl WebPushPlatform {
    /// Platform bound to the current window.
    pub fn new() -> Result<Self, WebError> {
        web_sys::window()
            .map(|window| Self { window })
            .ok_or(WebError::NoWindow)
    }

    fn push_manager(
        registration: &ServiceWorkerRegistration,
    ) -> Result<PushManager, PlatformError> {
        registration
            .push_manager()
            .map_err(|e| js_error("registration.pushManager", e))
    }
}

fn has_property(target: &JsValue, name: &str) -> bool {
    Reflect::has(target, &JsValue::from_str(name)).unwrap_or(false)
}

/// Render a rejected promise or thrown value as a [`PlatformError`].
pub(crate) fn js_error(operation: &str, err: JsValue) -> PlatformError {
    let detail = err
        .as_string()
        .or_else(|| err.dyn_ref::<js_sys::Error>().map(|e| String::from(e.message())))
        .unwrap_or_else(|| format!("{err:?}"));
    PlatformError::new(format!("{operation} failed: {detail}"))
}

/// Await a promise returned by a throwing browser API.
pub(crate) async fn await_promise(
    operation: &str,
    promise: Result<Promise, JsValue>,
) -> Result<JsValue, PlatformError> {
    let promise = promise.map_err(|e| js_error(operation, e))?;
    JsFuture::from(promise)
        .await
        .map_err(|e| js_error(operation, e))
}

fn key_bytes(
    subscription: &PushSubscription,
    name: PushEncryptionKeyName,
) -> Result<Vec<u8>, PlatformError> {
    let buffer = subscription
        .get_key(name)
        .map_err(|e| js_error("PushSubscription.getKey", e))?;
    Ok(buffer.map(|b| Uint8Array::new(&b).to_vec()).unwrap_or_default())
}

fn descriptor(
    subscription: &PushSubscription,
) -> Result<PushSubscriptionDescriptor, PlatformError> {
    // Not every browser exposes `options.applicationServerKey`
    let application_server_key = Reflect::get(subscription, &"options".into())
        .and_then(|options| Reflect::get(&options, &"applicationServerKey".into()))
        .ok()
        .filter(|key| !key.is_null() && !key.is_undefined())
        .map(|key| Uint8Array::new(&key).to_vec());

    Ok(PushSubscriptionDescriptor {
        endpoint: subscription.endpoint(),
        p256dh: key_bytes(subscription, PushEncryptionKeyName::P256dh)?,
        auth: key_bytes(subscription, PushEncryptionKeyName::Auth)?,
        application_server_key,
    })
}

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), PlatformError> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(|e| js_error("Reflect.set", e))
}

#[async_trait(?Send)]
impl PushPlatform for WebPushPlatform {
    type Registration = ServiceWorkerRegistration;

    fn supports_service_worker(&self) -> bool {
        has_property(&self.window.navigator(), "serviceWorker")
    }

    fn supports_push(&self) -> bool {
        has_property(&self.window, "PushManager")
    }

    async fn register_worker(
        &self,
        script_url: &str,
        scope: &str,
    ) -> Result<ServiceWorkerRegistration, PlatformError> {
        let container = self.window.navigator().service_worker();
        let options = RegistrationOptions::new();
        options.set_scope(scope);

        let registration = JsFuture::from(container.register_with_options(script_url, &options))
            .await
            .map_err(|e| js_error("serviceWorker.register", e))?;
        registration
            .dyn_into::<ServiceWorkerRegistration>()
            .map_err(|_| PlatformError::new("Unexpected return value from serviceWorker.register"))
    }

    fn worker_lifecycle(&self, registration: &ServiceWorkerRegistration) -> WorkerLifecycle {
        if registration.active().is_some() {
            WorkerLifecycle::Active
        } else if registration.waiting().is_some() {
            WorkerLifecycle::Waiting
        } else {
            WorkerLifecycle::Installing
        }
    }

    fn permission_state(&self) -> PermissionState {
        match Notification::permission() {
            NotificationPermission::Granted => PermissionState::Granted,
            NotificationPermission::Denied => PermissionState::Denied,
            _ => PermissionState::Default,
        }
    }

    async fn request_permission(&self) -> Result<PermissionState, PlatformError> {
        let answer =
            await_promise("Notification.requestPermission", Notification::request_permission())
                .await?;
        Ok(answer
            .as_string()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default())
    }

    async fn get_subscription(
        &self,
        registration: &ServiceWorkerRegistration,
    ) -> Result<Option<PushSubscriptionDescriptor>, PlatformError> {
        let manager = Self::push_manager(registration)?;
        let value = await_promise("pushManager.getSubscription", manager.get_subscription()).await?;
        if value.is_null() || value.is_undefined() {
            return Ok(None);
        }
        let subscription: PushSubscription = value
            .dyn_into()
            .map_err(|_| PlatformError::new("Unexpected return value from getSubscription"))?;
        descriptor(&subscription).map(Some)
    }

    async fn subscribe(
        &self,
        registration: &ServiceWorkerRegistration,
        options: &SubscribeOptions,
    ) -> Result<PushSubscriptionDescriptor, PlatformError> {
        let init = Object::new();
        set(&init, "userVisibleOnly", &JsValue::from_bool(options.user_visible_only()))?;
        set(
            &init,
            "applicationServerKey",
            &Uint8Array::from(options.application_server_key().as_bytes()),
        )?;
        let init: PushSubscriptionOptionsInit = init.unchecked_into();

        let manager = Self::push_manager(registration)?;
        let value =
            await_promise("pushManager.subscribe", manager.subscribe_with_options(&init)).await?;
        let subscription: PushSubscription = value
            .dyn_into()
            .map_err(|_| PlatformError::new("Unexpected return value from pushManager.subscribe"))?;
        descriptor(&subscription)
    }

    async fn unsubscribe(
        &self,
        registration: &ServiceWorkerRegistration,
    ) -> Result<bool, PlatformError> {
        let manager = Self::push_manager(registration)?;
        let value = await_promise("pushManager.getSubscription", manager.get_subscription()).await?;
        let Ok(subscription) = value.dyn_into::<PushSubscription>() else {
            return Ok(false);
        };
        let removed =
            await_promise("PushSubscription.unsubscribe", subscription.unsubscribe()).await?;
        Ok(removed.as_bool().unwrap_or(false))
    }
}
