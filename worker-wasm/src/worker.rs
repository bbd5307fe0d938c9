//! Service worker side: `push` and `notificationclick` listeners.

use std::rc::Rc;

use async_trait::async_trait;
use js_sys::{Array, Object, Promise, Reflect, Uint8Array};
use portal_push::notification::NotificationSpec;
use portal_push::worker::{NotificationClick, WorkerScope};
use portal_push::{BackgroundNotificationHandler, PlatformError};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{
    ClientQueryOptions, ExtendableEvent, NotificationEvent, NotificationOptions, PushEvent,
    ServiceWorkerGlobalScope, WindowClient,
};

use crate::platform::{await_promise, js_error};
use crate::WebError;

/// `WorkerScope` backed by the running `ServiceWorkerGlobalScope`.
#[derive(Debug, Clone)]
pub struct ServiceWorkerScope {
    scope: ServiceWorkerGlobalScope,
}

impl ServiceWorkerScope {
    /// Scope of the worker this module is running in.
    pub fn current() -> Result<Self, WebError> {
        js_sys::global()
            .dyn_into::<ServiceWorkerGlobalScope>()
            .map(|scope| Self { scope })
            .map_err(|_| WebError::NotAWorker)
    }
}

fn notification_options(spec: &NotificationSpec) -> Result<NotificationOptions, PlatformError> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    spec.serialize(&serializer)
        .map(|value| value.unchecked_into::<NotificationOptions>())
        .map_err(|e| PlatformError::new(format!("Failed to build notification options: {e}")))
}

#[async_trait(?Send)]
impl WorkerScope for ServiceWorkerScope {
    async fn show_notification(&self, spec: &NotificationSpec) -> Result<(), PlatformError> {
        let options = notification_options(spec)?;
        let registration = self.scope.registration();
        await_promise(
            "registration.showNotification",
            registration.show_notification_with_options(&spec.title, &options),
        )
        .await?;
        Ok(())
    }

    async fn focus_window(&self, url: &str) -> Result<bool, PlatformError> {
        let query = Object::new();
        Reflect::set(&query, &"type".into(), &"window".into())
            .and_then(|_| Reflect::set(&query, &"includeUncontrolled".into(), &JsValue::TRUE))
            .map_err(|e| js_error("Reflect.set", e))?;
        let query: ClientQueryOptions = query.unchecked_into();

        let clients = JsFuture::from(self.scope.clients().match_all_with_options(&query))
            .await
            .map_err(|e| js_error("clients.matchAll", e))?;

        for client in Array::from(&clients).iter() {
            let Ok(client) = client.dyn_into::<WindowClient>() else {
                continue;
            };
            if client.url() == url {
                await_promise("WindowClient.focus", client.focus()).await?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn open_window(&self, url: &str) -> Result<(), PlatformError> {
        JsFuture::from(self.scope.clients().open_window(url))
            .await
            .map_err(|e| js_error("clients.openWindow", e))?;
        Ok(())
    }
}

/// `NotificationClick` view of a `notificationclick` event.
struct ClickEvent(NotificationEvent);

impl NotificationClick for ClickEvent {
    fn prevent_default(&self) {
        self.0.prevent_default();
    }

    fn action(&self) -> Option<String> {
        Reflect::get(&self.0, &"action".into())
            .ok()
            .and_then(|action| action.as_string())
            .filter(|action| !action.is_empty())
    }

    fn data(&self) -> serde_json::Value {
        serde_wasm_bindgen::from_value(self.0.notification().data()).unwrap_or_default()
    }

    fn close(&self) {
        self.0.notification().close();
    }
}

fn keep_alive(event: &ExtendableEvent, promise: &Promise) {
    if let Err(e) = event.wait_until(promise) {
        log::error!("[Worker] {}", js_error("event.waitUntil", e));
    }
}

fn reject(err: PlatformError) -> JsValue {
    WebError::from(err).into()
}

/// Register the `push` and `notificationclick` listeners on the worker's
/// global scope.
///
/// Must run during the worker script's first evaluation; the browser ignores
/// listeners added later.
#[wasm_bindgen(js_name = "installWorkerHandlers")]
pub fn install_worker_handlers() -> Result<(), JsValue> {
    let scope = ServiceWorkerScope::current()?;
    let handler = Rc::new(BackgroundNotificationHandler::default());

    let on_push = {
        let scope = scope.clone();
        let handler = Rc::clone(&handler);
        Closure::<dyn FnMut(PushEvent)>::new(move |event: PushEvent| {
            let data = event
                .data()
                .map(|data| Uint8Array::new(&data.array_buffer()).to_vec());
            let scope = scope.clone();
            let handler = Rc::clone(&handler);
            let promise = future_to_promise(async move {
                handler
                    .on_push(&scope, data.as_deref())
                    .await
                    .map_err(reject)?;
                Ok(JsValue::UNDEFINED)
            });
            keep_alive(&event, &promise);
        })
    };

    let on_click = {
        let scope = scope.clone();
        let handler = Rc::clone(&handler);
        Closure::<dyn FnMut(NotificationEvent)>::new(move |event: NotificationEvent| {
            let click = ClickEvent(event.clone());
            let scope = scope.clone();
            let handler = Rc::clone(&handler);
            let promise = future_to_promise(async move {
                let url = handler
                    .on_notification_click(&scope, &click)
                    .await
                    .map_err(reject)?;
                Ok(JsValue::from_str(&url))
            });
            keep_alive(&event, &promise);
        })
    };

    scope
        .scope
        .add_event_listener_with_callback("push", on_push.as_ref().unchecked_ref())?;
    scope
        .scope
        .add_event_listener_with_callback("notificationclick", on_click.as_ref().unchecked_ref())?;

    // Listeners live as long as the worker
    on_push.forget();
    on_click.forget();

    log::info!("[Worker] Push handlers installed");
    Ok(())
}
