//! Backend device registry client.
//!
//! The registry persists (user, push subscription) pairs so the backend can
//! later send pushes to this device. The response body is opaque; only the
//! status code matters.

// Rust guideline compliant 2026-02

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use crate::constants;
use crate::subscription::DeviceRegistration;

/// Backend that stores device registrations.
#[async_trait(?Send)]
pub trait DeviceRegistry {
    /// Persist `registration`. Any error means the backend did not store it.
    async fn register_device(&self, registration: &DeviceRegistration) -> Result<()>;
}

/// HTTP implementation talking to `POST <api-root>/user/add`.
#[derive(Debug, Clone)]
pub struct HttpDeviceRegistry {
    client: Client,
    api_root: String,
}

impl HttpDeviceRegistry {
    /// Creates a registry client for `api_root` (e.g. `https://api.example.com/api`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(api_root: impl Into<String>) -> Result<Self> {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(constants::HTTP_REQUEST_TIMEOUT);
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self::with_client(client, api_root))
    }

    /// Creates a registry client with a pre-configured HTTP client.
    pub fn with_client(client: Client, api_root: impl Into<String>) -> Self {
        Self {
            client,
            api_root: api_root.into(),
        }
    }

    /// Full URL of the registration endpoint.
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}{}",
            self.api_root.trim_end_matches('/'),
            constants::DEVICE_REGISTRATION_PATH
        )
    }
}

#[async_trait(?Send)]
impl DeviceRegistry for HttpDeviceRegistry {
    async fn register_device(&self, registration: &DeviceRegistration) -> Result<()> {
        let url = self.endpoint_url();
        let body = registration.to_request();

        log::debug!("[Registry] POST {} for user {}", url, registration.user_id);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Device registration request to {url} failed"))?;

        let status = response.status();
        if status.is_success() {
            log::info!(
                "[Registry] Device registered for user {} (HTTP {})",
                registration.user_id,
                status.as_u16()
            );
            Ok(())
        } else {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("Device registration rejected (HTTP {}): {}", status.as_u16(), text)
        }
    }
}
