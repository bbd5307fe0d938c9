//! Inbound push payloads and the notifications built from them.
//!
//! Payloads come from whatever backend job sends the push, so nothing about
//! their shape is trusted: every field is optional, empty strings count as
//! missing, and a body that is not JSON at all still yields a notification.

// Rust guideline compliant 2026-02

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants;

/// Why a push body could not be read as a [`NotificationPayload`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PayloadError {
    /// The push carried no data.
    #[error("push event carried no data")]
    Empty,
    /// The data was not a JSON object with the expected fields.
    #[error("push payload is not valid JSON: {0}")]
    Malformed(String),
}

/// Body of a push message as sent by the backend.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    /// Notification title.
    #[serde(default)]
    pub title: Option<String>,
    /// Notification body text.
    #[serde(default)]
    pub body: Option<String>,
    /// Page to open on click.
    #[serde(default)]
    pub url: Option<String>,
}

impl NotificationPayload {
    /// Parse raw push data.
    ///
    /// Fields are read one by one: a field of the wrong type is treated as
    /// missing without discarding the others. Only data that is not a JSON
    /// object is rejected as a whole.
    pub fn parse(data: Option<&[u8]>) -> Result<Self, PayloadError> {
        let bytes = match data {
            Some(bytes) if !bytes.iter().all(u8::is_ascii_whitespace) => bytes,
            _ => return Err(PayloadError::Empty),
        };
        let value: serde_json::Value =
            serde_json::from_slice(bytes).map_err(|e| PayloadError::Malformed(e.to_string()))?;
        let object = value.as_object().ok_or_else(|| {
            PayloadError::Malformed(format!("expected a JSON object, got {value}"))
        })?;

        let field = |name: &str| {
            let value = object.get(name)?;
            if !value.is_string() && !value.is_null() {
                log::debug!("[Worker] Ignoring push field '{}' of unexpected type", name);
            }
            value.as_str().map(str::to_string)
        };

        Ok(Self {
            title: field("title"),
            body: field("body"),
            url: field("url"),
        })
    }
}

/// Data attached to a displayed notification and read back on click.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationData {
    /// Page to open on click.
    pub url: String,
}

impl NotificationData {
    /// Extract the click target from notification data, if present.
    pub fn target_url(data: &serde_json::Value) -> Option<String> {
        data.get("url")
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
    }
}

/// A button on the notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    /// Identifier reported back on click.
    pub action: String,
    /// Button label.
    pub title: String,
    /// Button icon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Everything needed to display one notification.
///
/// Serializes to the shape of the browser's `NotificationOptions` (plus the
/// title), so the browser binding can hand it over as-is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSpec {
    /// Title line.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Large icon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Status-bar badge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    /// Action buttons.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<NotificationAction>,
    /// Data read back by the click handler.
    pub data: NotificationData,
}

/// Content used when a push leaves fields out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationDefaults {
    /// Fallback title.
    pub title: String,
    /// Fallback body.
    pub body: String,
    /// Fallback click target.
    pub target_url: String,
}

impl Default for NotificationDefaults {
    fn default() -> Self {
        Self {
            title: constants::FALLBACK_TITLE.to_string(),
            body: constants::FALLBACK_BODY.to_string(),
            target_url: constants::FALLBACK_TARGET_URL.to_string(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl NotificationSpec {
    /// Full notification for `payload`: icon, badge, the "Apply" action and
    /// the click target.
    pub fn from_payload(payload: &NotificationPayload, defaults: &NotificationDefaults) -> Self {
        let title = non_empty(payload.title.as_deref()).unwrap_or(&defaults.title);
        let body = non_empty(payload.body.as_deref()).unwrap_or(&defaults.body);
        let url = non_empty(payload.url.as_deref()).unwrap_or(&defaults.target_url);

        Self {
            title: title.to_string(),
            body: body.to_string(),
            icon: Some(constants::NOTIFICATION_ICON.to_string()),
            badge: Some(constants::NOTIFICATION_BADGE.to_string()),
            actions: vec![NotificationAction {
                action: constants::OPEN_URL_ACTION.to_string(),
                title: constants::OPEN_URL_ACTION_TITLE.to_string(),
                icon: Some(constants::OPEN_URL_ACTION_ICON.to_string()),
            }],
            data: NotificationData {
                url: url.to_string(),
            },
        }
    }

    /// Stripped-down notification used when the full one could not be shown.
    ///
    /// Keeps title, body and click target; drops assets and actions.
    pub fn plain(&self) -> Self {
        Self {
            title: self.title.clone(),
            body: self.body.clone(),
            icon: None,
            badge: None,
            actions: Vec::new(),
            data: self.data.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_payload() {
        let payload = NotificationPayload::parse(Some(
            br#"{"title":"Apply","body":"New role","url":"https://x/y"}"#,
        ))
        .unwrap();
        assert_eq!(payload.title.as_deref(), Some("Apply"));
        assert_eq!(payload.body.as_deref(), Some("New role"));
        assert_eq!(payload.url.as_deref(), Some("https://x/y"));
    }

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let payload = NotificationPayload::parse(Some(br#"{"title":"Hi","tag":"x"}"#)).unwrap();
        assert_eq!(payload.title.as_deref(), Some("Hi"));
        assert!(payload.url.is_none());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(NotificationPayload::parse(None), Err(PayloadError::Empty));
        assert_eq!(NotificationPayload::parse(Some(b"  ")), Err(PayloadError::Empty));
        assert!(matches!(
            NotificationPayload::parse(Some(b"hello")),
            Err(PayloadError::Malformed(_))
        ));
        assert!(matches!(
            NotificationPayload::parse(Some(b"[1,2]")),
            Err(PayloadError::Malformed(_))
        ));
        assert!(matches!(
            NotificationPayload::parse(Some(b"\"just a string\"")),
            Err(PayloadError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_keeps_valid_fields_next_to_mistyped_ones() {
        let payload =
            NotificationPayload::parse(Some(br#"{"title":"Apply","body":null,"url":42}"#)).unwrap();
        assert_eq!(payload.title.as_deref(), Some("Apply"));
        assert!(payload.body.is_none());
        assert!(payload.url.is_none());
    }

    #[test]
    fn test_spec_uses_fallbacks_for_missing_and_empty_fields() {
        let payload = NotificationPayload {
            title: Some(String::new()),
            body: None,
            url: Some("   ".to_string()),
        };
        let spec = NotificationSpec::from_payload(&payload, &NotificationDefaults::default());

        assert_eq!(spec.title, "New Notification");
        assert_eq!(spec.body, "Click the button below to visit the site.");
        assert_eq!(spec.data.url, "https://www.aws.com");
    }

    #[test]
    fn test_spec_carries_assets_and_single_action() {
        let payload = NotificationPayload {
            title: Some("Apply".to_string()),
            body: None,
            url: Some("https://x/y".to_string()),
        };
        let spec = NotificationSpec::from_payload(&payload, &NotificationDefaults::default());

        assert_eq!(spec.title, "Apply");
        assert_eq!(spec.icon.as_deref(), Some("/images/icon.png"));
        assert_eq!(spec.badge.as_deref(), Some("/images/badge.png"));
        assert_eq!(spec.actions.len(), 1);
        assert_eq!(spec.actions[0].action, "open-url");
        assert_eq!(spec.data.url, "https://x/y");

        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["data"]["url"], "https://x/y");
        assert_eq!(json["actions"][0]["title"], "Apply");
    }

    #[test]
    fn test_plain_keeps_target() {
        let spec = NotificationSpec::from_payload(
            &NotificationPayload::default(),
            &NotificationDefaults::default(),
        );
        let plain = spec.plain();
        assert!(plain.actions.is_empty());
        assert!(plain.icon.is_none());
        assert_eq!(plain.data, spec.data);
        assert_eq!(plain.title, spec.title);
    }

    #[test]
    fn test_target_url_from_data() {
        let data = serde_json::json!({"url": "https://x/y"});
        assert_eq!(NotificationData::target_url(&data).as_deref(), Some("https://x/y"));
        assert_eq!(NotificationData::target_url(&serde_json::json!({})), None);
        assert_eq!(NotificationData::target_url(&serde_json::Value::Null), None);
        assert_eq!(NotificationData::target_url(&serde_json::json!({"url": 3})), None);
    }
}
