//! CLI subcommand implementations for portal-push.
//!
//! Developer and support tooling around the push subsystem. Commands are
//! organized into submodules by concern:
//!
//! - [`key`] - VAPID public key validation
//! - [`register`] - manual device registration against the backend
//! - [`preview`] - render the notification a push payload would produce
//!
//! # Usage
//!
//! Commands are invoked from the main CLI dispatcher:
//!
//! ```ignore
//! use portal_push::commands;
//!
//! commands::key::check(&config.vapid_public_key)?;
//! commands::preview::run(Some(r#"{"title":"Apply"}"#)).await?;
//! ```

pub mod key;
pub mod preview;
pub mod register;
