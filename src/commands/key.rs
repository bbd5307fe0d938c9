//! VAPID public key validation.
//!
//! ```bash
//! portal-push check-key
//! portal-push check-key --key BGWNHwBl...
//! ```

// Rust guideline compliant 2026-02

use anyhow::{Context, Result};

use crate::codec::ServerKey;

/// Validates `key` and prints a short summary.
///
/// # Errors
///
/// Returns an error if the key is not base64url or not an uncompressed
/// P-256 point.
pub fn check(key: &str) -> Result<ServerKey> {
    let server_key = ServerKey::from_base64url(key).context("VAPID public key is not usable")?;
    println!(
        "VAPID public key OK ({} bytes, uncompressed P-256 point)",
        server_key.as_bytes().len()
    );
    Ok(server_key)
}
