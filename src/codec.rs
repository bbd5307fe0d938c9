//! Key material encoding for push subscriptions.
//!
//! The platform hands out subscription keys as raw byte buffers and expects
//! the VAPID `applicationServerKey` as bytes, while both the backend call and
//! the configured server key travel as text. Everything here uses base64url
//! without padding so the backend can decode it with any standard library.

// Rust guideline compliant 2026-02

use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64URL, Engine};
use thiserror::Error;

/// Length of an uncompressed SEC1 P-256 point.
const UNCOMPRESSED_POINT_LEN: usize = 65;

/// Errors produced while decoding key text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyCodecError {
    /// Input is not valid base64url.
    #[error("invalid base64url key: {0}")]
    InvalidEncoding(String),
    /// Decoded bytes are not a usable VAPID public key.
    #[error("invalid VAPID public key: {0}")]
    InvalidServerKey(String),
}

/// Encode raw key material as unpadded base64url.
pub fn encode_key(raw: &[u8]) -> String {
    BASE64URL.encode(raw)
}

/// Decode base64url text into bytes.
///
/// Trailing `=` padding is tolerated since some key generators emit it.
pub fn decode_server_key(text: &str) -> Result<Vec<u8>, KeyCodecError> {
    let trimmed = text.trim().trim_end_matches('=');
    BASE64URL
        .decode(trimmed)
        .map_err(|e| KeyCodecError::InvalidEncoding(e.to_string()))
}

/// Validated VAPID public key, ready to be used as `applicationServerKey`.
#[derive(Clone, PartialEq, Eq)]
pub struct ServerKey {
    bytes: Vec<u8>,
}

impl std::fmt::Debug for ServerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ServerKey").field(&self.to_base64url()).finish()
    }
}

impl ServerKey {
    /// Decode and validate a base64url VAPID public key.
    ///
    /// The key must be a 65-byte uncompressed point that lies on P-256.
    pub fn from_base64url(text: &str) -> Result<Self, KeyCodecError> {
        let bytes = decode_server_key(text)?;
        if bytes.len() != UNCOMPRESSED_POINT_LEN || bytes[0] != 0x04 {
            return Err(KeyCodecError::InvalidServerKey(format!(
                "expected 65-byte uncompressed P-256 point, got {} bytes",
                bytes.len()
            )));
        }
        p256::PublicKey::from_sec1_bytes(&bytes)
            .map_err(|e| KeyCodecError::InvalidServerKey(format!("not a P-256 point: {e}")))?;
        Ok(Self { bytes })
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Canonical base64url form (no padding).
    pub fn to_base64url(&self) -> String {
        encode_key(&self.bytes)
    }
}
