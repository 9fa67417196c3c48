//! Error types for the protocol layer.

/// Errors that can occur while encoding, decoding, or parsing protocol
/// values.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust value into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust value).
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The input parsed as text but doesn't follow protocol rules, e.g. a
    /// control id like `s12:z9`.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
