use thiserror::Error;

/// Top-level error type for the `jantteri-client` crate.
///
/// Covers the transport-layer failure modes: the WebSocket connection
/// itself, and frame encoding/decoding. Connection failures surface to
/// socket owners as a status change; the variants here carry the reason
/// for logging and for `jantteri-core` diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    /// WebSocket connection failed or dropped (refused, DNS failure,
    /// bad upgrade, mid-session transport error).
    #[error("WebSocket connection failed: {0}")]
    Connect(String),

    /// An inbound text frame was not a valid named-event envelope.
    #[error("Malformed frame: {message}")]
    MalformedFrame { message: String, text: String },

    /// An outbound frame could not be serialized.
    #[error("Frame encoding failed: {0}")]
    Encode(#[source] serde_json::Error),
}

impl Error {
    /// Returns `true` if this is a transient error worth a fresh `open`.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connect(_))
    }
}
