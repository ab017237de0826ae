// ── Core error types ──
//
// Consumer-facing errors from jantteri-core. The `From<jantteri_client::Error>`
// impl translates transport-layer errors into domain-appropriate variants so
// consumers never see WebSocket internals directly.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl From<jantteri_client::Error> for CoreError {
    fn from(err: jantteri_client::Error) -> Self {
        match err {
            jantteri_client::Error::Connect(reason) => Self::ConnectionFailed {
                url: String::new(),
                reason,
            },
            other => Self::Transport {
                message: other.to_string(),
            },
        }
    }
}
