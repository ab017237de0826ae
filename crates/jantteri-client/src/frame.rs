// ── Wire frame envelope ──
//
// Every message on the channel is one JSON text frame with the shape
// `{"event": "<name>", "data": <payload>}`. The event name selects the
// channel (e.g. `jantteri_event`, `console_output`); the payload is an
// arbitrary JSON value owned by that channel.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// A named event frame, inbound or outbound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Channel name, e.g. `"jantteri_state"` or `"join_game"`.
    pub event: String,

    /// Channel-specific JSON payload. Missing on the wire decodes as `null`.
    #[serde(default)]
    pub data: Value,
}

impl Frame {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    /// Parse a text frame into an envelope.
    pub fn decode(text: &str) -> Result<Self, Error> {
        serde_json::from_str(text).map_err(|e| Error::MalformedFrame {
            message: e.to_string(),
            text: text.to_owned(),
        })
    }

    /// Serialize the envelope for the wire.
    pub fn encode(&self) -> Result<String, Error> {
        serde_json::to_string(self).map_err(Error::Encode)
    }
}
