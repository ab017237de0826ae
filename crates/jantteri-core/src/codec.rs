// ── Message codec ──
//
// Pure formatting of inbound payloads into display strings, one function
// per event kind. Dispatch is a total mapping from channel tag to decoder:
// malformed payloads on a known channel degrade to a raw-JSON rendering,
// unknown ordinals render as UNKNOWN(<raw>). Nothing here fails, performs
// I/O, or holds state.

use serde_json::Value;

use crate::model::{
    DeviceEvent, DeviceEventPayload, HitDebugPayload, PidDebugPayload, TargetConfigPayload,
    TargetState, TargetStatePayload,
};

// ── Channel dispatch ─────────────────────────────────────────────────

/// The fixed set of named channels a session listens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// `jantteri_event` -- device lifecycle events.
    Event,
    /// `jantteri_state` -- commanded target position.
    State,
    /// `jantteri_config` -- potentiometer/lamp configuration.
    Config,
    /// `jantteri_hit_debug` -- raw hit-sensor timings.
    HitDebug,
    /// `jantteri_pid_debug` -- motion controller samples.
    PidDebug,
    /// `console_output` -- script output from the game engine.
    ConsoleOutput,
    /// `error` -- server-side failure reports.
    Error,
    /// `status` -- free-form server status messages.
    Status,
    /// `message` -- generic fallback channel, rendered raw.
    Message,
}

impl Channel {
    /// Map a wire event name to its channel, `None` for unbound names.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "jantteri_event" => Some(Self::Event),
            "jantteri_state" => Some(Self::State),
            "jantteri_config" => Some(Self::Config),
            "jantteri_hit_debug" => Some(Self::HitDebug),
            "jantteri_pid_debug" => Some(Self::PidDebug),
            "console_output" => Some(Self::ConsoleOutput),
            "error" => Some(Self::Error),
            "status" => Some(Self::Status),
            "message" => Some(Self::Message),
            _ => None,
        }
    }

    /// Decode a payload into its log entry.
    pub fn decode(self, data: &Value) -> String {
        match self {
            Self::Event => typed(data, format_device_event),
            Self::State => typed(data, format_target_state),
            Self::Config => typed(data, format_target_config),
            Self::HitDebug => typed(data, format_hit_debug),
            Self::PidDebug => typed(data, format_pid_debug),
            Self::ConsoleOutput => format_console_output(data),
            Self::Error => format_server_error(data),
            Self::Status => format_status(data),
            Self::Message => raw_json(data),
        }
    }
}

/// Deserialize into the typed payload and format it, falling back to the
/// raw JSON rendering when the shape does not match.
fn typed<T, F>(data: &Value, format: F) -> String
where
    T: serde::de::DeserializeOwned,
    F: Fn(&T) -> String,
{
    match serde_json::from_value::<T>(data.clone()) {
        Ok(payload) => format(&payload),
        Err(_) => raw_json(data),
    }
}

// ── Typed formatters ─────────────────────────────────────────────────

pub fn format_device_event(payload: &DeviceEventPayload) -> String {
    let event = device_event_label(payload.event);
    let at = format_timestamp(payload.timestamp);
    match payload.delay {
        Some(delay) if delay > 0.0 => {
            format!(
                "Device {}: {event} at {at} (delay {delay:.1}s)",
                payload.device_id
            )
        }
        _ => format!("Device {}: {event} at {at}", payload.device_id),
    }
}

pub fn format_target_state(payload: &TargetStatePayload) -> String {
    format!("Target state: {}", target_state_label(payload.target_state))
}

pub fn format_target_config(payload: &TargetConfigPayload) -> String {
    format!(
        "Config: active pot {}, inactive pot {}, colors #{:06X}/#{:06X}",
        payload.active_pot_val, payload.inactive_pot_val, payload.color1, payload.color2
    )
}

pub fn format_hit_debug(payload: &HitDebugPayload) -> String {
    format!(
        "Hit debug: {} hits (left {:?}, center {:?}, right {:?})",
        payload.hit_count,
        payload.hit_times_left,
        payload.hit_times_center,
        payload.hit_times_right
    )
}

pub fn format_pid_debug(payload: &PidDebugPayload) -> String {
    format!(
        "PID: pos {:.2}, spd {:.2}, setpoint {:.2}",
        payload.pos, payload.spd, payload.pos_set_point
    )
}

// ── Untyped formatters ───────────────────────────────────────────────

/// `Status: <message>`, or raw JSON when the message field is missing.
fn format_status(data: &Value) -> String {
    match data.get("message").and_then(Value::as_str) {
        Some(message) => format!("Status: {message}"),
        None => raw_json(data),
    }
}

/// `Error: <message>`, or raw JSON when the message field is missing.
fn format_server_error(data: &Value) -> String {
    match data.get("message").and_then(Value::as_str) {
        Some(message) => format!("Error: {message}"),
        None => raw_json(data),
    }
}

/// The message text alone; payloads without one render raw.
fn format_console_output(data: &Value) -> String {
    match data.get("message").and_then(Value::as_str) {
        Some(message) => message.to_owned(),
        None => raw_json(data),
    }
}

// ── Shared helpers ───────────────────────────────────────────────────

/// Ordinal → enum name, `UNKNOWN(<raw>)` for out-of-range values.
pub fn device_event_label(ordinal: i64) -> String {
    DeviceEvent::from_repr(ordinal)
        .map_or_else(|| format!("UNKNOWN({ordinal})"), |event| event.to_string())
}

/// Ordinal → enum name, `UNKNOWN(<raw>)` for out-of-range values.
pub fn target_state_label(ordinal: i64) -> String {
    TargetState::from_repr(ordinal)
        .map_or_else(|| format!("UNKNOWN({ordinal})"), |state| state.to_string())
}

/// Epoch seconds as a UTC date-time; unrepresentable values render raw.
fn format_timestamp(epoch_secs: i64) -> String {
    chrono::DateTime::from_timestamp(epoch_secs, 0).map_or_else(
        || epoch_secs.to_string(),
        |at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

fn raw_json(data: &Value) -> String {
    data.to_string()
}

// ── Tests ────────────────────────────────────────────────────────────
