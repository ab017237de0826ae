// ── Typed event payloads and wire enums ──

use serde::Deserialize;
use strum::{Display, FromRepr};

/// Device lifecycle event carried by `jantteri_event`.
///
/// Decoded from the wire ordinal with [`DeviceEvent::from_repr`]; ordinals
/// outside the known set are rendered as `UNKNOWN(<raw>)` by the codec,
/// never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, FromRepr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(i64)]
pub enum DeviceEvent {
    ActivateRequest = 0,
    Activated = 1,
    Hit = 2,
    DeactivateRequest = 3,
}

/// Commanded target position carried by `jantteri_state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, FromRepr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(i64)]
pub enum TargetState {
    Hidden = 0,
    Raising = 1,
    Raised = 2,
    Lowering = 3,
}

/// `jantteri_event`: one device reported a lifecycle event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceEventPayload {
    pub device_id: u32,
    /// Raw [`DeviceEvent`] ordinal.
    pub event: i64,
    /// Epoch seconds.
    pub timestamp: i64,
    /// Activation delay in seconds, when the server scheduled one.
    #[serde(default)]
    pub delay: Option<f64>,
}

/// `jantteri_state`: the commanded target position changed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetStatePayload {
    /// Raw [`TargetState`] ordinal.
    pub target_state: i64,
}

/// `jantteri_config`: potentiometer and lamp configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetConfigPayload {
    pub active_pot_val: u32,
    pub inactive_pot_val: u32,
    pub color1: u32,
    pub color2: u32,
}

/// `jantteri_hit_debug`: raw hit-sensor timings.
///
/// The per-microphone arrays are optional on the wire; absent arrays decode
/// as empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitDebugPayload {
    #[serde(default)]
    pub hit_count: u32,
    #[serde(default)]
    pub hit_times_left: Vec<f64>,
    #[serde(default)]
    pub hit_times_center: Vec<f64>,
    #[serde(default)]
    pub hit_times_right: Vec<f64>,
}

/// `jantteri_pid_debug`: motion controller sample.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PidDebugPayload {
    pub pos: f64,
    pub spd: f64,
    pub pos_set_point: f64,
}
