// ── Typed telemetry model ──
//
// Canonical representations of the payloads the controller emits on its
// named channels. Field names mirror the wire (camelCase protobuf JSON).

pub mod event;

pub use event::{
    DeviceEvent, DeviceEventPayload, HitDebugPayload, PidDebugPayload, TargetConfigPayload,
    TargetState, TargetStatePayload,
};
