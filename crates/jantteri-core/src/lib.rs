// jantteri-core: Reactive session layer between jantteri-client and consumers.

pub mod codec;
pub mod config;
pub mod error;
pub mod model;
pub mod session;
pub mod store;
pub mod stream;
pub mod subscription;

// ── Primary re-exports ──────────────────────────────────────────────
pub use codec::Channel;
pub use config::SessionTarget;
pub use error::CoreError;
pub use session::{ConnectionStatus, Session};
pub use store::MessageLog;
pub use stream::LogStream;
pub use subscription::SubscriptionManager;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    DeviceEvent, DeviceEventPayload, HitDebugPayload, PidDebugPayload, TargetConfigPayload,
    TargetState, TargetStatePayload,
};
