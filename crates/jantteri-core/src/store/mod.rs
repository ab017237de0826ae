// ── Reactive message log store ──
//
// Append-only ordered storage with push-based change notification.

mod message_log;

pub use message_log::MessageLog;
