// ── Append-only message log ──
//
// The current snapshot lives inside a `watch` channel: every mutation
// publishes a fresh `Arc<Vec<_>>`, so reads are wait-free clones and
// subscribers are notified on each change.

use std::sync::Arc;

use tokio::sync::watch;

use crate::stream::LogStream;

type Snapshot = Arc<Vec<Arc<str>>>;

/// Ordered, append-only log of formatted telemetry entries.
///
/// Owned exclusively by one `Session`; entries are appended strictly in
/// frame-arrival order and only removed by [`clear`](Self::clear) on an
/// explicit user action.
pub struct MessageLog {
    snapshot: watch::Sender<Snapshot>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self {
            snapshot: watch::Sender::new(Arc::new(Vec::new())),
        }
    }

    /// Append one entry to the end of the log.
    pub fn append(&self, entry: impl Into<Arc<str>>) {
        let entry = entry.into();
        self.snapshot.send_modify(|snap| {
            Arc::make_mut(snap).push(entry);
        });
    }

    /// Drop every entry. Subscribers observe the empty snapshot.
    pub fn clear(&self) {
        self.snapshot.send_replace(Arc::new(Vec::new()));
    }

    /// Current snapshot of all entries, oldest first.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.snapshot.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.borrow().is_empty()
    }

    /// Subscribe to log changes.
    pub fn subscribe(&self) -> LogStream {
        LogStream::new(self.snapshot.subscribe())
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}
