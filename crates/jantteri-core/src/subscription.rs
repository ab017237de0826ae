// ── Event subscription manager ──
//
// Binds the fixed channel set of one socket to the message log. One
// binding slot, keyed by connection identity: `bind` detaches any prior
// binding before attaching, `unbind` detaches everything at once by
// aborting the single consumer task that owns the whole channel set.

use std::sync::Arc;

use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;

use jantteri_client::{ConnectionId, Frame, Socket};

use crate::codec::Channel;
use crate::store::MessageLog;

/// Routes a socket's inbound frames through the codec into a log.
pub struct SubscriptionManager {
    binding: Mutex<Option<Binding>>,
}

struct Binding {
    connection: ConnectionId,
    task: JoinHandle<()>,
}

impl SubscriptionManager {
    pub fn new() -> Self {
        Self {
            binding: Mutex::new(None),
        }
    }

    /// Attach `socket`'s channel set to `log`.
    ///
    /// Idempotent per connection instance: any prior binding is detached
    /// first, so rebinding the same socket never produces duplicate
    /// deliveries.
    pub async fn bind(&self, socket: &Socket, log: Arc<MessageLog>) {
        let mut slot = self.binding.lock().await;
        if let Some(prev) = slot.take() {
            prev.task.abort();
        }

        let mut frames = socket.frames();
        let connection = socket.id();

        let task = tokio::spawn(async move {
            loop {
                match frames.recv().await {
                    Ok(frame) => dispatch(&frame, &log),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "frame consumer lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        *slot = Some(Binding { connection, task });
    }

    /// Detach every handler of the current binding.
    pub async fn unbind(&self) {
        if let Some(binding) = self.binding.lock().await.take() {
            binding.task.abort();
        }
    }

    /// Identity of the currently bound connection, if any.
    pub async fn bound_connection(&self) -> Option<ConnectionId> {
        self.binding.lock().await.as_ref().map(|b| b.connection)
    }
}

impl Default for SubscriptionManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Route one inbound frame: bound channels append exactly one formatted
/// entry, frames on unbound channel names are discarded.
fn dispatch(frame: &Frame, log: &MessageLog) {
    match Channel::parse(&frame.event) {
        Some(channel) => log.append(channel.decode(&frame.data)),
        None => {
            tracing::debug!(event = %frame.event, "ignoring frame on unbound channel");
        }
    }
}
