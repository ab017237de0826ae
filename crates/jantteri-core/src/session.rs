// ── Session facade ──
//
// The externally consumed unit: given a target, produces a live
// (status, messages) pair. Owns at most one socket at a time, tagged by
// connection identity so late callbacks from a superseded socket can
// never mutate current state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::debug;
use url::Url;

use jantteri_client::{ConnectionId, Socket, SocketStatus};

use crate::config::SessionTarget;
use crate::error::CoreError;
use crate::store::MessageLog;
use crate::stream::LogStream;
use crate::subscription::SubscriptionManager;

// ── ConnectionStatus ─────────────────────────────────────────────────

/// Connection state observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Disconnected,
}

impl From<SocketStatus> for ConnectionStatus {
    fn from(status: SocketStatus) -> Self {
        match status {
            SocketStatus::Connecting => Self::Connecting,
            SocketStatus::Connected => Self::Connected,
            SocketStatus::Disconnected => Self::Disconnected,
        }
    }
}

// ── Session ──────────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<SessionInner>`. Starts Disconnected and
/// idle; [`set_target`](Self::set_target) points it at a server (and
/// optional game room), [`disconnect`](Self::disconnect) returns it to
/// idle. Both are explicit user actions and reset the message log;
/// ambient transport transitions never do.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    status: watch::Sender<ConnectionStatus>,
    log: Arc<MessageLog>,
    subscriptions: SubscriptionManager,
    active: Mutex<Option<ActiveSocket>>,
    /// `ConnectionId` of the live socket, 0 when idle. Checked by every
    /// callback before it touches session state.
    current: AtomicU64,
}

struct ActiveSocket {
    socket: Socket,
    status_task: JoinHandle<()>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SessionInner {
                status: watch::Sender::new(ConnectionStatus::Disconnected),
                log: Arc::new(MessageLog::new()),
                subscriptions: SubscriptionManager::new(),
                active: Mutex::new(None),
                current: AtomicU64::new(0),
            }),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Point the session at a new target.
    ///
    /// Tears down the previous socket first (leave-room-then-disconnect),
    /// clears the log, and opens a fresh connection -- including the
    /// "no target" → "has target" transitions and back. An idle target
    /// (empty URL) is valid: the session stays Disconnected with no
    /// socket held.
    pub async fn set_target(&self, target: &SessionTarget) -> Result<(), CoreError> {
        self.teardown().await;
        self.inner.log.clear();
        self.inner.status.send_replace(ConnectionStatus::Disconnected);

        if target.is_idle() {
            debug!("no server URL, staying idle");
            return Ok(());
        }

        let url = Url::parse(target.server_url.trim()).map_err(|e| CoreError::Config {
            message: format!("invalid server URL '{}': {e}", target.server_url),
        })?;

        let socket = Socket::open(url, target.game_id.clone());
        self.inner.status.send_replace(ConnectionStatus::Connecting);
        self.inner
            .subscriptions
            .bind(&socket, Arc::clone(&self.inner.log))
            .await;
        self.inner.current.store(socket.id(), Ordering::Release);

        let status_task = tokio::spawn(forward_status(
            socket.status(),
            socket.id(),
            self.clone(),
        ));

        *self.inner.active.lock().await = Some(ActiveSocket {
            socket,
            status_task,
        });

        debug!(game_id = ?target.game_id, "target set");
        Ok(())
    }

    /// Return to idle: leave the room, release the socket, clear the log.
    pub async fn disconnect(&self) {
        self.teardown().await;
        self.inner.log.clear();
        self.inner.status.send_replace(ConnectionStatus::Disconnected);
        debug!("disconnected");
    }

    /// Release the current socket, if any. Leave-room runs before the
    /// transport drops; stale callbacks are cut off by zeroing the
    /// generation tag first.
    async fn teardown(&self) {
        self.inner.current.store(0, Ordering::Release);
        self.inner.subscriptions.unbind().await;
        if let Some(active) = self.inner.active.lock().await.take() {
            active.status_task.abort();
            active.socket.close();
        }
    }

    // ── State observation ────────────────────────────────────────

    /// Subscribe to connection state changes.
    pub fn status(&self) -> watch::Receiver<ConnectionStatus> {
        self.inner.status.subscribe()
    }

    /// Current status snapshot.
    pub fn current_status(&self) -> ConnectionStatus {
        *self.inner.status.borrow()
    }

    /// Subscribe to message-log changes.
    pub fn messages(&self) -> LogStream {
        self.inner.log.subscribe()
    }

    /// Current log snapshot, oldest entry first.
    pub fn messages_snapshot(&self) -> Arc<Vec<Arc<str>>> {
        self.inner.log.snapshot()
    }

    /// Identity of the live connection, `None` when idle.
    pub async fn connection_id(&self) -> Option<ConnectionId> {
        self.inner.active.lock().await.as_ref().map(|a| a.socket.id())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

// ── Status forwarding ────────────────────────────────────────────────

/// Mirror one socket's status into the session, generation-guarded:
/// the task exits the moment its socket is no longer the current one.
async fn forward_status(
    mut socket_status: watch::Receiver<SocketStatus>,
    id: ConnectionId,
    session: Session,
) {
    loop {
        let snapshot = *socket_status.borrow_and_update();
        if session.inner.current.load(Ordering::Acquire) != id {
            break;
        }
        session.inner.status.send_replace(snapshot.into());

        if socket_status.changed().await.is_err() {
            break;
        }
    }
}
