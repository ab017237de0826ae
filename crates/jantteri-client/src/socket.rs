//! Session-scoped WebSocket channel to a Jantteri game controller.
//!
//! [`Socket::open`] spawns a driver task that performs the upgrade, joins the
//! requested game room, and pumps named frames in both directions. There is
//! no automatic reconnection: a transport failure parks the socket in
//! [`SocketStatus::Disconnected`] and it stays there until the owner opens a
//! fresh socket.
//!
//! # Example
//!
//! ```rust,ignore
//! use jantteri_client::Socket;
//! use url::Url;
//!
//! let url = Url::parse("ws://localhost:5000/")?;
//! let socket = Socket::open(url, Some("VVUKUI".into()));
//! let mut frames = socket.frames();
//!
//! while let Ok(frame) = frames.recv().await {
//!     println!("{}: {}", frame.event, frame.data);
//! }
//!
//! socket.close();
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::sync::{broadcast, mpsc, watch};
use tokio_tungstenite::tungstenite::{self, ClientRequestBuilder};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::Error;
use crate::frame::Frame;

// ── Channel capacities and wire event names ──────────────────────────

const FRAME_CHANNEL_CAPACITY: usize = 1024;

/// Outbound room-membership event sent once after a successful connect.
pub const JOIN_GAME: &str = "join_game";

/// Outbound room-membership event sent once before teardown.
pub const LEAVE_GAME: &str = "leave_game";

/// Identity tag for one physical connection.
///
/// Monotonically increasing across the process; a superseded socket's id
/// never matches the current one, which is how owners reject late callbacks.
pub type ConnectionId = u64;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

// ── SocketStatus ─────────────────────────────────────────────────────

/// Lifecycle state of one socket, published through a `watch` channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketStatus {
    /// Upgrade requested, handshake not yet acknowledged.
    Connecting,
    /// Handshake acknowledged; frames flow.
    Connected,
    /// Terminal: explicit close, transport drop, or connect error.
    Disconnected,
}

// ── Socket ───────────────────────────────────────────────────────────

/// Handle to one live channel toward the controller.
///
/// Owned exclusively by one consumer for the lifetime of one
/// `(url, game_id)` pair. Dropping the handle releases the channel without
/// the leave-room courtesy; call [`close`](Self::close) for the full
/// teardown sequence.
pub struct Socket {
    id: ConnectionId,
    game_id: Option<String>,
    status: Arc<watch::Sender<SocketStatus>>,
    frame_tx: broadcast::Sender<Arc<Frame>>,
    outbound_tx: mpsc::UnboundedSender<Frame>,
    cancel: CancellationToken,
}

impl Socket {
    /// Open a channel to `url`, joining `game_id` once connected.
    ///
    /// Returns immediately with status [`SocketStatus::Connecting`]; the
    /// upgrade proceeds on a spawned driver task. Must be called within a
    /// Tokio runtime. `http(s)` URLs are rewritten to `ws(s)` before the
    /// upgrade.
    pub fn open(url: Url, game_id: Option<String>) -> Self {
        let id = NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed);
        let status = Arc::new(watch::Sender::new(SocketStatus::Connecting));
        let (frame_tx, _) = broadcast::channel(FRAME_CHANNEL_CAPACITY);
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        tokio::spawn(driver(
            websocket_url(url),
            game_id.clone(),
            Arc::clone(&status),
            frame_tx.clone(),
            outbound_rx,
            cancel.clone(),
        ));

        Self {
            id,
            game_id,
            status,
            frame_tx,
            outbound_tx,
            cancel,
        }
    }

    /// Identity tag of this connection.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// The room this socket joins on connect, if any.
    pub fn game_id(&self) -> Option<&str> {
        self.game_id.as_deref()
    }

    /// Subscribe to status transitions.
    pub fn status(&self) -> watch::Receiver<SocketStatus> {
        self.status.subscribe()
    }

    /// Current status snapshot.
    pub fn current_status(&self) -> SocketStatus {
        *self.status.borrow()
    }

    /// Get a new receiver for the inbound frame stream.
    ///
    /// Multiple consumers can subscribe concurrently. A consumer that falls
    /// behind receives [`broadcast::error::RecvError::Lagged`].
    pub fn frames(&self) -> broadcast::Receiver<Arc<Frame>> {
        self.frame_tx.subscribe()
    }

    /// Queue a named event toward the server, fire-and-forget.
    ///
    /// Frames queued while disconnected are dropped with the channel.
    pub fn emit(&self, event: &str, data: serde_json::Value) {
        let _ = self.outbound_tx.send(Frame::new(event, data));
    }

    /// Close the channel.
    ///
    /// If the room was joined, a `leave_game` frame is queued ahead of
    /// teardown (best-effort; the driver flushes the queue before the close
    /// frame). The status moves to `Disconnected` synchronously and the
    /// channel is released unconditionally.
    pub fn close(&self) {
        if self.current_status() == SocketStatus::Connected {
            if let Some(game) = &self.game_id {
                self.emit(LEAVE_GAME, json!({ "game_id": game }));
            }
        }
        self.status.send_replace(SocketStatus::Disconnected);
        self.cancel.cancel();
    }
}

impl Drop for Socket {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

// ── Driver task ──────────────────────────────────────────────────────

/// Single connection lifecycle: connect → join → pump → teardown.
///
/// Exactly one attempt; any outcome parks the status in `Disconnected`
/// and exits. The owner starts a brand-new socket to retry.
async fn driver(
    url: Url,
    game_id: Option<String>,
    status: Arc<watch::Sender<SocketStatus>>,
    frame_tx: broadcast::Sender<Arc<Frame>>,
    outbound_rx: mpsc::UnboundedReceiver<Frame>,
    cancel: CancellationToken,
) {
    match connect_and_pump(&url, game_id.as_deref(), &status, &frame_tx, outbound_rx, &cancel)
        .await
    {
        Ok(()) => tracing::info!("socket closed"),
        Err(e) => tracing::warn!(error = %e, "socket failed"),
    }

    status.send_replace(SocketStatus::Disconnected);
    tracing::debug!("socket driver exiting");
}

/// Establish a single WebSocket connection and pump frames until it drops.
async fn connect_and_pump(
    url: &Url,
    game_id: Option<&str>,
    status: &watch::Sender<SocketStatus>,
    frame_tx: &broadcast::Sender<Arc<Frame>>,
    mut outbound_rx: mpsc::UnboundedReceiver<Frame>,
    cancel: &CancellationToken,
) -> Result<(), Error> {
    tracing::info!(url = %url, "connecting");

    let uri: tungstenite::http::Uri = url
        .as_str()
        .parse()
        .map_err(|e: tungstenite::http::uri::InvalidUri| Error::Connect(e.to_string()))?;

    let request = ClientRequestBuilder::new(uri);

    let connect = tokio::select! {
        biased;
        () = cancel.cancelled() => return Ok(()),
        result = tokio_tungstenite::connect_async(request) => result,
    };

    let (ws_stream, _response) = connect.map_err(|e| Error::Connect(e.to_string()))?;
    let (mut write, mut read) = ws_stream.split();

    status.send_replace(SocketStatus::Connected);
    tracing::info!(url = %url, "connected");

    // Join the game room once per successful connect, never retried.
    if let Some(game) = game_id {
        let join = Frame::new(JOIN_GAME, json!({ "game_id": game }));
        send_frame(&mut write, &join)
            .await
            .map_err(|()| Error::Connect("join_game send failed".into()))?;
        tracing::debug!(game_id = %game, "joined game room");
    }

    let mut outbound_open = true;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                // Flush queued outbound frames (the leave_game courtesy lives
                // here) before the close frame. Errors are ignored: teardown
                // proceeds unconditionally.
                while let Ok(frame) = outbound_rx.try_recv() {
                    let _ = send_frame(&mut write, &frame).await;
                }
                let _ = write.send(tungstenite::Message::Close(None)).await;
                return Ok(());
            }
            queued = outbound_rx.recv(), if outbound_open => {
                match queued {
                    Some(frame) => {
                        if send_frame(&mut write, &frame).await.is_err() {
                            return Err(Error::Connect("send failed".into()));
                        }
                    }
                    None => outbound_open = false,
                }
            }
            inbound = read.next() => {
                match inbound {
                    Some(Ok(tungstenite::Message::Text(text))) => {
                        match Frame::decode(text.as_str()) {
                            Ok(frame) => {
                                // Ignore send errors: no subscribers right now.
                                let _ = frame_tx.send(Arc::new(frame));
                            }
                            Err(e) => {
                                tracing::debug!(error = %e, "discarding malformed frame");
                            }
                        }
                    }
                    Some(Ok(tungstenite::Message::Ping(_))) => {
                        // tungstenite answers pongs automatically
                        tracing::trace!("ping");
                    }
                    Some(Ok(tungstenite::Message::Close(close))) => {
                        if let Some(ref cf) = close {
                            tracing::info!(code = %cf.code, reason = %cf.reason, "close frame received");
                        } else {
                            tracing::info!("close frame received");
                        }
                        return Ok(());
                    }
                    Some(Err(e)) => {
                        return Err(Error::Connect(e.to_string()));
                    }
                    None => {
                        tracing::info!("stream ended");
                        return Ok(());
                    }
                    _ => {
                        // Binary, Pong, Frame -- ignore
                    }
                }
            }
        }
    }
}

/// Encode and send one frame, logging failures.
async fn send_frame<S>(write: &mut S, frame: &Frame) -> Result<(), ()>
where
    S: SinkExt<tungstenite::Message> + Unpin,
    S::Error: std::fmt::Display,
{
    let text = match frame.encode() {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, event = %frame.event, "dropping unencodable frame");
            return Ok(());
        }
    };

    write
        .send(tungstenite::Message::Text(text.into()))
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, event = %frame.event, "WebSocket send failed");
        })
}

/// Rewrite `http(s)` schemes to `ws(s)`; anything else passes through.
fn websocket_url(mut url: Url) -> Url {
    let scheme = match url.scheme() {
        "http" => "ws",
        "https" => "wss",
        _ => return url,
    };
    // set_scheme only rejects invalid transitions; ws/wss are always valid here.
    let _ = url.set_scheme(scheme);
    url
}
