// Integration tests for `Socket` against an in-process WebSocket server.

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

use jantteri_client::{Frame, Socket, SocketStatus};

const WAIT: Duration = Duration::from_secs(5);

// ── Test server ─────────────────────────────────────────────────────

/// Single-connection server: records every inbound frame and forwards
/// queued pushes to the client. The inbound channel closes when the
/// connection does, which tests use to detect teardown.
struct TestServer {
    addr: SocketAddr,
    inbound: mpsc::UnboundedReceiver<Frame>,
    push: mpsc::UnboundedSender<Frame>,
}

async fn spawn_server() -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (inbound_tx, inbound) = mpsc::unbounded_channel();
    let (push, mut push_rx) = mpsc::unbounded_channel::<Frame>();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        let (mut write, mut read) = ws.split();

        loop {
            tokio::select! {
                queued = push_rx.recv() => {
                    let Some(frame) = queued else { break };
                    let text = frame.encode().unwrap();
                    if write.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            if let Ok(frame) = Frame::decode(text.as_str()) {
                                let _ = inbound_tx.send(frame);
                            }
                        }
                        Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                        Some(Ok(_)) => {}
                    }
                }
            }
        }
    });

    TestServer {
        addr,
        inbound,
        push,
    }
}

fn server_url(addr: SocketAddr) -> Url {
    Url::parse(&format!("ws://{addr}/")).unwrap()
}

async fn wait_connected(socket: &Socket) {
    let mut status = socket.status();
    timeout(WAIT, status.wait_for(|s| *s == SocketStatus::Connected))
        .await
        .expect("timed out waiting for Connected")
        .expect("status channel closed");
}

// ── Room membership ─────────────────────────────────────────────────

#[tokio::test]
async fn join_then_leave_round_trip() {
    let mut server = spawn_server().await;
    let socket = Socket::open(server_url(server.addr), Some("VVUKUI".into()));

    wait_connected(&socket).await;

    let join = timeout(WAIT, server.inbound.recv()).await.unwrap().unwrap();
    assert_eq!(join.event, "join_game");
    assert_eq!(join.data, json!({ "game_id": "VVUKUI" }));

    socket.close();
    assert_eq!(socket.current_status(), SocketStatus::Disconnected);

    let leave = timeout(WAIT, server.inbound.recv()).await.unwrap().unwrap();
    assert_eq!(leave.event, "leave_game");
    assert_eq!(leave.data, json!({ "game_id": "VVUKUI" }));
}

#[tokio::test]
async fn no_room_means_no_membership_frames() {
    let mut server = spawn_server().await;
    let socket = Socket::open(server_url(server.addr), None);

    wait_connected(&socket).await;
    socket.close();

    // The server loop ends with the connection; the inbound channel must
    // close without ever carrying a join or leave frame.
    let drained = timeout(WAIT, server.inbound.recv()).await.unwrap();
    assert!(drained.is_none(), "unexpected frame: {drained:?}");
}

// ── Frame delivery ──────────────────────────────────────────────────

#[tokio::test]
async fn frames_arrive_in_delivery_order() {
    let server = spawn_server().await;
    let socket = Socket::open(server_url(server.addr), None);
    let mut frames = socket.frames();

    wait_connected(&socket).await;

    server
        .push
        .send(Frame::new("jantteri_state", json!({ "targetState": 2 })))
        .unwrap();
    server
        .push
        .send(Frame::new(
            "jantteri_event",
            json!({ "deviceId": 1, "event": 2, "timestamp": 1_700_000_000 }),
        ))
        .unwrap();
    server
        .push
        .send(Frame::new("console_output", json!({ "message": "round over" })))
        .unwrap();

    let mut received = Vec::new();
    for _ in 0..3 {
        let frame = timeout(WAIT, frames.recv()).await.unwrap().unwrap();
        received.push(frame.event.clone());
    }
    assert_eq!(received, ["jantteri_state", "jantteri_event", "console_output"]);

    socket.close();
    drop(server.inbound);
}

// ── Failure paths ───────────────────────────────────────────────────

#[tokio::test]
async fn connect_error_parks_disconnected() {
    // Grab a port that nothing is listening on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let socket = Socket::open(server_url(addr), Some("VVUKUI".into()));

    let mut status = socket.status();
    timeout(WAIT, status.wait_for(|s| *s == SocketStatus::Disconnected))
        .await
        .expect("timed out waiting for Disconnected")
        .expect("status channel closed");
}

#[tokio::test]
async fn server_drop_parks_disconnected_without_reconnect() {
    let server = spawn_server().await;
    let socket = Socket::open(server_url(server.addr), None);

    wait_connected(&socket).await;

    // Kill the server side; the socket must settle in Disconnected and stay.
    drop(server.push);
    let mut status = socket.status();
    timeout(WAIT, status.wait_for(|s| *s == SocketStatus::Disconnected))
        .await
        .expect("timed out waiting for Disconnected")
        .expect("status channel closed");

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(socket.current_status(), SocketStatus::Disconnected);
    drop(server.inbound);
}
