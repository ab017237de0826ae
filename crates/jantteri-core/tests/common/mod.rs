// Shared test plumbing: a single-connection WebSocket server that records
// inbound frames and forwards queued pushes to the client.
#![allow(dead_code)] // not every suite uses every helper

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;

use jantteri_client::Frame;
use jantteri_core::LogStream;

pub const WAIT: Duration = Duration::from_secs(5);

pub struct TestServer {
    pub addr: SocketAddr,
    pub inbound: mpsc::UnboundedReceiver<Frame>,
    pub push: mpsc::UnboundedSender<Frame>,
}

pub async fn spawn_server() -> TestServer {
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

pub fn server_url(addr: SocketAddr) -> String {
    format!("ws://{addr}/")
}

/// Block until the log holds at least `n` entries, returning the snapshot.
pub async fn wait_for_log_len(stream: &mut LogStream, n: usize) -> Arc<Vec<Arc<str>>> {
    timeout(WAIT, async {
        let mut snap = stream.latest();
        while snap.len() < n {
            snap = stream.changed().await.expect("log dropped");
        }
        snap
    })
    .await
    .expect("timed out waiting for log entries")
}

/// Receive the next recorded inbound frame from the server.
pub async fn next_inbound(server: &mut TestServer) -> Frame {
    timeout(WAIT, server.inbound.recv())
        .await
        .expect("timed out waiting for inbound frame")
        .expect("server connection ended")
}
