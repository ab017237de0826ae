// Integration tests for `SubscriptionManager` binding semantics.

mod common;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::time::timeout;
use url::Url;

use common::{WAIT, server_url, spawn_server, wait_for_log_len};
use jantteri_client::{Frame, Socket, SocketStatus};
use jantteri_core::{MessageLog, SubscriptionManager};

async fn open_connected(addr: std::net::SocketAddr) -> Socket {
    let url = Url::parse(&server_url(addr)).unwrap();
    let socket = Socket::open(url, None);
    let mut status = socket.status();
    timeout(WAIT, status.wait_for(|s| *s == SocketStatus::Connected))
        .await
        .expect("timed out waiting for Connected")
        .expect("status channel closed");
    socket
}

#[tokio::test]
async fn rebinding_the_same_socket_yields_no_duplicates() {
    let server = spawn_server().await;
    let socket = open_connected(server.addr).await;

    let log = Arc::new(MessageLog::new());
    let manager = SubscriptionManager::new();

    manager.bind(&socket, Arc::clone(&log)).await;
    manager.bind(&socket, Arc::clone(&log)).await;

    server
        .push
        .send(Frame::new("jantteri_state", json!({ "targetState": 0 })))
        .unwrap();
    server
        .push
        .send(Frame::new("jantteri_state", json!({ "targetState": 2 })))
        .unwrap();

    let mut stream = log.subscribe();
    wait_for_log_len(&mut stream, 2).await;

    // A duplicate binding would double these up; give it a moment to show.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(log.len(), 2);

    socket.close();
}

#[tokio::test]
async fn unbind_detaches_every_channel() {
    let server = spawn_server().await;
    let socket = open_connected(server.addr).await;

    let log = Arc::new(MessageLog::new());
    let manager = SubscriptionManager::new();
    manager.bind(&socket, Arc::clone(&log)).await;

    server
        .push
        .send(Frame::new("console_output", json!({ "message": "bound" })))
        .unwrap();
    let mut stream = log.subscribe();
    wait_for_log_len(&mut stream, 1).await;

    manager.unbind().await;

    server
        .push
        .send(Frame::new("console_output", json!({ "message": "unbound" })))
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(log.len(), 1);
    assert_eq!(log.snapshot()[0].as_ref(), "bound");

    socket.close();
}

#[tokio::test]
async fn bound_connection_tracks_the_socket_identity() {
    let server = spawn_server().await;
    let socket = open_connected(server.addr).await;

    let log = Arc::new(MessageLog::new());
    let manager = SubscriptionManager::new();

    assert_eq!(manager.bound_connection().await, None);

    manager.bind(&socket, Arc::clone(&log)).await;
    assert_eq!(manager.bound_connection().await, Some(socket.id()));

    manager.unbind().await;
    assert_eq!(manager.bound_connection().await, None);

    socket.close();
}
