use crate::{
    Command, ConnectionManager, ConnectionState, FRAME_SIZE, ListenerError, Message,
    RECV_BUFFER_SIZE,
    tests::support::{trigger_server, unused_endpoint},
};

use std::{
    io::Write,
    sync::{Arc, mpsc},
    thread,
    time::Duration,
};

const CONNECT_TIMEOUT: Duration = Duration::from_millis(500);

/// WHAT: Connecting with nothing listening fails and stays disconnected
/// WHY: Retry policy lives in the caller; connect must not retry itself
#[test]
fn given_no_server_when_connecting_then_connect_failed_and_disconnected() {
    // Given: An endpoint nobody listens on
    let manager = ConnectionManager::new(unused_endpoint(), CONNECT_TIMEOUT);

    // When: Connecting
    let result = manager.connect();

    // Then: ConnectFailed, state Disconnected
    assert!(matches!(result, Err(ListenerError::ConnectFailed { .. })));
    assert_eq!(manager.state(), ConnectionState::Disconnected);
}

/// WHAT: An endpoint that is not an address fails resolution
/// WHY: Resolution failures are reported separately from refusals
#[test]
fn given_unresolvable_endpoint_when_connecting_then_resolve_failed() {
    // Given: An endpoint without a port
    let manager = ConnectionManager::new("no-port-here", CONNECT_TIMEOUT);

    // When: Connecting
    let result = manager.connect();

    // Then: ResolveFailed
    assert!(matches!(result, Err(ListenerError::ResolveFailed { .. })));
    assert_eq!(manager.state(), ConnectionState::Disconnected);
}

/// WHAT: Receiving before connecting is an error
/// WHY: There is no socket to read from
#[test]
fn given_unconnected_manager_when_receiving_then_not_connected() {
    let manager = ConnectionManager::new(unused_endpoint(), CONNECT_TIMEOUT);
    let mut buf = [0u8; RECV_BUFFER_SIZE];

    let result = manager.receive(&mut buf);

    assert!(matches!(result, Err(ListenerError::NotConnected { .. })));
}

/// WHAT: Bytes written by the peer are received; a peer close reads as zero
/// WHY: Zero is an orderly close, not an error
#[test]
fn given_connected_peer_when_receiving_then_bytes_then_zero_on_close() {
    // Given: A connected manager
    let (server, endpoint) = trigger_server();
    let manager = ConnectionManager::new(endpoint, CONNECT_TIMEOUT);
    manager.connect().unwrap();
    assert_eq!(manager.state(), ConnectionState::Connected);
    let (mut peer, _) = server.accept().unwrap();

    // When: The peer sends one frame then closes
    peer.write_all(&Message::new(Command::StartTrigger, 3.0).encode())
        .unwrap();
    drop(peer);

    // Then: The frame arrives, followed by an orderly close
    let mut buf = [0u8; RECV_BUFFER_SIZE];
    let mut received = Vec::new();
    loop {
        let n = manager.receive(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        received.extend_from_slice(&buf[..n]);
    }
    assert_eq!(received.len(), FRAME_SIZE);
    assert_eq!(
        Message::decode(&received).unwrap(),
        Message::new(Command::StartTrigger, 3.0)
    );
}

/// WHAT: Closing twice is harmless
/// WHY: Both the receive loop and shutdown close the same socket
#[test]
fn given_connected_manager_when_closing_twice_then_disconnected() {
    // Given: A connected manager
    let (server, endpoint) = trigger_server();
    let manager = ConnectionManager::new(endpoint, CONNECT_TIMEOUT);
    manager.connect().unwrap();
    let _peer = server.accept().unwrap();

    // When: Closing twice
    manager.close();
    manager.close();

    // Then: Disconnected, and receive reports no connection
    assert_eq!(manager.state(), ConnectionState::Disconnected);
    let mut buf = [0u8; RECV_BUFFER_SIZE];
    assert!(matches!(
        manager.receive(&mut buf),
        Err(ListenerError::NotConnected { .. })
    ));
}

/// WHAT: Closing from another thread unblocks a pending receive
/// WHY: Forced close is the only way to cancel a blocking receive
#[test]
fn given_blocked_receive_when_closing_from_other_thread_then_receive_returns() {
    // Given: A connected manager whose peer never sends
    let (server, endpoint) = trigger_server();
    let manager = Arc::new(ConnectionManager::new(endpoint, CONNECT_TIMEOUT));
    manager.connect().unwrap();
    let _peer = server.accept().unwrap();

    let (done_tx, done_rx) = mpsc::channel();
    let reader = Arc::clone(&manager);
    let handle = thread::spawn(move || {
        let mut buf = [0u8; RECV_BUFFER_SIZE];
        let result = reader.receive(&mut buf);
        let _ = done_tx.send(());
        result
    });
    thread::sleep(Duration::from_millis(50));

    // When: Closing from this thread
    manager.close();

    // Then: The receive returns promptly with zero or an error
    assert!(done_rx.recv_timeout(Duration::from_secs(2)).is_ok());
    match handle.join().unwrap() {
        Ok(n) => assert_eq!(n, 0),
        // Closed before the read started.
        Err(e) => assert!(matches!(
            e,
            ListenerError::ReceiveFailed { .. } | ListenerError::NotConnected { .. }
        )),
    }
    assert_eq!(manager.state(), ConnectionState::Disconnected);
}
