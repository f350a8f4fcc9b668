//! WebSocket server: accept loop and per-session command reading.
//!
//! This module is responsible for:
//!
//! 1. Binding a TCP listener on the configured address.
//! 2. Accepting incoming TCP connections from controller pages.
//! 3. Upgrading each connection to a WebSocket session.
//! 4. Reading text frames and handing each one to the [`RelayService`].
//! 5. Shutting down when the `running` flag is cleared.
//!
//! # One-way traffic
//!
//! Commands flow client → server only.  The relay never sends application
//! frames back — there is no acknowledgment, no sequence numbering, no
//! delivery report.  Connection state (open/closed) is the only thing the
//! client can observe.
//!
//! # Concurrency
//!
//! Each session runs in its own Tokio task; the accept loop never blocks on
//! a session.  All sessions feed the same shared injector through the
//! service, so several connected controllers simply interleave on the same
//! pointer — by design there is no per-client arbitration.
//!
//! # Error containment
//!
//! A session error (handshake failure, protocol violation) ends that session
//! only.  Injector health never reaches this layer at all: the accept loop
//! keeps serving new connections even when every instruction is being
//! discarded by a degraded backend.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use futures_util::StreamExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::{
    accept_async,
    tungstenite::{Error as WsError, Message as WsMessage},
};
use tracing::{debug, error, info, warn};

use crate::application::RelayService;

// ── Public API ────────────────────────────────────────────────────────────────

/// Runs the main WebSocket accept loop until `running` is set to `false`.
///
/// Binds a TCP listener on `bind_addr` and accepts incoming connections in a
/// loop.  Each accepted connection is handed off to a dedicated Tokio task so
/// that one slow client never blocks others.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot be bound (e.g., the port is
/// already in use).  Accept errors after that are logged and non-fatal.
pub async fn run_server(
    bind_addr: SocketAddr,
    service: Arc<RelayService>,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind command listener on {bind_addr}"))?;

    info!("command channel listening on {bind_addr}");

    loop {
        if !running.load(Ordering::Relaxed) {
            info!("shutdown flag set; stopping accept loop");
            break;
        }

        // Short timeout on accept() so the loop can periodically check the
        // `running` flag even when no controllers are connecting.
        let accept_result = timeout(Duration::from_millis(200), listener.accept()).await;

        match accept_result {
            Ok(Ok((stream, peer_addr))) => {
                info!("controller connected from {peer_addr}");
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    handle_controller_session(stream, peer_addr, service).await;
                });
            }
            Ok(Err(e)) => {
                // Transient accept error; keep the server alive.
                error!("accept error: {e}");
            }
            Err(_) => {
                // Timeout — no new connection in the last 200 ms.
            }
        }
    }

    Ok(())
}

// ── Per-session handler ───────────────────────────────────────────────────────

/// Top-level handler for a single controller session.
///
/// Wraps [`run_session`] and logs the outcome.  The outer/inner split lets
/// `run_session` use `?` for propagation while errors get logged exactly once
/// here.
async fn handle_controller_session(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    service: Arc<RelayService>,
) {
    match run_session(raw_stream, peer_addr, service).await {
        Ok(()) => info!("session {peer_addr} closed"),
        Err(e) => warn!("session {peer_addr} closed with error: {e:#}"),
    }
}

/// Runs the complete lifecycle of one controller WebSocket session: the
/// upgrade handshake, then a read loop feeding each text frame to the
/// service until the stream ends.
///
/// No cleanup is needed on close — the injector is process-wide, not
/// per-session.
///
/// # Errors
///
/// Returns an error if the WebSocket handshake fails.
async fn run_session(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    service: Arc<RelayService>,
) -> anyhow::Result<()> {
    let mut ws_stream = accept_async(raw_stream)
        .await
        .with_context(|| format!("WebSocket handshake failed with {peer_addr}"))?;

    while let Some(frame) = ws_stream.next().await {
        match frame {
            Ok(WsMessage::Text(payload)) => {
                let dispatched = service.handle_message(&payload).await;
                debug!("session {peer_addr}: dispatched {dispatched} instruction(s)");
            }

            Ok(WsMessage::Binary(_)) => {
                // The command protocol is text-only.
                warn!("session {peer_addr}: unexpected binary frame (ignored)");
            }

            Ok(WsMessage::Ping(_)) | Ok(WsMessage::Pong(_)) => {
                // Protocol-level keepalive; tungstenite answers pings itself.
                debug!("session {peer_addr}: ping/pong");
            }

            Ok(WsMessage::Close(_)) => {
                debug!("session {peer_addr}: close frame received");
                break;
            }

            Ok(WsMessage::Frame(_)) => {
                debug!("session {peer_addr}: raw frame (ignored)");
            }

            Err(WsError::ConnectionClosed | WsError::Protocol(_)) => {
                debug!("session {peer_addr}: connection closed");
                break;
            }

            Err(e) => {
                warn!("session {peer_addr}: WebSocket error: {e}");
                break;
            }
        }
    }

    Ok(())
}
