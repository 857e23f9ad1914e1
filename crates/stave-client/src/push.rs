//! Push-channel handle: the long-lived WebSocket to the backend.
//!
//! One connection per session, owned by whoever holds the [`PushChannel`]
//! handle. It survives across job submissions; binding and unbinding jobs
//! is the status store's business, not the socket's.
//!
//! Inbound frames are parsed into [`ServerEvent`]s on the reader task and
//! buffered on a flume channel the app drains from its poll tick (the same
//! bridge the UI uses for device input elsewhere). Outbound events trickle
//! from the publisher's channel through the writer task; failures are
//! logged and dropped, never surfaced.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use flume::Receiver;
use futures_util::{SinkExt, StreamExt};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;

use stave_core::{ClientEvent, ServerEvent};

use crate::publisher::SyncPublisher;

/// Buffered events per direction before the oldest are dropped.
const CHANNEL_CAPACITY: usize = 256;

/// Error type for push-channel operations.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("websocket connect failed: {0}")]
    Connect(String),
}

/// Live connection handle. Dropping it tears the socket tasks down.
#[derive(Debug)]
pub struct PushChannel {
    inbound_rx: Receiver<ServerEvent>,
    outbound_tx: flume::Sender<ClientEvent>,
    alive: Arc<AtomicBool>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl PushChannel {
    /// Connect to the backend's WebSocket endpoint and spawn the socket
    /// tasks. The returned handle is the only way to reach the connection.
    pub async fn connect(url: &str) -> Result<Self, PushError> {
        let (socket, _response) = connect_async(url)
            .await
            .map_err(|e| PushError::Connect(e.to_string()))?;
        log::info!("push: connected to {url}");

        let (mut ws_tx, mut ws_rx) = socket.split();
        let (inbound_tx, inbound_rx) = flume::bounded(CHANNEL_CAPACITY);
        let (outbound_tx, outbound_rx) = flume::bounded::<ClientEvent>(CHANNEL_CAPACITY);
        let alive = Arc::new(AtomicBool::new(true));

        let reader_alive = alive.clone();
        let reader = tokio::spawn(async move {
            while let Some(frame) = ws_rx.next().await {
                match frame {
                    Ok(WsMessage::Text(text)) => {
                        match serde_json::from_str::<ServerEvent>(&text) {
                            Ok(event) => {
                                if inbound_tx.send_async(event).await.is_err() {
                                    break;
                                }
                            }
                            // Unknown or malformed event: drop it at the
                            // boundary, the app never sees it.
                            Err(e) => log::debug!("push: discarding malformed event: {e}"),
                        }
                    }
                    Ok(WsMessage::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        log::warn!("push: read error: {e}");
                        break;
                    }
                }
            }
            reader_alive.store(false, Ordering::Relaxed);
            log::info!("push: reader stopped");
        });

        let writer_alive = alive.clone();
        let writer = tokio::spawn(async move {
            while let Ok(event) = outbound_rx.recv_async().await {
                let json = match serde_json::to_string(&event) {
                    Ok(json) => json,
                    Err(e) => {
                        log::debug!("push: failed to encode event: {e}");
                        continue;
                    }
                };
                if let Err(e) = ws_tx.send(WsMessage::Text(json.into())).await {
                    log::debug!("push: send failed, dropping event: {e}");
                    break;
                }
            }
            writer_alive.store(false, Ordering::Relaxed);
            log::info!("push: writer stopped");
        });

        Ok(Self {
            inbound_rx,
            outbound_tx,
            alive,
            reader,
            writer,
        })
    }

    /// Receiver of inbound server events. Drain it with `try_recv` from the
    /// app's poll tick.
    pub fn updates(&self) -> Receiver<ServerEvent> {
        self.inbound_rx.clone()
    }

    /// A publisher bound to this connection's outbound queue.
    pub fn publisher(&self) -> SyncPublisher {
        SyncPublisher::new(self.outbound_tx.clone())
    }

    /// Whether both socket tasks are still running.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Relaxed)
    }

    /// Tear down the connection. Both tasks stop; nothing runs afterwards.
    pub fn disconnect(&self) {
        self.reader.abort();
        self.writer.abort();
        self.alive.store(false, Ordering::Relaxed);
        log::info!("push: disconnected");
    }
}

impl Drop for PushChannel {
    fn drop(&mut self) {
        self.reader.abort();
        self.writer.abort();
    }
}
