//! WebSocket connection to the chat server.

use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message as WsMessage;

use super::EventSink;
use super::events::{ClientEvent, ServerEvent};
use crate::error::{Error, Result};

/// Outbound half of a realtime connection.
///
/// Events are queued to a writer task, so [`EventSink::emit`] never
/// blocks the caller.
#[derive(Debug, Clone)]
pub struct Outbound {
    tx: mpsc::UnboundedSender<ClientEvent>,
}

impl EventSink for Outbound {
    fn emit(&self, event: ClientEvent) -> Result<()> {
        if self.tx.send(event).is_err() {
            return Err(Error::ConnectionClosed);
        }
        Ok(())
    }
}

/// Inbound half of a realtime connection.
#[derive(Debug)]
pub struct Inbound {
    rx: mpsc::UnboundedReceiver<ServerEvent>,
}

impl Inbound {
    /// Next decoded server event, or `None` once the connection closed.
    pub async fn next(&mut self) -> Option<ServerEvent> {
        self.rx.recv().await
    }
}

/// Open the realtime connection and split it into its two halves.
///
/// Two tasks are spawned: a writer draining [`Outbound`] into the socket
/// and a reader decoding frames into [`Inbound`]. Frames that fail to
/// decode are logged and skipped.
pub async fn connect(url: &str) -> Result<(Outbound, Inbound)> {
    let (ws, _response) = tokio_tungstenite::connect_async(url).await?;
    tracing::info!(name: "realtime.connected", url = %url, "Realtime channel connected");

    let (mut ws_sink, mut ws_stream) = ws.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ClientEvent>();
    let (in_tx, in_rx) = mpsc::unbounded_channel::<ServerEvent>();

    tokio::spawn(async move {
        while let Some(event) = out_rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to encode realtime event");
                    continue;
                }
            };
            if let Err(e) = ws_sink.send(WsMessage::Text(text)).await {
                tracing::warn!(name: "realtime.send.failed", error = %e, "Realtime send failed");
                break;
            }
        }
        let _ = ws_sink.close().await;
    });

    tokio::spawn(async move {
        while let Some(frame) = ws_stream.next().await {
            match frame {
                Ok(WsMessage::Text(text)) => match ServerEvent::decode(&text) {
                    Ok(Some(event)) => {
                        if in_tx.send(event).is_err() {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(
                            name: "realtime.frame.malformed",
                            error = %e,
                            "Dropping malformed frame"
                        );
                    }
                },
                Ok(WsMessage::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(
                        name: "realtime.recv.failed",
                        error = %e,
                        "Realtime receive failed"
                    );
                    break;
                }
            }
        }
        tracing::info!(name: "realtime.closed", "Realtime channel closed");
    });

    Ok((Outbound { tx: out_tx }, Inbound { rx: in_rx }))
}
