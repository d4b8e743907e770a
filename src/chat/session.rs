//! Live WebSocket session against the chat service.
//!
//! `ChatSession` owns a background driver task that holds the socket,
//! forwards inbound frames to the caller as [`ChatEvent`]s, and reconnects
//! after a fixed delay when the connection drops. Shutting the session down
//! closes the socket and cancels any pending reconnect.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use uuid::Uuid;

use super::transcript::Source;
use crate::core::AppConfig;

/// Delay before the single reconnect attempt after a drop.
const RECONNECT_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Events forwarded to the consumer, in socket arrival order.
#[derive(Debug, Clone)]
pub enum ChatEvent {
    Connected,
    Disconnected,
    Chunk(String),
    Sources(Vec<Source>),
    Done,
    Error(String),
}

/// Inbound frames from the chat service.
#[derive(Deserialize, Debug)]
#[serde(tag = "type")]
enum ServerFrame {
    /// Incremental fragment of the assistant reply
    #[serde(rename = "chunk")]
    Chunk {
        #[serde(default)]
        text: String,
    },

    /// Citations for the reply being streamed
    #[serde(rename = "sources")]
    Sources {
        #[serde(default)]
        sources: Vec<Source>,
    },

    /// End of the assistant turn
    #[serde(rename = "done")]
    Done,

    /// Server-side failure; ends the turn
    #[serde(rename = "error")]
    Error {
        #[serde(default)]
        message: Option<String>,
    },
}

/// Handle to a running chat session.
pub struct ChatSession {
    outbound: mpsc::UnboundedSender<String>,
    state: watch::Receiver<ConnectionState>,
    busy: Arc<AtomicBool>,
    shutdown: watch::Sender<bool>,
    conv_id: String,
    driver: JoinHandle<()>,
}

impl ChatSession {
    /// Spawn a session against the configured chat service. Returns the
    /// handle plus the event stream; connection happens in the background,
    /// watch [`ChatSession::subscribe_state`] for progress.
    pub fn connect(config: &AppConfig) -> (Self, mpsc::UnboundedReceiver<ChatEvent>) {
        Self::connect_with(config.chat_ws_url(), RECONNECT_DELAY)
    }

    fn connect_with(
        url: String,
        reconnect_delay: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<ChatEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let busy = Arc::new(AtomicBool::new(false));
        let conv_id = Uuid::new_v4().to_string();

        let driver = Driver {
            url,
            conv_id: conv_id.clone(),
            reconnect_delay,
            events: event_tx,
            state: state_tx,
            busy: busy.clone(),
            outbound: outbound_rx,
            shutdown: shutdown_rx,
        };
        let handle = tokio::spawn(driver.run());

        (
            Self {
                outbound: outbound_tx,
                state: state_rx,
                busy,
                shutdown: shutdown_tx,
                conv_id,
                driver: handle,
            },
            event_rx,
        )
    }

    /// Conversation id sent with every outbound message, fixed for the
    /// lifetime of the session.
    pub fn conv_id(&self) -> &str {
        &self.conv_id
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    /// Queue a user message. Rejected while disconnected or while a prior
    /// reply has not finished streaming.
    pub fn send(&self, text: &str) -> Result<()> {
        if self.state() != ConnectionState::Connected {
            bail!("Not connected to chat service");
        }
        if self.busy.load(Ordering::SeqCst) {
            bail!("A response is still streaming");
        }
        self.outbound
            .send(text.to_string())
            .map_err(|_| anyhow!("Chat session is shut down"))?;
        self.busy.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Close the socket, cancel any pending reconnect, and wait for the
    /// driver to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.driver.await;
    }
}

struct Driver {
    url: String,
    conv_id: String,
    reconnect_delay: Duration,
    events: mpsc::UnboundedSender<ChatEvent>,
    state: watch::Sender<ConnectionState>,
    busy: Arc<AtomicBool>,
    outbound: mpsc::UnboundedReceiver<String>,
    shutdown: watch::Receiver<bool>,
}

impl Driver {
    async fn run(mut self) {
        loop {
            if *self.shutdown.borrow() {
                break;
            }

            let _ = self.state.send(ConnectionState::Connecting);
            match connect_async(&self.url).await {
                Ok((socket, _)) => {
                    tracing::info!("Connected to chat service at {}", self.url);
                    let _ = self.state.send(ConnectionState::Connected);
                    let _ = self.events.send(ChatEvent::Connected);

                    let shutting_down = self.pump(socket).await;

                    // A reply cut off mid-stream is over as far as send
                    // gating is concerned.
                    self.busy.store(false, Ordering::SeqCst);
                    let _ = self.state.send(ConnectionState::Disconnected);
                    let _ = self.events.send(ChatEvent::Disconnected);
                    if shutting_down {
                        break;
                    }
                }
                Err(err) => {
                    tracing::warn!("Chat service connection failed: {}", err);
                    let _ = self.state.send(ConnectionState::Disconnected);
                    let _ = self.events.send(ChatEvent::Disconnected);
                }
            }

            // Exactly one reconnect timer is armed at a time; shutdown
            // cancels it.
            tokio::select! {
                _ = tokio::time::sleep(self.reconnect_delay) => {}
                _ = self.shutdown.changed() => break,
            }
        }
    }

    /// Shuttle frames until the socket closes. Returns true when the exit
    /// was a shutdown rather than a connection drop.
    async fn pump(&mut self, socket: WebSocketStream<MaybeTlsStream<TcpStream>>) -> bool {
        let (mut sink, mut stream) = socket.split();
        loop {
            tokio::select! {
                inbound = stream.next() => match inbound {
                    Some(Ok(WsMessage::Text(text))) => self.handle_frame(&text),
                    Some(Ok(WsMessage::Ping(data))) => {
                        let _ = sink.send(WsMessage::Pong(data)).await;
                    }
                    Some(Ok(WsMessage::Close(_))) | None => return false,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        tracing::warn!("Chat socket error: {}", err);
                        return false;
                    }
                },
                queued = self.outbound.recv() => match queued {
                    Some(text) => {
                        let frame = serde_json::json!({
                            "text": text,
                            "conv_id": self.conv_id,
                        })
                        .to_string();
                        if sink.send(WsMessage::Text(frame.into())).await.is_err() {
                            return false;
                        }
                    }
                    None => {
                        let _ = sink.send(WsMessage::Close(None)).await;
                        return true;
                    }
                },
                _ = self.shutdown.changed() => {
                    let _ = sink.send(WsMessage::Close(None)).await;
                    return true;
                }
            }
        }
    }

    fn handle_frame(&self, raw: &str) {
        match serde_json::from_str::<ServerFrame>(raw) {
            Ok(ServerFrame::Chunk { text }) => {
                let _ = self.events.send(ChatEvent::Chunk(text));
            }
            Ok(ServerFrame::Sources { sources }) => {
                let _ = self.events.send(ChatEvent::Sources(sources));
            }
            Ok(ServerFrame::Done) => {
                self.busy.store(false, Ordering::SeqCst);
                let _ = self.events.send(ChatEvent::Done);
            }
            Ok(ServerFrame::Error { message }) => {
                self.busy.store(false, Ordering::SeqCst);
                let _ = self.events.send(ChatEvent::Error(
                    message.unwrap_or_else(|| "An error occurred".to_string()),
                ));
            }
            Err(err) => {
                tracing::debug!("Skipping unrecognized chat frame: {} - {}", err, raw);
            }
        }
    }
}
