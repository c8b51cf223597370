use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum RealtimeError {
    #[error("WebSocket error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("realtime channel is not connected")]
    NotConnected,
    #[error("cannot derive a websocket endpoint from {0}")]
    InvalidEndpoint(Url),
}

/// Handler invoked for every inbound frame matching its event name.
pub type EventHandler = Arc<dyn Fn(Option<Value>) -> BoxFuture<'static, ()> + Send + Sync>;

/// Wire frame: a named event with an optional JSON payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EventFrame {
    event: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    data: Option<Value>,
}

/// Push-notification channel to the storage service.
///
/// Constructed without connecting so consumers can defer the handshake;
/// `connect` authenticates with the raw API key, then a background reader
/// dispatches inbound events to the registered handlers. Handlers for the
/// same event accumulate; registration does not deduplicate, so callers
/// manage their own subscribe/unsubscribe discipline.
pub struct Listener {
    url: Url,
    token: String,
    handlers: Arc<Mutex<HashMap<String, Vec<EventHandler>>>>,
    active: Mutex<Option<Active>>,
}

struct Active {
    outbound: mpsc::UnboundedSender<EventFrame>,
    writer: JoinHandle<()>,
    reader: JoinHandle<()>,
}

impl Listener {
    /// Derive the channel endpoint from the API host (`http(s)` becomes
    /// `ws(s)`). Does not connect.
    pub fn new(api_host: &Url, token: String) -> Result<Self, RealtimeError> {
        let mut url = api_host.clone();
        let scheme = match url.scheme() {
            "https" | "wss" => "wss",
            _ => "ws",
        };
        if url.set_scheme(scheme).is_err() {
            return Err(RealtimeError::InvalidEndpoint(api_host.clone()));
        }
        Ok(Self {
            url,
            token,
            handlers: Arc::new(Mutex::new(HashMap::new())),
            active: Mutex::new(None),
        })
    }

    pub fn is_connected(&self) -> bool {
        self.active.lock().is_some()
    }

    /// Open the WebSocket, send the auth handshake and start the reader
    /// and writer tasks. Connecting twice is a no-op.
    pub async fn connect(&self) -> Result<(), RealtimeError> {
        if self.is_connected() {
            return Ok(());
        }

        tracing::debug!(url = %self.url, "connecting realtime channel");
        let (stream, _response) = connect_async(self.url.as_str()).await?;
        let (mut sink, mut source) = stream.split();

        let auth = serde_json::json!({ "auth": { "token": self.token } });
        sink.send(Message::Text(auth.to_string())).await?;

        let (outbound, mut pending) = mpsc::unbounded_channel::<EventFrame>();
        let writer = tokio::spawn(async move {
            while let Some(frame) = pending.recv().await {
                let Ok(text) = serde_json::to_string(&frame) else {
                    continue;
                };
                if sink.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
        });

        let handlers = self.handlers.clone();
        let reader = tokio::spawn(async move {
            while let Some(next) = source.next().await {
                let message = match next {
                    Ok(message) => message,
                    Err(err) => {
                        tracing::warn!("realtime channel closed: {err}");
                        break;
                    }
                };
                let Message::Text(text) = message else {
                    continue;
                };
                let Ok(frame) = serde_json::from_str::<EventFrame>(&text) else {
                    tracing::debug!("ignoring unrecognized realtime frame");
                    continue;
                };
                let snapshot: Vec<EventHandler> = handlers
                    .lock()
                    .get(&frame.event)
                    .cloned()
                    .unwrap_or_default();
                for handler in snapshot {
                    tokio::spawn(handler(frame.data.clone()));
                }
            }
        });

        *self.active.lock() = Some(Active {
            outbound,
            writer,
            reader,
        });
        Ok(())
    }

    /// Tear down the channel. Registered handlers survive and fire again
    /// after a reconnect.
    pub fn disconnect(&self) {
        if let Some(active) = self.active.lock().take() {
            active.writer.abort();
            active.reader.abort();
        }
    }

    /// Queue an outbound event. Fails when the channel is not connected.
    pub fn emit(&self, event: &str) -> Result<(), RealtimeError> {
        let guard = self.active.lock();
        let active = guard.as_ref().ok_or(RealtimeError::NotConnected)?;
        active
            .outbound
            .send(EventFrame {
                event: event.to_string(),
                data: None,
            })
            .map_err(|_| RealtimeError::NotConnected)
    }

    /// Register a handler for an event. Handlers accumulate.
    pub fn on(&self, event: &str, handler: EventHandler) {
        self.handlers
            .lock()
            .entry(event.to_string())
            .or_default()
            .push(handler);
    }

    /// Remove every handler registered for an event.
    pub fn off(&self, event: &str) {
        self.handlers.lock().remove(event);
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener")
            .field("url", &self.url.as_str())
            .field("connected", &self.is_connected())
            .finish()
    }
}
