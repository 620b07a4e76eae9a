use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

/// Fixed delay between reconnection attempts. No backoff, no retry
/// limit; the loop only stops when the process does.
pub const RECONNECT_DELAY: Duration = Duration::from_millis(3000);

/// One live bidirectional text channel to the engine.
#[async_trait]
pub trait Transport: Send {
    async fn send(&mut self, text: String) -> Result<()>;

    /// Next inbound text payload. `None` means the channel closed
    /// cleanly; an `Err` means it broke. Either way the caller drops
    /// this transport before attempting a new connection.
    async fn recv(&mut self) -> Option<Result<String>>;

    async fn close(&mut self);
}

/// Produces transports on demand, so the reconnect loop can be driven
/// against a mock in tests.
#[async_trait]
pub trait Connector: Send {
    type Transport: Transport;

    async fn connect(&mut self) -> Result<Self::Transport>;
}

pub struct WsTransport {
    inner: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl Transport for WsTransport {
    async fn send(&mut self, text: String) -> Result<()> {
        self.inner.send(Message::Text(text)).await?;
        Ok(())
    }

    async fn recv(&mut self) -> Option<Result<String>> {
        while let Some(frame) = self.inner.next().await {
            match frame {
                Ok(Message::Text(text)) => return Some(Ok(text)),
                Ok(Message::Close(_)) => return None,
                // Ping/pong handled by tungstenite, binary not used.
                Ok(_) => continue,
                Err(e) => return Some(Err(e.into())),
            }
        }
        None
    }

    async fn close(&mut self) {
        let _ = self.inner.close(None).await;
    }
}

pub struct WsConnector {
    url: String,
}

impl WsConnector {
    pub fn new(url: impl Into<String>) -> Self {
        WsConnector { url: url.into() }
    }
}

#[async_trait]
impl Connector for WsConnector {
    type Transport = WsTransport;

    async fn connect(&mut self) -> Result<WsTransport> {
        let (stream, _) = connect_async(self.url.as_str()).await?;
        tracing::debug!("websocket connected to {}", self.url);
        Ok(WsTransport { inner: stream })
    }
}
