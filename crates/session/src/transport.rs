use crate::types::Handshake;
use anyhow::{Context, Result, anyhow};
use futures_util::SinkExt;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

/// Persistent ordered message channel to the backend: one JSON handshake
/// followed by binary frames. Closed exactly once per session activation.
#[allow(async_fn_in_trait)]
pub trait FrameChannel: Send {
    async fn send_handshake(&mut self, handshake: &Handshake) -> Result<()>;

    async fn send_frame(&mut self, frame: Vec<u8>) -> Result<()>;

    async fn close(&mut self) -> Result<()>;
}

/// Opens a channel addressed by `(course_id, ordinal)`.
#[allow(async_fn_in_trait)]
pub trait ChannelOpener {
    type Channel: FrameChannel;

    async fn open(&self, course_id: &str, ordinal: u32) -> Result<Self::Channel>;
}

pub fn channel_url(base: &str, course_id: &str, ordinal: u32) -> String {
    format!("{base}/ws/{course_id}/{ordinal}")
}

/// WebSocket opener with a bounded connect timeout. A hung open surfaces
/// as a channel error instead of stalling the session in `Starting`.
pub struct WsOpener {
    base: String,
    open_timeout: Duration,
}

impl WsOpener {
    /// `base` is the scheme/authority part, e.g. `ws://127.0.0.1:8000`.
    pub fn new(base: String, open_timeout: Duration) -> Self {
        Self { base, open_timeout }
    }
}

impl ChannelOpener for WsOpener {
    type Channel = WsChannel;

    async fn open(&self, course_id: &str, ordinal: u32) -> Result<WsChannel> {
        let url = channel_url(&self.base, course_id, ordinal);

        let (ws, _response) = tokio::time::timeout(self.open_timeout, connect_async(url.as_str()))
            .await
            .map_err(|_| anyhow!("Channel open timed out after {:?}", self.open_timeout))?
            .with_context(|| format!("Failed to open {url}"))?;

        tracing::info!(%url, "stream channel open");
        Ok(WsChannel { ws })
    }
}

#[derive(Debug)]
pub struct WsChannel {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl FrameChannel for WsChannel {
    async fn send_handshake(&mut self, handshake: &Handshake) -> Result<()> {
        let payload = serde_json::to_string(handshake).context("Failed to encode handshake")?;
        self.ws
            .send(Message::Text(payload))
            .await
            .context("Handshake send failed")?;
        Ok(())
    }

    async fn send_frame(&mut self, frame: Vec<u8>) -> Result<()> {
        self.ws
            .send(Message::Binary(frame))
            .await
            .context("Frame send failed")?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.ws.close(None).await.context("Channel close failed")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_url_addresses_course_and_ordinal() {
        assert_eq!(
            channel_url("ws://10.0.0.5:8000", "C1", 4),
            "ws://10.0.0.5:8000/ws/C1/4"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn open_times_out_when_handshake_never_completes() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Accept connections but never answer the WebSocket upgrade.
        tokio::spawn(async move {
            let mut held = Vec::new();
            loop {
                if let Ok((socket, _)) = listener.accept().await {
                    held.push(socket);
                }
            }
        });

        let opener = WsOpener::new(format!("ws://{addr}"), Duration::from_millis(200));

        let err = opener.open("C1", 0).await.unwrap_err();
        assert!(
            err.to_string().contains("timed out"),
            "expected open timeout, got: {err}"
        );
    }
}
