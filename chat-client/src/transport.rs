//! Transport abstraction for the chat channel

use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{Mutex, broadcast};

use crate::error::ChatError;
use crate::protocol::WireMessage;

/// Duplex channel to the chat server
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    async fn read_message(&self) -> Result<WireMessage, ChatError>;
    async fn write_message(&self, msg: &WireMessage) -> Result<(), ChatError>;
    async fn close(&self) -> Result<(), ChatError>;
}

/// TCP Transport Implementation
///
/// Frames are a 4-byte little-endian length prefix followed by a JSON
/// encoded [`WireMessage`].
#[derive(Debug, Clone)]
pub struct TcpTransport {
    reader: Arc<Mutex<OwnedReadHalf>>,
    writer: Arc<Mutex<OwnedWriteHalf>>,
}

impl TcpTransport {
    pub async fn connect(addr: &str) -> Result<Self, ChatError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| ChatError::Connection(e.to_string()))?;
        let (reader, writer) = stream.into_split();
        Ok(Self {
            reader: Arc::new(Mutex::new(reader)),
            writer: Arc::new(Mutex::new(writer)),
        })
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn read_message(&self) -> Result<WireMessage, ChatError> {
        let mut reader = self.reader.lock().await;

        // Read frame length (4 bytes)
        let mut len_buf = [0u8; 4];
        reader.read_exact(&mut len_buf).await.map_err(ChatError::Io)?;
        let len = u32::from_le_bytes(len_buf) as usize;

        // Read frame body
        let mut body = vec![0u8; len];
        reader.read_exact(&mut body).await.map_err(ChatError::Io)?;

        serde_json::from_slice(&body)
            .map_err(|e| ChatError::InvalidMessage(format!("bad frame: {e}")))
    }

    async fn write_message(&self, msg: &WireMessage) -> Result<(), ChatError> {
        let body = serde_json::to_vec(msg).map_err(ChatError::Serialization)?;

        let mut writer = self.writer.lock().await;
        let mut data = Vec::with_capacity(4 + body.len());
        data.extend_from_slice(&(body.len() as u32).to_le_bytes());
        data.extend_from_slice(&body);

        writer.write_all(&data).await.map_err(ChatError::Io)?;
        Ok(())
    }

    async fn close(&self) -> Result<(), ChatError> {
        // Dropping the Arc references will eventually close the stream
        Ok(())
    }
}

/// Memory Transport Implementation (for in-process test servers)
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    /// Receiver for messages FROM the server
    rx: Arc<Mutex<broadcast::Receiver<WireMessage>>>,
    /// Sender for messages TO the server
    tx: broadcast::Sender<WireMessage>,
}

impl MemoryTransport {
    /// Create a new memory transport
    ///
    /// # Arguments
    /// * `server_tx` - the server's broadcast sender (subscribed for inbound frames)
    /// * `client_tx` - the channel carrying frames to the server
    pub fn new(
        server_tx: &broadcast::Sender<WireMessage>,
        client_tx: &broadcast::Sender<WireMessage>,
    ) -> Self {
        Self {
            rx: Arc::new(Mutex::new(server_tx.subscribe())),
            tx: client_tx.clone(),
        }
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn read_message(&self) -> Result<WireMessage, ChatError> {
        let mut rx = self.rx.lock().await;
        rx.recv()
            .await
            .map_err(|e| ChatError::Connection(format!("Memory channel error: {e}")))
    }

    async fn write_message(&self, msg: &WireMessage) -> Result<(), ChatError> {
        self.tx
            .send(msg.clone())
            .map_err(|e| ChatError::Connection(format!("Failed to send to server: {e}")))?;
        Ok(())
    }

    async fn close(&self) -> Result<(), ChatError> {
        Ok(())
    }
}
