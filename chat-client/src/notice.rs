//! Normalized connection notifications
//!
//! The connection manager reports every observable state change through a
//! single dispatch callback carrying one of these records. This is the only
//! channel from the chat layer to the host application.

use serde_json::Value;
use std::sync::Arc;

/// A normalized state notification emitted by the connection manager
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Handshake started
    Connecting,
    /// Channel established
    Connected,
    /// Credentials were sent in reply to the server's token challenge
    TokenSent,
    /// Server confirmed the handshake
    Initialized {
        signer_user_id: u64,
        locale: String,
        groups: Vec<String>,
        geo_location: Option<Value>,
    },
    /// The chat transcript should be fetched
    TranscriptRequested,
    /// Credentials rejected; the channel was closed
    Unauthorized { message: String },
    /// Server-side disconnect
    Disconnected { reason: String },
    /// Transport is re-establishing the channel
    Reconnecting,
    /// Operator status changed
    StatusChanged(Value),
    /// Chat availability changed
    AvailabilityChanged(Value),
    /// Incoming chat message
    MessageReceived(Value),
    /// Emit-path or server-reported failure
    Error(String),
}

/// Callback receiving [`Notice`] records
pub type Dispatch = Arc<dyn Fn(Notice) + Send + Sync>;
