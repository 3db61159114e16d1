//! Live-chat connection client
//!
//! Manages a single persistent bidirectional connection to the chat
//! service: a one-time credential handshake, fire-and-forget sends, and
//! acknowledged requests raced against a timeout. Connection state is
//! reported to the host application exclusively through a notification
//! callback; the client performs no rendering or retry policy of its own.

pub mod connection;
pub mod error;
pub mod notice;
pub mod protocol;
pub mod transport;

pub use connection::{ChannelHandle, ChatHost, Connection, Handshake, SessionConfig};
pub use error::ChatError;
pub use notice::{Dispatch, Notice};
pub use protocol::{AckPayload, ChatUser, ServerEvent, WireMessage};
pub use transport::{MemoryTransport, TcpTransport, Transport};
