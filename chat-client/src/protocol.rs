//! Chat wire protocol
//!
//! Event names and payload shapes are a fixed contract with the remote
//! chat service and must stay verbatim on the wire. Inbound frames are
//! decoded into the closed [`ServerEvent`] enumeration at the channel
//! boundary so the connection manager never matches on raw strings.

use crate::error::ChatError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

// Wire event names (protocol contract)
pub const EVENT_CONNECT: &str = "connect";
pub const EVENT_TOKEN: &str = "token";
pub const EVENT_INIT: &str = "init";
pub const EVENT_UNAUTHORIZED: &str = "unauthorized";
pub const EVENT_DISCONNECT: &str = "disconnect";
pub const EVENT_RECONNECTING: &str = "reconnecting";
pub const EVENT_STATUS: &str = "status";
pub const EVENT_ACCEPT: &str = "accept";
pub const EVENT_MESSAGE: &str = "message";
pub const EVENT_TRANSCRIPT: &str = "transcript";
pub const EVENT_ACK: &str = "ack";

/// One frame on the chat channel
///
/// `correlation_id` ties an `ack` frame back to the request (or credential
/// challenge) it answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub payload: Value,
}

impl WireMessage {
    pub fn new(event: &str, payload: Value) -> Self {
        Self {
            event: event.to_string(),
            correlation_id: None,
            payload,
        }
    }

    /// Frame for an acknowledged client request
    pub fn request(event: &str, payload: Value, correlation_id: Uuid) -> Self {
        Self {
            event: event.to_string(),
            correlation_id: Some(correlation_id),
            payload,
        }
    }

    /// Acknowledgment reply frame
    pub fn ack(correlation_id: Option<Uuid>, payload: Value) -> Self {
        Self {
            event: EVENT_ACK.to_string(),
            correlation_id,
            payload,
        }
    }
}

/// Body of an `ack` frame: a server-reported error or a result value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AckPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub result: Value,
}

impl AckPayload {
    pub fn ok(result: Value) -> Self {
        Self {
            error: None,
            result,
        }
    }

    pub fn err(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            result: Value::Null,
        }
    }
}

/// Chat user identity passed through the handshake
///
/// Field names are the wire contract. `geo_location` is reported in the
/// `init` notification but never included in the credential reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatUser {
    pub signer_user_id: u64,
    pub jwt: String,
    pub locale: String,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_location: Option<Value>,
}

impl ChatUser {
    /// Credential reply for the server's `token` challenge.
    /// Deliberately omits `geo_location`.
    pub fn credentials(&self) -> Value {
        json!({
            "signer_user_id": self.signer_user_id,
            "jwt": self.jwt,
            "locale": self.locale,
            "groups": self.groups,
        })
    }
}

/// Decoded inbound protocol event
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// Channel established
    Connect,
    /// Server requests credentials; reply with an ack on the same id
    Token { correlation_id: Option<Uuid> },
    /// Handshake complete, steady-state messaging permitted
    Init,
    /// Credentials rejected
    Unauthorized,
    /// Server-side disconnect with a reason
    Disconnect { reason: String },
    /// Transport is attempting to re-establish the channel
    Reconnecting,
    /// Operator status change
    Status(Value),
    /// Chat availability change
    Accept(Value),
    /// Incoming chat message
    Message(Value),
    /// Reply to an acknowledged client request
    Ack {
        correlation_id: Uuid,
        payload: AckPayload,
    },
}

impl ServerEvent {
    /// Decode a wire frame into a protocol event.
    /// Unknown event names are an error; the read loop drops them.
    pub fn decode(msg: WireMessage) -> Result<Self, ChatError> {
        let event = match msg.event.as_str() {
            EVENT_CONNECT => ServerEvent::Connect,
            EVENT_TOKEN => ServerEvent::Token {
                correlation_id: msg.correlation_id,
            },
            EVENT_INIT => ServerEvent::Init,
            EVENT_UNAUTHORIZED => ServerEvent::Unauthorized,
            EVENT_DISCONNECT => ServerEvent::Disconnect {
                reason: msg
                    .payload
                    .as_str()
                    .unwrap_or_default()
                    .to_string(),
            },
            EVENT_RECONNECTING => ServerEvent::Reconnecting,
            EVENT_STATUS => ServerEvent::Status(msg.payload),
            EVENT_ACCEPT => ServerEvent::Accept(msg.payload),
            EVENT_MESSAGE => ServerEvent::Message(msg.payload),
            EVENT_ACK => {
                let correlation_id = msg.correlation_id.ok_or_else(|| {
                    ChatError::InvalidMessage("ack frame without correlation_id".to_string())
                })?;
                let payload = serde_json::from_value(msg.payload).unwrap_or_default();
                ServerEvent::Ack {
                    correlation_id,
                    payload,
                }
            }
            other => {
                return Err(ChatError::InvalidMessage(format!(
                    "unknown event: {other}"
                )));
            }
        };
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> ChatUser {
        ChatUser {
            signer_user_id: 12,
            jwt: "jwt-token".to_string(),
            locale: "es".to_string(),
            groups: vec!["woo".to_string()],
            geo_location: Some(json!({ "country_short": "ES" })),
        }
    }

    #[test]
    fn test_credentials_omit_geo_location() {
        let creds = user().credentials();
        assert_eq!(creds["signer_user_id"], 12);
        assert_eq!(creds["jwt"], "jwt-token");
        assert_eq!(creds["locale"], "es");
        assert_eq!(creds["groups"], json!(["woo"]));
        assert!(creds.get("geo_location").is_none());
    }

    #[test]
    fn test_decode_known_events() {
        assert_eq!(
            ServerEvent::decode(WireMessage::new(EVENT_CONNECT, Value::Null)).unwrap(),
            ServerEvent::Connect
        );
        assert_eq!(
            ServerEvent::decode(WireMessage::new(EVENT_DISCONNECT, json!("transport error")))
                .unwrap(),
            ServerEvent::Disconnect {
                reason: "transport error".to_string()
            }
        );
        assert_eq!(
            ServerEvent::decode(WireMessage::new(EVENT_STATUS, json!("assigned"))).unwrap(),
            ServerEvent::Status(json!("assigned"))
        );
    }

    #[test]
    fn test_decode_ack_requires_correlation_id() {
        let missing = WireMessage::new(EVENT_ACK, json!({ "result": 1 }));
        assert!(ServerEvent::decode(missing).is_err());

        let id = Uuid::new_v4();
        let ok = WireMessage::ack(Some(id), json!({ "result": { "timeline": [] } }));
        match ServerEvent::decode(ok).unwrap() {
            ServerEvent::Ack {
                correlation_id,
                payload,
            } => {
                assert_eq!(correlation_id, id);
                assert_eq!(payload, AckPayload::ok(json!({ "timeline": [] })));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_decode_unknown_event_is_error() {
        let msg = WireMessage::new("upgrade", Value::Null);
        assert!(ServerEvent::decode(msg).is_err());
    }

    #[test]
    fn test_wire_message_roundtrip() {
        let id = Uuid::new_v4();
        let msg = WireMessage::request(EVENT_TRANSCRIPT, Value::Null, id);
        let bytes = serde_json::to_vec(&msg).unwrap();
        let back: WireMessage = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back, msg);
    }
}
