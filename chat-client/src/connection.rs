//! Chat connection manager
//!
//! One manager owns at most one channel per session. `init` performs the
//! credential handshake exactly once and returns a clonable [`Handshake`]
//! future; steady-state messaging is a fire-and-forget [`Connection::send`]
//! or an acknowledged [`Connection::request`] raced against a timeout.
//! Every observable state change is reported through the dispatch callback.

use crate::error::ChatError;
use crate::notice::{Dispatch, Notice};
use crate::protocol::{AckPayload, ChatUser, ServerEvent, WireMessage};
use crate::transport::{TcpTransport, Transport};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use uuid::Uuid;

/// Shared handle to the live channel
pub type ChannelHandle = Arc<dyn Transport>;

type PendingMap = Arc<Mutex<HashMap<Uuid, oneshot::Sender<AckPayload>>>>;

/// Holds the handshake resolver until the server confirms `init`. Kept in
/// the session state so the sender outlives a failed session startup.
type ReadySlot = Arc<Mutex<Option<oneshot::Sender<ChannelHandle>>>>;

/// Where the session channel comes from
#[derive(Debug, Clone)]
pub enum ChatHost {
    /// Open a TCP channel to this address
    Addr(String),
    /// Use a pre-built channel directly (test doubles)
    Channel(ChannelHandle),
}

/// Session configuration resolved by the host application
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub host: ChatHost,
    pub user: ChatUser,
}

/// Clonable handshake result: resolves to the live channel once the server
/// confirms `init`
#[derive(Clone)]
pub struct Handshake {
    inner: Shared<BoxFuture<'static, Option<ChannelHandle>>>,
}

impl Handshake {
    /// Wait for the handshake to complete. `None` means the session task
    /// ended before the server ever confirmed.
    pub async fn ready(&self) -> Option<ChannelHandle> {
        self.inner.clone().await
    }
}

#[derive(Clone)]
struct Started {
    handshake: Handshake,
    pending: PendingMap,
    dispatch: Dispatch,
    ready: ReadySlot,
}

/// Chat connection manager
#[derive(Default)]
pub struct Connection {
    started: Mutex<Option<Started>>,
}

impl Connection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the session. Idempotent: while a session exists, later calls
    /// return the existing handshake without opening another channel.
    ///
    /// The configuration future is resolved on a spawned task; if it fails,
    /// no channel is created and the handshake stays pending. There is no
    /// rejection wiring: callers observe a handshake that never resolves.
    pub fn init<F>(&self, dispatch: Dispatch, config: F) -> Handshake
    where
        F: Future<Output = Result<SessionConfig, ChatError>> + Send + 'static,
    {
        let mut guard = self.started.lock().unwrap();
        if let Some(started) = guard.as_ref() {
            tracing::debug!("channel already open, reusing handshake");
            return started.handshake.clone();
        }

        let (ready_tx, ready_rx) = oneshot::channel::<ChannelHandle>();
        let handshake = Handshake {
            inner: async move { ready_rx.await.ok() }.boxed().shared(),
        };
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        // The resolver lives in the session state so a failed session
        // startup leaves the handshake pending without parking a task.
        let ready: ReadySlot = Arc::new(Mutex::new(Some(ready_tx)));
        *guard = Some(Started {
            handshake: handshake.clone(),
            pending: pending.clone(),
            dispatch: dispatch.clone(),
            ready: ready.clone(),
        });
        drop(guard);

        // Dispatched lock-free: the callback is host code and may call
        // straight back into the manager.
        (*dispatch)(Notice::Connecting);

        tokio::spawn(run_session(config, dispatch, pending, ready));
        handshake
    }

    /// Fire-and-forget emit
    ///
    /// Before `init` this is a silent no-op. After `init` it waits for the
    /// handshake, then writes; failures become an Error notification, never
    /// an error to the caller.
    pub async fn send(&self, event: &str, payload: Value) {
        self.send_labeled(event, payload, None).await
    }

    /// Like [`Connection::send`], with a caller-supplied error label used
    /// in place of the stringified failure
    pub async fn send_labeled(&self, event: &str, payload: Value, error_label: Option<&str>) {
        let Some(started) = self.started() else {
            return;
        };
        let Some(channel) = started.handshake.ready().await else {
            return;
        };
        if let Err(e) = channel
            .write_message(&WireMessage::new(event, payload))
            .await
        {
            let label = error_label
                .map(str::to_owned)
                .unwrap_or_else(|| e.to_string());
            (*started.dispatch)(Notice::Error(label));
        }
    }

    /// Acknowledged call raced against a timeout
    ///
    /// Exactly one outcome per call: the server result, a server-reported
    /// error (also dispatched as an Error notification), or
    /// [`ChatError::Timeout`]. The timeout path drops the pending entry, so
    /// a late server ack is discarded instead of firing the success path.
    pub async fn request(
        &self,
        event: &str,
        payload: Value,
        timeout: Duration,
    ) -> Result<Value, ChatError> {
        let Some(started) = self.started() else {
            return Err(ChatError::NotConnected);
        };
        let Some(channel) = started.handshake.ready().await else {
            return Err(ChatError::NotConnected);
        };

        let request_id = Uuid::new_v4();
        let (tx, rx) = oneshot::channel();
        started.pending.lock().unwrap().insert(request_id, tx);

        let msg = WireMessage::request(event, payload, request_id);
        if let Err(e) = channel.write_message(&msg).await {
            // Cleanup on send failure
            started.pending.lock().unwrap().remove(&request_id);
            return Err(e);
        }

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(ack)) => match ack.error {
                Some(error) => {
                    (*started.dispatch)(Notice::Error(error.clone()));
                    Err(ChatError::Server(error))
                }
                None => Ok(ack.result),
            },
            Ok(Err(_)) => Err(ChatError::Connection("Ack channel closed".to_string())),
            Err(_) => {
                // Timeout cleanup
                started.pending.lock().unwrap().remove(&request_id);
                Err(ChatError::Timeout)
            }
        }
    }

    fn started(&self) -> Option<Started> {
        self.started.lock().unwrap().clone()
    }
}

async fn run_session<F>(config: F, dispatch: Dispatch, pending: PendingMap, ready: ReadySlot)
where
    F: Future<Output = Result<SessionConfig, ChatError>> + Send + 'static,
{
    let config = match config.await {
        Ok(config) => config,
        Err(e) => {
            // No rejection wiring: the resolver stays in the session state,
            // so the handshake is left pending.
            tracing::warn!(error = %e, "chat session config failed");
            return;
        }
    };

    let channel: ChannelHandle = match config.host {
        ChatHost::Addr(addr) => match TcpTransport::connect(&addr).await {
            Ok(transport) => Arc::new(transport),
            Err(e) => {
                tracing::warn!(error = %e, "failed to open chat channel");
                (*dispatch)(Notice::Error(e.to_string()));
                return;
            }
        },
        ChatHost::Channel(channel) => channel,
    };

    read_loop(channel, config.user, dispatch, pending, ready.clone()).await;

    // Channel gone: drop the resolver so an unconfirmed handshake reports
    // the ended session instead of pending forever.
    ready.lock().unwrap().take();
}

/// Translate inbound protocol events into notifications for the lifetime
/// of the channel. Resolving the handshake on the server's `init` is the
/// only transition into the ready state.
async fn read_loop(
    channel: ChannelHandle,
    user: ChatUser,
    dispatch: Dispatch,
    pending: PendingMap,
    ready: ReadySlot,
) {
    loop {
        let msg = match channel.read_message().await {
            Ok(msg) => msg,
            Err(e) => {
                tracing::error!(error = %e, "chat channel read error");
                break;
            }
        };
        let event = match ServerEvent::decode(msg) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(error = %e, "dropping unrecognized frame");
                continue;
            }
        };

        match event {
            ServerEvent::Connect => (*dispatch)(Notice::Connected),
            ServerEvent::Token { correlation_id } => {
                (*dispatch)(Notice::TokenSent);
                let reply = WireMessage::ack(correlation_id, user.credentials());
                if let Err(e) = channel.write_message(&reply).await {
                    tracing::warn!(error = %e, "failed to send credentials");
                }
            }
            ServerEvent::Init => {
                (*dispatch)(Notice::Initialized {
                    signer_user_id: user.signer_user_id,
                    locale: user.locale.clone(),
                    groups: user.groups.clone(),
                    geo_location: user.geo_location.clone(),
                });
                (*dispatch)(Notice::TranscriptRequested);
                let tx = ready.lock().unwrap().take();
                if let Some(tx) = tx {
                    let _ = tx.send(channel.clone());
                }
            }
            ServerEvent::Unauthorized => {
                (*dispatch)(Notice::Unauthorized {
                    message: "User is not authorized".to_string(),
                });
                if let Err(e) = channel.close().await {
                    tracing::warn!(error = %e, "channel close failed");
                }
                break;
            }
            ServerEvent::Disconnect { reason } => (*dispatch)(Notice::Disconnected { reason }),
            ServerEvent::Reconnecting => (*dispatch)(Notice::Reconnecting),
            ServerEvent::Status(status) => (*dispatch)(Notice::StatusChanged(status)),
            ServerEvent::Accept(accept) => (*dispatch)(Notice::AvailabilityChanged(accept)),
            ServerEvent::Message(message) => (*dispatch)(Notice::MessageReceived(message)),
            ServerEvent::Ack {
                correlation_id,
                payload,
            } => {
                let tx = pending.lock().unwrap().remove(&correlation_id);
                match tx {
                    Some(tx) => {
                        let _ = tx.send(payload);
                    }
                    None => {
                        tracing::debug!(%correlation_id, "ack for unknown or expired request")
                    }
                }
            }
        }
    }
}
