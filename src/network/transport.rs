use futures::FutureExt;
use futures::future::BoxFuture;
use rust_socketio::asynchronous::{Client, ClientBuilder};
use rust_socketio::{Event, Payload};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::sync::mpsc;

use crate::common::{ClientError, WireMessage};

/// Server events this client subscribes to.
const SUBSCRIBED_EVENTS: [&str; 3] = ["new_message", "status_change", "is_typing"];

/// Events this client emits on the realtime channel.
///
/// Serialized adjacently tagged so the tag becomes the Socket.IO event name
/// and `data` the single argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    JoinPrivate {
        username: String,
        partner: String,
    },
    PrivateMessage {
        msg: String,
        sender: String,
        recipient: String,
        #[serde(rename = "type")]
        kind: String,
    },
    Typing {
        sender: String,
        recipient: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusChange {
    pub user: String,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypingNotice {
    pub sender: String,
    #[serde(default)]
    pub recipient: Option<String>,
}

/// Events pushed by the server.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    NewMessage(WireMessage),
    StatusChange(StatusChange),
    IsTyping(TypingNotice),
}

/// What the socket callbacks hand to the network loop.
#[derive(Debug)]
pub enum Inbound {
    Connected,
    Event(ServerEvent),
    Closed,
}

/// Split an outgoing event into its Socket.IO name and argument.
pub fn encode(event: &ClientEvent) -> Result<(String, Value), ClientError> {
    let mut frame = serde_json::to_value(event)?;
    let name = frame["event"].as_str().unwrap_or_default().to_string();
    let data = frame["data"].take();
    Ok((name, data))
}

pub fn decode(name: &str, data: Value) -> Result<ServerEvent, ClientError> {
    Ok(serde_json::from_value(json!({ "event": name, "data": data }))?)
}

fn decode_payload(name: &str, payload: Payload) -> Result<ServerEvent, ClientError> {
    match payload {
        Payload::Text(mut values) if !values.is_empty() => decode(name, values.swap_remove(0)),
        _ => Err(ClientError::UnexpectedPayload(name.to_string())),
    }
}

fn forward(
    name: &'static str,
    inbound: mpsc::Sender<Inbound>,
) -> impl FnMut(Payload, Client) -> BoxFuture<'static, ()> + Send + Sync + 'static {
    move |payload, _socket| {
        let inbound = inbound.clone();
        async move {
            match decode_payload(name, payload) {
                Ok(event) => {
                    let _ = inbound.send(Inbound::Event(event)).await;
                }
                Err(err) => log::debug!("Ignoring `{name}` push: {err}"),
            }
        }
        .boxed()
    }
}

fn lifecycle(
    signal: fn() -> Inbound,
    inbound: mpsc::Sender<Inbound>,
) -> impl FnMut(Payload, Client) -> BoxFuture<'static, ()> + Send + Sync + 'static {
    move |_payload, _socket| {
        let inbound = inbound.clone();
        async move {
            let _ = inbound.send(signal()).await;
        }
        .boxed()
    }
}

/// Socket.IO connection to the chat server.
pub struct RealtimeChannel {
    socket: Client,
}

impl RealtimeChannel {
    /// Connect to `base_url`, forwarding the session cookie on the opening
    /// request. Subscribed pushes are decoded and sent to `inbound`.
    pub async fn connect(
        base_url: &str,
        cookie: Option<&str>,
        inbound: mpsc::Sender<Inbound>,
    ) -> Result<Self, ClientError> {
        let mut builder = ClientBuilder::new(base_url).namespace("/");
        if let Some(cookie) = cookie {
            builder = builder.opening_header("Cookie", cookie.to_string());
        }

        for name in SUBSCRIBED_EVENTS {
            builder = builder.on(name, forward(name, inbound.clone()));
        }
        builder = builder
            .on(Event::Connect, lifecycle(|| Inbound::Connected, inbound.clone()))
            .on(Event::Close, lifecycle(|| Inbound::Closed, inbound));

        let socket = builder.connect().await?;
        log::info!("Realtime channel connected to {base_url}");
        Ok(Self { socket })
    }

    pub async fn emit(&self, event: &ClientEvent) -> Result<(), ClientError> {
        let (name, data) = encode(event)?;
        self.socket.emit(name.as_str(), data).await?;
        Ok(())
    }

    pub async fn disconnect(self) {
        if let Err(err) = self.socket.disconnect().await {
            log::debug!("Realtime channel disconnect failed: {err}");
        }
    }
}
