use tokio::sync::mpsc;

use crate::common::{ChatMessage, NetworkCommand, NetworkEvent};

use super::api::ApiClient;
use super::transport::{ClientEvent, Inbound, RealtimeChannel, ServerEvent};

pub struct ChatClient {
    api: ApiClient,
    cookie: Option<String>,
    event_sender: mpsc::Sender<NetworkEvent>,
    command_receiver: mpsc::Receiver<NetworkCommand>,
    /// Events produced by spawned tasks (finished uploads) waiting to be emitted.
    outbound_sender: mpsc::Sender<ClientEvent>,
    outbound_receiver: mpsc::Receiver<ClientEvent>,
}

impl ChatClient {
    pub fn new(
        api: ApiClient,
        cookie: Option<String>,
        event_sender: mpsc::Sender<NetworkEvent>,
        command_receiver: mpsc::Receiver<NetworkCommand>,
    ) -> Self {
        let (outbound_sender, outbound_receiver) = mpsc::channel(16);
        Self {
            api,
            cookie,
            event_sender,
            command_receiver,
            outbound_sender,
            outbound_receiver,
        }
    }

    /// Runs until the UI drops its command sender. A realtime outage only
    /// disables emits and pushes; REST commands keep being served.
    pub async fn run(mut self) {
        let (inbound_sender, mut inbound_receiver) = mpsc::channel(64);

        let channel = match RealtimeChannel::connect(
            self.api.base_url(),
            self.cookie.as_deref(),
            inbound_sender,
        )
        .await
        {
            Ok(channel) => {
                self.notify(NetworkEvent::Connected).await;
                Some(channel)
            }
            Err(err) => {
                log::warn!("Realtime channel unavailable ({err}); continuing with REST only");
                self.notify(NetworkEvent::Disconnected).await;
                None
            }
        };

        log::info!("Network event loop started");

        loop {
            tokio::select! {
                command = self.command_receiver.recv() => {
                    let Some(command) = command else {
                        break;
                    };
                    if let Some(event) = self.handle_command(command) {
                        emit(channel.as_ref(), &event).await;
                    }
                }
                Some(event) = self.outbound_receiver.recv() => {
                    emit(channel.as_ref(), &event).await;
                }
                Some(inbound) = inbound_receiver.recv() => {
                    match inbound {
                        Inbound::Connected => self.notify(NetworkEvent::Connected).await,
                        Inbound::Event(event) => self.dispatch(event).await,
                        Inbound::Closed => {
                            log::warn!("Realtime channel closed by server");
                            self.notify(NetworkEvent::Disconnected).await;
                        }
                    }
                }
            }
        }

        if let Some(channel) = channel {
            channel.disconnect().await;
        }
        log::info!("Network event loop stopped");
    }

    /// Emit-only commands map straight to an event; REST calls are spawned so
    /// the loop keeps draining the channel while they are in flight.
    fn handle_command(&self, command: NetworkCommand) -> Option<ClientEvent> {
        match command {
            NetworkCommand::LoadUsers => {
                let api = self.api.clone();
                let events = self.event_sender.clone();
                tokio::spawn(async move {
                    match api.get_users().await {
                        Ok(users) => {
                            let _ = events.send(NetworkEvent::UsersLoaded(users)).await;
                        }
                        Err(err) => log::warn!("Failed to load users: {err}"),
                    }
                });
                None
            }
            NetworkCommand::JoinPrivate { username, partner } => {
                Some(ClientEvent::JoinPrivate { username, partner })
            }
            NetworkCommand::LoadHistory {
                partner,
                generation,
            } => {
                let api = self.api.clone();
                let events = self.event_sender.clone();
                tokio::spawn(async move {
                    match api.get_history(&partner).await {
                        Ok(messages) => {
                            let _ = events
                                .send(NetworkEvent::HistoryLoaded {
                                    partner,
                                    generation,
                                    messages,
                                })
                                .await;
                        }
                        Err(err) => log::warn!("Failed to load history with {partner}: {err}"),
                    }
                });
                None
            }
            NetworkCommand::SendMessage {
                sender,
                recipient,
                content,
                kind,
            } => Some(ClientEvent::PrivateMessage {
                msg: content,
                sender,
                recipient,
                kind,
            }),
            NetworkCommand::Typing { sender, recipient } => {
                Some(ClientEvent::Typing { sender, recipient })
            }
            NetworkCommand::Upload {
                path,
                sender,
                recipient,
            } => {
                let api = self.api.clone();
                let outbound = self.outbound_sender.clone();
                tokio::spawn(async move {
                    match api.upload(&path).await {
                        Ok(file) => {
                            log::info!("Uploaded {} as {}", path.display(), file.url);
                            let event = ClientEvent::PrivateMessage {
                                msg: file.url,
                                sender,
                                recipient,
                                kind: file.kind,
                            };
                            let _ = outbound.send(event).await;
                        }
                        Err(err) => log::warn!("Upload of {} failed: {err}", path.display()),
                    }
                });
                None
            }
        }
    }

    async fn dispatch(&self, event: ServerEvent) {
        let event = match event {
            ServerEvent::NewMessage(wire) => NetworkEvent::MessageReceived(ChatMessage::from(wire)),
            ServerEvent::StatusChange(change) => NetworkEvent::StatusChanged {
                online: change.status == "online",
                user: change.user,
            },
            ServerEvent::IsTyping(notice) => NetworkEvent::Typing {
                sender: notice.sender,
                recipient: notice.recipient,
            },
        };
        self.notify(event).await;
    }

    async fn notify(&self, event: NetworkEvent) {
        if let Err(err) = self.event_sender.send(event).await {
            log::warn!("Failed to notify UI: {err}");
        }
    }
}

async fn emit(channel: Option<&RealtimeChannel>, event: &ClientEvent) {
    let Some(channel) = channel else {
        log::warn!("Dropping {event:?}: realtime channel is down");
        return;
    };
    if let Err(err) = channel.emit(event).await {
        log::warn!("Failed to emit {event:?}: {err}");
    }
}
