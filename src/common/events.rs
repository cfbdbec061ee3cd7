use super::types::{ChatMessage, User};

/// Events the network layer pushes up to the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkEvent {
    Connected,
    UsersLoaded(Vec<User>),
    HistoryLoaded {
        partner: String,
        generation: u64,
        messages: Vec<ChatMessage>,
    },
    MessageReceived(ChatMessage),
    StatusChanged { user: String, online: bool },
    /// `recipient` is absent when the server does not echo it.
    Typing {
        sender: String,
        recipient: Option<String>,
    },
    Disconnected,
}
