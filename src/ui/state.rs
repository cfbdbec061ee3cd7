use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::common::{ChatMessage, NetworkCommand, User};
use crate::config::ForeignMessagePolicy;
use crate::notify::Notifier;

use super::bubble::Bubble;

/// Silence window after which the typing indicator clears.
pub const TYPING_TIMEOUT: Duration = Duration::from_millis(2000);
const TYPING_LABEL: &str = "typing...";

/// Who is chatting with whom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub local_user: String,
    pub active_partner: Option<String>,
    /// Bumped on every partner switch; history responses from an older
    /// generation are discarded.
    pub generation: u64,
}

/// Which pane owns the window on narrow layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    List,
    Conversation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Enter,
    Character,
}

/// UI-local state; everything the views read and the network events write.
pub struct AppState {
    pub session: Session,
    pub users: Vec<User>,
    pub search_text: String,
    pub unread: HashMap<String, usize>,
    pub bubbles: Vec<Bubble>,
    pub scroll_to_bottom: bool,
    pub input_text: String,
    pub attachment_path: Option<PathBuf>,
    pub layout: Layout,
    pub connected: bool,
    foreign_messages: ForeignMessagePolicy,
    typing_deadline: Option<Instant>,
}

impl AppState {
    pub fn new(local_user: String, foreign_messages: ForeignMessagePolicy) -> Self {
        Self {
            session: Session {
                local_user,
                active_partner: None,
                generation: 0,
            },
            users: Vec::new(),
            search_text: String::new(),
            unread: HashMap::new(),
            bubbles: Vec::new(),
            scroll_to_bottom: false,
            input_text: String::new(),
            attachment_path: None,
            layout: Layout::List,
            connected: false,
            foreign_messages,
            typing_deadline: None,
        }
    }

    pub fn active_partner(&self) -> Option<&str> {
        self.session.active_partner.as_deref()
    }

    // --- User directory ---

    pub fn load_users(&self) -> NetworkCommand {
        NetworkCommand::LoadUsers
    }

    pub fn search_users(&self) -> NetworkCommand {
        self.load_users()
    }

    pub fn apply_users(&mut self, users: Vec<User>) {
        self.users = users;
    }

    /// Users whose name contains the search text, ignoring case.
    pub fn visible_users(&self) -> Vec<&User> {
        let term = self.search_text.to_lowercase();
        self.users
            .iter()
            .filter(|user| user.username.to_lowercase().contains(&term))
            .collect()
    }

    pub fn on_status_change(&self, user: &str, online: bool) -> NetworkCommand {
        log::debug!("{user} is now {}", if online { "online" } else { "offline" });
        self.load_users()
    }

    // --- Conversation view ---

    pub fn start_chat(&mut self, partner: &str) -> Vec<NetworkCommand> {
        self.session.active_partner = Some(partner.to_string());
        self.session.generation += 1;
        self.bubbles.clear();
        self.typing_deadline = None;
        self.unread.remove(partner);
        self.layout = Layout::Conversation;

        vec![
            NetworkCommand::JoinPrivate {
                username: self.session.local_user.clone(),
                partner: partner.to_string(),
            },
            NetworkCommand::LoadHistory {
                partner: partner.to_string(),
                generation: self.session.generation,
            },
        ]
    }

    pub fn close_chat(&mut self) {
        self.layout = Layout::List;
        self.session.active_partner = None;
        self.session.generation += 1;
        self.typing_deadline = None;
    }

    pub fn apply_history(
        &mut self,
        partner: &str,
        generation: u64,
        messages: Vec<ChatMessage>,
        notifier: &dyn Notifier,
    ) {
        if generation != self.session.generation || self.active_partner() != Some(partner) {
            log::debug!(
                "Dropping stale history for {partner} (generation {generation}, current {})",
                self.session.generation
            );
            return;
        }

        for message in &messages {
            self.render_msg(message, notifier);
        }
    }

    // --- Message renderer ---

    pub fn render_msg(&mut self, message: &ChatMessage, notifier: &dyn Notifier) {
        let bubble = Bubble::from_message(message, &self.session.local_user);
        let received = bubble.is_received();
        self.bubbles.push(bubble);
        self.scroll_to_bottom = true;

        if received {
            play_quietly(notifier);
        }
    }

    /// Live push from the server.
    pub fn receive_message(&mut self, message: ChatMessage, notifier: &dyn Notifier) {
        let in_conversation = self
            .active_partner()
            .is_some_and(|partner| message.belongs_to(&self.session.local_user, partner));

        if in_conversation {
            self.render_msg(&message, notifier);
            return;
        }

        match self.foreign_messages {
            ForeignMessagePolicy::Render => self.render_msg(&message, notifier),
            ForeignMessagePolicy::Suppress => {
                log::debug!("Suppressed message from {} outside the open chat", message.sender);
            }
            ForeignMessagePolicy::Badge => {
                if message.sender != self.session.local_user {
                    *self.unread.entry(message.sender.clone()).or_insert(0) += 1;
                    play_quietly(notifier);
                }
            }
        }
    }

    // --- Composer ---

    pub fn send_message(&mut self) -> Option<NetworkCommand> {
        let partner = self.session.active_partner.clone()?;
        if self.input_text.trim().is_empty() {
            return None;
        }

        let content = std::mem::take(&mut self.input_text);
        Some(NetworkCommand::SendMessage {
            sender: self.session.local_user.clone(),
            recipient: partner,
            content,
            kind: "text".to_string(),
        })
    }

    /// Enter sends; every other keystroke is a typing notification.
    pub fn on_key(&mut self, key: KeyInput) -> Option<NetworkCommand> {
        match key {
            KeyInput::Enter => self.send_message(),
            KeyInput::Character => {
                let partner = self.active_partner()?;
                Some(NetworkCommand::Typing {
                    sender: self.session.local_user.clone(),
                    recipient: partner.to_string(),
                })
            }
        }
    }

    // --- Typing indicator ---

    /// Notices addressed to another user are ignored; servers that do not
    /// echo the recipient are trusted.
    pub fn on_typing(&mut self, sender: &str, recipient: Option<&str>, now: Instant) {
        let for_me = recipient.is_none_or(|recipient| recipient == self.session.local_user);
        if for_me && self.active_partner() == Some(sender) {
            self.typing_deadline = Some(now + TYPING_TIMEOUT);
        }
    }

    pub fn typing_indicator(&self, now: Instant) -> &'static str {
        match self.typing_deadline {
            Some(deadline) if now < deadline => TYPING_LABEL,
            _ => "",
        }
    }

    // --- Attachment uploader ---

    pub fn upload_file(&mut self) -> Option<NetworkCommand> {
        if self.attachment_path.is_none() {
            return None;
        }
        let Some(partner) = self.active_partner() else {
            log::debug!("Upload ignored: no conversation open");
            return None;
        };

        let recipient = partner.to_string();
        let path = self.attachment_path.take()?;
        Some(NetworkCommand::Upload {
            path,
            sender: self.session.local_user.clone(),
            recipient,
        })
    }
}

fn play_quietly(notifier: &dyn Notifier) {
    if let Err(err) = notifier.play() {
        log::debug!("Notification sound blocked: {err}");
    }
}
