use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Message types that are shown as pictures instead of text.
pub const IMAGE_TYPES: [&str; 4] = ["jpg", "png", "jpeg", "gif"];

/// One entry of the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub online: bool,
}

/// Domain model for a private chat message, already normalized from the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub sender: String,
    /// Not every producer sends it; live pushes from older servers omit it.
    pub recipient: Option<String>,
    /// Text body, or the URL of an uploaded file.
    pub content: String,
    /// `"text"` or the lowercase file extension of an attachment.
    pub kind: String,
    /// Seconds since the Unix epoch.
    pub timestamp: f64,
    pub seen: bool,
}

impl ChatMessage {
    pub fn is_image(&self) -> bool {
        IMAGE_TYPES.contains(&self.kind.as_str())
    }

    /// Whether this message belongs to the conversation between `me` and `partner`.
    pub fn belongs_to(&self, me: &str, partner: &str) -> bool {
        match self.recipient.as_deref() {
            Some(recipient) => {
                (self.sender == me && recipient == partner)
                    || (self.sender == partner && recipient == me)
            }
            None => self.sender == partner || self.sender == me,
        }
    }
}

/// Message record as produced by the server.
///
/// History rows carry the body in `message`, live pushes carry it in `msg`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireMessage {
    pub sender: String,
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub timestamp: Option<f64>,
    #[serde(default)]
    pub seen: Option<u8>,
}

impl From<WireMessage> for ChatMessage {
    fn from(wire: WireMessage) -> Self {
        let content = wire
            .message
            .filter(|body| !body.is_empty())
            .or(wire.msg)
            .unwrap_or_default();

        Self {
            sender: wire.sender,
            recipient: wire.recipient,
            content,
            kind: wire.kind.unwrap_or_else(|| "text".to_string()),
            timestamp: wire
                .timestamp
                .unwrap_or_else(|| Utc::now().timestamp() as f64),
            seen: wire.seen == Some(1),
        }
    }
}

/// Successful upload, as returned by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoredFile {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UploadResponse {
    Stored(StoredFile),
    Rejected { error: String },
}
