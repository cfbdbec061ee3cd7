use std::path::PathBuf;

/// Commands the UI sends down to the network layer.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkCommand {
    /// Fetch the full user directory.
    LoadUsers,
    /// Announce that `username` opened the private room shared with `partner`.
    JoinPrivate { username: String, partner: String },
    /// Fetch the conversation history with `partner`.
    /// - generation: session generation at request time, echoed back so stale
    ///   responses can be dropped
    LoadHistory { partner: String, generation: u64 },
    SendMessage {
        sender: String,
        recipient: String,
        content: String,
        kind: String,
    },
    Typing { sender: String, recipient: String },
    /// Post a local file to the upload endpoint, then send it to `recipient`.
    Upload {
        path: PathBuf,
        sender: String,
        recipient: String,
    },
}
