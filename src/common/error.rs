use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("realtime channel error: {0}")]
    Realtime(#[from] rust_socketio::Error),

    #[error("unexpected payload for `{0}`")]
    UnexpectedPayload(String),

    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid header value: {0}")]
    InvalidHeader(String),

    #[error("server rejected upload: {0}")]
    UploadRejected(String),

    #[error("audio output unavailable: {0}")]
    AudioUnavailable(String),
}
