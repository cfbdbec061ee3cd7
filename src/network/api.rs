use std::path::Path;

use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};

use crate::common::{ChatMessage, ClientError, StoredFile, UploadResponse, User, WireMessage};

/// REST side of the chat backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, cookie: Option<&str>) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|err| ClientError::InvalidHeader(err.to_string()))?;
            headers.insert(COOKIE, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get_users(&self) -> Result<Vec<User>, ClientError> {
        let users = self
            .http
            .get(self.url("/get_users"))
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<User>>()
            .await?;
        Ok(users)
    }

    /// Full history with `partner`, in the order the server returns it.
    pub async fn get_history(&self, partner: &str) -> Result<Vec<ChatMessage>, ClientError> {
        let rows = self
            .http
            .get(self.url(&history_path(partner)))
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<WireMessage>>()
            .await?;
        Ok(rows.into_iter().map(ChatMessage::from).collect())
    }

    pub async fn upload(&self, path: &Path) -> Result<StoredFile, ClientError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));
        let response = self
            .http
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json::<UploadResponse>()
            .await?;

        match response {
            UploadResponse::Stored(file) => Ok(file),
            UploadResponse::Rejected { error } => Err(ClientError::UploadRejected(error)),
        }
    }
}

fn history_path(partner: &str) -> String {
    format!("/get_history/{}", urlencoding::encode(partner))
}

/// Resolve a server-relative attachment URL for display.
pub fn resolve_url(base_url: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            url.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::test_server::TestServer;

    #[test]
    fn history_path_escapes_partner() {
        assert_eq!(history_path("bob"), "/get_history/bob");
        assert_eq!(history_path("bob smith/2"), "/get_history/bob%20smith%2F2");
    }

    #[test]
    fn base_url_is_normalized() {
        let api = ApiClient::new("http://localhost:5000/", None).unwrap();
        assert_eq!(api.url("/get_users"), "http://localhost:5000/get_users");
    }

    #[test]
    fn invalid_cookie_is_rejected() {
        let err = ApiClient::new("http://localhost:5000", Some("bad\ncookie")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidHeader(_)));
    }

    #[test]
    fn relative_upload_urls_resolve_against_server() {
        assert_eq!(
            resolve_url("http://localhost:5000/", "/static/uploads/1_x.png"),
            "http://localhost:5000/static/uploads/1_x.png"
        );
        assert_eq!(
            resolve_url("http://localhost:5000", "https://cdn.example.org/x.png"),
            "https://cdn.example.org/x.png"
        );
    }

    #[tokio::test]
    async fn get_users_reads_directory() {
        let server = TestServer::start(vec![(
            "GET /get_users",
            200,
            r#"[{"username": "alice", "online": true}, {"username": "bob", "online": false}]"#.into(),
        )])
        .await;
        let api = ApiClient::new(&server.base_url, None).unwrap();

        let users = api.get_users().await.unwrap();
        assert_eq!(
            users,
            vec![
                User { username: "alice".into(), online: true },
                User { username: "bob".into(), online: false },
            ]
        );
    }

    #[tokio::test]
    async fn get_history_normalizes_rows_in_order() {
        let server = TestServer::start(vec![(
            "GET /get_history/bob%20smith",
            200,
            r#"[{"id": 1, "sender": "bob smith", "recipient": "alice", "message": "hi", "type": "text", "timestamp": 1.0, "seen": 1},
                {"id": 2, "sender": "alice", "recipient": "bob smith", "message": "/f/x.png", "type": "png", "timestamp": 2.0, "seen": 0}]"#
                .into(),
        )])
        .await;
        let api = ApiClient::new(&server.base_url, None).unwrap();

        let history = api.get_history("bob smith").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "hi");
        assert!(history[0].seen);
        assert!(history[1].is_image());
    }

    #[tokio::test]
    async fn failed_fetch_is_an_error() {
        let server = TestServer::start(Vec::new()).await;
        let api = ApiClient::new(&server.base_url, None).unwrap();

        assert!(matches!(api.get_users().await, Err(ClientError::Http(_))));
    }

    #[tokio::test]
    async fn upload_posts_multipart_file_field() {
        let server = TestServer::start(vec![(
            "POST /upload",
            200,
            r#"{"url": "/f/x.png", "type": "png"}"#.into(),
        )])
        .await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.png");
        std::fs::write(&path, b"not really a png").unwrap();
        let api = ApiClient::new(&server.base_url, Some("session=abc")).unwrap();

        let stored = api.upload(&path).await.unwrap();
        assert_eq!(
            stored,
            StoredFile {
                url: "/f/x.png".into(),
                kind: "png".into()
            }
        );

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        let body = requests[0].body_text();
        assert!(body.contains(r#"name="file""#));
        assert!(body.contains(r#"filename="x.png""#));
        assert!(body.contains("not really a png"));
    }

    #[tokio::test]
    async fn upload_error_body_is_rejected() {
        let server = TestServer::start(vec![(
            "POST /upload",
            200,
            r#"{"error": "no filename"}"#.into(),
        )])
        .await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();
        let api = ApiClient::new(&server.base_url, None).unwrap();

        let err = api.upload(&path).await.unwrap_err();
        assert!(matches!(err, ClientError::UploadRejected(ref reason) if reason == "no filename"));
    }
}
