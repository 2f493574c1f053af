use reqwest::StatusCode;
use thiserror::Error;

use crate::common::{ErrorBody, Message, NewMessage, OnlineCount};
use crate::server::SESSION_HEADER;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server answered {status}: {message}")]
    Status { status: StatusCode, message: String },
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Http(err) => err.status(),
            ClientError::Status { status, .. } => Some(*status),
        }
    }
}

/// Thin typed wrapper over the chat REST API. Every request carries the
/// session id so the server counts this client as online.
#[derive(Debug, Clone)]
pub struct ChatApiClient {
    http: reqwest::Client,
    base_url: String,
    session_id: String,
}

impl ChatApiClient {
    pub fn new(base_url: impl Into<String>, session_id: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            session_id: session_id.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub async fn fetch_messages(&self) -> Result<Vec<Message>, ClientError> {
        let response = self
            .http
            .get(self.url("/api/messages"))
            .header(SESSION_HEADER, &self.session_id)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn fetch_online_count(&self) -> Result<usize, ClientError> {
        let response = self
            .http
            .get(self.url("/api/online-count"))
            .header(SESSION_HEADER, &self.session_id)
            .send()
            .await?;
        let count: OnlineCount = check(response).await?.json().await?;
        Ok(count.count)
    }

    pub async fn create_message(&self, content: &str) -> Result<Message, ClientError> {
        let response = self
            .http
            .post(self.url("/api/messages"))
            .header(SESSION_HEADER, &self.session_id)
            .json(&NewMessage {
                content: content.to_string(),
            })
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unexpected response")
            .to_string(),
    };
    Err(ClientError::Status { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ChatApiClient::new("http://localhost:5000/", "s1");
        assert_eq!(client.url("/api/messages"), "http://localhost:5000/api/messages");
        assert_eq!(client.session_id(), "s1");
    }

    #[test]
    fn status_error_exposes_status() {
        let err = ClientError::Status {
            status: StatusCode::BAD_REQUEST,
            message: "Invalid message data".to_string(),
        };
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(
            err.to_string(),
            "server answered 400 Bad Request: Invalid message data"
        );
    }
}
