use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Domain model đại diện một tin nhắn chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Body of `POST /api/messages` after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnlineCount {
    pub count: usize,
}

/// Error payload returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("request body must be an object with a string `content` field")]
    MissingContent,
    #[error("message content is empty")]
    EmptyContent,
}

impl NewMessage {
    /// Validate a decoded JSON body. Only an object carrying a non-blank
    /// string `content` is accepted; extra fields are ignored.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let content = value
            .as_object()
            .and_then(|object| object.get("content"))
            .and_then(Value::as_str)
            .ok_or(ValidationError::MissingContent)?;

        let message = Self {
            content: content.to_string(),
        };
        message.validate()?;
        Ok(message)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.content.trim().is_empty() {
            return Err(ValidationError::EmptyContent);
        }
        Ok(())
    }
}
