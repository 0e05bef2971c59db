//! Wire types for the history and chat endpoints
use anyhow::{Error, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One stored turn of a conversation as returned by `/history`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct LogEntry {
    pub role: String,
    pub message: String,
}

impl LogEntry {
    pub fn new(role: &str, message: &str) -> Self {
        Self {
            role: role.to_string(),
            message: message.to_string(),
        }
    }

    /// Anything other than `user` was said by the assistant.
    pub fn is_user(&self) -> bool {
        self.role == "user"
    }
}

/// Read one raw history item leniently: a missing or non-string
/// `role` belongs to the assistant and a non-string `message` is
/// shown as its JSON text. Only items that aren't objects fail.
impl TryFrom<&Value> for LogEntry {
    type Error = Error;

    fn try_from(item: &Value) -> Result<Self, Error> {
        if !item.is_object() {
            return Err(anyhow!("History entry is not an object: {}", item));
        }
        let role = item["role"].as_str().unwrap_or_default().to_string();
        let message = match &item["message"] {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        Ok(Self { role, message })
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ChatRequest {
    pub user_name: String,
    pub message: String,
}

impl ChatRequest {
    pub fn new(user_name: &str, message: &str) -> Self {
        Self {
            user_name: user_name.to_string(),
            message: message.to_string(),
        }
    }
}

/// A well formed answer from `/chat`.
#[derive(Clone, Debug, PartialEq)]
pub enum ChatReply {
    Response(String),
    // The service answered but refused, e.g. `{"error": "rate limited"}`
    Rejected(String),
}

impl TryFrom<Value> for ChatReply {
    type Error = Error;

    fn try_from(body: Value) -> Result<Self, Error> {
        match &body["error"] {
            Value::Null => {}
            Value::String(err) => return Ok(ChatReply::Rejected(err.clone())),
            other => return Ok(ChatReply::Rejected(other.to_string())),
        }
        let response = body["response"]
            .as_str()
            .ok_or(anyhow!("Chat response missing `response` field: {}", body))?;
        Ok(ChatReply::Response(response.to_string()))
    }
}
