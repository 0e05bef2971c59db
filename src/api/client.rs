use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest;
use serde_json::Value;

use super::public::{ChatReply, ChatRequest};

/// The remote half of the chat: stored history and new replies.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Fetch every stored turn for `user_name`, oldest first.
    ///
    /// Items are returned raw so a bad entry only stops rendering at
    /// that entry; see `LogEntry::try_from`.
    async fn history(&self, user_name: &str) -> Result<Vec<Value>>;

    /// Send one message and wait for the assistant's answer.
    ///
    /// An `Err` means the exchange failed on the way (connection,
    /// body that isn't JSON, unknown shape). A refusal spelled out by
    /// the service comes back as `Ok(ChatReply::Rejected(..))`.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply>;
}

pub struct HttpChatApi {
    api_base_url: String,
    client: reqwest::Client,
}

impl HttpChatApi {
    pub fn new(api_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }
}

impl Default for HttpChatApi {
    fn default() -> Self {
        Self::new("http://127.0.0.1:5000")
    }
}

#[async_trait]
impl ChatApi for HttpChatApi {
    async fn history(&self, user_name: &str) -> Result<Vec<Value>> {
        let mut url = reqwest::Url::parse(&format!("{}/history", self.api_base_url))
            .with_context(|| format!("Invalid API url {}", self.api_base_url))?;
        url.query_pairs_mut().append_pair("user_name", user_name);

        // Status is not checked, a body that isn't a JSON array is the
        // failure regardless of what the service answered with
        let entries: Vec<Value> = self
            .client
            .get(url.as_str())
            .send()
            .await?
            .json()
            .await
            .with_context(|| "Attempted to parse chat history from json")?;

        Ok(entries)
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        let url = format!("{}/chat", self.api_base_url);

        // The service reports its own failures as `{"error": ..}` with
        // a 4xx/5xx status so the body is read regardless of status
        let body: Value = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?
            .json()
            .await
            .with_context(|| "Attempted to parse chat response from json")?;

        ChatReply::try_from(body)
    }
}
