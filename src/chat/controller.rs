use std::sync::Arc;

use anyhow::{Context, Result};

use super::prompt::NamePrompt;
use super::view::{ChatView, MessageClass};
use crate::api::{ChatApi, ChatReply, ChatRequest, LogEntry};
use crate::core::config::DEFAULT_ASSISTANT_NAME;
use crate::store::{KvStore, USER_NAME_KEY};

/// Result of loading the conversation history for the identity.
///
/// The pending stretch in between is the `load_history` future
/// itself, which holds the controller exclusively until it resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryState {
    /// No name was stored or supplied so nothing was requested
    NoIdentity,
    /// Number of entries rendered
    Loaded(usize),
    /// Entries rendered before the failure stay in the view
    Failed,
}

/// How a single send ended.
#[derive(Clone, Debug, PartialEq)]
pub enum ExchangeOutcome {
    Replied(String),
    Rejected(String),
    Failed(String),
}

/// Drives one chat window: who is talking, what has been rendered
/// and the two calls to the chat service.
///
/// The controller owns the contents of the name and message fields.
/// Sending does not wait for the service; it renders the message
/// right away and hands back an `Exchange` to be awaited or spawned
/// so several sends can be in flight at once.
pub struct ChatController {
    store: Arc<dyn KvStore>,
    api: Arc<dyn ChatApi>,
    view: Arc<dyn ChatView>,
    assistant_name: String,
    identity: Option<String>,
    name_field: String,
    message_field: String,
    history: HistoryState,
}

impl ChatController {
    pub fn new(store: Arc<dyn KvStore>, api: Arc<dyn ChatApi>, view: Arc<dyn ChatView>) -> Self {
        Self {
            store,
            api,
            view,
            assistant_name: DEFAULT_ASSISTANT_NAME.to_string(),
            identity: None,
            name_field: String::new(),
            message_field: String::new(),
            history: HistoryState::NoIdentity,
        }
    }

    pub fn assistant_name(mut self, name: &str) -> Self {
        self.assistant_name = name.to_string();
        self
    }

    /// Resolve the identity and render its history.
    ///
    /// A stored name wins and the prompt is never shown. Otherwise the
    /// prompt is asked once and the trimmed answer is persisted; an
    /// empty or whitespace-only answer counts as declining. Only
    /// store failures are returned as errors, history failures are
    /// logged and reported through the returned state.
    pub async fn initialize(&mut self, prompt: &mut dyn NamePrompt) -> Result<HistoryState> {
        let stored = self
            .store
            .get(USER_NAME_KEY)
            .await
            .context("Failed to read stored user name")?
            .filter(|name| !name.is_empty());

        let identity = match stored {
            Some(name) => Some(name),
            None => {
                let answer = prompt
                    .ask_name()
                    .map(|name| name.trim().to_string())
                    .filter(|name| !name.is_empty());
                if let Some(name) = &answer {
                    self.store
                        .set(USER_NAME_KEY, name)
                        .await
                        .context("Failed to persist user name")?;
                }
                answer
            }
        };

        let Some(identity) = identity else {
            tracing::info!("No user name supplied, skipping history");
            self.history = HistoryState::NoIdentity;
            return Ok(self.history);
        };

        self.name_field = identity.clone();
        self.identity = Some(identity.clone());
        Ok(self.load_history(&identity).await)
    }

    /// Render every stored turn for `identity` in the order the
    /// service returns them, then scroll once.
    ///
    /// Entries are rendered one at a time. An entry that can't be read
    /// stops rendering there: earlier rows stay and no scroll happens.
    pub async fn load_history(&mut self, identity: &str) -> HistoryState {
        let items = match self.api.history(identity).await {
            Ok(items) => items,
            Err(e) => {
                tracing::error!("Error loading history: {:#}", e);
                self.history = HistoryState::Failed;
                return self.history;
            }
        };

        for item in items.iter() {
            let entry = match LogEntry::try_from(item) {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::error!("Error loading history: {:#}", e);
                    self.history = HistoryState::Failed;
                    return self.history;
                }
            };
            let (speaker, class) = if entry.is_user() {
                (identity, MessageClass::User)
            } else {
                (self.assistant_name.as_str(), MessageClass::Assistant)
            };
            self.view.append_message(speaker, &entry.message, class);
        }
        self.view.scroll_to_bottom();
        tracing::debug!("Rendered {} history entries for {}", items.len(), identity);

        self.history = HistoryState::Loaded(items.len());
        self.history
    }

    /// Send whatever is in the name and message fields.
    ///
    /// Returns `None` without touching the view or the network when
    /// either field is blank after trimming. Otherwise the message is
    /// echoed immediately, the message field is cleared and the
    /// pending request is returned.
    pub fn send(&mut self) -> Option<Exchange> {
        let user_name = self.name_field.trim();
        let message = self.message_field.trim();
        if user_name.is_empty() || message.is_empty() {
            return None;
        }

        self.view.append_message(user_name, message, MessageClass::User);
        self.view.scroll_to_bottom();

        let exchange = Exchange {
            api: Arc::clone(&self.api),
            view: Arc::clone(&self.view),
            assistant_name: self.assistant_name.clone(),
            request: ChatRequest::new(user_name, message),
        };
        self.message_field.clear();

        Some(exchange)
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn history_state(&self) -> HistoryState {
        self.history
    }

    pub fn name_field(&self) -> &str {
        &self.name_field
    }

    /// Edit the name field. The stored identity is left alone.
    pub fn set_name_field(&mut self, value: &str) {
        self.name_field = value.to_string();
    }

    pub fn message_field(&self) -> &str {
        &self.message_field
    }

    pub fn set_message_field(&mut self, value: &str) {
        self.message_field = value.to_string();
    }
}

/// One in-flight `POST /chat`, already echoed in the view.
pub struct Exchange {
    api: Arc<dyn ChatApi>,
    view: Arc<dyn ChatView>,
    assistant_name: String,
    request: ChatRequest,
}

impl Exchange {
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }

    /// Wait for the reply and render it. Failures are logged and leave
    /// the echoed message as the last word; nothing is retried.
    pub async fn run(self) -> ExchangeOutcome {
        match self.api.chat(&self.request).await {
            Ok(ChatReply::Response(text)) => {
                self.view
                    .append_message(&self.assistant_name, &text, MessageClass::Assistant);
                self.view.scroll_to_bottom();
                ExchangeOutcome::Replied(text)
            }
            Ok(ChatReply::Rejected(err)) => {
                tracing::error!("Error: {}", err);
                ExchangeOutcome::Rejected(err)
            }
            Err(e) => {
                tracing::error!("Error sending message: {:#}", e);
                ExchangeOutcome::Failed(e.to_string())
            }
        }
    }
}
