//! Test utilities for integration tests
#![allow(dead_code)]
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::Value;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

use megha::api::{ChatApi, ChatReply, ChatRequest, HttpChatApi};
use megha::chat::{ChatController, ChatView, MessageClass, NamePrompt, RenderedMessage};
use megha::store::{KvStore, SqliteKvStore, USER_NAME_KEY};

/// Keeps every rendered message so tests can assert on the view.
#[derive(Default)]
pub struct RecordingView {
    messages: Mutex<Vec<RenderedMessage>>,
    scrolls: AtomicUsize,
}

impl RecordingView {
    pub fn messages(&self) -> Vec<RenderedMessage> {
        self.messages.lock().unwrap().clone()
    }

    /// Rendered messages as `speaker: text [class]`.
    pub fn lines(&self) -> Vec<String> {
        self.messages()
            .iter()
            .map(|m| format!("{} [{}]", m, m.class))
            .collect()
    }

    pub fn scrolls(&self) -> usize {
        self.scrolls.load(Ordering::SeqCst)
    }
}

impl ChatView for RecordingView {
    fn append_message(&self, speaker: &str, text: &str, class: MessageClass) {
        self.messages
            .lock()
            .unwrap()
            .push(RenderedMessage::new(speaker, text, class));
    }

    fn scroll_to_bottom(&self) {
        self.scrolls.fetch_add(1, Ordering::SeqCst);
    }
}

/// Answers the name prompt and counts how often it was shown.
pub struct CountingPrompt {
    pub answer: Option<String>,
    pub shown: usize,
}

impl CountingPrompt {
    pub fn new(answer: Option<&str>) -> Self {
        Self {
            answer: answer.map(String::from),
            shown: 0,
        }
    }
}

impl NamePrompt for CountingPrompt {
    fn ask_name(&mut self) -> Option<String> {
        self.shown += 1;
        self.answer.clone()
    }
}

/// Replies to each message after a per-message delay, echoing the
/// message back. Unknown messages fail.
pub struct DelayedApi {
    pub delays: Vec<(String, Duration)>,
}

#[async_trait]
impl ChatApi for DelayedApi {
    async fn history(&self, _user_name: &str) -> Result<Vec<Value>> {
        Ok(vec![])
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        let (_, delay) = self
            .delays
            .iter()
            .find(|(msg, _)| *msg == request.message)
            .ok_or(anyhow!("unexpected message {}", request.message))?;
        tokio::time::sleep(*delay).await;
        Ok(ChatReply::Response(format!("re: {}", request.message)))
    }
}

/// A controller talking to `api_url` with an in-memory sqlite store,
/// optionally seeded with a stored name.
pub async fn test_controller(
    api_url: &str,
    stored_name: Option<&str>,
) -> (ChatController, Arc<RecordingView>, Arc<SqliteKvStore>) {
    let db = tokio_rusqlite::Connection::open_in_memory()
        .await
        .expect("Failed to open in-memory db");
    let store = Arc::new(
        SqliteKvStore::new(db)
            .await
            .expect("Failed to initialize kv store"),
    );
    if let Some(name) = stored_name {
        store
            .set(USER_NAME_KEY, name)
            .await
            .expect("Failed to seed user name");
    }
    let view = Arc::new(RecordingView::default());
    let controller = ChatController::new(
        store.clone(),
        Arc::new(HttpChatApi::new(api_url)),
        view.clone(),
    );
    (controller, view, store)
}

/// Shared buffer that collects formatted log output.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Capture logs on the current thread until the guard drops.
    /// Tests using this must run on the current thread runtime.
    pub fn install() -> (Self, DefaultGuard) {
        let capture = Self::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_ansi(false)
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

pub struct LogWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter(Arc::clone(&self.0))
    }
}
