//! Client side of the two endpoints exposed by the chat service.
pub mod client;
pub use client::{ChatApi, HttpChatApi};

pub mod public;
pub use public::{ChatReply, ChatRequest, LogEntry};
