//! Key-value persistence for client preferences.
//!
//! The client only ever keeps one value around, the user's display
//! name, but it goes through the `KvStore` capability so the chat
//! controller never touches a database directly.
use anyhow::Result;
use async_trait::async_trait;

pub mod memory;
pub use memory::MemoryKvStore;

pub mod sqlite;
pub use sqlite::SqliteKvStore;

/// Key the display name is persisted under.
pub const USER_NAME_KEY: &str = "userName";

#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}
