use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::{Result, anyhow};
use async_trait::async_trait;

use super::KvStore;

/// Process-local store. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryKvStore(RwLock<HashMap<String, String>>);

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_with_entries(entries: &[(&str, &str)]) -> Self {
        let map = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self(RwLock::new(map))
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let map = self.0.read().map_err(|_| anyhow!("kv store lock poisoned"))?;
        Ok(map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.0.write().map_err(|_| anyhow!("kv store lock poisoned"))?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn it_overwrites_existing_values() {
        let store = MemoryKvStore::new_with_entries(&[("userName", "Alice")]);
        assert_eq!(store.get("userName").await.unwrap(), Some("Alice".to_string()));

        store.set("userName", "Bob").await.unwrap();
        assert_eq!(store.get("userName").await.unwrap(), Some("Bob".to_string()));
        assert_eq!(store.get("missing").await.unwrap(), None);
    }
}
