use anyhow::{Context, Result};
use async_trait::async_trait;
use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

use super::KvStore;
use crate::core::db::{async_db, initialize_db};

/// Store backed by the `kv` table of the client's sqlite database.
pub struct SqliteKvStore {
    db: Connection,
}

impl SqliteKvStore {
    /// Wrap an existing connection, creating the schema if needed.
    pub async fn new(db: Connection) -> Result<Self> {
        db.call(|conn| {
            initialize_db(conn)?;
            Ok(())
        })
        .await
        .context("initializing kv schema")?;
        Ok(Self { db })
    }

    pub async fn open(db_path: &str) -> Result<Self> {
        let db = async_db(db_path).await?;
        Self::new(db).await
    }
}

#[async_trait]
impl KvStore for SqliteKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_owned();
        let value = self
            .db
            .call(move |conn| {
                let value = conn
                    .query_row("SELECT value FROM kv WHERE key = ?", [key], |row| {
                        row.get::<_, String>(0)
                    })
                    .optional()?;
                Ok(value)
            })
            .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let key = key.to_owned();
        let value = value.to_owned();
        self.db
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO kv (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    [key, value],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }
}
