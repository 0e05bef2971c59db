use anyhow::{Result, bail};

use crate::core::AppConfig;
use crate::store::{KvStore, SqliteKvStore, USER_NAME_KEY};

/// Print the stored name, or replace it with `value`.
pub async fn run(config: &AppConfig, value: Option<String>) -> Result<()> {
    let store = SqliteKvStore::open(&config.db_path).await?;

    match value {
        Some(value) => {
            let value = value.trim();
            if value.is_empty() {
                bail!("Name can't be blank");
            }
            store.set(USER_NAME_KEY, value).await?;
            tracing::info!("Stored user name {}", value);
            println!("{}", value);
        }
        None => match store.get(USER_NAME_KEY).await? {
            Some(name) if !name.is_empty() => println!("{}", name),
            _ => println!("No name stored"),
        },
    }

    Ok(())
}
