use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tokio_rusqlite::Connection;

/// Open the sqlite database at `db_path`, creating its parent
/// directory when missing.
pub async fn async_db(db_path: &str) -> Result<Connection> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let db = Connection::open(db_path)
        .await
        .with_context(|| format!("opening database {}", db_path))?;
    Ok(db)
}

pub fn initialize_db(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS kv (
             key TEXT PRIMARY KEY,
             value TEXT NOT NULL
         );",
    )
}
