use std::sync::Arc;

use anyhow::{Result, bail};

use crate::chat::{HistoryState, TerminalView};
use crate::core::AppConfig;

pub async fn run(config: &AppConfig, name: Option<String>) -> Result<()> {
    let name = super::resolve_name(config, name).await?;
    let mut controller = super::controller(config, Arc::new(TerminalView::stdout())).await?;

    match controller.load_history(&name).await {
        HistoryState::Loaded(0) => println!("No messages yet for {}", name),
        HistoryState::Failed => bail!("Failed to load history for {}", name),
        _ => {}
    }

    Ok(())
}
