use std::sync::Arc;

use anyhow::{Result, bail};

use crate::chat::{ExchangeOutcome, TerminalView};
use crate::core::AppConfig;

/// Send one message and wait for the reply. Exits with an error when
/// no reply was rendered so scripts can tell.
pub async fn run(config: &AppConfig, name: Option<String>, message: &str) -> Result<()> {
    let name = super::resolve_name(config, name).await?;
    let mut controller = super::controller(config, Arc::new(TerminalView::stdout())).await?;

    controller.set_name_field(&name);
    controller.set_message_field(message);
    let Some(exchange) = controller.send() else {
        bail!("Nothing to send");
    };

    match exchange.run().await {
        ExchangeOutcome::Replied(_) => Ok(()),
        ExchangeOutcome::Rejected(err) => bail!("Chat service refused the message: {}", err),
        ExchangeOutcome::Failed(err) => bail!("Failed to reach the chat service: {}", err),
    }
}
