use std::sync::Arc;

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::HttpChatApi;
use crate::chat::{ChatController, ChatView};
use crate::core::AppConfig;
use crate::store::{KvStore, SqliteKvStore, USER_NAME_KEY};

pub mod chat;
pub mod history;
pub mod name;
pub mod send;

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Start an interactive chat session (default)
    Chat {},
    /// Print the conversation history
    History {
        /// Load history for this name instead of the stored one
        #[arg(long)]
        name: Option<String>,
    },
    /// Send a single message and print the reply
    Send {
        /// Send as this name instead of the stored one
        #[arg(long)]
        name: Option<String>,
        #[arg(required = true)]
        message: Vec<String>,
    },
    /// Show or change the stored user name
    Name { value: Option<String> },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base URL of the chat service, overrides MEGHA_API_URL
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Send diagnostics to stderr so they never mix with the transcript.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=warn", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Build a controller over the on-disk store and the configured
/// service, rendering into `view`.
async fn controller(config: &AppConfig, view: Arc<dyn ChatView>) -> Result<ChatController> {
    let store = SqliteKvStore::open(&config.db_path).await?;
    let api = HttpChatApi::new(&config.api_url);
    Ok(
        ChatController::new(Arc::new(store), Arc::new(api), view)
            .assistant_name(&config.assistant_name),
    )
}

/// Use `name` when given, otherwise fall back to the stored identity.
async fn resolve_name(config: &AppConfig, name: Option<String>) -> Result<String> {
    if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
        return Ok(name.trim().to_string());
    }
    let store = SqliteKvStore::open(&config.db_path).await?;
    store
        .get(USER_NAME_KEY)
        .await?
        .filter(|n| !n.is_empty())
        .ok_or(anyhow!(
            "No user name stored. Run `megha name <NAME>` or pass --name"
        ))
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    init_tracing();

    let mut config = AppConfig::default();
    if let Some(url) = &args.url {
        config = config.with_api_url(url);
    }
    tracing::debug!("Using chat service at {}", config.api_url);

    // Handle each sub command
    match args.command {
        Some(Command::Chat {}) | None => {
            chat::run(&config).await?;
        }
        Some(Command::History { name }) => {
            history::run(&config, name).await?;
        }
        Some(Command::Send { name, message }) => {
            send::run(&config, name, &message.join(" ")).await?;
        }
        Some(Command::Name { value }) => {
            name::run(&config, value).await?;
        }
    }

    Ok(())
}
