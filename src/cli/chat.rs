use std::sync::Arc;

use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::task::{self, JoinSet};

use crate::chat::{ChatController, HistoryState, NamePrompt, TerminalView};
use crate::core::AppConfig;

/// A line typed at the chat prompt.
#[derive(Debug, PartialEq)]
enum Input<'a> {
    Message(&'a str),
    SetName(&'a str),
    ShowName,
    Help,
    Quit,
}

impl<'a> Input<'a> {
    fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();
        let Some(command) = trimmed.strip_prefix('/') else {
            return Input::Message(line);
        };
        let (cmd, rest) = command
            .split_once(char::is_whitespace)
            .unwrap_or((command, ""));
        match cmd {
            "name" if rest.trim().is_empty() => Input::ShowName,
            "name" => Input::SetName(rest.trim()),
            "quit" | "exit" => Input::Quit,
            _ => Input::Help,
        }
    }
}

const HELP: &str = "Commands:
  /name          show the name messages are sent as
  /name <NAME>   send as NAME from now on
  /quit          leave the chat (or Ctrl+D)
Anything else is sent as a message.";

/// Asks for a name on the chat prompt itself.
struct ReadlinePrompt<'a>(&'a mut DefaultEditor);

impl NamePrompt for ReadlinePrompt<'_> {
    fn ask_name(&mut self) -> Option<String> {
        // Ctrl+C and Ctrl+D both count as declining
        task::block_in_place(|| self.0.readline("Please enter your name: ")).ok()
    }
}

pub async fn run(config: &AppConfig) -> Result<()> {
    let mut rl = DefaultEditor::new().context("Failed to start line editor")?;

    let view = Arc::new(TerminalView::stdout());
    let mut controller = super::controller(config, view.clone()).await?;

    let state = controller.initialize(&mut ReadlinePrompt(&mut rl)).await?;
    match state {
        HistoryState::NoIdentity => {
            println!("No name set, use /name <NAME> to start chatting");
        }
        HistoryState::Failed => {
            println!("Couldn't load earlier messages");
        }
        _ => {}
    }
    println!(
        "Chatting with {} (Ctrl+D to exit, /help for commands)",
        config.assistant_name
    );

    match rl.create_external_printer() {
        Ok(printer) => view.attach_printer(Box::new(printer)),
        Err(e) => tracing::debug!("No external printer, writing replies to stdout: {}", e),
    }

    chat_loop(&mut rl, &mut controller).await
}

/// Keep non-blank lines for up-arrow recall.
fn record_line(rl: &mut DefaultEditor, line: &str) {
    if line.trim().is_empty() {
        return;
    }
    if let Err(e) = rl.add_history_entry(line) {
        tracing::debug!("Failed to record line in editor history: {}", e);
    }
}

async fn chat_loop(rl: &mut DefaultEditor, controller: &mut ChatController) -> Result<()> {
    // Every send runs on its own so a slow reply never blocks typing
    let mut exchanges = JoinSet::new();

    loop {
        while let Some(res) = exchanges.try_join_next() {
            if let Err(e) = res {
                tracing::error!("Chat exchange task failed: {}", e);
            }
        }

        let readline = task::block_in_place(|| rl.readline(">>> "));
        match readline {
            Ok(line) => {
                record_line(rl, &line);
                match Input::parse(&line) {
                    Input::Message(text) => {
                        controller.set_message_field(text);
                        if let Some(exchange) = controller.send() {
                            exchanges.spawn(exchange.run());
                        }
                    }
                    Input::SetName(name) => controller.set_name_field(name),
                    Input::ShowName => {
                        let name = controller.name_field().trim();
                        if name.is_empty() {
                            println!("No name set");
                        } else {
                            println!("{}", name);
                        }
                    }
                    Input::Help => println!("{}", HELP),
                    Input::Quit => break,
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }

    if !exchanges.is_empty() {
        tracing::debug!("Dropping {} unanswered messages", exchanges.len());
    }

    Ok(())
}
