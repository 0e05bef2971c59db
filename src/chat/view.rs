//! Rendering of chat messages.
use std::fmt;
use std::io::{self, Write};
use std::sync::Mutex;

use rustyline::ExternalPrinter;

/// Who a rendered line belongs to. Maps onto the class names the web
/// client styles messages with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageClass {
    User,
    Assistant,
}

impl MessageClass {
    pub fn css_class(&self) -> &'static str {
        match self {
            MessageClass::User => "chat-user",
            MessageClass::Assistant => "chat-megha",
        }
    }
}

impl fmt::Display for MessageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.css_class())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderedMessage {
    pub speaker: String,
    pub text: String,
    pub class: MessageClass,
}

impl RenderedMessage {
    pub fn new(speaker: &str, text: &str, class: MessageClass) -> Self {
        Self {
            speaker: speaker.to_string(),
            text: text.to_string(),
            class,
        }
    }
}

impl fmt::Display for RenderedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.speaker, self.text)
    }
}

/// The append-only message list the controller draws into.
///
/// Implementations are shared with in-flight exchanges so every
/// method takes `&self`.
pub trait ChatView: Send + Sync {
    fn append_message(&self, speaker: &str, text: &str, class: MessageClass);
    fn scroll_to_bottom(&self);
}

enum Sink {
    // Prints above the active readline prompt without mangling it
    Printer(Box<dyn ExternalPrinter + Send>),
    Stdout,
}

/// Renders messages as `speaker: text` lines in the terminal.
pub struct TerminalView {
    sink: Mutex<Sink>,
}

impl TerminalView {
    pub fn stdout() -> Self {
        Self {
            sink: Mutex::new(Sink::Stdout),
        }
    }

    pub fn with_printer(printer: Box<dyn ExternalPrinter + Send>) -> Self {
        Self {
            sink: Mutex::new(Sink::Printer(printer)),
        }
    }

    /// Route later messages through `printer`. The printer only drains
    /// while a line is being read so attach it once the prompt loop
    /// is about to start.
    pub fn attach_printer(&self, printer: Box<dyn ExternalPrinter + Send>) {
        if let Ok(mut sink) = self.sink.lock() {
            *sink = Sink::Printer(printer);
        }
    }
}

impl ChatView for TerminalView {
    fn append_message(&self, speaker: &str, text: &str, class: MessageClass) {
        let line = RenderedMessage::new(speaker, text, class).to_string();
        let Ok(mut sink) = self.sink.lock() else {
            println!("{}", line);
            return;
        };
        match &mut *sink {
            Sink::Printer(printer) => {
                if let Err(e) = printer.print(format!("{}\n", line)) {
                    tracing::warn!("External printer failed, falling back to stdout: {}", e);
                    println!("{}", line);
                    *sink = Sink::Stdout;
                }
            }
            Sink::Stdout => println!("{}", line),
        }
    }

    fn scroll_to_bottom(&self) {
        // New lines already land at the bottom of a terminal
        io::stdout().flush().ok();
    }
}
