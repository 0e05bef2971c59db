pub mod controller;
pub use controller::{ChatController, Exchange, ExchangeOutcome, HistoryState};

pub mod prompt;
pub use prompt::{FixedName, NamePrompt};

pub mod view;
pub use view::{ChatView, MessageClass, RenderedMessage, TerminalView};
