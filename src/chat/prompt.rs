/// Asks the person at the keyboard for a display name.
///
/// Returning `None` (or an empty answer) means they declined.
pub trait NamePrompt {
    fn ask_name(&mut self) -> Option<String>;
}

/// A prompt with a predetermined answer, for non-interactive commands.
pub struct FixedName(pub Option<String>);

impl NamePrompt for FixedName {
    fn ask_name(&mut self) -> Option<String> {
        self.0.take()
    }
}
