use anyhow::{Context, Result};
use arboard::Clipboard;

use crate::models::Conversation;
use crate::resume::shell_command;

/// Trait for clipboard operations (allows mocking in tests)
trait ClipboardProvider {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// Real clipboard implementation using arboard
struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    fn new() -> Result<Self> {
        let clipboard = Clipboard::new().context("Failed to initialize clipboard")?;
        Ok(Self { clipboard })
    }
}

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.clipboard.set_text(text).context("Failed to set clipboard contents")?;
        Ok(())
    }
}

fn copy_resume_command_with(
    conversation: &Conversation,
    provider: &mut dyn ClipboardProvider,
) -> Result<String> {
    let command = shell_command(conversation);
    provider.set_text(&command)?;
    Ok(command)
}

/// Copy `cd <cwd> && claude --resume <id>` for `conversation` to the system
/// clipboard, returning the copied command.
///
/// # Errors
/// Returns error if the clipboard is unavailable (headless session, no display
/// server) or refuses the write.
pub fn copy_resume_command(conversation: &Conversation) -> Result<String> {
    let mut clipboard = SystemClipboard::new()?;
    copy_resume_command_with(conversation, &mut clipboard)
}
