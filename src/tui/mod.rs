// TUI module for interactive conversation search
mod app;
mod events;
mod layout;
pub mod preview;
mod rendering;
mod terminal;

use anyhow::Result;
pub use app::{App, Exit};
use terminal::TerminalManager;

use crate::models::ListItem;

/// Run the interactive TUI until the user resumes a conversation or quits
pub fn run_interactive(items: Vec<ListItem>) -> Result<Exit> {
    let mut manager = TerminalManager::new()?;
    let mut app = App::new(items);

    // Restore before propagating so errors print on the normal screen
    let res = app.run(manager.terminal_mut());
    manager.restore()?;

    res
}
