//! TUI application state and event handling.
//!
//! `App` owns the filter/selection state machine behind the interactive search:
//!
//! - **Filtering**: every query edit rebuilds `filtered` (indices into `items`) by
//!   case-insensitive substring match against each item's search text
//! - **Selection**: a cursor into `filtered`, kept in bounds after every transition
//! - **Preview scrolling**: an offset into the selected conversation's preview body
//! - **Deletion**: a two-step request/confirm flow that removes the transcript file
//! - **Status messages**: transient feedback for clipboard and delete operations
//!
//! # States
//!
//! ```text
//! Browsing --Ctrl+D--> ConfirmingDelete --y--> Browsing (file removed)
//!                                      --n/Esc--> Browsing (unchanged)
//! ```
//!
//! While confirming, everything except confirm, cancel, quit and resize is ignored.
//!
//! The loop ends with an [`Exit`]: either a conversation to resume or a cancel.
//! `handle_action` holds every state mutation; rendering only reads.

use std::fs;
use std::time::{Duration, Instant};

use anyhow::Result;
use ratatui::Terminal;
use ratatui::backend::Backend;
use tracing::debug;

use super::events::{Action, poll_event};
use super::layout::{Region, list_height_for, preview_mode_for, preview_rows_for, region_at};
use super::preview::Preview;
use super::rendering::render_ui;
use crate::clipboard::copy_resume_command;
use crate::models::{Conversation, ListItem};

/// Duration for success status messages (milliseconds)
const STATUS_SUCCESS_DURATION_MS: u64 = 3000;
/// Duration for error status messages (milliseconds)
const STATUS_ERROR_DURATION_MS: u64 = 5000;
/// Preview lines moved per wheel notch
pub const WHEEL_SCROLL_STEP: usize = 3;
/// Preview lines moved per PageUp/PageDown
pub const PAGE_SCROLL_STEP: usize = 10;
const POLL_INTERVAL_MS: u64 = 100;
const DEFAULT_WIDTH: u16 = 80;
const DEFAULT_HEIGHT: u16 = 24;

/// Type of status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Error,
}

/// Transient status message with expiry
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub message_type: MessageType,
    pub expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browsing,
    /// `index` is the position in `filtered` captured at request time
    ConfirmingDelete { index: usize },
}

/// How the interactive loop ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exit {
    Resume(Box<Conversation>),
    Cancel,
}

/// Terminal dimensions plus the derived list band height
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
    pub list_height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height, list_height: list_height_for(height) }
    }

    /// Text rows inside the preview block
    pub fn preview_rows(&self) -> usize {
        usize::from(preview_rows_for(self.height, self.list_height))
    }
}

type CopyFn = fn(&Conversation) -> Result<String>;

pub struct App {
    items: Vec<ListItem>,
    /// Indices into `items`, ascending
    filtered: Vec<usize>,
    query: String,
    cursor: usize,
    preview_scroll: usize,
    mode: Mode,
    viewport: Viewport,
    status_message: Option<StatusMessage>,
    exit: Option<Exit>,
    // Dirty state tracking for efficient rendering
    needs_redraw: bool,
    copy_fn: CopyFn,
}

impl App {
    pub fn new(items: Vec<ListItem>) -> Self {
        let filtered = (0..items.len()).collect();
        Self {
            items,
            filtered,
            query: String::new(),
            cursor: 0,
            preview_scroll: 0,
            mode: Mode::Browsing,
            viewport: Viewport::new(DEFAULT_WIDTH, DEFAULT_HEIGHT),
            status_message: None,
            exit: None,
            needs_redraw: true,
            copy_fn: copy_resume_command,
        }
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<Exit> {
        let size = terminal.size()?;
        self.viewport = Viewport::new(size.width, size.height);

        loop {
            if let Some(exit) = self.exit.take() {
                return Ok(exit);
            }

            // Clear expired status messages (marks dirty if cleared)
            self.check_and_clear_expired_status();

            if self.needs_redraw {
                let app: &App = self;
                terminal.draw(|f| render_ui(f, app))?;
                self.needs_redraw = false;
            }

            let action =
                poll_event(Duration::from_millis(POLL_INTERVAL_MS), self.is_confirming())?;
            self.handle_action(action);
        }
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    /// Items matching the current query, in original order
    pub fn filtered_items(&self) -> impl Iterator<Item = &ListItem> {
        self.filtered.iter().map(|&idx| &self.items[idx])
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn selected(&self) -> Option<&ListItem> {
        self.filtered.get(self.cursor).map(|&idx| &self.items[idx])
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn preview_scroll(&self) -> usize {
        self.preview_scroll
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_confirming(&self) -> bool {
        matches!(self.mode, Mode::ConfirmingDelete { .. })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn status_message(&self) -> Option<&StatusMessage> {
        self.status_message.as_ref()
    }

    /// Conversation targeted by a pending delete confirmation
    pub fn pending_delete(&self) -> Option<&ListItem> {
        match self.mode {
            Mode::ConfirmingDelete { index } => {
                self.filtered.get(index).map(|&idx| &self.items[idx])
            }
            Mode::Browsing => None,
        }
    }

    /// Set a transient status message with automatic expiry
    fn set_status(&mut self, text: impl Into<String>, message_type: MessageType, duration_ms: u64) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            message_type,
            expires_at: Instant::now() + Duration::from_millis(duration_ms),
        });
        self.needs_redraw = true;
    }

    /// Check and clear expired status messages
    fn check_and_clear_expired_status(&mut self) {
        let expired =
            self.status_message.as_ref().is_some_and(|msg| Instant::now() >= msg.expires_at);
        if expired {
            self.status_message = None;
            self.needs_redraw = true;
        }
    }

    /// Apply one action to the state machine (extracted for testing)
    pub(crate) fn handle_action(&mut self, action: Action) {
        if self.is_confirming() {
            self.handle_confirming_action(action);
            return;
        }

        match action {
            Action::Quit => self.exit = Some(Exit::Cancel),
            Action::InsertChar(c) => {
                let mut query = self.query.clone();
                query.push(c);
                self.set_query(query);
            }
            Action::DeleteChar => {
                if !self.query.is_empty() {
                    let mut query = self.query.clone();
                    query.pop();
                    self.set_query(query);
                }
            }
            Action::ClearQuery => self.set_query(String::new()),
            Action::MoveUp => self.move_cursor(-1),
            Action::MoveDown => self.move_cursor(1),
            Action::PageUp => self.scroll_preview_up(PAGE_SCROLL_STEP),
            Action::PageDown => self.scroll_preview_down(PAGE_SCROLL_STEP),
            Action::WheelUp { row } => match region_at(row, self.viewport.list_height) {
                Region::List => self.move_cursor(-1),
                Region::Preview => self.scroll_preview_up(WHEEL_SCROLL_STEP),
                Region::Header => {}
            },
            Action::WheelDown { row } => match region_at(row, self.viewport.list_height) {
                Region::List => self.move_cursor(1),
                Region::Preview => self.scroll_preview_down(WHEEL_SCROLL_STEP),
                Region::Header => {}
            },
            Action::Resize { width, height } => self.resize(width, height),
            Action::Select => {
                if let Some(item) = self.selected() {
                    self.exit = Some(Exit::Resume(Box::new(item.conversation.clone())));
                }
            }
            Action::RequestDelete => {
                if !self.filtered.is_empty() {
                    self.mode = Mode::ConfirmingDelete { index: self.cursor };
                    self.needs_redraw = true;
                }
            }
            Action::CopyResumeCommand => self.copy_resume_command(),
            Action::ConfirmDelete | Action::CancelDelete | Action::None => {}
        }
    }

    fn handle_confirming_action(&mut self, action: Action) {
        match action {
            Action::ConfirmDelete => self.confirm_delete(),
            Action::CancelDelete => {
                self.mode = Mode::Browsing;
                self.needs_redraw = true;
            }
            Action::Quit => self.exit = Some(Exit::Cancel),
            Action::Resize { width, height } => self.resize(width, height),
            _ => {}
        }
    }

    fn set_query(&mut self, query: String) {
        self.query = query;
        self.refilter();
        self.preview_scroll = 0;
        self.needs_redraw = true;
    }

    /// Rebuild `filtered` from `items` and the current query
    fn refilter(&mut self) {
        let query_lower = self.query.to_lowercase();
        self.filtered = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.matches(&query_lower))
            .map(|(idx, _)| idx)
            .collect();
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.filtered.len().saturating_sub(1));
    }

    fn move_cursor(&mut self, delta: isize) {
        let old = self.cursor;
        self.cursor = self.cursor.saturating_add_signed(delta);
        self.clamp_cursor();

        if old != self.cursor {
            self.preview_scroll = 0;
            self.needs_redraw = true;
        }
    }

    fn scroll_preview_up(&mut self, step: usize) {
        let old = self.preview_scroll;
        self.preview_scroll = self.preview_scroll.saturating_sub(step);
        self.needs_redraw |= old != self.preview_scroll;
    }

    fn scroll_preview_down(&mut self, step: usize) {
        let old = self.preview_scroll;
        self.preview_scroll = (self.preview_scroll + step).min(self.preview_max_scroll());
        self.needs_redraw |= old != self.preview_scroll;
    }

    fn preview_max_scroll(&self) -> usize {
        let Some(item) = self.selected() else {
            return 0;
        };
        let rows = self.viewport.preview_rows();
        let mode = preview_mode_for(rows as u16);
        Preview::build(&item.conversation, &self.query, mode).max_scroll_for(rows)
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.viewport = Viewport::new(width, height);
        self.preview_scroll = self.preview_scroll.min(self.preview_max_scroll());
        self.needs_redraw = true;
    }

    fn confirm_delete(&mut self) {
        let Mode::ConfirmingDelete { index } = self.mode else {
            return;
        };
        self.mode = Mode::Browsing;
        self.needs_redraw = true;

        let Some(&item_idx) = self.filtered.get(index) else {
            debug!("Ignoring delete of stale index {}", index);
            return;
        };

        let conversation = &self.items[item_idx].conversation;
        match fs::remove_file(&conversation.file_path) {
            Ok(()) => {
                let removed = self.items.remove(item_idx);
                debug!("Deleted {}", removed.conversation.file_path.display());
                self.refilter();
                self.preview_scroll = 0;
                self.set_status(
                    format!("✓ Deleted conversation {}", removed.conversation.session_id),
                    MessageType::Success,
                    STATUS_SUCCESS_DURATION_MS,
                );
            }
            Err(e) => {
                debug!("Failed to delete {}: {}", conversation.file_path.display(), e);
                let text = format!("✗ Failed to delete {}: {}", conversation.session_id, e);
                self.set_status(text, MessageType::Error, STATUS_ERROR_DURATION_MS);
            }
        }
    }

    fn copy_resume_command(&mut self) {
        let Some(item) = self.selected() else {
            self.set_status("✗ No conversation selected", MessageType::Error, STATUS_ERROR_DURATION_MS);
            return;
        };

        match (self.copy_fn)(&item.conversation) {
            Ok(command) => self.set_status(
                format!("✓ Copied: {}", command),
                MessageType::Success,
                STATUS_SUCCESS_DURATION_MS,
            ),
            Err(e) => self.set_status(
                format!("✗ Clipboard error: {}", e),
                MessageType::Error,
                STATUS_ERROR_DURATION_MS,
            ),
        }
    }
}

#[cfg(test)]
impl App {
    fn with_copier(mut self, copy_fn: CopyFn) -> Self {
        self.copy_fn = copy_fn;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use tempfile::TempDir;

    use super::*;
    use crate::indexer::build_list_items;
    use crate::models::{Message, Role};
    use crate::tui::layout::HEADER_HEIGHT;

    fn conversation(id: &str, texts: &[&str], file_path: PathBuf) -> Conversation {
        Conversation {
            session_id: id.to_string(),
            cwd: "/repo".to_string(),
            first_timestamp: String::new(),
            last_timestamp: String::new(),
            file_path,
            messages: texts
                .iter()
                .enumerate()
                .map(|(i, text)| Message {
                    role: if i % 2 == 0 { Role::User } else { Role::Assistant },
                    text: text.to_string(),
                    timestamp: String::new(),
                })
                .collect(),
        }
    }

    fn app_with(entries: &[(&str, &str)]) -> App {
        let conversations = entries
            .iter()
            .map(|(id, text)| conversation(id, &[text], PathBuf::from(format!("/nonexistent/{}.jsonl", id))))
            .collect();
        App::new(build_list_items(conversations))
    }

    /// Items backed by real transcript files in a temp dir
    fn app_on_disk(dir: &Path, entries: &[(&str, &str)]) -> App {
        let conversations = entries
            .iter()
            .map(|(id, text)| {
                let path = dir.join(format!("{}.jsonl", id));
                fs::write(&path, "{}\n").unwrap();
                conversation(id, &[text], path)
            })
            .collect();
        App::new(build_list_items(conversations))
    }

    /// Forty ten-line messages, far taller than any preview band
    fn long_texts() -> Vec<String> {
        (0..40)
            .map(|i| (0..10).map(|line| format!("message {} line {}", i, line)).collect::<Vec<_>>().join("\n"))
            .collect()
    }

    fn filtered_ids(app: &App) -> Vec<String> {
        app.filtered_items().map(|item| item.conversation.session_id.clone()).collect()
    }

    fn type_query(app: &mut App, query: &str) {
        for c in query.chars() {
            app.handle_action(Action::InsertChar(c));
        }
    }

    fn assert_cursor_invariant(app: &App) {
        if app.filtered_len() > 0 {
            assert!(app.cursor() < app.filtered_len());
        } else {
            assert_eq!(app.cursor(), 0);
        }
    }

    #[test]
    fn test_app_new_initializes_state() {
        let app = app_with(&[("a", "one"), ("b", "two")]);

        assert_eq!(app.cursor(), 0);
        assert_eq!(app.query(), "");
        assert_eq!(app.mode(), Mode::Browsing);
        assert_eq!(app.filtered_len(), 2);
        assert!(app.exit.is_none());
        assert!(app.needs_redraw);
    }

    #[test]
    fn test_query_matches_case_insensitively() {
        let mut app = app_with(&[("a", "nothing here"), ("b", "Say HeLLo there"), ("c", "bye")]);

        type_query(&mut app, "hello");
        assert_eq!(filtered_ids(&app), vec!["b"]);

        app.handle_action(Action::ClearQuery);
        type_query(&mut app, "HELLO");
        assert_eq!(filtered_ids(&app), vec!["b"]);
    }

    #[test]
    fn test_filter_is_idempotent_and_monotonic() {
        let mut app = app_with(&[("a", "fix parser"), ("b", "fix printer"), ("c", "add parser")]);

        type_query(&mut app, "p");
        let short = filtered_ids(&app);
        app.refilter();
        assert_eq!(filtered_ids(&app), short);

        type_query(&mut app, "ars");
        let long = filtered_ids(&app);
        assert!(long.len() <= short.len());
        assert!(long.iter().all(|id| short.contains(id)));
        assert_eq!(long, vec!["a", "c"]);
    }

    #[test]
    fn test_filter_preserves_original_order() {
        let mut app = app_with(&[("a", "x1"), ("b", "y"), ("c", "x2"), ("d", "x3")]);
        type_query(&mut app, "x");
        assert_eq!(filtered_ids(&app), vec!["a", "c", "d"]);
    }

    #[test]
    fn test_query_edit_clamps_cursor_and_resets_scroll() {
        let mut app = app_with(&[("a", "alpha"), ("b", "beta"), ("c", "gamma")]);
        app.handle_action(Action::MoveDown);
        app.handle_action(Action::MoveDown);
        assert_eq!(app.cursor(), 2);
        app.preview_scroll = 7;

        type_query(&mut app, "beta");
        assert_eq!(app.cursor(), 0);
        assert_eq!(app.preview_scroll(), 0);
        assert_eq!(app.selected().unwrap().conversation.session_id, "b");
    }

    #[test]
    fn test_query_edit_keeps_cursor_when_in_bounds() {
        let mut app = app_with(&[("a", "x"), ("b", "x"), ("c", "x"), ("d", "y")]);
        app.handle_action(Action::MoveDown);
        type_query(&mut app, "x");
        assert_eq!(app.cursor(), 1);
    }

    #[test]
    fn test_query_with_no_matches() {
        let mut app = app_with(&[("a", "x")]);
        type_query(&mut app, "zzz");
        assert_eq!(app.filtered_len(), 0);
        assert!(app.selected().is_none());
        assert_cursor_invariant(&app);

        app.handle_action(Action::MoveDown);
        app.handle_action(Action::PageDown);
        assert_cursor_invariant(&app);
        assert_eq!(app.preview_scroll(), 0);
    }

    #[test]
    fn test_delete_char_and_clear() {
        let mut app = app_with(&[("a", "alpha"), ("b", "beta")]);
        type_query(&mut app, "betx");
        assert_eq!(app.filtered_len(), 0);

        app.handle_action(Action::DeleteChar);
        assert_eq!(app.query(), "bet");
        assert_eq!(filtered_ids(&app), vec!["b"]);

        app.handle_action(Action::ClearQuery);
        assert_eq!(app.query(), "");
        assert_eq!(app.filtered_len(), 2);

        // Backspace on an empty query is a no-op
        app.needs_redraw = false;
        app.handle_action(Action::DeleteChar);
        assert!(!app.needs_redraw);
    }

    #[test]
    fn test_cursor_bounds() {
        let mut app = app_with(&[("a", "1"), ("b", "2")]);

        app.handle_action(Action::MoveUp);
        assert_eq!(app.cursor(), 0);

        app.handle_action(Action::MoveDown);
        app.handle_action(Action::MoveDown);
        app.handle_action(Action::MoveDown);
        assert_eq!(app.cursor(), 1);
    }

    #[test]
    fn test_cursor_move_resets_scroll() {
        let mut app = app_with(&[("a", "1"), ("b", "2")]);
        app.preview_scroll = 5;
        app.handle_action(Action::MoveDown);
        assert_eq!(app.preview_scroll(), 0);

        // No movement at the bottom edge leaves scroll alone
        app.preview_scroll = 5;
        app.handle_action(Action::MoveDown);
        assert_eq!(app.preview_scroll(), 5);
    }

    #[test]
    fn test_select_resumes_conversation_under_cursor() {
        let mut app = app_with(&[("a", "alpha"), ("b", "beta"), ("c", "beta too")]);
        type_query(&mut app, "beta");
        app.handle_action(Action::MoveDown);
        app.handle_action(Action::Select);

        match app.exit.take() {
            Some(Exit::Resume(conversation)) => assert_eq!(conversation.session_id, "c"),
            other => panic!("expected resume, got {:?}", other),
        }
    }

    #[test]
    fn test_select_with_empty_filter_is_noop() {
        let mut app = app_with(&[("a", "alpha")]);
        type_query(&mut app, "zzz");
        app.handle_action(Action::Select);
        assert!(app.exit.is_none());
    }

    #[test]
    fn test_quit_cancels() {
        let mut app = app_with(&[("a", "alpha")]);
        app.handle_action(Action::Quit);
        assert_eq!(app.exit, Some(Exit::Cancel));
    }

    #[test]
    fn test_delete_confirm_removes_file_and_item() {
        let dir = TempDir::new().unwrap();
        let mut app = app_on_disk(dir.path(), &[("a", "one"), ("b", "two"), ("c", "three")]);
        app.handle_action(Action::MoveDown);

        app.handle_action(Action::RequestDelete);
        assert_eq!(app.mode(), Mode::ConfirmingDelete { index: 1 });
        assert_eq!(app.pending_delete().unwrap().conversation.session_id, "b");

        app.handle_action(Action::ConfirmDelete);
        assert_eq!(app.mode(), Mode::Browsing);
        assert!(!dir.path().join("b.jsonl").exists());
        assert!(dir.path().join("a.jsonl").exists());
        assert!(dir.path().join("c.jsonl").exists());

        let ids: Vec<&str> = app.items().iter().map(|i| i.conversation.session_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(filtered_ids(&app), vec!["a", "c"]);
        assert_eq!(app.cursor(), 1);
        assert_eq!(app.status_message().unwrap().message_type, MessageType::Success);
    }

    #[test]
    fn test_delete_within_filtered_subset() {
        let dir = TempDir::new().unwrap();
        let mut app = app_on_disk(dir.path(), &[("a", "keep"), ("b", "match"), ("c", "match")]);
        type_query(&mut app, "match");
        app.handle_action(Action::MoveDown);

        app.handle_action(Action::RequestDelete);
        app.handle_action(Action::ConfirmDelete);

        assert_eq!(app.items().len(), 2);
        assert_eq!(filtered_ids(&app), vec!["b"]);
        assert_eq!(app.cursor(), 0);
        assert!(dir.path().join("a.jsonl").exists());
        assert!(!dir.path().join("c.jsonl").exists());
    }

    #[test]
    fn test_delete_only_item_then_enter_is_noop() {
        let dir = TempDir::new().unwrap();
        let mut app = app_on_disk(dir.path(), &[("only", "solo")]);

        app.handle_action(Action::RequestDelete);
        app.handle_action(Action::ConfirmDelete);
        assert!(app.items().is_empty());
        assert_eq!(app.filtered_len(), 0);
        assert_cursor_invariant(&app);

        app.handle_action(Action::Select);
        assert!(app.exit.is_none());

        // Nothing left to delete
        app.handle_action(Action::RequestDelete);
        assert_eq!(app.mode(), Mode::Browsing);
    }

    #[test]
    fn test_delete_failure_leaves_state_unchanged() {
        let mut app = app_with(&[("a", "one"), ("b", "two")]);
        app.handle_action(Action::MoveDown);

        app.handle_action(Action::RequestDelete);
        app.handle_action(Action::ConfirmDelete);

        assert_eq!(app.mode(), Mode::Browsing);
        assert_eq!(app.items().len(), 2);
        assert_eq!(filtered_ids(&app), vec!["a", "b"]);
        assert_eq!(app.cursor(), 1);
        let status = app.status_message().unwrap();
        assert_eq!(status.message_type, MessageType::Error);
        assert!(status.text.contains("Failed to delete b"));
    }

    #[test]
    fn test_delete_cancel() {
        let dir = TempDir::new().unwrap();
        let mut app = app_on_disk(dir.path(), &[("a", "one")]);

        app.handle_action(Action::RequestDelete);
        app.handle_action(Action::CancelDelete);

        assert_eq!(app.mode(), Mode::Browsing);
        assert_eq!(app.items().len(), 1);
        assert!(dir.path().join("a.jsonl").exists());
        assert!(app.pending_delete().is_none());
    }

    #[test]
    fn test_confirming_ignores_other_input() {
        let dir = TempDir::new().unwrap();
        let mut app = app_on_disk(dir.path(), &[("a", "one"), ("b", "two")]);
        app.handle_action(Action::RequestDelete);

        app.handle_action(Action::InsertChar('x'));
        app.handle_action(Action::MoveDown);
        app.handle_action(Action::ClearQuery);
        app.handle_action(Action::Select);
        app.handle_action(Action::WheelDown { row: 5 });
        app.handle_action(Action::RequestDelete);

        assert_eq!(app.mode(), Mode::ConfirmingDelete { index: 0 });
        assert_eq!(app.query(), "");
        assert_eq!(app.cursor(), 0);
        assert!(app.exit.is_none());

        app.handle_action(Action::Resize { width: 100, height: 50 });
        assert_eq!(app.viewport().height, 50);
        assert!(app.is_confirming());

        app.handle_action(Action::Quit);
        assert_eq!(app.exit, Some(Exit::Cancel));
        assert!(dir.path().join("a.jsonl").exists());
    }

    #[test]
    fn test_confirm_outside_confirming_is_noop() {
        let dir = TempDir::new().unwrap();
        let mut app = app_on_disk(dir.path(), &[("a", "one")]);
        app.handle_action(Action::ConfirmDelete);
        assert_eq!(app.items().len(), 1);
        assert!(dir.path().join("a.jsonl").exists());
    }

    #[test]
    fn test_stale_delete_index_is_noop() {
        let dir = TempDir::new().unwrap();
        let mut app = app_on_disk(dir.path(), &[("a", "one")]);
        app.mode = Mode::ConfirmingDelete { index: 5 };

        app.handle_action(Action::ConfirmDelete);

        assert_eq!(app.mode(), Mode::Browsing);
        assert_eq!(app.items().len(), 1);
        assert!(dir.path().join("a.jsonl").exists());
    }

    #[test]
    fn test_wheel_by_region() {
        let long = long_texts();
        let texts: Vec<&str> = long.iter().map(String::as_str).collect();
        let conversations = vec![
            conversation("a", &texts, PathBuf::from("/nonexistent/a.jsonl")),
            conversation("b", &["short"], PathBuf::from("/nonexistent/b.jsonl")),
        ];
        let mut app = App::new(build_list_items(conversations));
        app.handle_action(Action::Resize { width: 80, height: 40 });
        let list_row = HEADER_HEIGHT;
        let preview_row = list_row + app.viewport().list_height;

        // Header band does nothing
        app.handle_action(Action::WheelDown { row: 0 });
        assert_eq!(app.cursor(), 0);
        assert_eq!(app.preview_scroll(), 0);

        app.handle_action(Action::WheelDown { row: preview_row });
        assert_eq!(app.preview_scroll(), WHEEL_SCROLL_STEP);
        app.handle_action(Action::WheelUp { row: preview_row + 3 });
        assert_eq!(app.preview_scroll(), 0);
        app.handle_action(Action::WheelUp { row: preview_row });
        assert_eq!(app.preview_scroll(), 0);

        app.handle_action(Action::WheelDown { row: preview_row });
        app.handle_action(Action::WheelDown { row: list_row });
        assert_eq!(app.cursor(), 1);
        assert_eq!(app.preview_scroll(), 0);
        app.handle_action(Action::WheelUp { row: list_row + 1 });
        assert_eq!(app.cursor(), 0);
    }

    #[test]
    fn test_page_scroll_is_clamped() {
        let long = long_texts();
        let texts: Vec<&str> = long.iter().map(String::as_str).collect();
        let mut app = App::new(build_list_items(vec![conversation(
            "a",
            &texts,
            PathBuf::from("/nonexistent/a.jsonl"),
        )]));

        app.handle_action(Action::PageDown);
        assert_eq!(app.preview_scroll(), PAGE_SCROLL_STEP);

        for _ in 0..100 {
            app.handle_action(Action::PageDown);
        }
        let max = app.preview_max_scroll();
        assert!(max > 0);
        assert_eq!(app.preview_scroll(), max);

        app.handle_action(Action::PageUp);
        assert_eq!(app.preview_scroll(), max.saturating_sub(PAGE_SCROLL_STEP));
        for _ in 0..100 {
            app.handle_action(Action::PageUp);
        }
        assert_eq!(app.preview_scroll(), 0);
    }

    #[test]
    fn test_short_preview_does_not_scroll() {
        let mut app = app_with(&[("a", "short")]);
        app.handle_action(Action::PageDown);
        assert_eq!(app.preview_scroll(), 0);
    }

    #[test]
    fn test_resize_recomputes_list_height() {
        let mut app = app_with(&[("a", "one")]);
        app.handle_action(Action::Resize { width: 120, height: 50 });
        assert_eq!(app.viewport(), Viewport { width: 120, height: 50, list_height: 20 });

        app.handle_action(Action::Resize { width: 40, height: 5 });
        assert_eq!(app.viewport().list_height, 3);
    }

    #[test]
    fn test_copy_resume_command_success() {
        fn copier(conversation: &Conversation) -> Result<String> {
            Ok(format!("claude --resume {}", conversation.session_id))
        }
        let mut app = app_with(&[("a", "one")]).with_copier(copier);

        app.handle_action(Action::CopyResumeCommand);
        let status = app.status_message().unwrap();
        assert_eq!(status.message_type, MessageType::Success);
        assert_eq!(status.text, "✓ Copied: claude --resume a");
    }

    #[test]
    fn test_copy_resume_command_failure() {
        fn copier(_: &Conversation) -> Result<String> {
            anyhow::bail!("no display")
        }
        let mut app = app_with(&[("a", "one")]).with_copier(copier);

        app.handle_action(Action::CopyResumeCommand);
        let status = app.status_message().unwrap();
        assert_eq!(status.message_type, MessageType::Error);
        assert!(status.text.contains("no display"));
    }

    #[test]
    fn test_copy_with_nothing_selected() {
        let mut app = app_with(&[]);
        app.handle_action(Action::CopyResumeCommand);
        assert!(app.status_message().unwrap().text.contains("No conversation selected"));
    }

    #[test]
    fn test_set_status_success_message() {
        let mut app = app_with(&[]);
        app.set_status("Test success", MessageType::Success, 1000);

        let msg = app.status_message().unwrap();
        assert_eq!(msg.text, "Test success");
        assert_eq!(msg.message_type, MessageType::Success);
    }

    #[test]
    fn test_check_and_clear_expired_status_clears_expired() {
        let mut app = app_with(&[]);
        app.set_status("Expired", MessageType::Error, 0);
        std::thread::sleep(Duration::from_millis(5));
        app.needs_redraw = false;

        app.check_and_clear_expired_status();
        assert!(app.status_message().is_none());
        assert!(app.needs_redraw);
    }

    #[test]
    fn test_check_and_clear_expired_status_keeps_active() {
        let mut app = app_with(&[]);
        app.set_status("Active", MessageType::Success, 10_000);

        app.check_and_clear_expired_status();
        assert!(app.status_message().is_some());
    }

    #[test]
    fn test_cursor_invariant_over_action_sequence() {
        let dir = TempDir::new().unwrap();
        let mut app = app_on_disk(
            dir.path(),
            &[("a", "red apple"), ("b", "green apple"), ("c", "red cherry"), ("d", "plum")],
        );

        let actions = vec![
            Action::MoveDown,
            Action::MoveDown,
            Action::MoveDown,
            Action::InsertChar('r'),
            Action::InsertChar('e'),
            Action::MoveDown,
            Action::RequestDelete,
            Action::ConfirmDelete,
            Action::DeleteChar,
            Action::DeleteChar,
            Action::MoveDown,
            Action::MoveDown,
            Action::MoveDown,
            Action::RequestDelete,
            Action::ConfirmDelete,
            Action::InsertChar('z'),
            Action::MoveUp,
            Action::ClearQuery,
        ];
        for action in actions {
            app.handle_action(action);
            assert_cursor_invariant(&app);
        }
        assert_eq!(app.items().len(), 2);
        assert_eq!(app.filtered_len(), 2);
    }
}
