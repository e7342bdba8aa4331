//! Index builder turning scanned conversations into searchable list items.
//!
//! Each item's search string is assembled once here so that filtering in the
//! interactive view is a single substring scan per conversation.

use crate::models::{Conversation, ListItem};
use crate::utils::format_timestamp;

/// Build one [`ListItem`] per conversation, preserving input order.
///
/// The search string joins the session ID, working directory, formatted first
/// and last timestamps, and every user message, with runs of whitespace
/// collapsed to single spaces. Assistant text is not included.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use ccs::indexer::build_list_items;
/// use ccs::models::{Conversation, Message, Role};
///
/// let conversation = Conversation {
///     session_id: "abc".into(),
///     cwd: "/repo".into(),
///     first_timestamp: String::new(),
///     last_timestamp: String::new(),
///     file_path: PathBuf::from("/tmp/abc.jsonl"),
///     messages: vec![Message { role: Role::User, text: "fix\nthe  build".into(), timestamp: String::new() }],
/// };
/// let items = build_list_items(vec![conversation]);
/// assert_eq!(items[0].search_text, "abc /repo fix the build");
/// ```
pub fn build_list_items(conversations: Vec<Conversation>) -> Vec<ListItem> {
    conversations
        .into_iter()
        .map(|conversation| {
            let search_text = build_search_text(&conversation);
            ListItem::new(conversation, search_text)
        })
        .collect()
}

fn build_search_text(conversation: &Conversation) -> String {
    let first = format_timestamp(&conversation.first_timestamp);
    let last = format_timestamp(&conversation.last_timestamp);

    let fields = [
        conversation.session_id.as_str(),
        conversation.cwd.as_str(),
        first.as_str(),
        last.as_str(),
    ];
    let mut search_text = String::new();
    for word in fields
        .into_iter()
        .chain(conversation.user_messages().map(|m| m.text.as_str()))
        .flat_map(str::split_whitespace)
    {
        if !search_text.is_empty() {
            search_text.push(' ');
        }
        search_text.push_str(word);
    }
    search_text
}
