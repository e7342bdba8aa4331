//! Data models for conversation transcripts.
//!
//! - [`TranscriptLine`] - One raw line of a transcript file
//! - [`MessageContent`] - The string-or-blocks `message.content` union
//! - [`Conversation`] / [`Message`] - A transcript reduced to displayable turns
//! - [`ListItem`] - A conversation with its precomputed search string

pub mod conversation;
pub mod list_item;
pub mod transcript;

pub use conversation::{Conversation, Message, Role, UNKNOWN_CWD};
pub use list_item::ListItem;
pub use transcript::{ContentBlock, MessageContent, TranscriptLine, TranscriptMessage};
