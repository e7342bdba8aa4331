//! ccs - Search and resume Claude Code conversations
//!
//! This library indexes the per-session transcripts Claude Code writes under
//! `~/.claude/projects/` and drives an interactive search over them:
//!
//! - Parsing line-delimited transcript files into conversations
//! - Scanning a projects directory on a bounded worker pool
//! - Building flattened search text for case-insensitive filtering
//! - A terminal UI with relevance-windowed previews, deletion and resume
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use ccs::{ScanOptions, build_list_items, scan_conversations};
//!
//! let projects = Path::new("/Users/alice/.claude/projects");
//! let items = build_list_items(scan_conversations(projects, &ScanOptions::default())?);
//! println!("Indexed {} conversations", items.len());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod clipboard;
pub mod index_storage;
pub mod indexer;
pub mod models;
pub mod parsers;
pub mod resume;
pub mod tui;
pub mod utils;

// Re-export commonly used types
pub use indexer::{ScanOptions, build_list_items, scan_conversations};
pub use models::{Conversation, ListItem, Message, Role};
pub use parsers::{extract_text, parse_transcript_file};
pub use utils::format_path_with_tilde;
