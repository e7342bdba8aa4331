//! One-shot conversation cache
//!
//! After every successful scan the conversations are written to a single JSON
//! file so that `ccs --preview <SESSION_ID>` can render a conversation without
//! rescanning the projects directory:
//!
//! ```text
//! {"conversations": {"<session id>": Conversation, ...}}
//! ```
//!
//! Cache location: platform-specific cache directories
//! - macOS: `~/Library/Caches/ccs/conversations.json`
//! - Linux: `~/.cache/ccs/conversations.json`
//! - Windows: `%LOCALAPPDATA%\ccs\conversations.json`
//!
//! The file is never read back by the interactive search, which always rescans.

pub mod persistence;

pub use persistence::{CacheData, cache_path, default_cache_dir, load_cache, save_cache};
