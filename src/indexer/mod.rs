//! Transcript discovery and index building
//!
//! # Error Handling Strategy
//!
//! The scanner combines graceful degradation with a fatal root check:
//!
//! - **Missing root**: Scanning a directory that does not exist is an error, since there is
//!   nothing to index.
//!
//! - **Walk errors**: Unreadable directory entries are skipped; the rest of the tree is still
//!   walked.
//!
//! - **File-level failures**: A transcript that cannot be opened or read is logged and
//!   excluded. Sibling transcripts are unaffected.
//!
//! - **Summary reporting**: The scan logs totals for files found, conversations produced,
//!   files skipped by admission filters, and failures.

pub mod builder;
pub mod scanner;

pub use builder::build_list_items;
pub use scanner::{DEFAULT_MAX_CONCURRENT_PARSES, ScanOptions, discover_transcripts, scan_conversations};
