//! Line-delimited JSON parsers for conversation transcripts
//!
//! # Error Handling Strategy
//!
//! This module follows a **graceful degradation** approach suitable for CLI tools:
//!
//! - **Individual line failures**: Malformed or oversized lines are logged at debug level
//!   and skipped. A single bad line never discards the rest of a transcript.
//!
//! - **Unknown shapes**: Record types other than `user`/`assistant`, and content encodings
//!   other than a string or an array of typed blocks, contribute nothing rather than failing.
//!
//! - **Admission skips**: Sub-agent transcripts and files rejected by the age/size filter
//!   produce `Ok(None)`, which is distinct from an error.
//!
//! - **Error propagation**: Only I/O failures (open, stat, read) surface as `anyhow::Result`
//!   errors, leaving the caller to decide whether one file's failure matters.

pub mod content;
pub mod transcript;

pub use content::extract_text;
pub use transcript::{
    AGENT_PREFIX, AdmissionFilter, MAX_LINE_BYTES, TRANSCRIPT_EXTENSION, is_session_transcript,
    parse_transcript_file,
};
