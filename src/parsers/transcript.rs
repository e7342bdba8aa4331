use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::time::SystemTime;

use anyhow::{Context, Result};
use tracing::debug;

use super::content::extract_text;
use crate::models::transcript::{ENTRY_TYPE_ASSISTANT, ENTRY_TYPE_USER};
use crate::models::{Conversation, Message, Role, TranscriptLine, UNKNOWN_CWD};

/// File extension of session transcripts
pub const TRANSCRIPT_EXTENSION: &str = ".jsonl";

/// Sub-agent transcripts carry this file name prefix and are never sessions
pub const AGENT_PREFIX: &str = "agent-";

/// Longest transcript line accepted (10MB); longer lines are skipped
pub const MAX_LINE_BYTES: usize = 10 * 1024 * 1024;

/// Age and size predicates applied to a transcript before its content is read.
///
/// `None` (or a zero size) means no limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdmissionFilter {
    /// Files modified strictly before this instant are skipped
    pub cutoff: Option<SystemTime>,
    /// Files strictly larger than this many bytes are skipped
    pub max_size_bytes: Option<u64>,
}

impl AdmissionFilter {
    pub fn admits(&self, modified: Option<SystemTime>, size: u64) -> bool {
        if let (Some(cutoff), Some(modified)) = (self.cutoff, modified)
            && modified < cutoff
        {
            return false;
        }
        match self.max_size_bytes {
            Some(max) if max > 0 => size <= max,
            _ => true,
        }
    }
}

/// Whether a file name denotes a sub-agent transcript
pub fn is_agent_transcript(file_name: &str) -> bool {
    file_name.starts_with(AGENT_PREFIX)
}

/// Whether a file name denotes a session transcript worth parsing
pub fn is_session_transcript(file_name: &str) -> bool {
    file_name.ends_with(TRANSCRIPT_EXTENSION) && !is_agent_transcript(file_name)
}

/// Parse one session transcript into a [`Conversation`].
///
/// Returns `Ok(None)` when the file is skipped by name or by `filter`, or when
/// no line yields a non-blank user or assistant message. Undecodable and
/// oversized lines are skipped individually.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, its metadata cannot be read,
/// or a read fails part way through.
pub fn parse_transcript_file(path: &Path, filter: &AdmissionFilter) -> Result<Option<Conversation>> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("Transcript path has no file name: {}", path.display()))?;

    if is_agent_transcript(&file_name) {
        return Ok(None);
    }

    // Stat through the open handle so the admission check and the read see the same file
    let file = File::open(path)
        .with_context(|| format!("Failed to open transcript: {}", path.display()))?;
    let metadata = file
        .metadata()
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;

    let modified = if filter.cutoff.is_some() {
        Some(
            metadata
                .modified()
                .with_context(|| format!("Failed to read mtime: {}", path.display()))?,
        )
    } else {
        None
    };
    if !filter.admits(modified, metadata.len()) {
        debug!(path = %path.display(), size = metadata.len(), "transcript not admitted");
        return Ok(None);
    }

    let session_id =
        file_name.strip_suffix(TRANSCRIPT_EXTENSION).unwrap_or(&file_name).to_string();

    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut cwd: Option<String> = None;
    let mut messages = Vec::new();
    let mut skipped = 0usize;

    loop {
        let line = read_bounded_line(&mut reader, &mut buf, MAX_LINE_BYTES)
            .with_context(|| format!("Failed to read line from {}", path.display()))?;
        match line {
            LineRead::Eof => break,
            LineRead::Oversized => {
                skipped += 1;
                debug!(path = %path.display(), "skipping line longer than {} bytes", MAX_LINE_BYTES);
                continue;
            }
            LineRead::Line => {}
        }

        let trimmed = buf.trim_ascii();
        if trimmed.is_empty() {
            continue;
        }

        let record: TranscriptLine = match serde_json::from_slice(trimmed) {
            Ok(record) => record,
            Err(e) => {
                skipped += 1;
                debug!(path = %path.display(), error = %e, "skipping undecodable line");
                continue;
            }
        };

        let role = match record.entry_type.as_str() {
            ENTRY_TYPE_USER => Role::User,
            ENTRY_TYPE_ASSISTANT => Role::Assistant,
            _ => continue,
        };

        if role == Role::User
            && cwd.is_none()
            && let Some(dir) = record.cwd.as_deref().filter(|d| !d.is_empty())
        {
            cwd = Some(dir.to_string());
        }

        let text = record.content().map(extract_text).unwrap_or_default();
        if text.trim().is_empty() {
            continue;
        }

        messages.push(Message { role, text, timestamp: record.timestamp });
    }

    if skipped > 0 {
        debug!(
            path = %path.display(),
            messages = messages.len(),
            skipped,
            "parsed transcript with skipped lines"
        );
    }

    let Some(last) = messages.last() else {
        return Ok(None);
    };
    // First user turn, not first message; empty for assistant-only transcripts
    let first_timestamp = messages
        .iter()
        .find(|m| m.role == Role::User)
        .map(|m| m.timestamp.clone())
        .unwrap_or_default();
    let last_timestamp = last.timestamp.clone();

    Ok(Some(Conversation {
        session_id,
        cwd: cwd.unwrap_or_else(|| UNKNOWN_CWD.to_string()),
        first_timestamp,
        last_timestamp,
        file_path: path.to_path_buf(),
        messages,
    }))
}

#[derive(Debug, PartialEq, Eq)]
enum LineRead {
    Line,
    Oversized,
    Eof,
}

/// Read one `\n`-terminated line into `buf` without buffering past `max_len`.
///
/// A line whose content exceeds `max_len` is consumed up to its newline and
/// reported as [`LineRead::Oversized`] with `buf` cleared.
fn read_bounded_line<R: BufRead>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    max_len: usize,
) -> io::Result<LineRead> {
    buf.clear();
    let read = reader.by_ref().take(max_len as u64 + 1).read_until(b'\n', buf)?;
    if read == 0 {
        return Ok(LineRead::Eof);
    }

    if buf.len() > max_len && buf.last() != Some(&b'\n') {
        buf.clear();
        skip_rest_of_line(reader)?;
        return Ok(LineRead::Oversized);
    }

    Ok(LineRead::Line)
}

fn skip_rest_of_line<R: BufRead>(reader: &mut R) -> io::Result<()> {
    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            return Ok(());
        }
        match available.iter().position(|&b| b == b'\n') {
            Some(pos) => {
                reader.consume(pos + 1);
                return Ok(());
            }
            None => {
                let len = available.len();
                reader.consume(len);
            }
        }
    }
}
