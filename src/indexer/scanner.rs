use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result, bail};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::models::Conversation;
use crate::parsers::{AdmissionFilter, is_session_transcript, parse_transcript_file};

/// Ceiling on transcripts parsed at once (and so on open file handles)
pub const DEFAULT_MAX_CONCURRENT_PARSES: usize = 20;

/// Tunables for a directory scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    pub admission: AdmissionFilter,
    pub max_concurrency: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self { admission: AdmissionFilter::default(), max_concurrency: DEFAULT_MAX_CONCURRENT_PARSES }
    }
}

impl ScanOptions {
    /// Skip transcripts last modified more than `max_age` before `now`
    pub fn with_max_age(mut self, max_age: Duration, now: SystemTime) -> Self {
        self.admission.cutoff = now.checked_sub(max_age);
        self
    }

    /// Skip transcripts larger than `max_size_bytes`; zero means no limit
    pub fn with_max_size(mut self, max_size_bytes: u64) -> Self {
        self.admission.max_size_bytes = (max_size_bytes > 0).then_some(max_size_bytes);
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }
}

/// Recursively list session transcripts under `root`, sorted by path.
///
/// Unreadable entries are skipped and the walk continues.
pub fn discover_transcripts(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(error = %e, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| is_session_transcript(&entry.file_name().to_string_lossy()))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

/// Scan `root` for transcripts and parse them on a bounded worker pool.
///
/// Returns conversations sorted by last activity, newest first. Files that
/// fail to open or read are logged and left out; sibling files are still
/// parsed.
///
/// # Errors
///
/// Returns an error if `root` is not a directory or the worker pool cannot be
/// created.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use ccs::indexer::{ScanOptions, scan_conversations};
///
/// let conversations = scan_conversations(Path::new("/Users/alice/.claude/projects"), &ScanOptions::default())?;
/// println!("Found {} conversations", conversations.len());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn scan_conversations(root: &Path, options: &ScanOptions) -> Result<Vec<Conversation>> {
    if !root.is_dir() {
        bail!("Projects directory not found: {}", root.display());
    }

    let files = discover_transcripts(root);
    let admission = options.admission;
    let results = parse_bounded(&files, options.max_concurrency, |path| {
        parse_transcript_file(path, &admission)
    })?;

    let mut conversations = Vec::with_capacity(results.len());
    let mut skipped = 0usize;
    let mut failed = 0usize;
    for (path, result) in results {
        match result {
            Ok(Some(conversation)) => conversations.push(conversation),
            Ok(None) => skipped += 1,
            Err(e) => {
                failed += 1;
                warn!(path = %path.display(), "Failed to parse transcript: {:#}", e);
            }
        }
    }

    info!(
        conversations = conversations.len(),
        files = files.len(),
        skipped,
        failed,
        "scanned {}",
        root.display()
    );

    conversations.sort_by(|a, b| b.last_timestamp.cmp(&a.last_timestamp));
    Ok(conversations)
}

/// Run `parse` over `files` with at most `max_concurrency` calls in flight,
/// returning results in input order
fn parse_bounded<'a, T, F>(
    files: &'a [PathBuf],
    max_concurrency: usize,
    parse: F,
) -> Result<Vec<(&'a PathBuf, T)>>
where
    T: Send,
    F: Fn(&Path) -> T + Sync,
{
    let pool = ThreadPoolBuilder::new()
        .num_threads(max_concurrency.max(1))
        .thread_name(|i| format!("ccs-scan-{}", i))
        .build()
        .context("Failed to build transcript scan pool")?;

    Ok(pool.install(|| files.par_iter().map(|path| (path, parse(path.as_path()))).collect()))
}
