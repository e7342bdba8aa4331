use std::collections::BTreeSet;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{Result, bail};
use clap::Parser;
use crossterm::style::Stylize;
use tracing::warn;

use crate::index_storage::{default_cache_dir, load_cache, save_cache};
use crate::indexer::{
    DEFAULT_MAX_CONCURRENT_PARSES, ScanOptions, build_list_items, scan_conversations,
};
use crate::models::{Conversation, Role};
use crate::resume::resume;
use crate::tui::preview::{Preview, PreviewMode, PreviewSpan, SpanStyle};
use crate::tui::{Exit, run_interactive};
use crate::utils::{format_path_with_tilde, format_timestamp, get_projects_dir};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;
const BYTES_PER_MB: u64 = 1024 * 1024;
const LOADING_NOTE: &str = "Loading conversations...";

#[derive(Parser, Debug)]
#[command(name = "ccs")]
#[command(version)]
#[command(about = "Search and resume Claude Code conversations", long_about = None)]
#[command(after_help = "\
Any other arguments are passed through to 'claude --resume'.

Examples:
  ccs                                   Search and resume a conversation
  ccs --dangerously-skip-permissions    Resume with auto-accept permissions
  ccs --max-age-days 30                 Only search the last month")]
pub struct Cli {
    /// Directory holding per-project transcript folders [default: ~/.claude/projects]
    #[arg(long, env = "CCS_PROJECTS_DIR", value_name = "DIR")]
    pub projects_dir: Option<PathBuf>,

    /// Directory for the conversation cache used by --preview
    #[arg(long, env = "CCS_CACHE_DIR", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Skip transcripts not modified in this many days (0 = no limit)
    #[arg(long, env = "CCS_MAX_AGE_DAYS", value_name = "DAYS", default_value_t = 0)]
    pub max_age_days: u64,

    /// Skip transcripts larger than this many MiB (0 = no limit)
    #[arg(long, env = "CCS_MAX_SIZE_MB", value_name = "MB", default_value_t = 0)]
    pub max_size_mb: u64,

    /// Maximum transcripts parsed at once
    #[arg(long, env = "CCS_JOBS", value_name = "N", default_value_t = DEFAULT_MAX_CONCURRENT_PARSES)]
    pub jobs: usize,

    /// Show statistics about the conversation history
    #[arg(long, conflicts_with_all = ["dump", "preview"])]
    pub stats: bool,

    /// Print all scanned conversations as JSON
    #[arg(long, conflicts_with = "preview")]
    pub dump: bool,

    /// Print the preview of one cached conversation
    #[arg(long, value_name = "SESSION_ID")]
    pub preview: Option<String>,

    /// Query to highlight in --preview output
    #[arg(long, value_name = "QUERY", requires = "preview")]
    pub query: Option<String>,

    /// Flags passed through to `claude --resume <id>`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "CLAUDE_ARGS")]
    pub passthrough: Vec<String>,
}

impl Cli {
    /// Admission filters and worker ceiling for a scan starting at `now`
    pub fn scan_options(&self, now: SystemTime) -> ScanOptions {
        let mut options = ScanOptions::default()
            .with_max_size(self.max_size_mb.saturating_mul(BYTES_PER_MB))
            .with_max_concurrency(self.jobs);
        if self.max_age_days > 0 {
            let max_age = Duration::from_secs(self.max_age_days.saturating_mul(SECONDS_PER_DAY));
            options = options.with_max_age(max_age, now);
        }
        options
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let cache_dir = cli.cache_dir.clone().unwrap_or_else(default_cache_dir);

    if let Some(session_id) = &cli.preview {
        return show_preview(&cache_dir, session_id, cli.query.as_deref().unwrap_or(""));
    }

    let projects_dir = match &cli.projects_dir {
        Some(dir) => dir.clone(),
        None => get_projects_dir()?,
    };
    if !projects_dir.is_dir() {
        bail!(
            "Projects directory not found: {}\n\
             Make sure Claude Code is installed and has been used at least once.",
            projects_dir.display()
        );
    }

    let conversations = {
        let _note = io::stderr().is_terminal().then(|| LoadingNote::show(io::stderr()));
        scan_conversations(&projects_dir, &cli.scan_options(SystemTime::now()))?
    };
    if let Err(e) = save_cache(&cache_dir, &conversations) {
        warn!("Could not save cache: {:#}", e);
    }

    if cli.stats {
        return show_stats(&projects_dir, &conversations);
    }
    if cli.dump {
        return dump(&conversations);
    }

    if conversations.is_empty() {
        bail!("No conversations found in {}", projects_dir.display());
    }
    let items = build_list_items(conversations);
    if items.is_empty() {
        bail!("No searchable messages found");
    }

    match run_interactive(items)? {
        Exit::Resume(conversation) => resume(&conversation, &cli.passthrough),
        Exit::Cancel => Ok(()),
    }
}

/// Progress note on a terminal, erased when dropped
struct LoadingNote<W: Write> {
    out: W,
}

impl<W: Write> LoadingNote<W> {
    fn show(mut out: W) -> Self {
        let _ = write!(out, "{}", LOADING_NOTE);
        let _ = out.flush();
        Self { out }
    }
}

impl<W: Write> Drop for LoadingNote<W> {
    fn drop(&mut self) {
        let _ = write!(self.out, "\r{}\r", " ".repeat(LOADING_NOTE.len()));
        let _ = self.out.flush();
    }
}

fn show_stats(projects_dir: &Path, conversations: &[Conversation]) -> Result<()> {
    let messages: usize = conversations.iter().map(|c| c.messages.len()).sum();
    let user_messages: usize = conversations.iter().map(|c| c.user_messages().count()).sum();
    let projects: BTreeSet<&str> = conversations.iter().map(|c| c.cwd.as_str()).collect();

    println!("Claude Code Conversation Statistics");
    println!("===================================");
    println!("Conversations: {}", conversations.len());
    println!("Messages: {}", messages);
    println!("  User: {}", user_messages);
    println!("  Assistant: {}", messages - user_messages);
    println!("Projects: {}", projects.len());
    println!();
    println!("Projects directory: {}", format_path_with_tilde(projects_dir));

    let oldest = conversations
        .iter()
        .map(|c| c.first_timestamp.as_str())
        .filter(|ts| !ts.is_empty())
        .min();
    if let Some(oldest) = oldest {
        println!("Oldest activity: {}", format_timestamp(oldest));
    }
    if let Some(newest) = conversations.first().filter(|c| !c.last_timestamp.is_empty()) {
        println!("Newest activity: {}", format_timestamp(&newest.last_timestamp));
    }

    Ok(())
}

fn dump(conversations: &[Conversation]) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, conversations)?;
    writeln!(stdout)?;
    Ok(())
}

fn show_preview(cache_dir: &Path, session_id: &str, query: &str) -> Result<()> {
    let conversations = load_cache(cache_dir)?;
    let Some(conversation) = conversations.get(session_id) else {
        bail!("Conversation not found");
    };

    let preview = Preview::build(conversation, query, PreviewMode::Full);
    let mut stdout = io::stdout().lock();
    for line in preview.header.iter().chain(&preview.body) {
        let rendered: String = line.spans.iter().map(ansi_span).collect();
        writeln!(stdout, "{}", rendered)?;
    }
    Ok(())
}

fn ansi_span(span: &PreviewSpan) -> String {
    let text = span.text.as_str();
    match span.style {
        SpanStyle::Plain => text.to_string(),
        SpanStyle::HeaderKey | SpanStyle::Timestamp | SpanStyle::CodeFrame => {
            text.dark_grey().to_string()
        }
        SpanStyle::Skipped | SpanStyle::Truncated => text.dark_grey().italic().to_string(),
        SpanStyle::Role { role, matched } => {
            let styled = match role {
                Role::User => text.green().bold(),
                Role::Assistant => text.blue().bold(),
            };
            if matched { styled.reverse().to_string() } else { styled.to_string() }
        }
        SpanStyle::Highlight => text.black().on_yellow().to_string(),
        SpanStyle::Code => text.cyan().to_string(),
    }
}
