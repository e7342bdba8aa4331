//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

/// Builder for a fake home directory containing `.claude/projects`
pub struct ProjectsDirBuilder {
    temp_dir: TempDir,
}

impl ProjectsDirBuilder {
    /// Create a new builder with an empty projects directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(temp_dir.path().join(".claude").join("projects"))
            .expect("Failed to create projects dir");
        Self { temp_dir }
    }

    /// Directory to use as `HOME`
    pub fn home(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The `.claude/projects` directory
    pub fn projects_dir(&self) -> PathBuf {
        projects_dir_in(self.temp_dir.path())
    }

    /// Add a project directory holding the given transcripts
    pub fn with_project(self, name: &str, transcripts: &[TranscriptBuilder]) -> Self {
        let project_dir = self.projects_dir().join(name);
        fs::create_dir_all(&project_dir).expect("Failed to create project dir");

        for transcript in transcripts {
            transcript.create_in(&project_dir);
        }

        self
    }

    /// Add an arbitrary file under a project directory
    pub fn with_raw_file(self, project: &str, filename: &str, content: &str) -> Self {
        let project_dir = self.projects_dir().join(project);
        fs::create_dir_all(&project_dir).expect("Failed to create project dir");
        fs::write(project_dir.join(filename), content).expect("Failed to write raw file");
        self
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for ProjectsDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `.claude/projects` under a home directory built by [`ProjectsDirBuilder`]
pub fn projects_dir_in(home: &Path) -> PathBuf {
    home.join(".claude").join("projects")
}

/// Builder for one session transcript file
pub struct TranscriptBuilder {
    filename: String,
    lines: Vec<String>,
}

impl TranscriptBuilder {
    /// A session transcript named `<session_id>.jsonl`
    pub fn new(session_id: &str) -> Self {
        Self { filename: format!("{}.jsonl", session_id), lines: Vec::new() }
    }

    /// A sub-agent transcript named `agent-<name>.jsonl`
    pub fn agent(name: &str) -> Self {
        Self { filename: format!("agent-{}.jsonl", name), lines: Vec::new() }
    }

    /// Add a structured entry
    pub fn with_entry(mut self, entry: EntryBuilder) -> Self {
        self.lines.push(entry.to_json());
        self
    }

    /// Add a line verbatim (for corrupt or unusual input)
    pub fn with_raw_line(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content(&self) -> String {
        let mut content = self.lines.join("\n");
        content.push('\n');
        content
    }

    /// Create the file in the given directory
    pub fn create_in(&self, dir: &Path) -> PathBuf {
        let path = dir.join(&self.filename);
        fs::write(&path, self.content()).expect("Failed to write transcript");
        path
    }
}

/// Builder for a single transcript line
pub struct EntryBuilder {
    entry_type: String,
    cwd: Option<String>,
    timestamp: String,
    content: Value,
}

impl EntryBuilder {
    fn new(entry_type: &str, content: Value) -> Self {
        Self {
            entry_type: entry_type.to_string(),
            cwd: Some("/Users/test/project".to_string()),
            timestamp: "2025-01-15T10:30:00.000Z".to_string(),
            content,
        }
    }

    /// A user entry with plain string content
    pub fn user(text: &str) -> Self {
        Self::new("user", json!(text))
    }

    /// An assistant entry with a single text block
    pub fn assistant(text: &str) -> Self {
        Self::new("assistant", json!([{"type": "text", "text": text}]))
    }

    /// An entry of any type with block-array content
    pub fn with_blocks(entry_type: &str, blocks: Value) -> Self {
        Self::new(entry_type, blocks)
    }

    /// Set the working directory
    pub fn cwd(mut self, cwd: &str) -> Self {
        self.cwd = Some(cwd.to_string());
        self
    }

    /// Omit the working directory
    pub fn without_cwd(mut self) -> Self {
        self.cwd = None;
        self
    }

    /// Set the ISO-8601 timestamp
    pub fn timestamp(mut self, timestamp: &str) -> Self {
        self.timestamp = timestamp.to_string();
        self
    }

    /// Convert to a JSON line
    pub fn to_json(&self) -> String {
        let mut entry = json!({
            "type": self.entry_type,
            "timestamp": self.timestamp,
            "sessionId": "ignored",
            "message": {"role": self.entry_type, "content": self.content},
        });
        if let Some(cwd) = &self.cwd {
            entry["cwd"] = json!(cwd);
        }
        entry.to_string()
    }
}

/// A `summary` line as Claude Code writes at the top of compacted sessions
pub fn summary_line(text: &str) -> String {
    json!({"type": "summary", "summary": text, "leafUuid": "0000"}).to_string()
}
