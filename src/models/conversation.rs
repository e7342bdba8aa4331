use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Working directory recorded when a transcript never carried a `cwd`
pub const UNKNOWN_CWD: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Claude",
        }
    }
}

/// One retained transcript entry. `text` is never blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
    /// ISO-8601, empty for legacy entries
    #[serde(default)]
    pub timestamp: String,
}

/// A transcript file reduced to its displayable messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub session_id: String,
    pub cwd: String,
    pub first_timestamp: String,
    pub last_timestamp: String,
    pub file_path: PathBuf,
    pub messages: Vec<Message>,
}

impl Conversation {
    pub fn user_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.role == Role::User)
    }

    /// Directory to resume in; `.` when the transcript never recorded one
    pub fn resume_dir(&self) -> &str {
        if self.cwd.is_empty() || self.cwd == UNKNOWN_CWD { "." } else { &self.cwd }
    }

    /// Last path component of the working directory
    pub fn project_name(&self) -> &str {
        self.cwd.rsplit('/').find(|part| !part.is_empty()).unwrap_or(&self.cwd)
    }
}
