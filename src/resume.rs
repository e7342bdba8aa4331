//! Hand-off to `claude --resume`.
//!
//! The selected conversation's working directory becomes the process's current
//! directory, then the resume program replaces this process (on Unix) so that it
//! inherits the terminal and environment untouched.

use std::env;
use std::io;
use std::process::Command;

use anyhow::{Context, Result, bail};
use crossterm::style::Stylize;
use tracing::warn;

use crate::models::Conversation;
use crate::utils::shell_quote;

/// Executable invoked to resume a session
pub const RESUME_PROGRAM: &str = "claude";

/// Arguments passed to [`RESUME_PROGRAM`]: `--resume <id>` then passthrough flags
pub fn resume_args(session_id: &str, passthrough: &[String]) -> Vec<String> {
    let mut args = vec!["--resume".to_string(), session_id.to_string()];
    args.extend(passthrough.iter().cloned());
    args
}

/// Shell one-liner that resumes `conversation` from any directory
pub fn shell_command(conversation: &Conversation) -> String {
    format!(
        "cd {} && {} --resume {}",
        shell_quote(conversation.resume_dir()),
        RESUME_PROGRAM,
        shell_quote(&conversation.session_id)
    )
}

/// Banner printed before handing over the terminal
pub fn banner(conversation: &Conversation, passthrough: &[String]) -> String {
    let mut out = format!(
        "{}\n",
        format!(
            "Resuming conversation {} in {}...",
            conversation.session_id,
            conversation.resume_dir()
        )
        .bold()
    );
    if !passthrough.is_empty() {
        out.push_str(&format!("{}\n", format!("Flags: {}", passthrough.join(" ")).dark_grey()));
    }
    out
}

/// Change into the conversation's directory and replace this process with
/// `claude --resume <id> <passthrough...>`.
///
/// Only returns on failure. A directory that cannot be entered is a warning and
/// the current directory is kept; a missing resume program is an error.
pub fn resume(conversation: &Conversation, passthrough: &[String]) -> Result<()> {
    println!("{}", banner(conversation, passthrough));

    let dir = conversation.resume_dir();
    if let Err(e) = env::set_current_dir(dir) {
        warn!("Could not change to directory {}: {}", dir, e);
    }

    let mut command = Command::new(RESUME_PROGRAM);
    command.args(resume_args(&conversation.session_id, passthrough));
    exec(command)
}

#[cfg(unix)]
fn exec(mut command: Command) -> Result<()> {
    use std::os::unix::process::CommandExt;

    let err = command.exec();
    if err.kind() == io::ErrorKind::NotFound {
        bail!("{} not found in PATH", RESUME_PROGRAM);
    }
    Err(err).with_context(|| format!("Failed to launch {}", RESUME_PROGRAM))
}

#[cfg(not(unix))]
fn exec(mut command: Command) -> Result<()> {
    let status = match command.status() {
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            bail!("{} not found in PATH", RESUME_PROGRAM)
        }
        other => other.with_context(|| format!("Failed to launch {}", RESUME_PROGRAM))?,
    };
    std::process::exit(status.code().unwrap_or(1));
}
