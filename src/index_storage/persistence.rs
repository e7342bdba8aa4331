//! Cache persistence: load/save with atomic writes

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::Conversation;

const CACHE_DIR_NAME: &str = "ccs";
const CACHE_FILENAME: &str = "conversations.json";

/// On-disk shape: conversations keyed by session id
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CacheData {
    pub conversations: BTreeMap<String, Conversation>,
}

#[derive(Serialize)]
struct CacheDataRef<'a> {
    conversations: BTreeMap<&'a str, &'a Conversation>,
}

/// Platform cache directory for ccs, falling back to the temp dir
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir().unwrap_or_else(env::temp_dir).join(CACHE_DIR_NAME)
}

/// Path of the cache file inside `cache_dir`
pub fn cache_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join(CACHE_FILENAME)
}

/// Write `conversations` to the cache file atomically (temp file + rename).
///
/// Later duplicates of a session id replace earlier ones.
pub fn save_cache(cache_dir: &Path, conversations: &[Conversation]) -> Result<PathBuf> {
    fs::create_dir_all(cache_dir)
        .with_context(|| format!("Failed to create cache directory {}", cache_dir.display()))?;

    let data = CacheDataRef {
        conversations: conversations.iter().map(|c| (c.session_id.as_str(), c)).collect(),
    };
    let json = serde_json::to_vec(&data).context("Failed to serialize cache")?;

    let path = cache_path(cache_dir);
    let temp = cache_dir.join(format!("{}.tmp", CACHE_FILENAME));
    fs::write(&temp, json).context("Failed to write cache temp file")?;
    fs::rename(&temp, &path).context("Failed to rename cache temp file")?;

    Ok(path)
}

/// Read the cache written by [`save_cache`]
pub fn load_cache(cache_dir: &Path) -> Result<BTreeMap<String, Conversation>> {
    let path = cache_path(cache_dir);
    let json = fs::read(&path)
        .with_context(|| format!("Failed to read cache file {}", path.display()))?;
    let data: CacheData = serde_json::from_slice(&json)
        .with_context(|| format!("Failed to parse cache file {}", path.display()))?;
    Ok(data.conversations)
}
