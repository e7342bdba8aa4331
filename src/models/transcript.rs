use serde::Deserialize;
use serde_json::Value;

/// Transcript line type carrying a user turn
pub const ENTRY_TYPE_USER: &str = "user";
/// Transcript line type carrying an assistant turn
pub const ENTRY_TYPE_ASSISTANT: &str = "assistant";
/// Content block type whose `text` is displayable
pub const CONTENT_TYPE_TEXT: &str = "text";

/// One decoded transcript line. Every field is optional so that unknown
/// record kinds (summaries, snapshots, system notices) still decode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranscriptLine {
    #[serde(rename = "type", default)]
    pub entry_type: String,
    #[serde(default)]
    pub cwd: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub timestamp: String,
    #[serde(default)]
    pub message: Option<TranscriptMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranscriptMessage {
    /// Left undecoded; the text extractor picks the shape
    #[serde(default)]
    pub content: Value,
}

impl TranscriptLine {
    pub fn content(&self) -> Option<&Value> {
        self.message.as_ref().map(|m| &m.content)
    }
}

/// `message.content` is either a plain string or an array of typed blocks
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    PlainText(String),
    Blocks(Vec<ContentBlock>),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type", default)]
    pub block_type: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// Timestamps are ISO strings; anything else degrades to empty
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        _ => Ok(String::new()),
    }
}
