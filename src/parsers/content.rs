use serde::Deserialize;
use serde_json::Value;

use crate::models::transcript::CONTENT_TYPE_TEXT;
use crate::models::MessageContent;

/// Flatten a `message.content` value into display text.
///
/// Plain strings are returned verbatim. Block arrays contribute the `text` of
/// every `"text"` block, space-joined in order; tool calls, images, thinking
/// and any other block kinds are dropped. Any other shape yields an empty
/// string.
pub fn extract_text(content: &Value) -> String {
    if content.is_null() {
        return String::new();
    }

    match MessageContent::deserialize(content) {
        Ok(MessageContent::PlainText(text)) => text,
        Ok(MessageContent::Blocks(blocks)) => {
            let parts: Vec<&str> = blocks
                .iter()
                .filter(|b| b.block_type == CONTENT_TYPE_TEXT)
                .filter_map(|b| b.text.as_deref())
                .filter(|t| !t.is_empty())
                .collect();
            parts.join(" ")
        }
        Err(_) => String::new(),
    }
}
