use super::Conversation;

/// A conversation plus its flattened, whitespace-normalised search string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub conversation: Conversation,
    pub search_text: String,
    /// Lowercased `search_text`, matched against lowercased queries
    search_key: String,
}

impl ListItem {
    pub fn new(conversation: Conversation, search_text: String) -> Self {
        let search_key = search_text.to_lowercase();
        Self { conversation, search_text, search_key }
    }

    /// Case-insensitive substring test; `query_lower` must already be lowercased
    pub fn matches(&self, query_lower: &str) -> bool {
        query_lower.is_empty() || self.search_key.contains(query_lower)
    }
}
