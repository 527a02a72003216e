//! KnowledgeBase trait — document retrieval for the expert capability.
//!
//! The expert folds retrieved passages into its prompts. How documents are
//! ranked (keywords, embeddings) is up to the implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::KnowledgeError;

/// A retrieved passage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// The passage text folded into prompts
    pub page_content: String,

    /// Where the passage came from (file path, sample name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Relevance score (set by queries)
    #[serde(default)]
    pub score: f32,
}

impl Document {
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            source: None,
            score: 0.0,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    /// The backend name (e.g., "in_memory", "empty").
    fn name(&self) -> &str;

    /// Return at most `n` passages relevant to `text`, best first.
    async fn query(&self, text: &str, n: usize) -> Result<Vec<Document>, KnowledgeError>;

    /// Number of stored documents.
    async fn count(&self) -> Result<usize, KnowledgeError>;
}

/// Join passages the way prompts expect them: one per line.
pub fn join_passages(documents: &[Document]) -> String {
    documents
        .iter()
        .map(|d| d.page_content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
