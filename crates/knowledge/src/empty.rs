//! Empty store — retrieval disabled.

use async_trait::async_trait;
use athly_core::error::KnowledgeError;
use athly_core::knowledge::{Document, KnowledgeBase};

/// A store that never returns anything. Prompts get an empty context.
pub struct EmptyKnowledgeBase;

#[async_trait]
impl KnowledgeBase for EmptyKnowledgeBase {
    fn name(&self) -> &str {
        "empty"
    }

    async fn query(&self, _text: &str, _n: usize) -> Result<Vec<Document>, KnowledgeError> {
        Ok(Vec::new())
    }

    async fn count(&self) -> Result<usize, KnowledgeError> {
        Ok(0)
    }
}
