//! Retrieval stores for Athly.
//!
//! Every store implements `athly_core::KnowledgeBase`; the expert
//! capability folds what they return into its prompts.

pub mod empty;
pub mod in_memory;
pub mod samples;

pub use empty::EmptyKnowledgeBase;
pub use in_memory::InMemoryKnowledgeBase;
