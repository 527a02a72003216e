//! In-memory store — keyword-scored coaching notes.

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use athly_core::error::KnowledgeError;
use athly_core::knowledge::{Document, KnowledgeBase};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::samples::SAMPLE_NOTES;

/// Shorter tokens ("de", "la", "en") carry no signal.
const MIN_TERM_LEN: usize = 3;

/// Documents kept in a Vec, ranked by query-term overlap.
pub struct InMemoryKnowledgeBase {
    entries: RwLock<Vec<Document>>,
}

impl InMemoryKnowledgeBase {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// A store seeded with the built-in notes.
    pub fn with_samples() -> Self {
        let mut kb = Self::new();
        for (source, content) in SAMPLE_NOTES {
            kb.push(Document::new(*content).with_source(*source));
        }
        kb
    }

    /// Add a document during construction.
    pub fn push(&mut self, document: Document) {
        self.entries.get_mut().push(document);
    }

    /// Ingest every `.md` / `.txt` file under `dir`, recursively, in path order.
    /// Returns the number of documents added.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, KnowledgeError> {
        let mut files = Vec::new();
        collect_files(dir, &mut files)?;
        files.sort();

        let mut added = 0;
        for path in files {
            let content = match std::fs::read_to_string(&path) {
                Ok(c) => c,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable note");
                    continue;
                }
            };
            if content.trim().is_empty() {
                continue;
            }
            let source = path
                .strip_prefix(dir)
                .unwrap_or(&path)
                .to_string_lossy()
                .replace('\\', "/");
            self.push(Document::new(content).with_source(source));
            added += 1;
        }

        debug!(dir = %dir.display(), added, "Knowledge directory loaded");
        Ok(added)
    }
}

impl Default for InMemoryKnowledgeBase {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_files(dir: &Path, out: &mut Vec<std::path::PathBuf>) -> Result<(), KnowledgeError> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| KnowledgeError::Storage(format!("{}: {e}", dir.display())))?;

    for entry in entries {
        let path = entry
            .map_err(|e| KnowledgeError::Storage(e.to_string()))?
            .path();
        if path.is_dir() {
            collect_files(&path, out)?;
        } else if matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("md" | "txt")
        ) {
            out.push(path);
        }
    }
    Ok(())
}

/// Lowercased alphanumeric words of at least [`MIN_TERM_LEN`] characters.
fn terms(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= MIN_TERM_LEN)
        .map(str::to_lowercase)
}

#[async_trait]
impl KnowledgeBase for InMemoryKnowledgeBase {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn query(&self, text: &str, n: usize) -> Result<Vec<Document>, KnowledgeError> {
        let query_terms: HashSet<String> = terms(text).collect();
        if query_terms.is_empty() || n == 0 {
            return Ok(Vec::new());
        }

        let entries = self.entries.read().await;
        let mut results: Vec<Document> = entries
            .iter()
            .filter_map(|doc| {
                let doc_terms: HashSet<String> = terms(&doc.page_content).collect();
                let matched = query_terms.intersection(&doc_terms).count();
                (matched > 0).then(|| {
                    let mut hit = doc.clone();
                    hit.score = matched as f32 / query_terms.len() as f32;
                    hit
                })
            })
            .collect();

        // Stable sort keeps insertion order among equal scores
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(n);

        Ok(results)
    }

    async fn count(&self) -> Result<usize, KnowledgeError> {
        Ok(self.entries.read().await.len())
    }
}
