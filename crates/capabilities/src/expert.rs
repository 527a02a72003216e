//! Expert sport capability — advice and program generation.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use athly_core::capability::{Capability, CapabilityKind, CapabilityRequest};
use athly_core::error::CapabilityError;
use athly_core::knowledge::{join_passages, KnowledgeBase};
use athly_core::provider::{ModelSettings, Provider};
use tracing::{debug, warn};

use crate::prompts;

pub struct ExpertSportCapability {
    provider: Arc<dyn Provider>,
    settings: ModelSettings,
    knowledge: Arc<dyn KnowledgeBase>,
    n_results: usize,
}

impl ExpertSportCapability {
    pub fn new(
        provider: Arc<dyn Provider>,
        settings: ModelSettings,
        knowledge: Arc<dyn KnowledgeBase>,
        n_results: usize,
    ) -> Self {
        Self {
            provider,
            settings,
            knowledge,
            n_results,
        }
    }

    /// Retrieved passages, or an empty context when retrieval fails.
    async fn context_for(&self, query: &str) -> String {
        match self.knowledge.query(query, self.n_results).await {
            Ok(docs) => {
                debug!(store = self.knowledge.name(), hits = docs.len(), "Context retrieved");
                join_passages(&docs)
            }
            Err(e) => {
                warn!(store = self.knowledge.name(), error = %e, "Retrieval failed, continuing without context");
                String::new()
            }
        }
    }

    async fn generate(&self, prompt: String) -> Result<String, CapabilityError> {
        let start = Instant::now();
        let response = self
            .provider
            .complete(self.settings.prompt(prompt))
            .await
            .map_err(|e| CapabilityError::ExecutionFailed {
                capability: CapabilityKind::ExpertSport.name().into(),
                reason: e.to_string(),
            })?;
        debug!(
            duration_ms = start.elapsed().as_millis() as u64,
            chars = response.message.content.len(),
            "Expert generation complete"
        );
        Ok(response.message.content)
    }
}

#[async_trait]
impl Capability for ExpertSportCapability {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::ExpertSport
    }

    fn description(&self) -> &str {
        "Expert en sciences du sport : conseils d'entraînement, technique, récupération, \
         périodisation. Entrée : la question à poser, en texte libre."
    }

    async fn invoke(&self, request: CapabilityRequest) -> Result<String, CapabilityError> {
        let prompt = match request {
            CapabilityRequest::Advice { query } => {
                if query.trim().is_empty() {
                    return Err(CapabilityError::InvalidInput(
                        "expert_sport needs a non-empty question".into(),
                    ));
                }
                let context = self.context_for(&query).await;
                prompts::advice(&query, &context)
            }
            CapabilityRequest::ProgramStructure(structure) => {
                let context = self.context_for(&prompts::structure_query(&structure)).await;
                prompts::structure(&structure, &context)
            }
            CapabilityRequest::ProgramDetail(detail) => prompts::detail(&detail),
            other => {
                return Err(CapabilityError::InvalidInput(format!(
                    "expert_sport cannot handle a {} request",
                    other.label()
                )));
            }
        };
        self.generate(prompt).await
    }
}
