//! Built-in capabilities for Athly.
//!
//! Two capabilities make up the closed set the orchestrator works with:
//! the sports expert (advice, program structure, session detail) and the
//! table generator (program text laid out as Markdown or HTML tables).

pub mod expert;
pub mod prompts;
pub mod table;

#[cfg(test)]
pub(crate) mod test_helpers;

use std::sync::Arc;

use athly_core::capability::CapabilityRegistry;
use athly_core::knowledge::KnowledgeBase;
use athly_core::provider::{ModelSettings, Provider};

pub use expert::ExpertSportCapability;
pub use table::TableGeneratorCapability;

/// Create the registry with both built-in capabilities sharing one provider.
pub fn default_registry(
    provider: Arc<dyn Provider>,
    settings: ModelSettings,
    knowledge: Arc<dyn KnowledgeBase>,
    n_results: usize,
) -> athly_core::Result<CapabilityRegistry> {
    CapabilityRegistry::builder()
        .register(Arc::new(ExpertSportCapability::new(
            provider.clone(),
            settings.clone(),
            knowledge,
            n_results,
        )))
        .register(Arc::new(TableGeneratorCapability::new(provider, settings)))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::RecordingProvider;
    use athly_knowledge::EmptyKnowledgeBase;

    #[test]
    fn default_registry_holds_both_capabilities() {
        let registry = default_registry(
            Arc::new(RecordingProvider::replying("ok")),
            ModelSettings::new("m"),
            Arc::new(EmptyKnowledgeBase),
            5,
        )
        .unwrap();
        assert_eq!(registry.names(), vec!["expert_sport", "table_generator"]);
        let descriptors = registry.descriptors();
        assert!(descriptors[1].description.contains("tableaux"));
    }
}
