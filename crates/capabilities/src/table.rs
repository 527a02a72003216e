//! Table generator capability — lays program text out as tables.

use std::sync::Arc;

use async_trait::async_trait;
use athly_core::capability::{Capability, CapabilityKind, CapabilityRequest};
use athly_core::error::CapabilityError;
use athly_core::provider::{ModelSettings, Provider};
use tracing::debug;

use crate::prompts;

pub struct TableGeneratorCapability {
    provider: Arc<dyn Provider>,
    settings: ModelSettings,
}

impl TableGeneratorCapability {
    pub fn new(provider: Arc<dyn Provider>, settings: ModelSettings) -> Self {
        Self { provider, settings }
    }
}

#[async_trait]
impl Capability for TableGeneratorCapability {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::TableGenerator
    }

    fn description(&self) -> &str {
        "Met en forme un programme d'entraînement sous forme de tableaux. Entrée : le texte \
         du programme, ou un objet {\"program_data\": ..., \"format\": \"markdown\"|\"html\", \
         \"view\": \"full\"|\"weekly_schedule\"|\"exercise_details\"|\"overview\"}."
    }

    async fn invoke(&self, request: CapabilityRequest) -> Result<String, CapabilityError> {
        let table = match request {
            CapabilityRequest::FormatTable(table) => table,
            other => {
                return Err(CapabilityError::InvalidInput(format!(
                    "table_generator cannot handle a {} request",
                    other.label()
                )));
            }
        };
        if table.program.trim().is_empty() {
            return Err(CapabilityError::InvalidInput(
                "table_generator needs program text".into(),
            ));
        }

        debug!(format = table.format.as_str(), view = ?table.view, "Generating table");
        let prompt = prompts::table(&table.program, table.format, table.view);
        let response = self
            .provider
            .complete(self.settings.prompt(prompt))
            .await
            .map_err(|e| CapabilityError::ExecutionFailed {
                capability: CapabilityKind::TableGenerator.name().into(),
                reason: e.to_string(),
            })?;
        Ok(response.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::RecordingProvider;
    use athly_core::capability::{TableFormat, TableRequest, TableView};

    #[tokio::test]
    async fn html_request_uses_html_template() {
        let provider = Arc::new(RecordingProvider::replying("<table></table>"));
        let cap = TableGeneratorCapability::new(provider.clone(), ModelSettings::new("m"));

        let out = cap
            .invoke(CapabilityRequest::FormatTable(TableRequest {
                program: "Semaine 1: 3 footings".into(),
                format: TableFormat::Html,
                view: TableView::Full,
            }))
            .await
            .unwrap();

        assert_eq!(out, "<table></table>");
        let prompt = provider.last_prompt().unwrap();
        assert!(prompt.contains("program-table"));
        assert!(prompt.contains("Semaine 1: 3 footings"));
    }

    #[tokio::test]
    async fn output_is_returned_verbatim() {
        let raw = "| Jour |Séance|\n|---|---|\n| Lundi |Footing   |";
        let provider = Arc::new(RecordingProvider::replying(raw));
        let cap = TableGeneratorCapability::new(provider, ModelSettings::new("m"));
        let out = cap
            .invoke(CapabilityRequest::FormatTable(TableRequest::markdown("S1")))
            .await
            .unwrap();
        assert_eq!(out, raw);
    }

    #[tokio::test]
    async fn empty_program_rejected() {
        let provider = Arc::new(RecordingProvider::replying("unused"));
        let cap = TableGeneratorCapability::new(provider.clone(), ModelSettings::new("m"));
        let err = cap
            .invoke(CapabilityRequest::FormatTable(TableRequest::markdown("  ")))
            .await
            .unwrap_err();
        assert!(matches!(err, CapabilityError::InvalidInput(_)));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn advice_request_rejected() {
        let provider = Arc::new(RecordingProvider::replying("unused"));
        let cap = TableGeneratorCapability::new(provider, ModelSettings::new("m"));
        let err = cap
            .invoke(CapabilityRequest::Advice { query: "?".into() })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("advice"));
    }

    #[tokio::test]
    async fn model_failure_is_execution_failure() {
        let cap = TableGeneratorCapability::new(
            Arc::new(RecordingProvider::failing()),
            ModelSettings::new("m"),
        );
        let err = cap
            .invoke(CapabilityRequest::FormatTable(TableRequest::markdown("S1")))
            .await
            .unwrap_err();
        assert!(!err.is_recoverable());
    }
}
