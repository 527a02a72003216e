//! The orchestrator — one coaching session's entry point.
//!
//! Chat turns are routed to the direct or agentic strategy and never fail:
//! any error becomes the apology text. Program generation runs the fixed
//! structure → detail → table pipeline, and its errors are the caller's.

use std::sync::Arc;
use std::time::Instant;

use athly_core::capability::{CapabilityRegistry, CapabilityRequest, TableRequest, TableView};
use athly_core::error::Error;
use athly_core::event::{DomainEvent, EventBus};
use athly_core::memory::ConversationMemory;
use athly_core::program::ProgramRequest;
use athly_core::provider::{ModelSettings, Provider};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::formatter::ResponseFormatter;
use crate::prompts;
use crate::router::{Route, Router};
use crate::tool_loop::{LoopMode, ToolLoop, preview};

pub use athly_core::message::DEFAULT_APOLOGY;

/// The strategy that produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Direct,
    Agentic,
    Pipeline,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Direct => "direct",
            Strategy::Agentic => "agentic",
            Strategy::Pipeline => "pipeline",
        }
    }
}

impl From<Route> for Strategy {
    fn from(route: Route) -> Self {
        match route {
            Route::Direct => Strategy::Direct,
            Route::Agentic => Strategy::Agentic,
        }
    }
}

/// A chat answer and how it was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub text: String,
    pub strategy: Strategy,
}

/// Owns one conversation. Chat methods take `&mut self`, so a session runs
/// at most one turn at a time.
pub struct Orchestrator {
    router: Router,
    tool_loop: ToolLoop,
    registry: Arc<CapabilityRegistry>,
    memory: ConversationMemory,
    formatter: ResponseFormatter,
    events: Arc<EventBus>,
    apology: String,
}

impl Orchestrator {
    pub fn new(
        provider: Arc<dyn Provider>,
        settings: ModelSettings,
        registry: CapabilityRegistry,
    ) -> Self {
        let registry = Arc::new(registry);
        let events = Arc::new(EventBus::default());
        Self {
            router: Router::new(),
            tool_loop: ToolLoop::new(provider, settings, registry.clone())
                .with_event_bus(events.clone()),
            registry,
            memory: ConversationMemory::new(),
            formatter: ResponseFormatter::new(),
            events,
            apology: DEFAULT_APOLOGY.to_string(),
        }
    }

    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.tool_loop = self.tool_loop.with_max_iterations(max);
        self
    }

    pub fn with_apology(mut self, apology: impl Into<String>) -> Self {
        self.apology = apology.into();
        self
    }

    pub fn with_router(mut self, router: Router) -> Self {
        self.router = router;
        self
    }

    /// Publish this session's events on a shared bus.
    pub fn with_event_bus(mut self, events: Arc<EventBus>) -> Self {
        self.tool_loop = self.tool_loop.with_event_bus(events.clone());
        self.events = events;
        self
    }

    /// The conversation so far.
    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// Answer one chat message. Never fails; see [`Orchestrator::respond`].
    pub async fn process_chat(&mut self, message: &str) -> String {
        self.respond(message).await.text
    }

    /// Merge `context` into the session before answering `message`.
    pub async fn process_chat_with_context(
        &mut self,
        message: &str,
        context: serde_json::Map<String, serde_json::Value>,
    ) -> String {
        self.memory.merge_context(context);
        self.respond(message).await.text
    }

    /// Answer one chat message, reporting the strategy used.
    ///
    /// On success the text is formatted and, for the agentic strategy, the
    /// exchange is appended to memory. On any failure memory is left as it
    /// was and the apology is returned unformatted.
    pub async fn respond(&mut self, message: &str) -> Response {
        let route = self.router.route(message);
        let strategy = Strategy::from(route);
        info!(strategy = strategy.as_str(), "Chat message routed");
        self.events.publish(DomainEvent::RequestRouted {
            strategy: strategy.as_str().to_string(),
            message_preview: preview(message),
            timestamp: Utc::now(),
        });

        let text = match self.run_strategy(route, message).await {
            Ok(text) => self.formatter.format(&text),
            Err(e) => {
                warn!(strategy = strategy.as_str(), error = %e, "Chat turn failed, answering with apology");
                self.apology.clone()
            }
        };
        Response { text, strategy }
    }

    async fn run_strategy(&mut self, route: Route, message: &str) -> Result<String, Error> {
        match route {
            Route::Direct => {
                let outcome = self.tool_loop.run(LoopMode::Direct, &[], message).await?;
                Ok(outcome.text)
            }
            Route::Agentic => {
                let system_prompt =
                    prompts::agentic_system(&self.registry.descriptors(), self.memory.context());
                let outcome = self
                    .tool_loop
                    .run(
                        LoopMode::Agentic { system_prompt },
                        self.memory.history(),
                        message,
                    )
                    .await?;
                debug!(
                    status = outcome.status.as_str(),
                    appended = outcome.new_messages.len(),
                    "Saving exchange to memory"
                );
                self.memory.extend(outcome.new_messages);
                Ok(outcome.text)
            }
        }
    }

    /// Generate a multi-week program: structure, then detail, then table.
    ///
    /// Each stage's output is the next stage's input. The first failure
    /// aborts the pipeline and is returned as is. The table is returned
    /// verbatim. The request is expected to be validated by the caller.
    pub async fn generate_training_program(&self, request: &ProgramRequest) -> Result<String, Error> {
        let start = Instant::now();
        info!(
            disciplines = ?request.disciplines,
            weeks = request.duration,
            level = %request.level,
            "Generating training program"
        );

        let structure = self
            .registry
            .invoke(CapabilityRequest::ProgramStructure(request.structure_request()))
            .await?;
        debug!(chars = structure.len(), "Program structure ready");

        let detail = self
            .registry
            .invoke(CapabilityRequest::ProgramDetail(request.detail_request(structure)))
            .await?;
        debug!(chars = detail.len(), "Program detail ready");

        let table = self
            .registry
            .invoke(CapabilityRequest::FormatTable(TableRequest {
                program: detail,
                format: request.format,
                view: TableView::Full,
            }))
            .await?;

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(duration_ms, chars = table.len(), "Training program generated");
        self.events.publish(DomainEvent::ProgramGenerated {
            disciplines: request.disciplines.clone(),
            duration_weeks: request.duration,
            output_chars: table.len(),
            timestamp: Utc::now(),
        });
        Ok(table)
    }
}
