//! The bounded tool loop — model call, capability dispatch, repeat.
//!
//! One [`ToolLoop::run`] is one `LoopRun`:
//!
//! 1. **Model call** with the system prompt, the prior history and the
//!    messages produced so far in this run
//! 2. **Parse** the output: no capability request means a final answer
//! 3. **Dispatch** every request in the order the model listed them; each
//!    outcome becomes a tool message. Unknown names and unreadable requests
//!    become corrective tool messages instead of errors
//! 4. Count the round and go back to 1, until the budget is spent
//!
//! The run never touches conversation memory. It returns the messages it
//! produced and the caller decides whether to keep them, so a failed run
//! leaves no trace.
//!
//! The direct strategy is the same run with capabilities disabled: one model
//! call on a stand-alone prompt, no history, output taken as final.

use std::sync::Arc;
use std::time::Instant;

use athly_core::capability::CapabilityRegistry;
use athly_core::error::{CapabilityError, Error};
use athly_core::event::{DomainEvent, EventBus};
use athly_core::message::Message;
use athly_core::provider::{ModelSettings, Provider, ProviderResponse};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::parser::{self, ActionRequest, ModelTurn, ParseIssue};
use crate::prompts;

/// Iteration budget when none is configured.
pub const DEFAULT_MAX_ITERATIONS: u32 = 25;

/// Capability name used on corrective messages about unreadable requests.
const INVALID_REQUEST_CHANNEL: &str = "invalid_request";

/// How a run talks to the model.
#[derive(Debug, Clone, PartialEq)]
pub enum LoopMode {
    /// One call on the stand-alone prompt, no history, no capabilities.
    Direct,
    /// The full loop under the given system prompt.
    Agentic { system_prompt: String },
}

impl LoopMode {
    fn label(&self) -> &'static str {
        match self {
            LoopMode::Direct => "direct",
            LoopMode::Agentic { .. } => "agentic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopStatus {
    Running,
    Answered,
    BudgetExceeded,
    Failed,
}

impl LoopStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LoopStatus::Running => "running",
            LoopStatus::Answered => "answered",
            LoopStatus::BudgetExceeded => "budget_exceeded",
            LoopStatus::Failed => "failed",
        }
    }
}

/// Bookkeeping of one run. Lives only for the duration of [`ToolLoop::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopRun {
    /// Completed dispatch rounds
    pub iteration: u32,
    pub max_iterations: u32,
    pub status: LoopStatus,
}

impl LoopRun {
    fn new(max_iterations: u32) -> Self {
        Self {
            iteration: 0,
            max_iterations,
            status: LoopStatus::Running,
        }
    }

    fn budget_spent(&self) -> bool {
        self.iteration >= self.max_iterations
    }
}

/// One capability request handled during a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocationRecord {
    /// Position among all requests of the run, starting at 0
    pub sequence_index: usize,
    /// The name the model used
    pub capability: String,
    pub input: serde_json::Value,
    pub outcome: Result<String, CapabilityError>,
}

impl ToolInvocationRecord {
    /// The tool message reporting this record back to the model.
    pub fn to_message(&self, known: &[&str]) -> Message {
        let content = match &self.outcome {
            Ok(output) => output.clone(),
            Err(CapabilityError::NotFound(name)) => prompts::unknown_capability(name, known),
            Err(e) => prompts::invalid_request(&e.to_string()),
        };
        Message::tool(self.capability.clone(), content)
    }
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct LoopOutcome {
    /// `Answered` or `BudgetExceeded`; failed runs return `Err`
    pub status: LoopStatus,
    /// The final answer, or the last model output when the budget ran out
    pub text: String,
    pub iterations: u32,
    pub model_calls: u32,
    pub invocations: Vec<ToolInvocationRecord>,
    /// User message, assistant turns and tool messages, in order. Empty for
    /// the direct strategy.
    pub new_messages: Vec<Message>,
}

/// Drives the model and the capabilities for one request at a time.
pub struct ToolLoop {
    provider: Arc<dyn Provider>,
    settings: ModelSettings,
    registry: Arc<CapabilityRegistry>,
    events: Arc<EventBus>,
    max_iterations: u32,
}

impl ToolLoop {
    pub fn new(
        provider: Arc<dyn Provider>,
        settings: ModelSettings,
        registry: Arc<CapabilityRegistry>,
    ) -> Self {
        Self {
            provider,
            settings,
            registry,
            events: Arc::new(EventBus::default()),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Set the iteration budget. A budget of zero is raised to one.
    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max.max(1);
        self
    }

    pub fn with_event_bus(mut self, events: Arc<EventBus>) -> Self {
        self.events = events;
        self
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Execute one run for `user_message` on top of `history`.
    pub async fn run(
        &self,
        mode: LoopMode,
        history: &[Message],
        user_message: &str,
    ) -> Result<LoopOutcome, Error> {
        let mut run = LoopRun::new(self.max_iterations);
        info!(
            mode = mode.label(),
            max_iterations = run.max_iterations,
            history_len = history.len(),
            "Tool loop started"
        );

        let system_prompt = match mode {
            LoopMode::Direct => {
                let response = self
                    .call_model(vec![Message::user(prompts::direct(user_message))])
                    .await
                    .inspect_err(|_| self.finish(&mut run, LoopStatus::Failed))?;
                self.finish(&mut run, LoopStatus::Answered);
                return Ok(LoopOutcome {
                    status: run.status,
                    text: response.message.content,
                    iterations: 0,
                    model_calls: 1,
                    invocations: Vec::new(),
                    new_messages: Vec::new(),
                });
            }
            LoopMode::Agentic { system_prompt } => system_prompt,
        };

        let known = self.registry.names();
        let mut new_messages = vec![Message::user(user_message)];
        let mut invocations: Vec<ToolInvocationRecord> = Vec::new();
        let mut model_calls = 0;

        let text = loop {
            let mut messages = Vec::with_capacity(1 + history.len() + new_messages.len());
            messages.push(Message::system(system_prompt.as_str()));
            messages.extend(history.iter().cloned());
            messages.extend(new_messages.iter().cloned());

            let response = self
                .call_model(messages)
                .await
                .inspect_err(|_| self.finish(&mut run, LoopStatus::Failed))?;
            model_calls += 1;
            let content = response.message.content;

            let requests = match parser::parse(&content) {
                ModelTurn::Final(answer) => {
                    new_messages.push(Message::assistant(answer.clone()));
                    run.status = LoopStatus::Answered;
                    break answer;
                }
                ModelTurn::Requests(requests) => requests,
            };

            new_messages.push(Message::assistant(content.clone()));
            for request in requests {
                let message = match request {
                    Ok(action) => {
                        let record = self
                            .dispatch(run.iteration, invocations.len(), action)
                            .await
                            .inspect_err(|_| self.finish(&mut run, LoopStatus::Failed))?;
                        let message = record.to_message(&known);
                        invocations.push(record);
                        message
                    }
                    Err(issue) => corrective_for(run.iteration, &issue),
                };
                new_messages.push(message);
            }

            run.iteration += 1;
            if run.budget_spent() {
                warn!(
                    iterations = run.iteration,
                    "Iteration budget spent, returning last model output"
                );
                run.status = LoopStatus::BudgetExceeded;
                break content;
            }
        };

        let status = run.status;
        self.finish(&mut run, status);
        Ok(LoopOutcome {
            status: run.status,
            text,
            iterations: run.iteration,
            model_calls,
            invocations,
            new_messages,
        })
    }

    async fn call_model(&self, messages: Vec<Message>) -> Result<ProviderResponse, Error> {
        let start = Instant::now();
        let response = self
            .provider
            .complete(self.settings.request(messages))
            .await
            .inspect_err(|e| warn!(provider = self.provider.name(), error = %e, "Model call failed"))?;
        let duration_ms = start.elapsed().as_millis() as u64;

        debug!(
            model = %response.model,
            duration_ms,
            output = %preview(&response.message.content),
            "Model answered"
        );
        self.events.publish(DomainEvent::ModelCalled {
            model: response.model.clone(),
            tokens_used: response.usage.as_ref().map(|u| u.total_tokens),
            duration_ms,
            timestamp: Utc::now(),
        });
        Ok(response)
    }

    /// Resolve and invoke one request. Only execution failures are errors;
    /// everything the model can correct is recorded on the returned record.
    async fn dispatch(
        &self,
        iteration: u32,
        sequence_index: usize,
        action: ActionRequest,
    ) -> Result<ToolInvocationRecord, Error> {
        let ActionRequest { action, input, .. } = action;
        debug!(
            iteration,
            capability = %action,
            input = %preview(&parser::value_text(&input)),
            "Capability requested"
        );

        let outcome = match self.registry.resolve(&action) {
            Err(e) => Err(e),
            Ok(capability) => match parser::request_for(capability.kind(), &input) {
                Err(e) => Err(e),
                Ok(request) => {
                    let start = Instant::now();
                    let result = capability.invoke(request).await;
                    let duration_ms = start.elapsed().as_millis() as u64;
                    self.events.publish(DomainEvent::CapabilityInvoked {
                        capability: capability.kind().name().to_string(),
                        success: result.is_ok(),
                        duration_ms,
                        timestamp: Utc::now(),
                    });
                    result
                }
            },
        };

        match &outcome {
            Ok(output) => debug!(
                iteration,
                capability = %action,
                output = %preview(output),
                "Capability succeeded"
            ),
            Err(e) if e.is_recoverable() => debug!(
                iteration,
                capability = %action,
                error = %e,
                "Capability request rejected, asking the model to correct it"
            ),
            Err(e) => {
                warn!(iteration, capability = %action, error = %e, "Capability failed");
                return Err(Error::Capability(e.clone()));
            }
        }

        Ok(ToolInvocationRecord {
            sequence_index,
            capability: action,
            input,
            outcome,
        })
    }

    fn finish(&self, run: &mut LoopRun, status: LoopStatus) {
        run.status = status;
        info!(
            status = status.as_str(),
            iterations = run.iteration,
            "Tool loop finished"
        );
        self.events.publish(DomainEvent::LoopFinished {
            status: status.as_str().to_string(),
            iterations: run.iteration,
            timestamp: Utc::now(),
        });
    }
}

fn corrective_for(iteration: u32, issue: &ParseIssue) -> Message {
    debug!(iteration, issue = %issue, "Unreadable capability request");
    Message::tool(INVALID_REQUEST_CHANNEL, prompts::invalid_request(&issue.to_string()))
}

/// First characters of `text`, for logs.
pub(crate) fn preview(text: &str) -> String {
    const MAX_CHARS: usize = 120;
    let mut out: String = text.chars().take(MAX_CHARS).collect();
    if text.chars().count() > MAX_CHARS {
        out.push('…');
    }
    out
}
