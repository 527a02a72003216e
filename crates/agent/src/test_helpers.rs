//! Shared test doubles for the loop and orchestrator tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use athly_core::capability::{Capability, CapabilityKind, CapabilityRegistry, CapabilityRequest};
use athly_core::error::{CapabilityError, ProviderError};
use athly_core::message::Message;
use athly_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};

/// A mock provider that returns scripted replies in sequence.
///
/// Once the script is used up it repeats the fallback reply, if any, and
/// panics otherwise. Every request is recorded.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
    fallback: Option<String>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(replies: &[&str]) -> Self {
        Self::from_results(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn from_results(script: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Reply with the same text forever.
    pub fn always(reply: &str) -> Self {
        Self {
            fallback: Some(reply.to_string()),
            ..Self::new(&[])
        }
    }

    /// Fail every call with a timeout.
    pub fn failing() -> Self {
        Self::from_results(vec![Err(ProviderError::Timeout("scripted timeout".into()))])
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let model = request.model.clone();
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request);
            requests.len()
        };

        let next = self.script.lock().unwrap().pop_front();
        let reply = match (next, &self.fallback) {
            (Some(reply), _) => reply?,
            (None, Some(fallback)) => fallback.clone(),
            (None, None) => panic!("ScriptedProvider exhausted at call #{call}"),
        };

        Ok(ProviderResponse {
            message: Message::assistant(reply),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model,
        })
    }
}

/// Every request the recording capabilities received, as `(kind name, request)`.
pub type CallLog = Arc<Mutex<Vec<(String, CapabilityRequest)>>>;

/// A capability that records its requests into a shared log and replies
/// `"<request label> output"`, or fails on one chosen request label.
pub struct RecordingCapability {
    kind: CapabilityKind,
    log: CallLog,
    fail_on: Option<&'static str>,
}

impl RecordingCapability {
    pub fn new(kind: CapabilityKind, log: &CallLog) -> Self {
        Self {
            kind,
            log: log.clone(),
            fail_on: None,
        }
    }

    pub fn failing_on(mut self, label: &'static str) -> Self {
        self.fail_on = Some(label);
        self
    }
}

#[async_trait]
impl Capability for RecordingCapability {
    fn kind(&self) -> CapabilityKind {
        self.kind
    }

    fn description(&self) -> &str {
        "Records requests"
    }

    async fn invoke(&self, request: CapabilityRequest) -> Result<String, CapabilityError> {
        let label = request.label();
        self.log
            .lock()
            .unwrap()
            .push((self.kind.name().to_string(), request));

        if self.fail_on == Some(label) {
            return Err(CapabilityError::ExecutionFailed {
                capability: self.kind.name().into(),
                reason: format!("{label} exploded"),
            });
        }
        Ok(format!("{label} output"))
    }
}

/// Registry of two recording capabilities sharing one log.
pub fn recording_registry() -> (CapabilityRegistry, CallLog) {
    failing_registry(None)
}

/// Like [`recording_registry`], failing on the given request label.
pub fn failing_registry(fail_on: Option<&'static str>) -> (CapabilityRegistry, CallLog) {
    let log = CallLog::default();
    let mut expert = RecordingCapability::new(CapabilityKind::ExpertSport, &log);
    let mut table = RecordingCapability::new(CapabilityKind::TableGenerator, &log);
    expert.fail_on = fail_on;
    table.fail_on = fail_on;
    let registry = CapabilityRegistry::builder()
        .register(Arc::new(expert))
        .register(Arc::new(table))
        .build()
        .unwrap();
    (registry, log)
}
