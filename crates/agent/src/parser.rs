//! Model-output parsing for the capability protocol.
//!
//! The model asks for a capability by emitting a JSON object
//! `{"thought": ..., "action": <name>, "action_input": ...}`, fenced in a
//! code block or as the whole message. `"action": "Final Answer"` ends the
//! turn. Text without any such object is itself the final answer.

use std::sync::LazyLock;

use athly_core::capability::{
    CapabilityKind, CapabilityRequest, DetailRequest, StructureRequest, TableFormat, TableRequest,
    TableView,
};
use athly_core::error::CapabilityError;
use regex_lite::Regex;
use serde_json::Value;

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[a-zA-Z]*[ \t]*\n?(.*?)```").expect("valid regex"));

/// What one model turn asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelTurn {
    /// No capability requested; the text is the answer.
    Final(String),
    /// Capability requests in the order the model listed them.
    Requests(Vec<Result<ActionRequest, ParseIssue>>),
}

/// A well-formed capability request, not yet resolved against the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    pub thought: Option<String>,
    pub action: String,
    pub input: Value,
}

/// Why an attempted request could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseIssue {
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("the object has no \"action\" field")]
    MissingAction,
}

enum Step {
    Final(String),
    Action(ActionRequest),
    Issue(ParseIssue),
}

pub fn parse(output: &str) -> ModelTurn {
    let steps = extract_steps(output);
    if steps.is_empty() {
        return ModelTurn::Final(output.trim().to_string());
    }

    let mut first_final = None;
    let mut requests = Vec::new();
    for step in steps {
        match step {
            Step::Final(text) => {
                first_final.get_or_insert(text);
            }
            Step::Action(action) => requests.push(Ok(action)),
            Step::Issue(issue) => requests.push(Err(issue)),
        }
    }

    // A final answer next to pending requests is premature; the requests win.
    match (requests.is_empty(), first_final) {
        (true, Some(text)) => ModelTurn::Final(text),
        _ => ModelTurn::Requests(requests),
    }
}

fn extract_steps(output: &str) -> Vec<Step> {
    let fenced: Vec<Step> = FENCED_BLOCK
        .captures_iter(output)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|body| body.starts_with('{'))
        .flat_map(decode_all)
        .collect();
    if !fenced.is_empty() {
        return fenced;
    }

    let trimmed = output.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return decode_all(trimmed);
    }

    // Objects embedded in prose only count when they are clearly requests.
    let embedded = embedded_requests(trimmed);
    if !embedded.is_empty() {
        return embedded;
    }
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end && trimmed[start..=end].contains("\"action\"") => {
            vec![decode(&trimmed[start..=end])]
        }
        _ => Vec::new(),
    }
}

fn decode(body: &str) -> Step {
    match serde_json::from_str(body) {
        Ok(value) => step_from(value),
        Err(e) => Step::Issue(ParseIssue::InvalidJson(e.to_string())),
    }
}

/// Back-to-back objects (`{..}\n{..}`), in order. Decoding stops at the
/// first malformed one.
fn decode_all(body: &str) -> Vec<Step> {
    let mut steps = Vec::new();
    for value in serde_json::Deserializer::from_str(body).into_iter::<Value>() {
        match value {
            Ok(value) => steps.push(step_from(value)),
            Err(e) => {
                steps.push(Step::Issue(ParseIssue::InvalidJson(e.to_string())));
                break;
            }
        }
    }
    steps
}

/// Well-formed objects carrying an `action` key, wherever they sit in `text`.
fn embedded_requests(text: &str) -> Vec<Step> {
    let mut steps = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find('{') {
        let candidate = &rest[start..];
        let mut stream = serde_json::Deserializer::from_str(candidate).into_iter::<Value>();
        match stream.next() {
            Some(Ok(value)) => {
                let consumed = stream.byte_offset();
                if value.get("action").is_some() {
                    steps.push(step_from(value));
                }
                rest = &candidate[consumed..];
            }
            _ => rest = &candidate[1..],
        }
    }
    steps
}

fn step_from(value: Value) -> Step {
    let Some(action) = value.get("action").and_then(Value::as_str) else {
        return Step::Issue(ParseIssue::MissingAction);
    };
    let input = value.get("action_input").cloned().unwrap_or(Value::Null);

    if is_final_answer(action) {
        return Step::Final(value_text(&input));
    }

    Step::Action(ActionRequest {
        thought: value
            .get("thought")
            .and_then(Value::as_str)
            .map(str::to_string),
        action: action.trim().to_string(),
        input,
    })
}

fn is_final_answer(action: &str) -> bool {
    let normalized = action.trim().to_lowercase().replace(['_', '-'], " ");
    normalized == "final answer"
}

/// The text a JSON input stands for: strings as-is, anything else serialized.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Turn a model-supplied `action_input` into a typed request for `kind`.
pub fn request_for(kind: CapabilityKind, input: &Value) -> Result<CapabilityRequest, CapabilityError> {
    match kind {
        CapabilityKind::ExpertSport => expert_request(input),
        CapabilityKind::TableGenerator => table_request(input),
    }
}

fn expert_request(input: &Value) -> Result<CapabilityRequest, CapabilityError> {
    match input {
        Value::String(query) => Ok(CapabilityRequest::Advice {
            query: query.clone(),
        }),
        Value::Object(map) if map.contains_key("structure") => {
            serde_json::from_value::<DetailRequest>(input.clone())
                .map(CapabilityRequest::ProgramDetail)
                .map_err(|e| CapabilityError::InvalidInput(e.to_string()))
        }
        Value::Object(map) if map.contains_key("disciplines") => {
            serde_json::from_value::<StructureRequest>(input.clone())
                .map(CapabilityRequest::ProgramStructure)
                .map_err(|e| CapabilityError::InvalidInput(e.to_string()))
        }
        Value::Object(map) => map
            .get("query")
            .and_then(Value::as_str)
            .map(|q| CapabilityRequest::Advice {
                query: q.to_string(),
            })
            .ok_or_else(|| {
                CapabilityError::InvalidInput(
                    "expert_sport expects a question string or {\"query\": ...}".into(),
                )
            }),
        _ => Err(CapabilityError::InvalidInput(
            "expert_sport expects a question string".into(),
        )),
    }
}

fn table_request(input: &Value) -> Result<CapabilityRequest, CapabilityError> {
    match input {
        Value::String(program) => Ok(CapabilityRequest::FormatTable(TableRequest::markdown(
            program.clone(),
        ))),
        Value::Object(map) => {
            let program = map
                .get("program_data")
                .or_else(|| map.get("program"))
                .map(value_text)
                .ok_or_else(|| {
                    CapabilityError::InvalidInput(
                        "table_generator expects the program text in \"program_data\"".into(),
                    )
                })?;
            let format = map
                .get("format")
                .and_then(Value::as_str)
                .map(TableFormat::from_hint)
                .unwrap_or_default();
            let view = match map.get("view").and_then(Value::as_str) {
                None => TableView::Full,
                Some(hint) => TableView::from_hint(hint).ok_or_else(|| {
                    CapabilityError::InvalidInput(format!(
                        "unknown view '{hint}' (expected full, weekly_schedule, exercise_details or overview)"
                    ))
                })?,
            };
            Ok(CapabilityRequest::FormatTable(TableRequest {
                program,
                format,
                view,
            }))
        }
        _ => Err(CapabilityError::InvalidInput(
            "table_generator expects the program text".into(),
        )),
    }
}
