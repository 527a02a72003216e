//! Capability trait — the named units of work the orchestrator can invoke.
//!
//! The set of capabilities is closed: [`CapabilityKind`] enumerates every
//! name the model may request, and [`CapabilityRegistry`] is validated at
//! construction to hold exactly one implementation per kind. Resolving a
//! model-supplied name is the only place an unknown capability can surface.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{CapabilityError, Error};

/// Every capability the orchestrator knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    /// Sports-science advice and program generation
    ExpertSport,
    /// Turns raw program text into tables
    TableGenerator,
}

impl CapabilityKind {
    pub const ALL: [CapabilityKind; 2] = [CapabilityKind::ExpertSport, CapabilityKind::TableGenerator];

    /// The name the model uses to request this capability.
    pub fn name(self) -> &'static str {
        match self {
            CapabilityKind::ExpertSport => "expert_sport",
            CapabilityKind::TableGenerator => "table_generator",
        }
    }

    /// Resolve a model-supplied name. Surrounding whitespace and case are ignored.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Output format for the table generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    #[default]
    Markdown,
    Html,
}

impl TableFormat {
    /// Parse a format hint; anything unrecognised falls back to Markdown.
    pub fn from_hint(hint: &str) -> Self {
        match hint.trim().to_ascii_lowercase().as_str() {
            "html" => TableFormat::Html,
            _ => TableFormat::Markdown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TableFormat::Markdown => "markdown",
            TableFormat::Html => "html",
        }
    }
}

/// Which table the generator should produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableView {
    /// The whole program, week by week
    #[default]
    Full,
    /// One week's days and session types
    WeeklySchedule,
    /// Sets, reps, load and rest per exercise
    ExerciseDetails,
    /// Week-by-week progression summary
    Overview,
}

impl TableView {
    pub fn from_hint(hint: &str) -> Option<Self> {
        match hint.trim().to_ascii_lowercase().as_str() {
            "full" => Some(TableView::Full),
            "weekly_schedule" | "weekly" => Some(TableView::WeeklySchedule),
            "exercise_details" | "exercises" => Some(TableView::ExerciseDetails),
            "overview" => Some(TableView::Overview),
            _ => None,
        }
    }
}

/// Input of the structure stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureRequest {
    pub disciplines: Vec<String>,
    pub duration_weeks: u32,
    pub level: String,
    pub goals: String,
}

/// Input of the detail stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRequest {
    /// Output of the structure stage, verbatim
    pub structure: String,
    pub constraints: String,
    pub equipment: String,
    pub frequency: u32,
    pub time_per_session: u32,
}

/// Input of the table generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRequest {
    pub program: String,
    #[serde(default)]
    pub format: TableFormat,
    #[serde(default)]
    pub view: TableView,
}

impl TableRequest {
    pub fn markdown(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            format: TableFormat::Markdown,
            view: TableView::Full,
        }
    }
}

/// One unit of work for a capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CapabilityRequest {
    Advice { query: String },
    ProgramStructure(StructureRequest),
    ProgramDetail(DetailRequest),
    FormatTable(TableRequest),
}

impl CapabilityRequest {
    /// The capability that serves this request.
    pub fn kind(&self) -> CapabilityKind {
        match self {
            CapabilityRequest::Advice { .. }
            | CapabilityRequest::ProgramStructure(_)
            | CapabilityRequest::ProgramDetail(_) => CapabilityKind::ExpertSport,
            CapabilityRequest::FormatTable(_) => CapabilityKind::TableGenerator,
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            CapabilityRequest::Advice { .. } => "advice",
            CapabilityRequest::ProgramStructure(_) => "program_structure",
            CapabilityRequest::ProgramDetail(_) => "program_detail",
            CapabilityRequest::FormatTable(_) => "format_table",
        }
    }
}

/// Name and description of a registered capability (sent to the model).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityDescriptor {
    pub name: String,
    pub description: String,
}

/// The core Capability trait.
#[async_trait]
pub trait Capability: Send + Sync {
    /// Which slot of the registry this capability fills.
    fn kind(&self) -> CapabilityKind;

    /// What this capability does (sent to the model).
    fn description(&self) -> &str;

    /// Run one request. Requests meant for another kind are `InvalidInput`.
    async fn invoke(&self, request: CapabilityRequest) -> Result<String, CapabilityError>;

    fn descriptor(&self) -> CapabilityDescriptor {
        CapabilityDescriptor {
            name: self.kind().name().to_string(),
            description: self.description().to_string(),
        }
    }
}

/// The fixed capability set, one implementation per [`CapabilityKind`].
///
/// Read-only after construction, so it can be shared behind an `Arc`.
pub struct CapabilityRegistry {
    expert_sport: Arc<dyn Capability>,
    table_generator: Arc<dyn Capability>,
}

impl CapabilityRegistry {
    pub fn builder() -> CapabilityRegistryBuilder {
        CapabilityRegistryBuilder::default()
    }

    /// Look up a capability by kind.
    pub fn get(&self, kind: CapabilityKind) -> &dyn Capability {
        match kind {
            CapabilityKind::ExpertSport => self.expert_sport.as_ref(),
            CapabilityKind::TableGenerator => self.table_generator.as_ref(),
        }
    }

    /// Look up a capability by the name the model used.
    pub fn resolve(&self, name: &str) -> Result<&dyn Capability, CapabilityError> {
        CapabilityKind::from_name(name)
            .map(|kind| self.get(kind))
            .ok_or_else(|| CapabilityError::NotFound(name.trim().to_string()))
    }

    /// Route a request to the capability that serves it.
    pub async fn invoke(&self, request: CapabilityRequest) -> Result<String, CapabilityError> {
        self.get(request.kind()).invoke(request).await
    }

    /// Descriptors in declaration order.
    pub fn descriptors(&self) -> Vec<CapabilityDescriptor> {
        CapabilityKind::ALL
            .into_iter()
            .map(|kind| self.get(kind).descriptor())
            .collect()
    }

    pub fn names(&self) -> Vec<&'static str> {
        CapabilityKind::ALL.into_iter().map(CapabilityKind::name).collect()
    }
}

/// Collects implementations and checks that the set is complete.
#[derive(Default)]
pub struct CapabilityRegistryBuilder {
    expert_sport: Option<Arc<dyn Capability>>,
    table_generator: Option<Arc<dyn Capability>>,
}

impl CapabilityRegistryBuilder {
    /// Register a capability in the slot named by its kind. Replaces any earlier one.
    pub fn register(mut self, capability: Arc<dyn Capability>) -> Self {
        match capability.kind() {
            CapabilityKind::ExpertSport => self.expert_sport = Some(capability),
            CapabilityKind::TableGenerator => self.table_generator = Some(capability),
        }
        self
    }

    /// Fails if any kind has no implementation.
    pub fn build(self) -> Result<CapabilityRegistry, Error> {
        let missing = |kind: CapabilityKind| Error::Config {
            message: format!("no implementation registered for capability '{kind}'"),
        };
        Ok(CapabilityRegistry {
            expert_sport: self
                .expert_sport
                .ok_or_else(|| missing(CapabilityKind::ExpertSport))?,
            table_generator: self
                .table_generator
                .ok_or_else(|| missing(CapabilityKind::TableGenerator))?,
        })
    }
}
