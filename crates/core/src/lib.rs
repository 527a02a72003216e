//! # Athly Core
//!
//! Domain types, traits, and error definitions for the Athly coaching
//! orchestrator. This crate has **no framework dependencies**: it defines the
//! domain model every other crate implements against.
//!
//! ## Design Philosophy
//!
//! Every collaborator (language model, capability, retrieval store) is a trait
//! here. Implementations live in their own crates, which keeps the
//! orchestration core testable with scripted stand-ins.

pub mod capability;
pub mod error;
pub mod event;
pub mod knowledge;
pub mod memory;
pub mod message;
pub mod program;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use capability::{
    Capability, CapabilityDescriptor, CapabilityKind, CapabilityRegistry, CapabilityRequest,
    DetailRequest, StructureRequest, TableFormat, TableRequest, TableView,
};
pub use error::{CapabilityError, Error, KnowledgeError, ProviderError, Result};
pub use event::{DomainEvent, EventBus};
pub use knowledge::{Document, KnowledgeBase};
pub use memory::ConversationMemory;
pub use message::{ConversationId, DEFAULT_APOLOGY, Message, Role};
pub use program::ProgramRequest;
pub use provider::{ModelSettings, Provider, ProviderRequest, ProviderResponse, Usage};
