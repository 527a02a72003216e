//! Error types for the Athly domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; [`Error`] wraps them all.

use thiserror::Error;

/// The top-level error type for all Athly operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Language model errors ---
    #[error("Language model error: {0}")]
    Provider(#[from] ProviderError),

    // --- Capability errors ---
    #[error("Capability error: {0}")]
    Capability(#[from] CapabilityError),

    // --- Retrieval errors ---
    #[error("Knowledge base error: {0}")]
    Knowledge(#[from] KnowledgeError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Caller input ---
    #[error("Invalid request: {0}")]
    Validation(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// A language-model call failed or timed out.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider returned no completion")]
    EmptyResponse,
}

/// A capability could not be resolved, was given unusable input, or failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    #[error("Unknown capability: {0}")]
    NotFound(String),

    #[error("Invalid capability input: {0}")]
    InvalidInput(String),

    #[error("Capability {capability} failed: {reason}")]
    ExecutionFailed { capability: String, reason: String },
}

impl CapabilityError {
    /// Recoverable problems are fed back to the model; execution failures are not.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CapabilityError::ExecutionFailed { .. })
    }
}

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),
}
