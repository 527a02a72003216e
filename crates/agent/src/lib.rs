//! The orchestration core of Athly.
//!
//! A chat message takes one of two paths:
//!
//! 1. **Route** the raw message ([`Router`]): plain questions go direct,
//!    comparisons, planning and custom-program requests go agentic
//! 2. **Direct**: one model call on a stand-alone prompt
//! 3. **Agentic**: the bounded [`ToolLoop`] on top of the session history,
//!    where the model may call the sports expert or the table generator
//!    before answering
//! 4. **Format** the answer ([`ResponseFormatter`]) and return it
//!
//! Training programs skip the router and run a fixed three-stage pipeline
//! through [`Orchestrator::generate_training_program`].

pub mod formatter;
pub mod orchestrator;
pub mod parser;
pub mod prompts;
pub mod router;
pub mod tool_loop;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use formatter::ResponseFormatter;
pub use orchestrator::{DEFAULT_APOLOGY, Orchestrator, Response, Strategy};
pub use parser::{ActionRequest, ModelTurn, ParseIssue};
pub use router::{Route, Router};
pub use tool_loop::{
    DEFAULT_MAX_ITERATIONS, LoopMode, LoopOutcome, LoopRun, LoopStatus, ToolInvocationRecord,
    ToolLoop,
};
