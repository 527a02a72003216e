//! Language-model provider implementations for Athly.
//!
//! All providers implement the `athly_core::Provider` trait.
//! [`setup::build_from_config`] picks the backend named in configuration.

pub mod openai_compat;
pub mod setup;

pub use openai_compat::OpenAiCompatProvider;
pub use setup::{build_from_config, default_base_url, model_settings};
