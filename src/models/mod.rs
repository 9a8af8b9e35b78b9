//! Model client abstraction and the hosted-API implementation
//!
//! [`ModelClient`] is the capability the core depends on; [`GeminiClient`]
//! is the production implementation.

pub mod client;
pub mod gemini;

pub use client::{ModelClient, ModelError, ModelReply};
pub use gemini::GeminiClient;
