//! qagen - question/answer and free-form prompt generator
//!
//! This library classifies incoming generation requests, builds the prompt for
//! the selected strategy, and forwards it to a hosted LLM through the
//! [`models::ModelClient`] capability.

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod generator;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod prompt;
pub mod telemetry;
