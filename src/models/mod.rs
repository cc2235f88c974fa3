//! Data models for the upstream APIs and the HTTP surface.
//!
//! This module contains the type definitions for:
//! - The Anthropic Messages API (`anthropic`)
//! - The Google Gemini generateContent API (`gemini`)
//! - The JSON envelopes returned to callers (`envelope`)

// Author: kelexine (https://github.com/kelexine)

pub mod anthropic;
pub mod envelope;
pub mod gemini;

pub use envelope::{AnalysisEnvelope, ErrorEnvelope, GenerationEnvelope, HealthResponse, HealthStatus};
