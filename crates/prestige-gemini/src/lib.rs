//! Gemini `generateContent` backend for Prestige design proposals.
//!
//! Themes are requested with a JSON response schema so the model answers
//! with an array that deserialises straight into
//! [`ThemeDraft`](prestige_core::model::ThemeDraft). Biographies are plain
//! text. Every failure is reported as an [`Error`]; turning failures into
//! fallbacks is the job of
//! [`ProposalService`](prestige_core::proposal::ProposalService).

mod client;
mod prompt;
mod wire;

pub mod error;

pub use client::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClient, GeminiConfig};
pub use error::{Error, Result};
