//! Error type for `prestige-gemini`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("no Gemini API key configured")]
  MissingApiKey,

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("Gemini returned {status}: {body}")]
  Status { status: u16, body: String },

  #[error("Gemini response contained no text")]
  EmptyResponse,

  #[error("malformed Gemini payload: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
