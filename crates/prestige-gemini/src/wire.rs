//! Request and response bodies of `models/{model}:generateContent`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
  pub contents:          Vec<Content>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub generation_config: Option<GenerationConfig>,
}

impl GenerateRequest {
  pub fn text(prompt: String) -> Self {
    Self {
      contents:          vec![Content { parts: vec![Part { text: Some(prompt) }] }],
      generation_config: None,
    }
  }

  pub fn json(prompt: String, schema: Value) -> Self {
    Self {
      generation_config: Some(GenerationConfig {
        response_mime_type: "application/json".into(),
        response_schema:    schema,
      }),
      ..Self::text(prompt)
    }
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
  pub response_mime_type: String,
  pub response_schema:    Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
  #[serde(default)]
  pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
  #[serde(default)]
  pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
  pub content: Option<Content>,
}

impl GenerateResponse {
  /// Concatenated text parts of the first candidate.
  pub fn text(&self) -> Option<String> {
    let content = self.candidates.first()?.content.as_ref()?;
    let text: String = content
      .parts
      .iter()
      .filter_map(|p| p.text.as_deref())
      .collect();
    (!text.trim().is_empty()).then_some(text)
  }
}
