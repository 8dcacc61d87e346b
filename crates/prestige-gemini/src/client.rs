//! [`GeminiClient`], an HTTP [`DesignBackend`].

use std::{fmt, time::Duration};

use prestige_core::{
  model::ThemeDraft,
  proposal::{BioRequest, DesignBackend, DesignRequest},
};
use reqwest::Client;
use tracing::debug;

use crate::{
  Error, Result,
  prompt::{bio_prompt, design_prompt, theme_schema},
  wire::{GenerateRequest, GenerateResponse},
};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Connection settings for the Gemini API.
#[derive(Clone)]
pub struct GeminiConfig {
  pub api_key:  String,
  pub model:    String,
  pub base_url: String,
  pub timeout:  Duration,
}

impl Default for GeminiConfig {
  fn default() -> Self {
    Self {
      api_key:  String::new(),
      model:    DEFAULT_MODEL.to_owned(),
      base_url: DEFAULT_BASE_URL.to_owned(),
      timeout:  Duration::from_secs(60),
    }
  }
}

impl fmt::Debug for GeminiConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("GeminiConfig")
      .field("api_key", &"<redacted>")
      .field("model", &self.model)
      .field("base_url", &self.base_url)
      .field("timeout", &self.timeout)
      .finish()
  }
}

/// Async client for `generateContent`.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct GeminiClient {
  client: Client,
  config: GeminiConfig,
}

impl GeminiClient {
  pub fn new(config: GeminiConfig) -> Result<Self> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config })
  }

  pub fn config(&self) -> &GeminiConfig { &self.config }

  fn url(&self) -> String {
    format!(
      "{}/v1beta/models/{}:generateContent",
      self.config.base_url.trim_end_matches('/'),
      self.config.model
    )
  }

  /// `POST models/{model}:generateContent`, returning the answer text.
  async fn generate(&self, body: GenerateRequest) -> Result<String> {
    if self.config.api_key.trim().is_empty() {
      return Err(Error::MissingApiKey);
    }

    let resp = self
      .client
      .post(self.url())
      .header("x-goog-api-key", &self.config.api_key)
      .json(&body)
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(Error::Status { status: status.as_u16(), body });
    }

    let parsed: GenerateResponse = resp.json().await?;
    parsed.text().ok_or(Error::EmptyResponse)
  }
}

/// Models sometimes wrap JSON in a Markdown fence even when asked not to.
fn strip_fence(text: &str) -> &str {
  let trimmed = text.trim();
  trimmed
    .strip_prefix("```json")
    .or_else(|| trimmed.strip_prefix("```"))
    .and_then(|rest| rest.strip_suffix("```"))
    .map_or(trimmed, str::trim)
}

impl DesignBackend for GeminiClient {
  type Error = Error;

  async fn generate_designs(&self, request: DesignRequest) -> Result<Vec<ThemeDraft>> {
    let body = GenerateRequest::json(design_prompt(&request), theme_schema());
    let text = self.generate(body).await?;
    let drafts: Vec<ThemeDraft> = serde_json::from_str(strip_fence(&text))?;
    debug!(count = drafts.len(), model = %self.config.model, "parsed theme drafts");
    Ok(drafts)
  }

  async fn generate_bio(&self, request: BioRequest) -> Result<String> {
    let text = self.generate(GenerateRequest::text(bio_prompt(&request))).await?;
    Ok(text.trim().to_owned())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fences_are_stripped() {
    assert_eq!(strip_fence("```json\n[1]\n```"), "[1]");
    assert_eq!(strip_fence("```\n[]```"), "[]");
    assert_eq!(strip_fence("  [2] "), "[2]");
  }

  #[test]
  fn url_uses_model_and_trims_slash() {
    let client = GeminiClient::new(GeminiConfig {
      base_url: "http://localhost:9/".into(),
      ..GeminiConfig::default()
    })
    .unwrap();
    assert_eq!(
      client.url(),
      "http://localhost:9/v1beta/models/gemini-2.5-flash:generateContent"
    );
  }
}
