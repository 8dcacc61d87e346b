//! Theme and biography proposals with an always-degrade fallback policy.
//!
//! A [`DesignBackend`] is the external generator (an LLM behind an HTTP API).
//! [`ProposalService`] wraps it so that callers always get a usable answer:
//! any transport error, malformed payload or schema violation is replaced by
//! a fixed fallback and logged. The result is tagged so a caller can tell a
//! live answer from a degraded one, but the workflow treats both as success.

use std::future::Future;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::model::{AccentShape, ContactInfo, FontFamily, LayoutKind, Theme, ThemeDraft};

/// Number of candidates requested per batch.
pub const CANDIDATE_COUNT: usize = 6;

/// Style hint for the second and later batches, biased away from the
/// aesthetics a first batch usually covers.
pub const LOAD_MORE_STYLE_HINT: &str =
  "styl New Age, Minimalistyczny, Futurystyczny, Eteryczny, Czysta Typografia";

/// Used whenever a biography cannot be generated.
pub const FALLBACK_BIO: &str = "Doświadczony specjalista w swojej branży, nastawiony na \
                                innowacyjne rozwiązania i najwyższą jakość usług.";

// ─── Backend contract ────────────────────────────────────────────────────────

/// Business context sent to the theme generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignRequest {
  pub industry:     String,
  pub job_title:    String,
  pub company_name: String,
  /// Free text steering the batch towards a different aesthetic family.
  pub style_hint:   Option<String>,
  /// How many candidates to ask for.
  pub count:        usize,
}

impl DesignRequest {
  pub fn from_info(info: &ContactInfo, style_hint: Option<&str>) -> Self {
    Self {
      industry:     info.industry.clone(),
      job_title:    info.job_title.clone(),
      company_name: info.company_name.clone(),
      style_hint:   style_hint.map(str::to_owned),
      count:        CANDIDATE_COUNT,
    }
  }
}

/// Person details sent to the biography generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BioRequest {
  pub full_name: String,
  pub job_title: String,
  pub industry:  String,
}

impl BioRequest {
  pub fn from_info(info: &ContactInfo) -> Self {
    Self {
      full_name: info.full_name.clone(),
      job_title: info.job_title.clone(),
      industry:  info.industry.clone(),
    }
  }
}

/// An external generation backend. Both calls are fallible; the caller
/// decides what a failure means.
pub trait DesignBackend: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Produce candidate themes. Ids are assigned by the caller.
  fn generate_designs(
    &self,
    request: DesignRequest,
  ) -> impl Future<Output = Result<Vec<ThemeDraft>, Self::Error>> + Send + '_;

  /// Produce a short free-text biography.
  fn generate_bio(
    &self,
    request: BioRequest,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + '_;
}

// ─── Tagged result ───────────────────────────────────────────────────────────

/// A proposal and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Proposal<T> {
  /// Produced by the backend.
  Live(T),
  /// The backend failed; this is the fixed substitute.
  Fallback(T),
}

impl<T> Proposal<T> {
  pub fn is_fallback(&self) -> bool { matches!(self, Self::Fallback(_)) }

  pub fn value(&self) -> &T {
    match self {
      Self::Live(v) | Self::Fallback(v) => v,
    }
  }

  pub fn into_inner(self) -> T {
    match self {
      Self::Live(v) | Self::Fallback(v) => v,
    }
  }
}

// ─── Service ─────────────────────────────────────────────────────────────────

/// Why a live batch was rejected.
#[derive(Debug, thiserror::Error)]
enum Rejected<E> {
  #[error("backend error: {0}")]
  Backend(E),
  #[error("backend returned no candidates")]
  Empty,
  #[error("candidate {index} violates the theme schema: {source}")]
  Schema { index: usize, source: crate::Error },
}

/// Wraps a [`DesignBackend`] with the fallback policy.
#[derive(Debug, Clone)]
pub struct ProposalService<B> {
  backend: B,
}

impl<B: DesignBackend> ProposalService<B> {
  pub fn new(backend: B) -> Self { Self { backend } }

  pub fn backend(&self) -> &B { &self.backend }

  /// Ask for [`CANDIDATE_COUNT`] themes. Never fails: a rejected batch is
  /// replaced by [`fallback_themes`]. Every returned theme has a fresh id.
  pub async fn propose_themes(
    &self,
    info: &ContactInfo,
    style_hint: Option<&str>,
  ) -> Proposal<Vec<Theme>> {
    let request = DesignRequest::from_info(info, style_hint);
    match self.live_themes(request).await {
      Ok(themes) => {
        debug!(count = themes.len(), hinted = style_hint.is_some(), "received theme candidates");
        Proposal::Live(themes)
      }
      Err(error) => {
        warn!(%error, "theme generation failed; using fallback themes");
        Proposal::Fallback(fallback_themes())
      }
    }
  }

  async fn live_themes(
    &self,
    request: DesignRequest,
  ) -> Result<Vec<Theme>, Rejected<B::Error>> {
    let mut drafts = self
      .backend
      .generate_designs(request)
      .await
      .map_err(Rejected::Backend)?;

    if drafts.is_empty() {
      return Err(Rejected::Empty);
    }
    if drafts.len() > CANDIDATE_COUNT {
      debug!(count = drafts.len(), "truncating oversized candidate batch");
      drafts.truncate(CANDIDATE_COUNT);
    }
    for (index, draft) in drafts.iter().enumerate() {
      draft
        .validate()
        .map_err(|source| Rejected::Schema { index, source })?;
    }

    Ok(
      drafts
        .into_iter()
        .map(|draft| draft.into_theme(Uuid::new_v4()))
        .collect(),
    )
  }

  /// Ask for a short biography. Never fails: errors and blank answers are
  /// replaced by [`FALLBACK_BIO`]. The caller is responsible for checking
  /// [`ContactInfo::validate_for_bio`] first.
  pub async fn propose_bio(&self, info: &ContactInfo) -> Proposal<String> {
    match self.backend.generate_bio(BioRequest::from_info(info)).await {
      Ok(bio) if !bio.trim().is_empty() => Proposal::Live(bio.trim().to_owned()),
      Ok(_) => {
        warn!("biography generation returned nothing; using fallback");
        Proposal::Fallback(FALLBACK_BIO.to_owned())
      }
      Err(error) => {
        warn!(%error, "biography generation failed; using fallback");
        Proposal::Fallback(FALLBACK_BIO.to_owned())
      }
    }
  }
}

// ─── Fallback data ───────────────────────────────────────────────────────────

fn fallback_drafts() -> [ThemeDraft; 2] {
  [
    ThemeDraft {
      name:             "Classic Elegant".into(),
      layout:           LayoutKind::Luxury,
      primary_color:    "#C7A038".into(),
      secondary_color:  "#1A1A1A".into(),
      background_color: "#0F0F0F".into(),
      text_color:       "#FFFFFF".into(),
      font:             FontFamily::Cormorant,
      slogan:           "Excellence in every detail.".into(),
      accent:           AccentShape::Line,
    },
    ThemeDraft {
      name:             "Modern Minimal".into(),
      layout:           LayoutKind::Minimal,
      primary_color:    "#3B82F6".into(),
      secondary_color:  "#E5E7EB".into(),
      background_color: "#FFFFFF".into(),
      text_color:       "#111827".into(),
      font:             FontFamily::Poppins,
      slogan:           "Simple solutions.".into(),
      accent:           AccentShape::None,
    },
  ]
}

/// The fixed themes used when generation fails, with fresh ids so that ids
/// are never repeated within a session.
pub fn fallback_themes() -> Vec<Theme> {
  fallback_drafts()
    .into_iter()
    .map(|draft| draft.into_theme(Uuid::new_v4()))
    .collect()
}
